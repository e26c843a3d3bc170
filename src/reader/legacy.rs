//! Sequential reader for version 1-4, block-based files (spec §4 "Legacy
//! block format"). Each block is read in full before moving to the next;
//! `block_number` must increase by exactly one each time or the file is
//! rejected with `Status::BlockSequence`.

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::error::{err, Result, Status};
use crate::headers::block_header::{BlockHeader, BLOCK_HEADER_BYTES};

pub struct LegacyReader {
    events: Vec<Vec<u8>>,
    has_dictionary: bool,
    has_first_event: bool,
}

impl LegacyReader {
    pub fn parse(bytes: &[u8]) -> Result<LegacyReader> {
        let order = ByteOrder::detect(bytes, 28)?;
        let buf = ByteBuffer::wrap(bytes.to_vec(), order);

        let mut events = Vec::new();
        let mut has_dictionary = false;
        let mut has_first_event = false;
        let mut prev_block_number: Option<u32> = None;
        let mut pos = 0usize;

        loop {
            if pos + BLOCK_HEADER_BYTES > bytes.len() {
                break;
            }
            let header = BlockHeader::decode(&buf, pos)?;
            if let Some(prev) = prev_block_number {
                if header.block_number != prev + 1 {
                    return err(Status::BlockSequence, "block numbers must increase by exactly one");
                }
            }
            prev_block_number = Some(header.block_number);
            has_dictionary |= header.has_dictionary();
            has_first_event |= header.has_first_event();

            let block_end = pos + (header.block_words as usize) * 4;
            if block_end > bytes.len() || block_end < pos + BLOCK_HEADER_BYTES {
                return err(Status::TruncatedHeader, "block length runs past end of buffer");
            }

            let mut epos = pos + BLOCK_HEADER_BYTES;
            for _ in 0..header.event_count {
                if epos + 8 > block_end {
                    return err(Status::TruncatedHeader, "block ended mid-event");
                }
                let bank_len = buf.get_u32_at(epos)?;
                let total = (bank_len as usize + 1) * 4;
                if epos + total > block_end {
                    return err(Status::TruncatedHeader, "event length runs past end of block");
                }
                events.push(buf.get_bytes_at(epos, total)?.to_vec());
                epos += total;
            }

            let is_last = header.is_last_block();
            pos = block_end;
            if is_last {
                break;
            }
        }

        Ok(LegacyReader { events, has_dictionary, has_first_event })
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn event(&self, index: usize) -> &[u8] {
        &self.events[index]
    }

    pub fn has_dictionary(&self) -> bool {
        self.has_dictionary
    }

    pub fn has_first_event(&self) -> bool {
        self.has_first_event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::bit_info::BitInfo;

    fn single_event_block(event_bytes: &[u8], is_last: bool) -> Vec<u8> {
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        let block_words = (BLOCK_HEADER_BYTES + event_bytes.len()) / 4;
        let mut bit_info = 4u32; // version 4
        if is_last {
            bit_info = BitInfo::set_bit(bit_info, 9, true);
        }
        let header = BlockHeader {
            block_words: block_words as u32,
            block_number: 1,
            event_count: 1,
            start: 0,
            end: 0,
            bit_info_version: bit_info,
        };
        header.encode(&mut buf, 0).unwrap();
        buf.put_bytes(event_bytes).unwrap();
        buf.array().to_vec()
    }

    #[test]
    fn parses_single_block_single_event() {
        let event = {
            let mut buf = ByteBuffer::with_capacity(8, ByteOrder::Little);
            buf.put_u32_at(0, 1).unwrap(); // length: 1 (2 header words - 1)
            buf.put_u32_at(4, 0).unwrap();
            buf.array().to_vec()
        };
        let bytes = single_event_block(&event, true);
        let reader = LegacyReader::parse(&bytes).unwrap();
        assert_eq!(reader.event_count(), 1);
        assert_eq!(reader.event(0).len(), 8);
    }
}
