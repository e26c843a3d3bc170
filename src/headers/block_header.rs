//! Legacy block header, versions 1-4: 32 bytes, 8 32-bit words (spec §3
//! "Block", §6). Versions 1-3 reuse words 4/5 as start/end markers instead
//! of bit-info; version 4 is the first to carry a real bit-info word.

use crate::buffer::ByteBuffer;
use crate::byte_order::{ByteOrder, MAGIC};
use crate::error::{err, Result, Status};
use crate::headers::bit_info::BitInfo;

pub const BLOCK_HEADER_WORDS: u32 = 8;
pub const BLOCK_HEADER_BYTES: usize = (BLOCK_HEADER_WORDS as usize) * 4;

#[derive(Clone, Debug)]
pub struct BlockHeader {
    pub block_words: u32,
    pub block_number: u32,
    pub event_count: u32,
    /// v1-3 only: the word offset of the first event's start (0 means an
    /// event spans from a prior block — spec §9 open question, rejected by
    /// this implementation with `BadFormat`).
    pub start: u32,
    /// v1-3 only: the word offset one past the last valid word in the block.
    pub end: u32,
    pub bit_info_version: u32,
}

impl BlockHeader {
    pub fn version(&self) -> u8 {
        BitInfo::get_field(self.bit_info_version, BitInfo::VERSION_SHIFT, BitInfo::VERSION_MASK) as u8
    }

    pub fn has_dictionary(&self) -> bool {
        self.version() >= 4 && BitInfo::get_bit(self.bit_info_version, BitInfo::DICTIONARY_BIT)
    }

    pub fn is_last_block(&self) -> bool {
        self.version() >= 4 && BitInfo::get_bit(self.bit_info_version, 9)
    }

    pub fn event_type(&self) -> u8 {
        BitInfo::get_field(self.bit_info_version, 10, 0xf) as u8
    }

    pub fn has_first_event(&self) -> bool {
        self.version() >= 4 && BitInfo::get_bit(self.bit_info_version, 14)
    }

    pub fn length_in_words(&self) -> u32 {
        BLOCK_HEADER_WORDS
    }

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        buf.put_u32_at(offset, self.block_words)?;
        buf.put_u32_at(offset + 4, self.block_number)?;
        buf.put_u32_at(offset + 8, BLOCK_HEADER_WORDS)?;
        buf.put_u32_at(offset + 12, self.event_count)?;
        if self.version() >= 4 {
            buf.put_u32_at(offset + 16, 0)?;
            buf.put_u32_at(offset + 20, self.bit_info_version)?;
            buf.put_u32_at(offset + 24, 0)?;
        } else {
            buf.put_u32_at(offset + 16, self.start)?;
            buf.put_u32_at(offset + 20, self.end)?;
            buf.put_u32_at(offset + 24, 0)?;
        }
        buf.put_u32_at(offset + 28, MAGIC)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<BlockHeader> {
        let order = ByteOrder::detect(buf.array(), offset + 28)?;
        let mut local = buf.clone();
        local.set_order(order);

        let block_words = local.get_u32_at(offset)?;
        let block_number = local.get_u32_at(offset + 4)?;
        let header_words = local.get_u32_at(offset + 8)?;
        if header_words != BLOCK_HEADER_WORDS {
            return err(Status::BadHeaderLength, "block header length must be 8 words");
        }
        let event_count = local.get_u32_at(offset + 12)?;
        let word4 = local.get_u32_at(offset + 16)?;
        let word5 = local.get_u32_at(offset + 20)?;

        // Version 4 puts the bit-info/version word at offset+20; versions
        // 1-3 leave it zero, so a nonzero low byte there is our signal.
        let version_guess = (word5 & 0xff) as u8;
        let (start, end, bit_info_version) = if (1..=4).contains(&version_guess) && version_guess == 4 {
            (0, 0, word5)
        } else {
            (word4, word5, 0u32)
        };

        if (1..=3).contains(&version_guess) && start == 0 {
            return err(Status::BadFormat, "v1-3 block with start=0 (event spanning three blocks) is not supported");
        }

        Ok(BlockHeader { block_words, block_number, event_count, start, end, bit_info_version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_round_trip() {
        let h = BlockHeader {
            block_words: 100,
            block_number: 1,
            event_count: 2,
            start: 0,
            end: 0,
            bit_info_version: 4,
        };
        let mut buf = ByteBuffer::with_capacity(BLOCK_HEADER_BYTES, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        let decoded = BlockHeader::decode(&buf, 0).unwrap();
        assert_eq!(decoded.version(), 4);
        assert_eq!(decoded.block_words, 100);
    }
}
