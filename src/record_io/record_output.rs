//! Accumulates whole, already-serialized events into one record and builds
//! its on-disk bytes (spec §4.3 "Record assembly"). One `RecordOutput`
//! backs one record; the writer pipeline owns a pool of them.

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::compression;
use crate::error::{err, Result, Status};
use crate::headers::bit_info::{padding_for, HeaderType};
use crate::headers::record_header::{CompressionType, RecordHeader, RECORD_HEADER_BYTES};

pub struct RecordOutput {
    order: ByteOrder,
    events: Vec<Vec<u8>>,
    user_header: Option<Vec<u8>>,
    max_event_count: usize,
    max_uncompressed_bytes: usize,
    record_number: u32,
}

impl RecordOutput {
    pub fn new(order: ByteOrder, max_event_count: usize, max_uncompressed_bytes: usize) -> Self {
        RecordOutput { order, events: Vec::new(), user_header: None, max_event_count, max_uncompressed_bytes, record_number: 1 }
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn uncompressed_bytes(&self) -> usize {
        self.events.iter().map(|e| e.len()).sum()
    }

    pub fn set_record_number(&mut self, n: u32) {
        self.record_number = n;
    }

    pub fn set_user_header(&mut self, bytes: Vec<u8>) {
        self.user_header = Some(bytes);
    }

    /// Returns `Err(Status::BufferOverflow)` if adding `event` would exceed
    /// either configured limit without adding it — callers are expected to
    /// flush the current record and retry on a fresh one.
    pub fn add_event(&mut self, event: &[u8]) -> Result<()> {
        if event.len() % 4 != 0 {
            return err(Status::BadFormat, "event bytes must be a whole number of words");
        }
        if self.events.len() + 1 > self.max_event_count {
            return err(Status::BufferOverflow, "record event count limit reached");
        }
        if self.uncompressed_bytes() + event.len() > self.max_uncompressed_bytes {
            return err(Status::BufferOverflow, "record uncompressed size limit reached");
        }
        self.events.push(event.to_vec());
        Ok(())
    }

    pub fn reset(&mut self) {
        self.events.clear();
        self.user_header = None;
    }

    fn index_array(&self) -> Vec<u8> {
        let mut idx = ByteBuffer::with_capacity(0, self.order);
        for e in &self.events {
            idx.put_u32(e.len() as u32).unwrap();
        }
        idx.array().to_vec()
    }

    /// Builds the complete record: header, index array, user header,
    /// compressed event data — each section individually word-padded (spec
    /// §4.2 "Record header").
    pub fn build(&self, compression: CompressionType, is_last: bool) -> Result<Vec<u8>> {
        let index_array = self.index_array();
        let mut event_data = Vec::new();
        for e in &self.events {
            event_data.extend_from_slice(e);
        }
        let uncompressed_len = event_data.len();
        let compressed = compression::compress(compression, &event_data)?;

        let mut header = RecordHeader::new();
        header.set_header_type(HeaderType::HipoRecord);
        header.record_number = self.record_number;
        header.entry_count = self.events.len() as u32;
        header.index_array_bytes = index_array.len() as u32;
        header.compression_type = compression;
        header.set_is_last_record(is_last);
        if let Some(uh) = &self.user_header {
            header.set_user_header_length(uh.len());
        }
        header.set_data_length(uncompressed_len as u32);
        header.set_compressed_data_length(compressed.len());

        let user_header_padded_len = self.user_header.as_ref().map(|u| u.len() + padding_for(u.len()) as usize).unwrap_or(0);
        let compressed_padded_len = compressed.len() + padding_for(compressed.len()) as usize;
        let total_bytes = RECORD_HEADER_BYTES + index_array.len() + user_header_padded_len + compressed_padded_len;
        header.set_length_words((total_bytes / 4) as u32);

        let mut buf = ByteBuffer::with_capacity(total_bytes, self.order);
        header.encode(&mut buf, 0)?;
        buf.set_position(RECORD_HEADER_BYTES)?;
        buf.put_bytes(&index_array)?;
        if let Some(uh) = &self.user_header {
            buf.put_bytes(uh)?;
            for _ in 0..padding_for(uh.len()) {
                buf.put_u8(0)?;
            }
        }
        buf.put_bytes(&compressed)?;
        for _ in 0..padding_for(compressed.len()) {
            buf.put_u8(0)?;
        }
        Ok(buf.array().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_event_count_over_limit() {
        let mut out = RecordOutput::new(ByteOrder::Little, 1, 1 << 20);
        out.add_event(&[0u8; 4]).unwrap();
        assert!(out.add_event(&[0u8; 4]).is_err());
    }

    #[test]
    fn builds_uncompressed_record() {
        let mut out = RecordOutput::new(ByteOrder::Little, 10, 1 << 20);
        out.add_event(&[1, 0, 0, 0, 2, 0, 0, 0]).unwrap();
        out.add_event(&[3, 0, 0, 0]).unwrap();
        let bytes = out.build(CompressionType::None, true).unwrap();
        assert_eq!(bytes.len() % 4, 0);
        assert!(bytes.len() >= RECORD_HEADER_BYTES);
    }
}
