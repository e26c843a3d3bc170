//! Decodes a record's header, index array and event-data section, exposing
//! each event's raw bytes by index (spec §4.3 "Record assembly", reverse
//! direction).

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::compression;
use crate::error::{err, Result, Status};
use crate::headers::record_header::{RecordHeader, RECORD_HEADER_BYTES};

pub struct RecordInput {
    pub header: RecordHeader,
    event_offsets: Vec<(usize, usize)>,
    event_data: Vec<u8>,
    user_header: Vec<u8>,
}

impl RecordInput {
    /// Decodes the record starting at `offset` in `buf`. `buf`'s own byte
    /// order is overridden by whatever the header's magic-word check
    /// detects, matching every other header type in this crate.
    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<RecordInput> {
        let header = RecordHeader::decode(buf, offset)?;
        let order = ByteOrder::detect(buf.array(), offset + 28)?;

        let index_start = offset + RECORD_HEADER_BYTES;
        let index_bytes = header.index_array_bytes as usize;
        let mut index_buf = ByteBuffer::wrap(buf.get_bytes_at(index_start, index_bytes)?.to_vec(), order);
        let mut lengths = Vec::with_capacity(header.entry_count as usize);
        for _ in 0..header.entry_count {
            lengths.push(index_buf.get_u32()? as usize);
        }

        let user_header_start = index_start + index_bytes;
        let user_header_padded = header.user_header_bytes as usize + header.user_header_padding() as usize;
        let user_header = buf.get_bytes_at(user_header_start, header.user_header_bytes as usize)?.to_vec();

        let compressed_start = user_header_start + user_header_padded;
        let compressed_bytes = (header.compressed_words as usize) * 4;
        let compressed = buf.get_bytes_at(compressed_start, compressed_bytes)?;
        let event_data = compression::decompress(header.compression_type, compressed, header.uncompressed_data_bytes as usize)?;

        if event_data.len() != header.uncompressed_data_bytes as usize {
            return err(Status::BadFormat, "decompressed event data length mismatch");
        }
        let mut event_offsets = Vec::with_capacity(lengths.len());
        let mut pos = 0usize;
        for len in lengths {
            if pos + len > event_data.len() {
                return err(Status::BadFormat, "event index array overruns decompressed data");
            }
            event_offsets.push((pos, len));
            pos += len;
        }

        Ok(RecordInput { header, event_offsets, event_data, user_header })
    }

    pub fn event_count(&self) -> usize {
        self.event_offsets.len()
    }

    pub fn event(&self, index: usize) -> Result<&[u8]> {
        let (start, len) = *self.event_offsets.get(index).ok_or_else(|| {
            crate::error::EvioError::new(Status::IndexOutOfRange, Some("event index out of range"))
        })?;
        Ok(&self.event_data[start..start + len])
    }

    pub fn user_header(&self) -> &[u8] {
        &self.user_header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::record_header::CompressionType;
    use crate::record_io::record_output::RecordOutput;

    #[test]
    fn round_trips_through_output_and_input() {
        let mut out = RecordOutput::new(ByteOrder::Little, 10, 1 << 20);
        out.add_event(&[1, 0, 0, 0]).unwrap();
        out.add_event(&[2, 0, 0, 0, 3, 0, 0, 0]).unwrap();
        let bytes = out.build(CompressionType::Lz4Fast, true).unwrap();

        let buf = ByteBuffer::wrap(bytes, ByteOrder::Little);
        let input = RecordInput::decode(&buf, 0).unwrap();
        assert_eq!(input.event_count(), 2);
        assert_eq!(input.event(0).unwrap(), &[1, 0, 0, 0]);
        assert_eq!(input.event(1).unwrap(), &[2, 0, 0, 0, 3, 0, 0, 0]);
    }
}
