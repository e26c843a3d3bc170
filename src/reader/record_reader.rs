//! Reader for version 6, record-based files (spec §4 "File", §4.3
//! "Record"). Prefers the trailer's record-length index for O(1) seeking;
//! falls back to a sequential scan if the trailer is missing, truncated, or
//! the caller asked to ignore it (`ReaderOptions::ignore_trailer_index`).

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::error::{err, Result, Status};
use crate::headers::file_header::{FileHeader, FILE_HEADER_BYTES};
use crate::headers::record_header::RECORD_HEADER_BYTES;
use crate::record_io::RecordInput;
use crate::reader::options::ReaderOptions;

pub struct RecordBasedReader {
    buf: ByteBuffer,
    pub file_header: FileHeader,
    /// Byte offset of each record in the file, in order.
    record_offsets: Vec<usize>,
}

impl RecordBasedReader {
    pub fn open(bytes: Vec<u8>, options: &ReaderOptions) -> Result<RecordBasedReader> {
        let order = ByteOrder::detect(&bytes, 28)?;
        let buf = ByteBuffer::wrap(bytes, order);
        let file_header = FileHeader::decode(&buf, 0)?;

        let record_offsets = if !options.ignore_trailer_index && file_header.has_trailer_with_index() && file_header.trailer_position > 0 {
            Self::offsets_from_trailer(&buf, &file_header)?
        } else {
            Self::offsets_by_scanning(&buf, &file_header)?
        };

        Ok(RecordBasedReader { buf, file_header, record_offsets })
    }

    fn offsets_from_trailer(buf: &ByteBuffer, file_header: &FileHeader) -> Result<Vec<usize>> {
        let trailer_pos = file_header.trailer_position as usize;
        let trailer = crate::headers::record_header::RecordHeader::decode(buf, trailer_pos)?;
        let index_start = trailer_pos + RECORD_HEADER_BYTES;
        let mut idx_buf = ByteBuffer::wrap(buf.get_bytes_at(index_start, trailer.index_array_bytes as usize)?.to_vec(), buf.order());
        let mut offsets = Vec::with_capacity(trailer.entry_count as usize);
        let mut pos = FILE_HEADER_BYTES;
        for _ in 0..trailer.entry_count {
            offsets.push(pos);
            let words = idx_buf.get_u32()?;
            pos += (words as usize) * 4;
        }
        Ok(offsets)
    }

    fn offsets_by_scanning(buf: &ByteBuffer, _file_header: &FileHeader) -> Result<Vec<usize>> {
        let mut offsets = Vec::new();
        let mut pos = FILE_HEADER_BYTES;
        loop {
            if pos + RECORD_HEADER_BYTES > buf.array().len() {
                break;
            }
            let header = crate::headers::record_header::RecordHeader::decode(buf, pos)?;
            if header.header_type() == Some(crate::headers::bit_info::HeaderType::HipoTrailer)
                || header.header_type() == Some(crate::headers::bit_info::HeaderType::EvioTrailer)
            {
                break;
            }
            offsets.push(pos);
            let total_bytes = (header.record_words as usize) * 4;
            if total_bytes == 0 {
                return err(Status::BadFormat, "record with zero length while scanning");
            }
            pos += total_bytes;
        }
        Ok(offsets)
    }

    pub fn record_count(&self) -> usize {
        self.record_offsets.len()
    }

    pub fn read_record(&self, index: usize) -> Result<RecordInput> {
        let offset = *self.record_offsets.get(index).ok_or_else(|| {
            crate::error::EvioError::new(Status::IndexOutOfRange, Some("record index out of range"))
        })?;
        RecordInput::decode(&self.buf, offset)
    }
}
