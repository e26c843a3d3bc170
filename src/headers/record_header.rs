//! Record header: 56 bytes, 14 32-bit words (spec §3 "Record", §6).

use crate::buffer::ByteBuffer;
use crate::byte_order::{ByteOrder, MAGIC};
use crate::error::{err, Result, Status};
use crate::headers::bit_info::{padding_for, BitInfo, HeaderType};
use crate::headers::HeaderState;

pub const RECORD_HEADER_WORDS: u32 = 14;
pub const RECORD_HEADER_BYTES: usize = (RECORD_HEADER_WORDS as usize) * 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CompressionType {
    None,
    Lz4Fast,
    Lz4Best,
    Gzip,
}

impl CompressionType {
    pub fn code(self) -> u32 {
        match self {
            CompressionType::None => 0,
            CompressionType::Lz4Fast => 1,
            CompressionType::Lz4Best => 2,
            CompressionType::Gzip => 3,
        }
    }

    pub fn from_code(code: u32) -> Result<CompressionType> {
        Ok(match code {
            0 => CompressionType::None,
            1 => CompressionType::Lz4Fast,
            2 => CompressionType::Lz4Best,
            3 => CompressionType::Gzip,
            _ => return err(Status::BadFormat, "unrecognized compression type code"),
        })
    }
}

/// The 14-word record header, plus the state machine that tracks how far
/// along its fields are (spec §4.2): `Empty -> LengthsSet -> Written`.
#[derive(Clone, Debug)]
pub struct RecordHeader {
    pub record_words: u32,
    pub record_number: u32,
    pub entry_count: u32,
    pub index_array_bytes: u32,
    pub bit_info_version: u32,
    pub user_header_bytes: u32,
    pub uncompressed_data_bytes: u32,
    pub compression_type: CompressionType,
    pub compressed_words: u32,
    pub user_register_1: u64,
    pub user_register_2: u64,

    state: HeaderState,
}

impl Default for RecordHeader {
    fn default() -> Self {
        RecordHeader {
            record_words: 0,
            record_number: 1,
            entry_count: 0,
            index_array_bytes: 0,
            bit_info_version: 6,
            user_header_bytes: 0,
            uncompressed_data_bytes: 0,
            compression_type: CompressionType::None,
            compressed_words: 0,
            user_register_1: 0,
            user_register_2: 0,
            state: HeaderState::Empty,
        }
    }
}

impl RecordHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn version(&self) -> u8 {
        BitInfo::get_field(self.bit_info_version, BitInfo::VERSION_SHIFT, BitInfo::VERSION_MASK) as u8
    }

    pub fn set_version(&mut self, version: u8) {
        self.bit_info_version =
            BitInfo::set_field(self.bit_info_version, BitInfo::VERSION_SHIFT, BitInfo::VERSION_MASK, version as u32);
    }

    pub fn has_dictionary(&self) -> bool {
        BitInfo::get_bit(self.bit_info_version, BitInfo::DICTIONARY_BIT)
    }

    pub fn set_has_dictionary(&mut self, v: bool) {
        self.bit_info_version = BitInfo::set_bit(self.bit_info_version, BitInfo::DICTIONARY_BIT, v);
    }

    pub fn has_first_event(&self) -> bool {
        BitInfo::get_bit(self.bit_info_version, BitInfo::FIRST_EVENT_BIT)
    }

    pub fn set_has_first_event(&mut self, v: bool) {
        self.bit_info_version = BitInfo::set_bit(self.bit_info_version, BitInfo::FIRST_EVENT_BIT, v);
    }

    pub fn is_last_record(&self) -> bool {
        BitInfo::get_bit(self.bit_info_version, BitInfo::BIT10)
    }

    pub fn set_is_last_record(&mut self, v: bool) {
        self.bit_info_version = BitInfo::set_bit(self.bit_info_version, BitInfo::BIT10, v);
    }

    pub fn event_type(&self) -> u8 {
        BitInfo::get_field(self.bit_info_version, BitInfo::EVENT_TYPE_SHIFT, BitInfo::EVENT_TYPE_MASK) as u8
    }

    pub fn set_event_type(&mut self, t: u8) {
        self.bit_info_version =
            BitInfo::set_field(self.bit_info_version, BitInfo::EVENT_TYPE_SHIFT, BitInfo::EVENT_TYPE_MASK, t as u32);
    }

    pub fn header_type(&self) -> Option<HeaderType> {
        HeaderType::from_code(BitInfo::get_field(
            self.bit_info_version,
            BitInfo::HEADER_TYPE_SHIFT,
            BitInfo::HEADER_TYPE_MASK,
        ))
    }

    pub fn set_header_type(&mut self, t: HeaderType) {
        self.bit_info_version = BitInfo::set_field(
            self.bit_info_version,
            BitInfo::HEADER_TYPE_SHIFT,
            BitInfo::HEADER_TYPE_MASK,
            t.code(),
        );
    }

    fn set_pad(&mut self, shift: u32, bytes: usize) {
        self.bit_info_version =
            BitInfo::set_field(self.bit_info_version, shift, BitInfo::PAD_MASK, padding_for(bytes) as u32);
    }

    fn get_pad(&self, shift: u32) -> u8 {
        BitInfo::get_field(self.bit_info_version, shift, BitInfo::PAD_MASK) as u8
    }

    pub fn user_header_padding(&self) -> u8 {
        self.get_pad(BitInfo::PAD1_SHIFT)
    }

    pub fn data_padding(&self) -> u8 {
        self.get_pad(BitInfo::PAD2_SHIFT)
    }

    pub fn compressed_data_padding(&self) -> u8 {
        self.get_pad(BitInfo::PAD3_SHIFT)
    }

    /// Sets the total record length in words and transitions to `LengthsSet`.
    pub fn set_length_words(&mut self, words: u32) {
        self.record_words = words;
        self.state = HeaderState::LengthsSet;
    }

    /// Sets the uncompressed event-data length in bytes, recomputing its
    /// padding field.
    pub fn set_data_length(&mut self, bytes: u32) {
        self.uncompressed_data_bytes = bytes;
        self.set_pad(BitInfo::PAD2_SHIFT, bytes as usize);
        self.state = HeaderState::LengthsSet;
    }

    /// Sets the compressed-data length in words and recomputes the padding
    /// used to round the compressed blob up to a 4-byte boundary.
    pub fn set_compressed_data_length(&mut self, bytes: usize) {
        self.compressed_words = ((bytes + 3) / 4) as u32;
        self.set_pad(BitInfo::PAD3_SHIFT, bytes);
        self.state = HeaderState::LengthsSet;
    }

    pub fn set_user_header_length(&mut self, bytes: usize) {
        self.user_header_bytes = bytes as u32;
        self.set_pad(BitInfo::PAD1_SHIFT, bytes);
    }

    pub fn length_in_words(&self) -> u32 {
        RECORD_HEADER_WORDS
    }

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        if self.state == HeaderState::Empty {
            return err(Status::BadFormat, "cannot encode a record header with no lengths set");
        }
        buf.put_u32_at(offset, self.record_words)?;
        buf.put_u32_at(offset + 4, self.record_number)?;
        buf.put_u32_at(offset + 8, RECORD_HEADER_WORDS)?;
        buf.put_u32_at(offset + 12, self.entry_count)?;
        buf.put_u32_at(offset + 16, self.index_array_bytes)?;
        buf.put_u32_at(offset + 20, self.bit_info_version)?;
        buf.put_u32_at(offset + 24, self.user_header_bytes)?;
        buf.put_u32_at(offset + 28, MAGIC)?;
        buf.put_u32_at(offset + 32, self.uncompressed_data_bytes)?;
        let word10 = (self.compression_type.code() << 28) | (self.compressed_words & 0x0fff_ffff);
        buf.put_u32_at(offset + 36, word10)?;
        buf.put_u32_at(offset + 40, (self.user_register_1 & 0xffff_ffff) as u32)?;
        buf.put_u32_at(offset + 44, (self.user_register_1 >> 32) as u32)?;
        buf.put_u32_at(offset + 48, (self.user_register_2 & 0xffff_ffff) as u32)?;
        buf.put_u32_at(offset + 52, (self.user_register_2 >> 32) as u32)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<RecordHeader> {
        let order = ByteOrder::detect(buf.array(), offset + 28)?;
        let mut local = buf.clone();
        local.set_order(order);

        let record_words = local.get_u32_at(offset)?;
        let record_number = local.get_u32_at(offset + 4)?;
        let header_words = local.get_u32_at(offset + 8)?;
        if header_words != RECORD_HEADER_WORDS {
            return err(Status::BadHeaderLength, "record header length must be 14 words");
        }
        let entry_count = local.get_u32_at(offset + 12)?;
        let index_array_bytes = local.get_u32_at(offset + 16)?;
        if index_array_bytes % 4 != 0 {
            return err(Status::BadFormat, "index array length must be a multiple of 4");
        }
        let bit_info_version = local.get_u32_at(offset + 20)?;
        let user_header_bytes = local.get_u32_at(offset + 24)?;
        let uncompressed_data_bytes = local.get_u32_at(offset + 32)?;
        let word10 = local.get_u32_at(offset + 36)?;
        let compression_type = CompressionType::from_code(word10 >> 28)?;
        let compressed_words = word10 & 0x0fff_ffff;
        let reg1_lo = local.get_u32_at(offset + 40)? as u64;
        let reg1_hi = local.get_u32_at(offset + 44)? as u64;
        let reg2_lo = local.get_u32_at(offset + 48)? as u64;
        let reg2_hi = local.get_u32_at(offset + 52)? as u64;

        let header_bytes = RECORD_HEADER_BYTES as u32;
        let user_header_padded = user_header_bytes + padding_for(user_header_bytes as usize) as u32;
        let compressed_bytes = compressed_words * 4;
        let max_compressed =
            (record_words * 4).saturating_sub(header_bytes).saturating_sub(index_array_bytes).saturating_sub(user_header_padded);
        if compression_type != CompressionType::None && compressed_bytes > max_compressed {
            return err(Status::BadFormat, "compressed data length exceeds record bounds");
        }

        Ok(RecordHeader {
            record_words,
            record_number,
            entry_count,
            index_array_bytes,
            bit_info_version,
            user_header_bytes,
            uncompressed_data_bytes,
            compression_type,
            compressed_words,
            user_register_1: reg1_lo | (reg1_hi << 32),
            user_register_2: reg2_lo | (reg2_hi << 32),
            state: HeaderState::Written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(h: &RecordHeader) -> ByteBuffer {
        let mut buf = ByteBuffer::with_capacity(RECORD_HEADER_BYTES, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        buf
    }

    #[test]
    fn encode_requires_lengths_set() {
        let h = RecordHeader::new();
        let mut buf = ByteBuffer::with_capacity(RECORD_HEADER_BYTES, ByteOrder::Little);
        assert!(h.encode(&mut buf, 0).is_err());
    }

    #[test]
    fn round_trip() {
        let mut h = RecordHeader::new();
        h.set_data_length(17);
        h.set_length_words(20);
        h.entry_count = 3;
        h.set_has_dictionary(true);
        h.user_register_1 = 0x1122_3344_5566_7788;
        let buf = encoded(&h);
        let decoded = RecordHeader::decode(&buf, 0).unwrap();
        assert_eq!(decoded.record_words, 20);
        assert_eq!(decoded.entry_count, 3);
        assert!(decoded.has_dictionary());
        assert_eq!(decoded.user_register_1, 0x1122_3344_5566_7788);
        assert_eq!(decoded.data_padding(), 3);
    }

    #[test]
    fn bad_header_length_rejected() {
        let mut buf = ByteBuffer::with_capacity(RECORD_HEADER_BYTES, ByteOrder::Little);
        buf.put_u32_at(8, 13).unwrap();
        buf.put_u32_at(28, MAGIC).unwrap();
        assert!(RecordHeader::decode(&buf, 0).is_err());
    }
}
