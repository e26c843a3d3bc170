//! File header: 56 bytes, 14 32-bit words (spec §3 "File", §6).

use crate::buffer::ByteBuffer;
use crate::byte_order::{ByteOrder, MAGIC};
use crate::error::{err, Result, Status};
use crate::headers::bit_info::{BitInfo, HeaderType};
use crate::headers::HeaderState;

pub const FILE_HEADER_WORDS: u32 = 14;
pub const FILE_HEADER_BYTES: usize = (FILE_HEADER_WORDS as usize) * 4;

pub const HIPO_FILE_ID: u32 = 0x4849_504f; // "HIPO"
pub const EVIO_FILE_ID: u32 = 0x4556_494f; // "EVIO"

pub const DEFAULT_VERSION: u8 = 6;

#[derive(Clone, Debug)]
pub struct FileHeader {
    pub id: u32,
    pub file_number: u32,
    pub record_count: u32,
    pub index_array_bytes: u32,
    pub bit_info_version: u32,
    pub user_header_bytes: u32,
    pub user_register: u64,
    pub trailer_position: u64,
    pub user_int_1: u32,
    pub user_int_2: u32,

    state: HeaderState,
}

impl Default for FileHeader {
    fn default() -> Self {
        let mut h = FileHeader {
            id: HIPO_FILE_ID,
            file_number: 0,
            record_count: 0,
            index_array_bytes: 0,
            bit_info_version: 0,
            user_header_bytes: 0,
            user_register: 0,
            trailer_position: 0,
            user_int_1: 0,
            user_int_2: 0,
            state: HeaderState::Empty,
        };
        h.set_version(DEFAULT_VERSION);
        h.set_header_type(HeaderType::HipoFile);
        h
    }
}

impl FileHeader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u8 {
        BitInfo::get_field(self.bit_info_version, BitInfo::VERSION_SHIFT, BitInfo::VERSION_MASK) as u8
    }

    pub fn set_version(&mut self, v: u8) {
        self.bit_info_version = BitInfo::set_field(self.bit_info_version, BitInfo::VERSION_SHIFT, BitInfo::VERSION_MASK, v as u32);
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

    pub fn has_trailer_with_index(&self) -> bool {
        BitInfo::get_bit(self.bit_info_version, BitInfo::BIT10)
    }

    pub fn set_has_trailer_with_index(&mut self, v: bool) {
        self.bit_info_version = BitInfo::set_bit(self.bit_info_version, BitInfo::BIT10, v);
    }

    pub fn header_type(&self) -> Option<HeaderType> {
        HeaderType::from_code(BitInfo::get_field(self.bit_info_version, BitInfo::HEADER_TYPE_SHIFT, BitInfo::HEADER_TYPE_MASK))
    }

    pub fn set_header_type(&mut self, t: HeaderType) {
        self.bit_info_version =
            BitInfo::set_field(self.bit_info_version, BitInfo::HEADER_TYPE_SHIFT, BitInfo::HEADER_TYPE_MASK, t.code());
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    pub fn set_trailer_position(&mut self, pos: u64) {
        self.trailer_position = pos;
        self.state = HeaderState::LengthsSet;
    }

    pub fn length_in_words(&self) -> u32 {
        FILE_HEADER_WORDS
    }

    /// Per spec §9 open question: `reset` clears every field *except*
    /// restoring `headerVersion` to the library default, 6.
    pub fn reset(&mut self) {
        let id = self.id;
        *self = FileHeader::default();
        self.id = id;
    }

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        buf.put_u32_at(offset, self.id)?;
        buf.put_u32_at(offset + 4, self.file_number)?;
        buf.put_u32_at(offset + 8, FILE_HEADER_WORDS)?;
        buf.put_u32_at(offset + 12, self.record_count)?;
        buf.put_u32_at(offset + 16, self.index_array_bytes)?;
        buf.put_u32_at(offset + 20, self.bit_info_version)?;
        buf.put_u32_at(offset + 24, self.user_header_bytes)?;
        buf.put_u32_at(offset + 28, MAGIC)?;
        buf.put_u32_at(offset + 32, (self.user_register & 0xffff_ffff) as u32)?;
        buf.put_u32_at(offset + 36, (self.user_register >> 32) as u32)?;
        buf.put_u32_at(offset + 40, (self.trailer_position & 0xffff_ffff) as u32)?;
        buf.put_u32_at(offset + 44, (self.trailer_position >> 32) as u32)?;
        buf.put_u32_at(offset + 48, self.user_int_1)?;
        buf.put_u32_at(offset + 52, self.user_int_2)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<FileHeader> {
        let order = ByteOrder::detect(buf.array(), offset + 28)?;
        let mut local = buf.clone();
        local.set_order(order);

        let id = local.get_u32_at(offset)?;
        if id != HIPO_FILE_ID && id != EVIO_FILE_ID {
            return err(Status::BadMagic, "file header id is neither HIPO nor EVIO");
        }
        let file_number = local.get_u32_at(offset + 4)?;
        let header_words = local.get_u32_at(offset + 8)?;
        if header_words != FILE_HEADER_WORDS {
            return err(Status::BadHeaderLength, "file header length must be 14 words");
        }
        let record_count = local.get_u32_at(offset + 12)?;
        let index_array_bytes = local.get_u32_at(offset + 16)?;
        let bit_info_version = local.get_u32_at(offset + 20)?;
        let user_header_bytes = local.get_u32_at(offset + 24)?;
        let reg_lo = local.get_u32_at(offset + 32)? as u64;
        let reg_hi = local.get_u32_at(offset + 36)? as u64;
        let pos_lo = local.get_u32_at(offset + 40)? as u64;
        let pos_hi = local.get_u32_at(offset + 44)? as u64;
        let user_int_1 = local.get_u32_at(offset + 48)?;
        let user_int_2 = local.get_u32_at(offset + 52)?;

        Ok(FileHeader {
            id,
            file_number,
            record_count,
            index_array_bytes,
            bit_info_version,
            user_header_bytes,
            user_register: reg_lo | (reg_hi << 32),
            trailer_position: pos_lo | (pos_hi << 32),
            user_int_1,
            user_int_2,
            state: HeaderState::Written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut h = FileHeader::new();
        h.record_count = 5;
        h.set_trailer_position(112);
        h.set_has_dictionary(true);
        let mut buf = ByteBuffer::with_capacity(FILE_HEADER_BYTES, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        let decoded = FileHeader::decode(&buf, 0).unwrap();
        assert_eq!(decoded.record_count, 5);
        assert_eq!(decoded.trailer_position, 112);
        assert!(decoded.has_dictionary());
        assert_eq!(decoded.version(), DEFAULT_VERSION);
    }

    #[test]
    fn reset_keeps_default_version() {
        let mut h = FileHeader::new();
        h.set_version(4);
        h.reset();
        assert_eq!(h.version(), DEFAULT_VERSION);
    }

    #[test]
    fn bad_id_rejected() {
        let mut buf = ByteBuffer::with_capacity(FILE_HEADER_BYTES, ByteOrder::Little);
        buf.put_u32_at(0, 0xdead_beef).unwrap();
        buf.put_u32_at(8, FILE_HEADER_WORDS).unwrap();
        buf.put_u32_at(28, MAGIC).unwrap();
        assert!(FileHeader::decode(&buf, 0).is_err());
    }
}
