//! Bank / segment / tagsegment header encode-decode (spec §3 "Structure",
//! §6). These are not stateful objects like the record/file headers — just
//! fixed bit-packings of `(tag, dataType, num, padding, length)` into one or
//! two 32-bit words.

use crate::buffer::ByteBuffer;
use crate::data_type::DataType;
use crate::error::Result;

/// `(length, (tag<<16)|(pad<<14)|(type<<8)|num)` — 2 words, tag is 16 bits,
/// num is present.
#[derive(Clone, Copy, Debug)]
pub struct BankHeader {
    pub length: u32,
    pub tag: u16,
    pub data_type: DataType,
    pub num: u8,
    pub padding: u8,
}

impl BankHeader {
    pub const WORDS: u32 = 2;

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        buf.put_u32_at(offset, self.length)?;
        let word2 = ((self.tag as u32) << 16)
            | ((self.padding as u32 & 0x3) << 14)
            | ((self.data_type.code() as u32) << 8)
            | (self.num as u32);
        buf.put_u32_at(offset + 4, word2)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<BankHeader> {
        let length = buf.get_u32_at(offset)?;
        let word2 = buf.get_u32_at(offset + 4)?;
        let tag = (word2 >> 16) as u16;
        let padding = ((word2 >> 14) & 0x3) as u8;
        let data_type = DataType::from_code(((word2 >> 8) & 0x3f) as u8)?;
        let num = (word2 & 0xff) as u8;
        Ok(BankHeader { length, tag, data_type, num, padding })
    }
}

/// `((tag<<24)|(pad<<22)|(type<<16)|length)` — 1 word, tag is 8 bits, no
/// num field.
#[derive(Clone, Copy, Debug)]
pub struct SegmentHeader {
    pub length: u32,
    pub tag: u8,
    pub data_type: DataType,
    pub padding: u8,
}

impl SegmentHeader {
    pub const WORDS: u32 = 1;

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        let word = ((self.tag as u32) << 24)
            | ((self.padding as u32 & 0x3) << 22)
            | ((self.data_type.code() as u32) << 16)
            | (self.length & 0xffff);
        buf.put_u32_at(offset, word)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<SegmentHeader> {
        let word = buf.get_u32_at(offset)?;
        let tag = (word >> 24) as u8;
        let padding = ((word >> 22) & 0x3) as u8;
        let data_type = DataType::from_code(((word >> 16) & 0x3f) as u8)?;
        let length = word & 0xffff;
        Ok(SegmentHeader { length, tag, data_type, padding })
    }
}

/// `((tag<<20)|(type<<16)|length)` — 1 word, tag is 12 bits, no padding
/// (data types restricted to non-padding types).
#[derive(Clone, Copy, Debug)]
pub struct TagSegmentHeader {
    pub length: u32,
    pub tag: u16,
    pub data_type: DataType,
}

impl TagSegmentHeader {
    pub const WORDS: u32 = 1;

    pub fn encode(&self, buf: &mut ByteBuffer, offset: usize) -> Result<()> {
        let word = ((self.tag as u32 & 0xfff) << 20)
            | ((self.data_type.code4() as u32) << 16)
            | (self.length & 0xffff);
        buf.put_u32_at(offset, word)?;
        Ok(())
    }

    pub fn decode(buf: &ByteBuffer, offset: usize) -> Result<TagSegmentHeader> {
        let word = buf.get_u32_at(offset)?;
        let tag = ((word >> 20) & 0xfff) as u16;
        let data_type = DataType::from_code(((word >> 16) & 0xf) as u8)?;
        let length = word & 0xffff;
        Ok(TagSegmentHeader { length, tag, data_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;

    #[test]
    fn bank_round_trip() {
        let h = BankHeader { length: 10, tag: 0x1234, data_type: DataType::Int32, num: 7, padding: 2 };
        let mut buf = ByteBuffer::with_capacity(8, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        let d = BankHeader::decode(&buf, 0).unwrap();
        assert_eq!(d.tag, 0x1234);
        assert_eq!(d.num, 7);
        assert_eq!(d.padding, 2);
        assert_eq!(d.data_type, DataType::Int32);
    }

    #[test]
    fn segment_round_trip() {
        let h = SegmentHeader { length: 20, tag: 5, data_type: DataType::Double64, padding: 0 };
        let mut buf = ByteBuffer::with_capacity(4, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        let d = SegmentHeader::decode(&buf, 0).unwrap();
        assert_eq!(d.tag, 5);
        assert_eq!(d.length, 20);
    }

    #[test]
    fn tagsegment_round_trip() {
        let h = TagSegmentHeader { length: 30, tag: 0xabc, data_type: DataType::Short16 };
        let mut buf = ByteBuffer::with_capacity(4, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        let d = TagSegmentHeader::decode(&buf, 0).unwrap();
        assert_eq!(d.tag, 0xabc);
        assert_eq!(d.data_type, DataType::Short16);
    }
}
