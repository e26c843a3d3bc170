//! Bit-packing helpers shared by every header's `bitInfo | version` word.
//! Padding counts are *derived* from the lengths a header already carries —
//! callers never set a pad field directly, they call `recompute_padding`
//! after setting a length, per spec §4.2.

/// Header-type nibble occupying bits 28-31 of every bit-info word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderType {
    EvioFile,
    EvioExtension,
    EvioTrailer,
    HipoFile,
    HipoExtension,
    HipoTrailer,
    HipoRecord,
}

impl HeaderType {
    pub fn code(self) -> u32 {
        match self {
            HeaderType::EvioFile => 1,
            HeaderType::EvioExtension => 2,
            HeaderType::EvioTrailer => 3,
            HeaderType::HipoFile => 5,
            HeaderType::HipoExtension => 6,
            HeaderType::HipoTrailer => 7,
            HeaderType::HipoRecord => 8,
        }
    }

    pub fn from_code(code: u32) -> Option<HeaderType> {
        Some(match code {
            1 => HeaderType::EvioFile,
            2 => HeaderType::EvioExtension,
            3 => HeaderType::EvioTrailer,
            5 => HeaderType::HipoFile,
            6 => HeaderType::HipoExtension,
            7 => HeaderType::HipoTrailer,
            8 => HeaderType::HipoRecord,
            _ => return None,
        })
    }

    pub fn is_trailer(self) -> bool {
        matches!(self, HeaderType::EvioTrailer | HeaderType::HipoTrailer)
    }
}

/// Generic placeholder struct kept only as a namespace for the bit-position
/// constants every concrete header's accessors are built from.
pub struct BitInfo;

impl BitInfo {
    pub const VERSION_SHIFT: u32 = 0;
    pub const VERSION_MASK: u32 = 0xff;

    pub const DICTIONARY_BIT: u32 = 8;
    pub const FIRST_EVENT_BIT: u32 = 9;
    /// Meaning depends on the carrying header: "is last record" on a record
    /// header, "has trailer with index" on a file header.
    pub const BIT10: u32 = 10;

    pub const EVENT_TYPE_SHIFT: u32 = 10;
    pub const EVENT_TYPE_MASK: u32 = 0xf;

    pub const PAD1_SHIFT: u32 = 20;
    pub const PAD2_SHIFT: u32 = 22;
    pub const PAD3_SHIFT: u32 = 24;
    pub const PAD_MASK: u32 = 0x3;

    pub const HEADER_TYPE_SHIFT: u32 = 28;
    pub const HEADER_TYPE_MASK: u32 = 0xf;

    #[inline]
    pub fn get_bit(word: u32, bit: u32) -> bool {
        (word >> bit) & 1 != 0
    }

    #[inline]
    pub fn set_bit(word: u32, bit: u32, value: bool) -> u32 {
        if value {
            word | (1 << bit)
        } else {
            word & !(1 << bit)
        }
    }

    #[inline]
    pub fn get_field(word: u32, shift: u32, mask: u32) -> u32 {
        (word >> shift) & mask
    }

    #[inline]
    pub fn set_field(word: u32, shift: u32, mask: u32, value: u32) -> u32 {
        (word & !(mask << shift)) | ((value & mask) << shift)
    }
}

/// Bytes of zero-fill trailing a 4-byte-rounded region, `0..=3`.
#[inline]
pub fn padding_for(byte_len: usize) -> u8 {
    ((4 - (byte_len % 4)) % 4) as u8
}
