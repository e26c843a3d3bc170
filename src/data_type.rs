//! The closed enumeration of EVIO/HIPO payload and container type codes
//! (spec §3 "Data type").

use crate::error::{err, Result, Status};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataType {
    Unknown32,
    UInt32,
    Float32,
    CharStar8,
    Short16,
    UShort16,
    Char8,
    UChar8,
    Double64,
    Long64,
    ULong64,
    Int32,
    TagSegment,
    AlsoSegment,
    AlsoBank,
    Composite,
    Bank,
    Segment,
}

impl DataType {
    pub fn from_code(code: u8) -> Result<DataType> {
        use DataType::*;
        Ok(match code {
            0 => Unknown32,
            1 => UInt32,
            2 => Float32,
            3 => CharStar8,
            4 => Short16,
            5 => UShort16,
            6 => Char8,
            7 => UChar8,
            8 => Double64,
            9 => Long64,
            10 => ULong64,
            11 => Int32,
            12 => TagSegment,
            13 => AlsoSegment,
            14 => AlsoBank,
            15 => Composite,
            16 => Bank,
            32 => Segment,
            _ => return err(Status::BadFormat, "unrecognized data type code"),
        })
    }

    pub fn code(self) -> u8 {
        use DataType::*;
        match self {
            Unknown32 => 0,
            UInt32 => 1,
            Float32 => 2,
            CharStar8 => 3,
            Short16 => 4,
            UShort16 => 5,
            Char8 => 6,
            UChar8 => 7,
            Double64 => 8,
            Long64 => 9,
            ULong64 => 10,
            Int32 => 11,
            TagSegment => 12,
            AlsoSegment => 13,
            AlsoBank => 14,
            Composite => 15,
            Bank => 16,
            Segment => 32,
        }
    }

    /// The 4-bit code used where only 4 bits of type are available (segment
    /// and tagsegment headers). `Bank`/`AlsoBank` collapse to the same 4-bit
    /// pattern as plain `Bank`, and likewise for segment — see
    /// `DESIGN.md`'s note on the ALSOBANK-in-tagsegment open question.
    pub fn code4(self) -> u8 {
        self.code() & 0x0f
    }

    pub fn is_container(self) -> bool {
        matches!(
            self,
            DataType::Bank | DataType::Segment | DataType::TagSegment
                | DataType::AlsoBank | DataType::AlsoSegment
        )
    }

    pub fn is_bank_like(self) -> bool {
        matches!(self, DataType::Bank | DataType::AlsoBank)
    }

    pub fn is_segment_like(self) -> bool {
        matches!(self, DataType::Segment | DataType::AlsoSegment)
    }

    /// Size in bytes of one primitive element, for the fixed-width leaf
    /// types. Containers and composite data have no fixed element size.
    pub fn element_size(self) -> Option<usize> {
        use DataType::*;
        match self {
            Char8 | UChar8 | CharStar8 => Some(1),
            Short16 | UShort16 => Some(2),
            UInt32 | Float32 | Int32 | Unknown32 => Some(4),
            Double64 | Long64 | ULong64 => Some(8),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for code in [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 32] {
            let dt = DataType::from_code(code).unwrap();
            assert_eq!(dt.code(), code);
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(DataType::from_code(200).is_err());
    }
}
