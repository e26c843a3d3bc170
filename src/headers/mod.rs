//! Fixed-layout encoders/decoders for every on-disk header kind (spec §4.2,
//! §6). Each header type exposes `decode`/`encode`/`length_in_words` plus
//! named bit-info accessors; the record and file headers additionally
//! implement the `Empty -> LengthsSet -> Written` state machine.

pub mod bit_info;
pub mod block_header;
pub mod file_header;
pub mod record_header;
pub mod struct_headers;

pub use bit_info::BitInfo;
pub use block_header::BlockHeader;
pub use file_header::FileHeader;
pub use record_header::RecordHeader;

/// Lifecycle of a record/file header, spec §4.2. `encode` requires
/// `LengthsSet` or later.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HeaderState {
    Empty,
    LengthsSet,
    Written,
}
