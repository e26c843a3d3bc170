//! A flat, zero-copy description of one structure inside a scanned buffer
//! (spec §4.6 "Compact / zero-copy reading"). No payload bytes are copied or
//! parsed into a `Payload`; callers slice the original buffer themselves.

use crate::data_type::DataType;
use crate::tree::node::StructureKind;

#[derive(Clone, Debug)]
pub struct NodeDescriptor {
    /// Byte offset of this structure's header, relative to the buffer passed
    /// to `scan`.
    pub buffer_offset: usize,
    /// Header size in bytes (8 for a bank, 4 for segment/tagsegment).
    pub header_bytes: usize,
    /// Total byte span of this structure, header included.
    pub total_bytes: usize,
    pub kind: StructureKind,
    pub tag: u16,
    pub num: u8,
    pub data_type: DataType,
    /// Index into the flat descriptor list this node was scanned into, or
    /// `None` for the root.
    pub parent: Option<usize>,
    /// Set by `compact::edit` operations; an obsolete descriptor's indices
    /// into the backing buffer are no longer valid (spec §4.6 "Edit").
    pub obsolete: bool,
}

impl NodeDescriptor {
    pub fn data_offset(&self) -> usize {
        self.buffer_offset + self.header_bytes
    }

    pub fn data_len(&self) -> usize {
        self.total_bytes - self.header_bytes
    }

    pub fn is_leaf(&self) -> bool {
        !self.data_type.is_container()
    }
}
