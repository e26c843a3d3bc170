//! Compact (zero-copy) reading and in-place editing of an already-decoded
//! event buffer (spec §4.6). Where `tree::EventTree` fully materializes a
//! structure into an arena of typed payloads, `CompactReader` only scans
//! header offsets — callers slice the backing buffer themselves to reach
//! leaf data.

pub mod edit;
pub mod node_descriptor;
pub mod scanner;

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::error::Result;
use crate::tree::node::StructureKind;
use node_descriptor::NodeDescriptor;
use std::sync::Mutex;

/// Wraps one event's bytes plus the flat descriptor list `scanner::scan`
/// produced from them. `sync` guards descriptor/buffer mutation when the
/// same reader is shared across threads (spec §4.6/§5 "concurrent access");
/// single-threaded callers can ignore it entirely.
pub struct CompactReader {
    buf: ByteBuffer,
    descriptors: Vec<NodeDescriptor>,
    sync: Option<Mutex<()>>,
}

impl CompactReader {
    pub fn scan(bytes: Vec<u8>, order: ByteOrder, root_kind: StructureKind) -> Result<Self> {
        let buf = ByteBuffer::wrap(bytes, order);
        let descriptors = scanner::scan(&buf, 0, root_kind)?;
        Ok(CompactReader { buf, descriptors, sync: None })
    }

    /// Same as `scan`, but wraps internal mutation in a mutex so
    /// `remove`/`add` are safe to call from multiple threads holding a
    /// shared `&CompactReader` (via interior mutability at the call site).
    pub fn scan_synced(bytes: Vec<u8>, order: ByteOrder, root_kind: StructureKind) -> Result<Self> {
        let mut reader = Self::scan(bytes, order, root_kind)?;
        reader.sync = Some(Mutex::new(()));
        Ok(reader)
    }

    pub fn descriptors(&self) -> &[NodeDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, idx: usize) -> &NodeDescriptor {
        &self.descriptors[idx]
    }

    /// The raw payload bytes for a leaf descriptor — callers interpret them
    /// according to `descriptor.data_type`.
    pub fn payload_bytes(&self, idx: usize) -> Result<&[u8]> {
        let d = &self.descriptors[idx];
        self.buf.get_bytes_at(d.data_offset(), d.data_len())
    }

    pub fn buffer(&self) -> &ByteBuffer {
        &self.buf
    }

    fn with_lock<F: FnOnce(&mut Self) -> Result<T>, T>(&mut self, f: F) -> Result<T> {
        match &self.sync {
            Some(m) => {
                let _guard = m.lock().unwrap();
                f(self)
            }
            None => f(self),
        }
    }

    pub fn remove(&mut self, idx: usize) -> Result<()> {
        self.with_lock(|this| edit::remove_structure(&mut this.buf, &mut this.descriptors, idx))
    }

    pub fn add_child(&mut self, parent_idx: usize, new_bytes: &[u8], child_kind: StructureKind) -> Result<usize> {
        self.with_lock(|this| edit::add_structure(&mut this.buf, &mut this.descriptors, parent_idx, new_bytes, child_kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::headers::struct_headers::BankHeader;

    #[test]
    fn scan_then_remove_via_reader() {
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        let child = BankHeader { length: 3, tag: 1, data_type: DataType::Int32, num: 0, padding: 0 };
        let outer = BankHeader { length: 5, tag: 99, data_type: DataType::Bank, num: 0, padding: 0 };
        let off = buf.reserve_and_advance(8);
        outer.encode(&mut buf, off).unwrap();
        let off = buf.reserve_and_advance(8);
        child.encode(&mut buf, off).unwrap();
        buf.reserve_and_advance(8);

        let mut reader = CompactReader::scan(buf.array().to_vec(), ByteOrder::Little, StructureKind::Bank).unwrap();
        assert_eq!(reader.descriptors().len(), 2);
        reader.remove(1).unwrap();
        assert!(reader.descriptor(1).obsolete);
    }
}
