//! The in-memory event tree: Bank/Segment/TagSegment nodes arranged in an
//! arena (spec §3 "Event tree", §4.4, §9 design notes). A `NodeId` is a
//! plain index; there are no cycles and no shared-pointer back-references.

pub mod iter;
pub mod node;
pub mod payload;
pub mod strings;
pub mod transform;

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::data_type::DataType;
use crate::error::{err, Result, Status};
use crate::headers::struct_headers::{BankHeader, SegmentHeader, TagSegmentHeader};
use node::{Node, NodeId, StructureKind};
use payload::Payload;

#[derive(Clone, Debug)]
pub struct EventTree {
    arena: Vec<Node>,
    root: NodeId,
    /// Bumped on every structural or payload mutation; iterators capture it
    /// at construction and stop yielding once it no longer matches (spec
    /// §4.4, §9 "Iteration").
    version: u64,
}

impl EventTree {
    fn new_root(kind: StructureKind, tag: u16, data_type: DataType, num: u8) -> Self {
        EventTree { arena: vec![Node::new(kind, tag, data_type, num)], root: NodeId(0), version: 0 }
    }

    pub fn new_bank(tag: u16, data_type: DataType, num: u8) -> Self {
        Self::new_root(StructureKind::Bank, tag, data_type, num)
    }

    pub fn new_segment(tag: u8, data_type: DataType) -> Self {
        Self::new_root(StructureKind::Segment, tag as u16, data_type, 0)
    }

    pub fn new_tagsegment(tag: u16, data_type: DataType) -> Self {
        Self::new_root(StructureKind::TagSegment, tag, data_type, 0)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    fn bump_version(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.bump_version();
        &mut self.arena[id.0]
    }

    /// Appends a freshly constructed bank/segment/tagsegment as a new child
    /// of `parent`, returning its `NodeId`.
    pub fn add_child(&mut self, parent: NodeId, kind: StructureKind, tag: u16, data_type: DataType, num: u8) -> Result<NodeId> {
        if !self.arena[parent.0].data_type.is_container() && self.arena[parent.0].payload_is_set() {
            return err(Status::BadFormat, "cannot add a child to a node already carrying a primitive payload");
        }
        let id = NodeId(self.arena.len());
        let mut node = Node::new(kind, tag, data_type, num);
        node.parent = Some(parent);
        self.arena.push(node);
        self.arena[parent.0].children.push(id);
        self.arena[parent.0].dirty = true;
        self.bump_version();
        Ok(id)
    }

    /// Detaches `id` from its parent. The node and its subtree remain in the
    /// arena (unreachable from `root`) until the whole tree is dropped —
    /// this mirrors the compact reader's "obsolete descriptor" behavior: any
    /// `NodeId` still referring to the removed subtree must not be used.
    pub fn remove_child(&mut self, id: NodeId) -> Result<()> {
        let parent = self.arena[id.0].parent.ok_or_else(|| {
            crate::error::EvioError::new(Status::BadFormat, Some("cannot remove the root node"))
        })?;
        self.arena[parent.0].children.retain(|&c| c != id);
        self.arena[parent.0].dirty = true;
        self.bump_version();
        Ok(())
    }

    pub fn depth_first(&self, from: NodeId) -> iter::DepthFirstIter<'_> {
        iter::DepthFirstIter::new(self, from)
    }

    pub fn breadth_first(&self, from: NodeId) -> iter::BreadthFirstIter<'_> {
        iter::BreadthFirstIter::new(self, from)
    }

    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.arena[id.0].parent;
        while let Some(p) = cur {
            out.push(p);
            cur = self.arena[p.0].parent;
        }
        out
    }

    pub fn leaves(&self, from: NodeId) -> Vec<NodeId> {
        self.depth_first(from).filter(|&id| self.arena[id.0].is_leaf()).collect()
    }

    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.arena[id.0].parent {
            Some(p) => self.arena[p.0].children.iter().copied().filter(|&c| c != id).collect(),
            None => Vec::new(),
        }
    }

    pub fn set_payload(&mut self, id: NodeId, payload: Payload) -> Result<()> {
        if self.arena[id.0].data_type.is_container() {
            return err(Status::BadFormat, "cannot set a primitive payload on a container node");
        }
        let node = self.node_mut(id);
        node.payload = payload;
        node.dirty = true;
        Ok(())
    }

    /// Post-order traversal recomputing every container's length as the sum
    /// of its children's total word counts, and every leaf's length from its
    /// payload byte count, clearing `dirty` throughout (spec §4.4).
    pub fn set_all_header_lengths(&mut self) {
        self.recompute(self.root);
        self.bump_version();
    }

    fn recompute(&mut self, id: NodeId) -> u32 {
        let children: Vec<NodeId> = self.arena[id.0].children.clone();
        let kind = self.arena[id.0].kind;
        let header_words = kind.header_words();

        if children.is_empty() && !matches!(self.arena[id.0].payload, Payload::None) {
            let byte_len = self.arena[id.0].payload.byte_len();
            let padding = ((4 - (byte_len % 4)) % 4) as u8;
            let data_words = ((byte_len + padding as usize) / 4) as u32;
            self.arena[id.0].padding = padding;
            self.arena[id.0].length = header_words + data_words - 1;
            self.arena[id.0].dirty = false;
            header_words + data_words
        } else {
            let mut child_words_total = 0u32;
            for child in children {
                child_words_total += self.recompute(child);
            }
            self.arena[id.0].length = header_words + child_words_total - 1;
            self.arena[id.0].dirty = false;
            header_words + child_words_total
        }
    }

    fn any_dirty(&self, id: NodeId) -> bool {
        if self.arena[id.0].dirty {
            return true;
        }
        self.arena[id.0].children.iter().any(|&c| self.any_dirty(c))
    }

    /// Serializes the subtree rooted at `from`, depth-first, using current
    /// lengths. Fails with `Status::BadFormat` if any node in the subtree is
    /// still dirty.
    pub fn serialize(&self, from: NodeId, buf: &mut ByteBuffer, order: ByteOrder) -> Result<()> {
        if self.any_dirty(from) {
            return err(Status::BadFormat, "tree lengths are stale; call set_all_header_lengths first");
        }
        buf.set_order(order);
        self.write_node(from, buf)
    }

    fn write_node(&self, id: NodeId, buf: &mut ByteBuffer) -> Result<()> {
        let node = &self.arena[id.0];
        match node.kind {
            StructureKind::Bank => {
                let header = BankHeader { length: node.length, tag: node.tag, data_type: node.data_type, num: node.num, padding: node.padding };
                let offset = buf.reserve_and_advance(8);
                header.encode(buf, offset)?;
            }
            StructureKind::Segment => {
                let header = SegmentHeader { length: node.length, tag: node.tag as u8, data_type: node.data_type, padding: node.padding };
                let offset = buf.reserve_and_advance(4);
                header.encode(buf, offset)?;
            }
            StructureKind::TagSegment => {
                let header = TagSegmentHeader { length: node.length, tag: node.tag, data_type: node.data_type };
                let offset = buf.reserve_and_advance(4);
                header.encode(buf, offset)?;
            }
        }
        if node.children.is_empty() {
            self.write_payload(&node.payload, buf)?;
        } else {
            for &child in &node.children {
                self.write_node(child, buf)?;
            }
        }
        Ok(())
    }

    fn write_payload(&self, payload: &Payload, buf: &mut ByteBuffer) -> Result<()> {
        macro_rules! write_scalars {
            ($vec:expr, $put:ident) => {{
                for v in $vec {
                    buf.$put(*v as _)?;
                }
            }};
        }
        match payload {
            Payload::None => {}
            Payload::Int32(v) => write_scalars!(v, put_u32),
            Payload::UInt32(v) => write_scalars!(v, put_u32),
            Payload::Float32(v) => {
                for x in v {
                    buf.put_u32(x.to_bits())?;
                }
            }
            Payload::Double64(v) => {
                for x in v {
                    buf.put_u64(x.to_bits())?;
                }
            }
            Payload::Long64(v) => write_scalars!(v, put_u64),
            Payload::ULong64(v) => write_scalars!(v, put_u64),
            Payload::Short16(v) => write_scalars!(v, put_u16),
            Payload::UShort16(v) => write_scalars!(v, put_u16),
            Payload::Char8(v) => {
                for x in v {
                    buf.put_u8(*x as u8)?;
                }
                pad_bytes(buf, v.len())?;
            }
            Payload::UChar8(v) => {
                buf.put_bytes(v)?;
                pad_bytes(buf, v.len())?;
            }
            Payload::CharStar8 { strings, .. } => {
                buf.put_bytes(&strings::encode(strings))?;
            }
            Payload::Composite { raw, .. } => {
                buf.put_bytes(raw)?;
            }
            Payload::Unknown32(v) => {
                buf.put_bytes(v)?;
            }
        }
        Ok(())
    }
}

fn pad_bytes(buf: &mut ByteBuffer, byte_len: usize) -> Result<()> {
    let pad = (4 - (byte_len % 4)) % 4;
    for _ in 0..pad {
        buf.put_u8(0)?;
    }
    Ok(())
}

impl Node {
    fn payload_is_set(&self) -> bool {
        !matches!(self.payload, Payload::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_length_is_sum_of_children() {
        let mut tree = EventTree::new_bank(1, DataType::Bank, 0);
        let root = tree.root();
        let child = tree.add_child(root, StructureKind::Bank, 2, DataType::Int32, 0).unwrap();
        tree.set_payload(child, Payload::Int32(vec![1, 2, 3, 4])).unwrap();
        tree.set_all_header_lengths();
        // child's length field: 2 header words + 4 data words - 1 = 5
        assert_eq!(tree.node(child).length, 5);
        // root's length field: header words + sum of each child's *total*
        // word count, minus 1 (the length field excludes itself), i.e.
        // 2 + 6 - 1 = 7 for the one child.
        assert_eq!(tree.node(root).length, 7);
    }

    #[test]
    fn serialize_requires_clean_lengths() {
        let tree = EventTree::new_bank(1, DataType::Int32, 0);
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        assert!(tree.serialize(tree.root(), &mut buf, ByteOrder::Little).is_err());
    }

    #[test]
    fn serialize_round_trip_leaf() {
        let mut tree = EventTree::new_bank(7, DataType::Int32, 3);
        let root = tree.root();
        tree.set_payload(root, Payload::Int32(vec![1, 2, 3, 4])).unwrap();
        tree.set_all_header_lengths();
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        tree.serialize(root, &mut buf, ByteOrder::Little).unwrap();
        assert_eq!(buf.position(), 12); // 2 header words + 4 data words
    }
}
