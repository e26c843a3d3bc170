//! Zero-copy structural scan: walks a buffer's bank/segment/tagsegment
//! headers into a flat `Vec<NodeDescriptor>` without ever materializing a
//! payload (spec §4.6 "Compact / zero-copy reading").

use super::node_descriptor::NodeDescriptor;
use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::data_type::DataType;
use crate::error::{err, Result, Status};
use crate::headers::struct_headers::{BankHeader, SegmentHeader, TagSegmentHeader};
use crate::tree::node::StructureKind;

/// Scans the structure at `offset` (and everything nested beneath it) into
/// `out`, depth-first pre-order, recording `parent` as each descriptor's
/// parent index. Returns the descriptor's own index in `out`.
pub fn scan_into(buf: &ByteBuffer, offset: usize, kind: StructureKind, parent: Option<usize>, out: &mut Vec<NodeDescriptor>) -> Result<usize> {
    let (mut desc, child_start, child_end, data_type) = decode_one(buf, offset, kind)?;
    desc.parent = parent;
    let my_index = out.len();
    out.push(desc);

    if data_type.is_container() {
        let child_kind = if data_type.is_bank_like() {
            StructureKind::Bank
        } else if data_type.is_segment_like() {
            StructureKind::Segment
        } else {
            StructureKind::TagSegment
        };
        let mut pos = child_start;
        while pos < child_end {
            let child_index = scan_into(buf, pos, child_kind, Some(my_index), out)?;
            pos = out[child_index].buffer_offset + out[child_index].total_bytes;
        }
    }

    Ok(my_index)
}

/// Scans the single top-level structure at `offset`, returning a flat
/// descriptor list in depth-first pre-order.
pub fn scan(buf: &ByteBuffer, offset: usize, root_kind: StructureKind) -> Result<Vec<NodeDescriptor>> {
    let mut out = Vec::new();
    scan_into(buf, offset, root_kind, None, &mut out)?;
    Ok(out)
}

fn decode_one(buf: &ByteBuffer, offset: usize, kind: StructureKind) -> Result<(NodeDescriptor, usize, usize, DataType)> {
    match kind {
        StructureKind::Bank => {
            let h = BankHeader::decode(buf, offset)?;
            let total_bytes = ((h.length as usize) + 1) * 4;
            if total_bytes < 8 {
                return err(Status::BadFormat, "bank length too small to cover its own header");
            }
            let desc = NodeDescriptor {
                buffer_offset: offset,
                header_bytes: 8,
                total_bytes,
                kind,
                tag: h.tag,
                num: h.num,
                data_type: h.data_type,
                parent: None,
                obsolete: false,
            };
            let child_start = offset + 8;
            let child_end = offset + total_bytes - h.padding as usize;
            Ok((desc, child_start, child_end, h.data_type))
        }
        StructureKind::Segment => {
            let h = SegmentHeader::decode(buf, offset)?;
            let total_bytes = ((h.length as usize) + 1) * 4;
            if total_bytes < 4 {
                return err(Status::BadFormat, "segment length too small to cover its own header");
            }
            let desc = NodeDescriptor {
                buffer_offset: offset,
                header_bytes: 4,
                total_bytes,
                kind,
                tag: h.tag as u16,
                num: 0,
                data_type: h.data_type,
                parent: None,
                obsolete: false,
            };
            let child_start = offset + 4;
            let child_end = offset + total_bytes - h.padding as usize;
            Ok((desc, child_start, child_end, h.data_type))
        }
        StructureKind::TagSegment => {
            let h = TagSegmentHeader::decode(buf, offset)?;
            let total_bytes = ((h.length as usize) + 1) * 4;
            if total_bytes < 4 {
                return err(Status::BadFormat, "tagsegment length too small to cover its own header");
            }
            let desc = NodeDescriptor {
                buffer_offset: offset,
                header_bytes: 4,
                total_bytes,
                kind,
                tag: h.tag,
                num: 0,
                data_type: h.data_type,
                parent: None,
                obsolete: false,
            };
            let child_start = offset + 4;
            let child_end = offset + total_bytes;
            Ok((desc, child_start, child_end, h.data_type))
        }
    }
}

/// Convenience wrapper used by the reader: wraps raw bytes in a `ByteBuffer`
/// with `order` already set, and scans the single top-level bank at offset 0.
pub fn scan_event(bytes: &[u8], order: ByteOrder) -> Result<Vec<NodeDescriptor>> {
    let buf = ByteBuffer::wrap(bytes.to_vec(), order);
    scan(&buf, 0, StructureKind::Bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::struct_headers::BankHeader;

    #[test]
    fn scans_leaf_bank() {
        let h = BankHeader { length: 3, tag: 7, data_type: DataType::Int32, num: 1, padding: 0 };
        let mut buf = ByteBuffer::with_capacity(16, ByteOrder::Little);
        h.encode(&mut buf, 0).unwrap();
        buf.put_u32_at(8, 10).unwrap();
        buf.put_u32_at(12, 20).unwrap();
        let descs = scan(&buf, 0, StructureKind::Bank).unwrap();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].tag, 7);
        assert_eq!(descs[0].data_len(), 8);
    }

    #[test]
    fn scans_nested_children_with_parent_links() {
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        // outer bank (container of banks) wrapping two leaf int32 banks.
        let child_a = BankHeader { length: 3, tag: 1, data_type: DataType::Int32, num: 0, padding: 0 };
        let child_b = BankHeader { length: 3, tag: 2, data_type: DataType::Int32, num: 0, padding: 0 };
        // 2 (outer header) + (2 + 2) + (2 + 2) = 10 words -> length = 9
        let outer = BankHeader { length: 9, tag: 99, data_type: DataType::Bank, num: 0, padding: 0 };
        let off = buf.reserve_and_advance(8);
        outer.encode(&mut buf, off).unwrap();
        let off = buf.reserve_and_advance(8);
        child_a.encode(&mut buf, off).unwrap();
        buf.reserve_and_advance(8);
        let off = buf.reserve_and_advance(8);
        child_b.encode(&mut buf, off).unwrap();
        buf.reserve_and_advance(8);

        let descs = scan(&buf, 0, StructureKind::Bank).unwrap();
        assert_eq!(descs.len(), 3);
        assert_eq!(descs[0].tag, 99);
        assert_eq!(descs[0].parent, None);
        assert_eq!(descs[1].tag, 1);
        assert_eq!(descs[1].parent, Some(0));
        assert_eq!(descs[2].tag, 2);
        assert_eq!(descs[2].parent, Some(0));
    }
}
