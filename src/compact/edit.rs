//! In-place structural edits over a scanned buffer: remove a structure (and
//! everything beneath it), or append a new child to a container (spec §4.6
//! "Edit"). Editing shifts bytes in the backing buffer and walks every
//! ancestor's length field down (or up) to match — there is no full
//! re-serialization.

use super::node_descriptor::NodeDescriptor;
use crate::buffer::ByteBuffer;
use crate::error::{err, Result, Status};
use crate::headers::struct_headers::{BankHeader, SegmentHeader, TagSegmentHeader};
use crate::tree::node::StructureKind;

fn read_length_words(buf: &ByteBuffer, desc: &NodeDescriptor) -> Result<u32> {
    match desc.kind {
        StructureKind::Bank => Ok(BankHeader::decode(buf, desc.buffer_offset)?.length),
        StructureKind::Segment => Ok(SegmentHeader::decode(buf, desc.buffer_offset)?.length),
        StructureKind::TagSegment => Ok(TagSegmentHeader::decode(buf, desc.buffer_offset)?.length),
    }
}

fn write_length_words(buf: &mut ByteBuffer, desc: &NodeDescriptor, new_length: u32) -> Result<()> {
    match desc.kind {
        StructureKind::Bank => {
            let mut h = BankHeader::decode(buf, desc.buffer_offset)?;
            h.length = new_length;
            h.encode(buf, desc.buffer_offset)
        }
        StructureKind::Segment => {
            let mut h = SegmentHeader::decode(buf, desc.buffer_offset)?;
            h.length = new_length;
            h.encode(buf, desc.buffer_offset)
        }
        StructureKind::TagSegment => {
            let mut h = TagSegmentHeader::decode(buf, desc.buffer_offset)?;
            h.length = new_length;
            h.encode(buf, desc.buffer_offset)
        }
    }
}

/// Every ancestor of `idx`, nearest first.
fn ancestors(descs: &[NodeDescriptor], idx: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut cur = descs[idx].parent;
    while let Some(p) = cur {
        out.push(p);
        cur = descs[p].parent;
    }
    out
}

/// Every descendant of `idx` (not including `idx` itself), in no particular
/// order.
fn descendants(descs: &[NodeDescriptor], idx: usize) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, d) in descs.iter().enumerate() {
        let mut cur = d.parent;
        while let Some(p) = cur {
            if p == idx {
                out.push(i);
                break;
            }
            cur = descs[p].parent;
        }
    }
    out
}

/// Removes the structure at `idx` (and its subtree) from `buf`, shrinking
/// every ancestor's length field by the removed word count and shifting all
/// bytes after the removed span down. Descriptors for the removed subtree
/// are marked `obsolete`; every descriptor after the removed span has its
/// `buffer_offset` adjusted in place. The caller must not use any
/// previously-held index into a structure nested inside the removed span.
pub fn remove_structure(buf: &mut ByteBuffer, descs: &mut Vec<NodeDescriptor>, idx: usize) -> Result<()> {
    if descs[idx].obsolete {
        return err(Status::IndexOutOfRange, "descriptor already removed");
    }
    if descs[idx].parent.is_none() {
        return err(Status::BadFormat, "cannot remove the root structure");
    }
    let removed_bytes = descs[idx].total_bytes;
    let removed_words = (removed_bytes / 4) as u32;
    let removed_start = descs[idx].buffer_offset;
    let removed_end = removed_start + removed_bytes;

    for anc in ancestors(descs, idx) {
        let old = read_length_words(buf, &descs[anc])?;
        write_length_words(buf, &descs[anc], old.saturating_sub(removed_words))?;
    }

    let data = buf.array_mut();
    data.copy_within(removed_end..data.len(), removed_start);
    let new_len = data.len() - removed_bytes;
    data.truncate(new_len);
    buf.set_limit(new_len)?;

    let mut dead = descendants(descs, idx);
    dead.push(idx);
    for &d in &dead {
        descs[d].obsolete = true;
    }
    for d in descs.iter_mut() {
        if !d.obsolete && d.buffer_offset >= removed_end {
            d.buffer_offset -= removed_bytes;
        }
    }
    Ok(())
}

/// Appends `new_bytes` (a fully-encoded, self-contained structure) as the
/// last child of the container at `parent_idx`, growing every ancestor's
/// length field by the added word count. Returns the new child's index;
/// descriptors for siblings after the insertion point are unaffected since
/// the bytes are appended at the end of the parent's existing data.
pub fn add_structure(buf: &mut ByteBuffer, descs: &mut Vec<NodeDescriptor>, parent_idx: usize, new_bytes: &[u8], child_kind: StructureKind) -> Result<usize> {
    if new_bytes.len() % 4 != 0 {
        return err(Status::BadFormat, "appended structure must be a whole number of words");
    }
    if descs[parent_idx].obsolete {
        return err(Status::IndexOutOfRange, "parent descriptor already removed");
    }
    if !descs[parent_idx].data_type.is_container() {
        return err(Status::BadFormat, "cannot add a child to a non-container structure");
    }
    let added_words = (new_bytes.len() / 4) as u32;
    let insert_at = descs[parent_idx].buffer_offset + descs[parent_idx].total_bytes;

    let mut path = vec![parent_idx];
    path.extend(ancestors(descs, parent_idx));
    for &anc in &path {
        let old = read_length_words(buf, &descs[anc])?;
        write_length_words(buf, &descs[anc], old + added_words)?;
    }

    let data = buf.array_mut();
    data.splice(insert_at..insert_at, new_bytes.iter().copied());
    buf.set_limit(data.len())?;

    for d in descs.iter_mut() {
        if !d.obsolete && d.buffer_offset >= insert_at {
            d.buffer_offset += new_bytes.len();
        }
    }
    for &anc in &path {
        descs[anc].total_bytes += new_bytes.len();
    }

    let child = super::scanner::scan_into(buf, insert_at, child_kind, Some(parent_idx), descs)?;
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::byte_order::ByteOrder;
    use crate::compact::scanner::scan;
    use crate::data_type::DataType;

    fn build_parent_with_two_children() -> ByteBuffer {
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        let child_a = BankHeader { length: 3, tag: 1, data_type: DataType::Int32, num: 0, padding: 0 };
        let child_b = BankHeader { length: 3, tag: 2, data_type: DataType::Int32, num: 0, padding: 0 };
        let outer = BankHeader { length: 9, tag: 99, data_type: DataType::Bank, num: 0, padding: 0 };
        let off = buf.reserve_and_advance(8);
        outer.encode(&mut buf, off).unwrap();
        let off = buf.reserve_and_advance(8);
        child_a.encode(&mut buf, off).unwrap();
        buf.reserve_and_advance(8);
        let off = buf.reserve_and_advance(8);
        child_b.encode(&mut buf, off).unwrap();
        buf.reserve_and_advance(8);
        buf
    }

    #[test]
    fn remove_child_shrinks_parent_length() {
        let mut buf = build_parent_with_two_children();
        let mut descs = scan(&buf, 0, StructureKind::Bank).unwrap();
        let child_a_idx = 1;
        remove_structure(&mut buf, &mut descs, child_a_idx).unwrap();
        assert!(descs[child_a_idx].obsolete);
        let parent_len = read_length_words(&buf, &descs[0]).unwrap();
        assert_eq!(parent_len, 9 - 4);
        assert_eq!(buf.array().len(), 32 - 16);
    }

    #[test]
    fn add_child_grows_parent_length() {
        let mut buf = build_parent_with_two_children();
        let mut descs = scan(&buf, 0, StructureKind::Bank).unwrap();
        let new_child = BankHeader { length: 3, tag: 3, data_type: DataType::Int32, num: 0, padding: 0 };
        let mut child_buf = ByteBuffer::with_capacity(16, ByteOrder::Little);
        new_child.encode(&mut child_buf, 0).unwrap();
        child_buf.put_u32_at(8, 1).unwrap();
        child_buf.put_u32_at(12, 2).unwrap();
        let idx = add_structure(&mut buf, &mut descs, 0, child_buf.array(), StructureKind::Bank).unwrap();
        assert_eq!(descs[idx].tag, 3);
        let parent_len = read_length_words(&buf, &descs[0]).unwrap();
        assert_eq!(parent_len, 9 + 4);
    }
}
