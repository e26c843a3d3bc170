//! Build a small event via `EventTree`, serialize it, then drive
//! `CompactReader`'s in-place edit operations directly on the serialized
//! bytes and check the buffer and descriptor list stay consistent.

use evio_hipo::tree::node::StructureKind;
use evio_hipo::{ByteOrder, CompactReader, DataType, EventTree};

fn serialize(tree: &mut EventTree) -> Vec<u8> {
    tree.set_all_header_lengths();
    let mut buf = evio_hipo::ByteBuffer::with_capacity(0, ByteOrder::Little);
    tree.serialize(tree.root(), &mut buf, ByteOrder::Little).unwrap();
    buf.array().to_vec()
}

#[test]
fn removing_a_child_shrinks_the_parent_and_marks_it_obsolete() {
    let mut tree = EventTree::new_bank(1, DataType::Bank, 0);
    let root = tree.root();
    let a = tree.add_child(root, StructureKind::Bank, 2, DataType::Int32, 0).unwrap();
    let b = tree.add_child(root, StructureKind::Bank, 3, DataType::Int32, 0).unwrap();
    tree.set_payload(a, evio_hipo::tree::payload::Payload::Int32(vec![1, 2])).unwrap();
    tree.set_payload(b, evio_hipo::tree::payload::Payload::Int32(vec![3, 4, 5])).unwrap();

    let bytes = serialize(&mut tree);
    let before_len = bytes.len();

    let mut reader = CompactReader::scan(bytes, ByteOrder::Little, StructureKind::Bank).unwrap();
    assert_eq!(reader.descriptors().len(), 3); // root + two children

    let b_idx = reader.descriptors().iter().position(|d| d.tag == 3).unwrap();
    let b_total_bytes = reader.descriptor(b_idx).total_bytes;
    reader.remove(b_idx).unwrap();

    assert!(reader.descriptor(b_idx).obsolete);
    assert_eq!(reader.buffer().array().len(), before_len - b_total_bytes);

    let a_idx = reader.descriptors().iter().position(|d| !d.obsolete && d.tag == 2).unwrap();
    let payload = reader.payload_bytes(a_idx).unwrap();
    let decoded: Vec<i32> = payload.chunks_exact(4).map(|c| i32::from_le_bytes(c.try_into().unwrap())).collect();
    assert_eq!(decoded, vec![1, 2]);
}

#[test]
fn adding_a_child_grows_the_buffer() {
    let mut tree = EventTree::new_bank(1, DataType::Bank, 0);
    let root = tree.root();
    let a = tree.add_child(root, StructureKind::Bank, 2, DataType::Int32, 0).unwrap();
    tree.set_payload(a, evio_hipo::tree::payload::Payload::Int32(vec![7])).unwrap();

    let bytes = serialize(&mut tree);
    let before_len = bytes.len();

    let mut reader = CompactReader::scan(bytes, ByteOrder::Little, StructureKind::Bank).unwrap();
    let root_idx = 0;

    let mut new_child = EventTree::new_bank(9, DataType::Int32, 0);
    let new_root = new_child.root();
    new_child.set_payload(new_root, evio_hipo::tree::payload::Payload::Int32(vec![99, 100])).unwrap();
    let new_bytes = serialize(&mut new_child);

    let added_idx = reader.add_child(root_idx, &new_bytes, StructureKind::Bank).unwrap();
    assert_eq!(reader.descriptor(added_idx).tag, 9);
    assert!(reader.buffer().array().len() > before_len);
    assert_eq!(reader.buffer().array().len(), before_len + new_bytes.len());
}
