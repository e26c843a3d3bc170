//! Forcing a small `split_size_bytes` should produce multiple numbered
//! files, each independently openable, whose event counts sum to the total
//! written.

use evio_hipo::tree::node::StructureKind;
use evio_hipo::{ByteOrder, DataType, EventTree, Reader, ReaderOptions, Writer, WriterOptions};

#[test]
fn splits_across_multiple_files() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("run");

    let options = WriterOptions::new().order(ByteOrder::Little).split_size_bytes(200);
    let mut writer = Writer::create_at(options, &base);

    let total_events = 40;
    for i in 0..total_events {
        let mut tree = EventTree::new_bank(i as u16, DataType::Bank, 0);
        let root = tree.root();
        let leaf = tree.add_child(root, StructureKind::Bank, 1, DataType::Int32, 0).unwrap();
        tree.set_payload(leaf, evio_hipo::tree::payload::Payload::Int32(vec![i, i, i, i])).unwrap();
        writer.add_event(&mut tree).unwrap();
    }
    writer.close().unwrap();

    let mut found_files = 0;
    let mut total_read = 0;
    for n in 0..total_events {
        let path = base.with_extension(format!("{}", n));
        if !path.exists() {
            break;
        }
        found_files += 1;
        let bytes = std::fs::read(&path).unwrap();
        let reader = Reader::open(bytes, ReaderOptions::default()).unwrap();
        total_read += reader.event_count();
    }

    assert!(found_files > 1, "expected splitting to produce more than one file, got {}", found_files);
    assert_eq!(total_read, total_events as usize);
}
