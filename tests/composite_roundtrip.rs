//! Build a composite payload with the builder, swap it (simulating an
//! endian-converting read), then swap it back and check we land on the
//! original bytes.

use evio_hipo::{ByteOrder, CompositeDataBuilder, CompositeFormat};

#[test]
fn swap_is_its_own_inverse() {
    let mut builder = CompositeDataBuilder::new("N(I,F,D)", ByteOrder::Little).unwrap();
    builder.push_u32(2);
    for i in 0..2 {
        builder.push_i32(i);
        builder.push_f32(i as f32 * 1.5);
        builder.push_f64(i as f64 * 2.5);
    }
    let (format, original) = builder.finish().unwrap();

    let mut swapped = original.clone();
    format.swap(&mut swapped, ByteOrder::Little).unwrap();
    assert_ne!(swapped, original, "swapping should change byte representation for multi-byte fields");

    // The first pass flips the leading repeat-count bytes too, so reading it
    // back correctly on the way home means swapping with the opposite order.
    format.swap(&mut swapped, ByteOrder::Big).unwrap();
    assert_eq!(swapped, original, "swapping twice (opposite order) should restore the original bytes");
}

#[test]
fn validate_rejects_short_buffer() {
    let format = CompositeFormat::compile("N(I,F)").unwrap();
    let too_short = vec![0u8; 3];
    assert!(format.validate(&too_short, ByteOrder::Little).is_err());
}
