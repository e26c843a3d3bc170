//! The writer's internal pipeline: one producer (the caller thread, via
//! `Writer::add_event`) hands off full records to a pool of compressor
//! threads, which hand compressed bytes to a single write thread — a
//! disruptor-style staged pipeline built directly on `crossbeam_channel`
//! rather than a generic executor (spec §5 "Writer pipeline", §9 "Ring
//! buffer / disruptor pattern").
//!
//! Records can finish compression out of order (different compressors run
//! at different speeds), but the file format requires them written in
//! sequence. `Resequencer` buffers early arrivals until the next expected
//! sequence number shows up.

use crate::headers::record_header::CompressionType;
use crate::record_io::RecordOutput;
use std::collections::BTreeMap;

/// One record traveling through the pipeline, tagged with its position in
/// the overall record sequence so the write thread can put it back in
/// order.
pub struct RingItem {
    pub sequence: u64,
    pub output: RecordOutput,
    pub compression: CompressionType,
    pub is_last: bool,
}

/// The same item after a compressor thread has built its final bytes.
pub struct BuiltItem {
    pub sequence: u64,
    pub bytes: Vec<u8>,
    pub event_count: usize,
    pub is_last: bool,
}

/// Holds out-of-order `BuiltItem`s until they can be released in strict
/// sequence order.
#[derive(Default)]
pub struct Resequencer {
    next: u64,
    pending: BTreeMap<u64, BuiltItem>,
}

impl Resequencer {
    pub fn new() -> Self {
        Resequencer { next: 0, pending: BTreeMap::new() }
    }

    /// Accepts an arrival and returns every item now releasable in sequence
    /// order (possibly more than one, possibly none).
    pub fn accept(&mut self, item: BuiltItem) -> Vec<BuiltItem> {
        self.pending.insert(item.sequence, item);
        let mut ready = Vec::new();
        while let Some(item) = self.pending.remove(&self.next) {
            self.next += 1;
            ready.push(item);
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_in_order_despite_arrival_order() {
        let mut seq = Resequencer::new();
        let item = |n: u64| BuiltItem { sequence: n, bytes: vec![], event_count: 0, is_last: false };
        assert_eq!(seq.accept(item(1)).len(), 0);
        assert_eq!(seq.accept(item(2)).len(), 0);
        let ready = seq.accept(item(0));
        assert_eq!(ready.iter().map(|i| i.sequence).collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
