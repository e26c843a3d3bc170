//! Builder for `Writer` construction knobs (spec §5 "Writer", §1 "Writer
//! options"). Mirrors the crate's other builder-pattern option structs
//! (`headers`/`record_io` take fully-built values; this is the one surface
//! meant to be assembled fluently by a caller).

use crate::byte_order::ByteOrder;
use crate::headers::record_header::CompressionType;

#[derive(Clone, Debug)]
pub struct WriterOptions {
    pub order: ByteOrder,
    pub compression: CompressionType,
    pub compression_threads: usize,
    pub max_record_event_count: usize,
    pub max_record_uncompressed_bytes: usize,
    /// Split to a new file once the current one would exceed this size.
    /// `0` disables splitting.
    pub split_size_bytes: u64,
    pub dictionary_xml: Option<String>,
    pub first_event: Option<Vec<u8>>,
    /// Capacity of the producer -> compressor -> writer channels.
    pub ring_capacity: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            order: ByteOrder::NATIVE,
            compression: CompressionType::None,
            compression_threads: 1,
            max_record_event_count: 1000,
            max_record_uncompressed_bytes: 8 * 1024 * 1024,
            split_size_bytes: 0,
            dictionary_xml: None,
            first_event: None,
            ring_capacity: 4,
        }
    }
}

impl WriterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    pub fn compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    pub fn compression_threads(mut self, n: usize) -> Self {
        self.compression_threads = n.max(1);
        self
    }

    pub fn max_record_event_count(mut self, n: usize) -> Self {
        self.max_record_event_count = n;
        self
    }

    pub fn max_record_uncompressed_bytes(mut self, n: usize) -> Self {
        self.max_record_uncompressed_bytes = n;
        self
    }

    pub fn split_size_bytes(mut self, n: u64) -> Self {
        self.split_size_bytes = n;
        self
    }

    pub fn dictionary_xml(mut self, xml: impl Into<String>) -> Self {
        self.dictionary_xml = Some(xml.into());
        self
    }

    pub fn first_event(mut self, bytes: Vec<u8>) -> Self {
        self.first_event = Some(bytes);
        self
    }

    pub fn ring_capacity(mut self, n: usize) -> Self {
        self.ring_capacity = n.max(1);
        self
    }
}
