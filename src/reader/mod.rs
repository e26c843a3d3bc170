//! Unified file reader: detects version 1-4 (block-based) vs version 6
//! (record-based) and exposes both through the same flat event-index API
//! (spec §4 "File", §1 "backward compatibility"). Compact (zero-copy)
//! access to an individual event's structure is available separately via
//! `compact::CompactReader::scan`.

pub mod legacy;
pub mod options;
pub mod record_reader;
pub mod visitor;

use crate::error::{err, Result, Status};
use legacy::LegacyReader;
pub use options::ReaderOptions;
use record_reader::RecordBasedReader;
use std::cell::RefCell;

enum Inner {
    Legacy(LegacyReader),
    RecordBased { reader: RecordBasedReader, record_entry_counts: Vec<u32>, cache: RefCell<Option<(usize, crate::record_io::RecordInput)>> },
}

pub struct Reader {
    inner: Inner,
}

impl Reader {
    pub fn open(bytes: Vec<u8>, options: ReaderOptions) -> Result<Reader> {
        if bytes.len() < 4 {
            return err(Status::TruncatedHeader, "file too short to contain a header");
        }
        let is_hipo_v6 = !options.force_legacy && Self::looks_like_record_based(&bytes)?;
        let inner = if is_hipo_v6 {
            let reader = RecordBasedReader::open(bytes, &options)?;
            let mut record_entry_counts = Vec::with_capacity(reader.record_count());
            for i in 0..reader.record_count() {
                record_entry_counts.push(reader.read_record(i)?.event_count() as u32);
            }
            Inner::RecordBased { reader, record_entry_counts, cache: RefCell::new(None) }
        } else {
            Inner::Legacy(LegacyReader::parse(&bytes)?)
        };
        Ok(Reader { inner })
    }

    fn looks_like_record_based(bytes: &[u8]) -> Result<bool> {
        let header = crate::headers::file_header::FileHeader::decode(
            &crate::buffer::ByteBuffer::wrap(bytes.to_vec(), crate::byte_order::ByteOrder::detect(bytes, 28)?),
            0,
        );
        Ok(header.map(|h| h.version() >= 6).unwrap_or(false))
    }

    pub fn has_dictionary(&self) -> bool {
        match &self.inner {
            Inner::Legacy(r) => r.has_dictionary(),
            Inner::RecordBased { reader, .. } => reader.file_header.has_dictionary(),
        }
    }

    pub fn event_count(&self) -> usize {
        match &self.inner {
            Inner::Legacy(r) => r.event_count(),
            Inner::RecordBased { record_entry_counts, .. } => record_entry_counts.iter().map(|&c| c as usize).sum(),
        }
    }

    pub fn event_bytes(&self, index: usize) -> Result<Vec<u8>> {
        match &self.inner {
            Inner::Legacy(r) => {
                if index >= r.event_count() {
                    return err(Status::IndexOutOfRange, "event index out of range");
                }
                Ok(r.event(index).to_vec())
            }
            Inner::RecordBased { reader, record_entry_counts, cache } => {
                let mut remaining = index;
                for (record_idx, &count) in record_entry_counts.iter().enumerate() {
                    if remaining < count as usize {
                        let mut slot = cache.borrow_mut();
                        if slot.as_ref().map(|(i, _)| *i != record_idx).unwrap_or(true) {
                            *slot = Some((record_idx, reader.read_record(record_idx)?));
                        }
                        let (_, input) = slot.as_ref().unwrap();
                        return Ok(input.event(remaining)?.to_vec());
                    }
                    remaining -= count as usize;
                }
                err(Status::IndexOutOfRange, "event index out of range")
            }
        }
    }

    /// A forward iterator over every event's raw bytes, in file order
    /// (supplemented feature — see `SPEC_FULL.md` §E).
    pub fn events(&self) -> EventsIter<'_> {
        EventsIter { reader: self, next: 0 }
    }
}

pub struct EventsIter<'a> {
    reader: &'a Reader,
    next: usize,
}

impl<'a> Iterator for EventsIter<'a> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.reader.event_count() {
            return None;
        }
        let result = self.reader.event_bytes(self.next);
        self.next += 1;
        Some(result)
    }
}
