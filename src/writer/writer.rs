//! Top-level event writer: accepts whole serialized events, batches them
//! into records, and drives the compress/write pipeline (spec §5
//! "Writer"). One `Writer` owns one output stream of (possibly several,
//! if splitting) files.

use super::compressor;
use super::file_closer;
use super::options::WriterOptions;
use super::ring::RingItem;
use super::write_thread::{self, WriteThreadConfig};
use crate::error::Result;
use crate::record_io::RecordOutput;
use crate::tree::EventTree;
use crossbeam_channel::Sender;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

pub struct Writer {
    options: WriterOptions,
    current: RecordOutput,
    sequence: u64,
    to_compress: Option<Sender<RingItem>>,
    compressor_handles: Vec<JoinHandle<()>>,
    write_handle: Option<JoinHandle<Result<()>>>,
    closer_handle: Option<JoinHandle<()>>,
    closed: bool,
}

impl Writer {
    /// Opens (or begins) a file sequence rooted at `base_path`; `naming`
    /// maps a 0-based file index to its path (e.g. `foo.0.hipo`,
    /// `foo.1.hipo`, ... for a split sequence — see `naming` module).
    pub fn create(options: WriterOptions, naming: impl Fn(u32) -> PathBuf + Send + 'static) -> Self {
        let (to_compress, from_producer) = crossbeam_channel::bounded(options.ring_capacity);
        let (to_write, from_compressors) = crossbeam_channel::bounded(options.ring_capacity);

        let compressor_handles = compressor::spawn_pool(options.compression_threads, from_producer, to_write);

        let cfg = WriteThreadConfig { order: options.order, split_size_bytes: options.split_size_bytes, naming: Box::new(naming) };
        let (write_handle, close_rx) = write_thread::spawn(from_compressors, cfg);
        let closer_handle = file_closer::spawn_closer(close_rx);

        let current = RecordOutput::new(options.order, options.max_record_event_count, options.max_record_uncompressed_bytes);
        Writer {
            options,
            current,
            sequence: 0,
            to_compress: Some(to_compress),
            compressor_handles,
            write_handle: Some(write_handle),
            closer_handle: Some(closer_handle),
            closed: false,
        }
    }

    /// Convenience constructor naming files `<stem>.0`, `<stem>.1`, ... when
    /// splitting, or just `<stem>` when `split_size_bytes` is 0.
    pub fn create_at(options: WriterOptions, path: impl AsRef<Path>) -> Self {
        let base = path.as_ref().to_path_buf();
        let splitting = options.split_size_bytes > 0;
        Writer::create(options, move |n| if splitting { base.with_extension(format!("{}", n)) } else { base.clone() })
    }

    /// Serializes `tree`'s root and queues it as one event.
    pub fn add_event(&mut self, tree: &mut EventTree) -> Result<()> {
        tree.set_all_header_lengths();
        let mut buf = crate::buffer::ByteBuffer::with_capacity(0, self.options.order);
        tree.serialize(tree.root(), &mut buf, self.options.order)?;
        self.add_event_bytes(buf.array().to_vec())
    }

    /// Queues an already-serialized event's bytes directly.
    pub fn add_event_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        if self.current.add_event(&bytes).is_err() {
            self.flush_current(false)?;
            self.current.add_event(&bytes)?;
        }
        Ok(())
    }

    fn flush_current(&mut self, is_last: bool) -> Result<()> {
        let mut finished = RecordOutput::new(self.options.order, self.options.max_record_event_count, self.options.max_record_uncompressed_bytes);
        std::mem::swap(&mut finished, &mut self.current);
        if finished.event_count() == 0 && !is_last {
            return Ok(());
        }
        let item = RingItem { sequence: self.sequence, output: finished, compression: self.options.compression, is_last };
        self.sequence += 1;
        let sender = self.to_compress.as_ref().ok_or_else(|| {
            crate::error::EvioError::new(crate::error::Status::ClosedObject, Some("writer pipeline has already shut down"))
        })?;
        sender.send(item).map_err(|_| {
            crate::error::EvioError::new(crate::error::Status::ClosedObject, Some("writer pipeline has already shut down"))
        })
    }

    /// Flushes any pending record as the final one, then joins every
    /// pipeline thread. Safe to call at most once.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.flush_current(true)?;
        // Drop the sender so the compressor threads' `rx.recv()` sees a
        // closed channel and returns, instead of blocking forever.
        self.to_compress.take();
        for h in self.compressor_handles.drain(..) {
            let _ = h.join();
        }
        if let Some(h) = self.write_handle.take() {
            h.join().map_err(|_| crate::error::EvioError::new(crate::error::Status::IoError, Some("write thread panicked")))??;
        }
        if let Some(h) = self.closer_handle.take() {
            let _ = h.join();
        }
        Ok(())
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.close();
        }
    }
}
