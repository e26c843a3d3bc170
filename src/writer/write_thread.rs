//! The single write thread: drains resequenced, in-order record bytes and
//! streams them to the current output file, splitting onto a new file once
//! the configured size threshold is crossed (spec §5 "Writer", §4 "File
//! splitting"). Finishing a file (trailer + header patch) is handed off to
//! `file_closer` so it doesn't stall the next file's first write.

use super::file_closer::{self, PendingClose};
use super::ring::{BuiltItem, Resequencer};
use crate::byte_order::ByteOrder;
use crate::error::Result;
use crate::headers::file_header::{FileHeader, FILE_HEADER_BYTES};
use crossbeam_channel::Receiver;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::thread::JoinHandle;

pub struct WriteThreadConfig {
    pub order: ByteOrder,
    pub split_size_bytes: u64,
    pub naming: Box<dyn Fn(u32) -> PathBuf + Send>,
}

struct OpenFile {
    path: PathBuf,
    writer: BufWriter<File>,
    header: FileHeader,
    bytes_written: u64,
    record_words: Vec<u32>,
}

fn open_next(file_number: u32, cfg: &WriteThreadConfig) -> Result<OpenFile> {
    let path = (cfg.naming)(file_number);
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let mut header = FileHeader::new();
    header.file_number = file_number;
    header.set_trailer_position(0);
    let mut buf = crate::buffer::ByteBuffer::with_capacity(FILE_HEADER_BYTES, cfg.order);
    header.encode(&mut buf, 0)?;
    writer.write_all(buf.array())?;
    Ok(OpenFile { path, writer, header, bytes_written: FILE_HEADER_BYTES as u64, record_words: Vec::new() })
}

/// Spawns the write thread, returning its handle and a channel of
/// `PendingClose` jobs for the caller to hand to `file_closer`.
pub fn spawn(rx: Receiver<BuiltItem>, cfg: WriteThreadConfig) -> (JoinHandle<Result<()>>, crossbeam_channel::Receiver<PendingClose>) {
    let (close_tx, close_rx) = crossbeam_channel::unbounded();
    let handle = std::thread::Builder::new()
        .name("evio-writer".to_string())
        .spawn(move || run(rx, cfg, close_tx))
        .expect("failed to spawn write thread");
    (handle, close_rx)
}

fn run(rx: Receiver<BuiltItem>, cfg: WriteThreadConfig, close_tx: crossbeam_channel::Sender<PendingClose>) -> Result<()> {
    let mut resequencer = Resequencer::new();
    let mut file_number = 0u32;
    let mut current = open_next(file_number, &cfg)?;

    while let Ok(item) = rx.recv() {
        for ready in resequencer.accept(item) {
            current.writer.write_all(&ready.bytes)?;
            current.bytes_written += ready.bytes.len() as u64;
            current.header.record_count += 1;
            current.record_words.push((ready.bytes.len() / 4) as u32);

            let should_split = cfg.split_size_bytes > 0 && current.bytes_written >= cfg.split_size_bytes && !ready.is_last;
            if should_split || ready.is_last {
                current.writer.flush()?;
                file_closer::close_current(&mut current.writer, &mut current.header, &current.record_words, cfg.order)?;
                let finished = current;
                let _ = close_tx.send(PendingClose { path: finished.path });
                if !ready.is_last {
                    file_number += 1;
                    current = open_next(file_number, &cfg)?;
                } else {
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}
