//! Compressor worker pool: each thread pulls a `RingItem` off the shared
//! receiver, builds its compressed record bytes, and forwards a
//! `BuiltItem` downstream (spec §5 "Writer pipeline").

use super::ring::{BuiltItem, RingItem};
use crossbeam_channel::{Receiver, Sender};
use std::thread::JoinHandle;

pub fn spawn_pool(n: usize, rx: Receiver<RingItem>, tx: Sender<BuiltItem>) -> Vec<JoinHandle<()>> {
    (0..n)
        .map(|worker_id| {
            let rx = rx.clone();
            let tx = tx.clone();
            std::thread::Builder::new()
                .name(format!("evio-compress-{}", worker_id))
                .spawn(move || run(rx, tx))
                .expect("failed to spawn compressor thread")
        })
        .collect()
}

fn run(rx: Receiver<RingItem>, tx: Sender<BuiltItem>) {
    while let Ok(item) = rx.recv() {
        let event_count = item.output.event_count();
        match item.output.build(item.compression, item.is_last) {
            Ok(bytes) => {
                let built = BuiltItem { sequence: item.sequence, bytes, event_count, is_last: item.is_last };
                if tx.send(built).is_err() {
                    break;
                }
            }
            Err(e) => {
                log::error!("record {} failed to compress: {}", item.sequence, e);
                break;
            }
        }
    }
}
