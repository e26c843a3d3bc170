// Copyright 2019 Fullstop000 <fullstop1005@gmail.com>.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// See the License for the specific language governing permissions and
// limitations under the License.

#![allow(clippy::unreadable_literal)]
#![allow(clippy::type_complexity)]

//! A library for reading and writing EVIO/HIPO self-describing binary
//! event-data files, the container format used by nuclear-physics DAQ and
//! offline-analysis systems. See each module for the corresponding piece
//! of the format: headers, the in-memory tree, composite data, the
//! dictionary, zero-copy compact access, and the multi-threaded writer and
//! version-aware reader built on top of them.

#[macro_use]
extern crate log;
extern crate crossbeam_channel;

pub mod buffer;
pub mod byte_order;
pub mod compact;
pub mod composite;
pub mod compression;
pub mod data_type;
pub mod dictionary;
pub mod error;
pub mod headers;
pub mod naming;
pub mod reader;
pub mod record_io;
pub mod tree;
pub mod writer;

pub use buffer::ByteBuffer;
pub use byte_order::ByteOrder;
pub use compact::CompactReader;
pub use composite::{CompositeDataBuilder, CompositeFormat};
pub use data_type::DataType;
pub use dictionary::Dictionary;
pub use error::{EvioError, Result, Status};
pub use headers::record_header::CompressionType;
pub use reader::{Reader, ReaderOptions};
pub use tree::node::{NodeId, StructureKind};
pub use tree::EventTree;
pub use writer::{Writer, WriterOptions};
