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

use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Closed taxonomy of failure modes across the engine (spec §7). `Status` is
/// `Copy` so callers can match on it without touching the owned message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    BadMagic,
    BadVersion,
    BadHeaderLength,
    TruncatedHeader,
    BufferOverflow,
    BufferUnderflow,
    IndexOutOfRange,
    BadFormat,
    EndOfStream,
    BlockSequence,
    IoError,
    CompressionError,
    ClosedObject,
    Conflict,
    TransformTooLarge,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::BadMagic => "bad magic",
            Status::BadVersion => "bad version",
            Status::BadHeaderLength => "bad header length",
            Status::TruncatedHeader => "truncated header",
            Status::BufferOverflow => "buffer overflow",
            Status::BufferUnderflow => "buffer underflow",
            Status::IndexOutOfRange => "index out of range",
            Status::BadFormat => "bad format",
            Status::EndOfStream => "end of stream",
            Status::BlockSequence => "block sequence check failed",
            Status::IoError => "io error",
            Status::CompressionError => "compression error",
            Status::ClosedObject => "object is closed",
            Status::Conflict => "conflict",
            Status::TransformTooLarge => "transform too large",
        };
        write!(f, "{}", s)
    }
}

/// Owned error value returned across every public API boundary in this
/// crate. Carries a `Status` for matching plus an optional human message and
/// an optional underlying cause.
pub struct EvioError {
    status: Status,
    description: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EvioError {
    pub fn new(status: Status, description: Option<&str>) -> Self {
        EvioError {
            status,
            description: description.map(|s| s.to_string()),
            source: None,
        }
    }

    pub fn with_source(
        status: Status,
        description: &str,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        EvioError {
            status,
            description: Some(description.to_string()),
            source: Some(Box::new(source)),
        }
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for EvioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvioError {{ status: {:?}, description: {:?} }}", self.status, self.description)
    }
}

impl fmt::Display for EvioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(d) => write!(f, "{}: {}", self.status, d),
            None => write!(f, "{}", self.status),
        }
    }
}

impl StdError for EvioError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|b| b.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<io::Error> for EvioError {
    fn from(e: io::Error) -> Self {
        EvioError::with_source(Status::IoError, "io error", e)
    }
}

pub type Result<T> = std::result::Result<T, EvioError>;

/// Shorthand for constructing an `EvioError` without a source.
pub(crate) fn err<T>(status: Status, description: &str) -> Result<T> {
    Err(EvioError::new(status, Some(description)))
}
