//! Composite Data (type 15): a format string compiled to a stack-machine
//! opcode program plus a heterogeneous, byte-swappable payload (spec §4.3).

pub mod codec;
pub mod format;

use crate::byte_order::ByteOrder;
use crate::error::Result;
use format::Opcode;

/// A compiled composite format, ready to drive `swap`/`validate_length`
/// against any payload claiming to match it.
#[derive(Clone, Debug)]
pub struct CompositeFormat {
    source: String,
    program: Vec<Opcode>,
}

impl CompositeFormat {
    pub fn compile(source: &str) -> Result<Self> {
        let program = format::compile(source)?;
        Ok(CompositeFormat { source: source.to_string(), program })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> &[Opcode] {
        &self.program
    }

    pub fn swap(&self, buf: &mut [u8], order: ByteOrder) -> Result<()> {
        codec::swap(buf, order, &self.program)
    }

    pub fn validate(&self, buf: &[u8], order: ByteOrder) -> Result<()> {
        codec::validate_length(buf, order, &self.program)
    }
}

/// Fluent builder for a composite payload: accepts typed values in
/// format-string order and validates the accumulated byte count against the
/// compiled program once finished (SPEC_FULL.md §E, the write-side
/// companion to the decode/swap engine spec.md §4.3 specifies).
pub struct CompositeDataBuilder {
    format: CompositeFormat,
    order: ByteOrder,
    buf: Vec<u8>,
}

impl CompositeDataBuilder {
    pub fn new(format_str: &str, order: ByteOrder) -> Result<Self> {
        Ok(CompositeDataBuilder { format: CompositeFormat::compile(format_str)?, order, buf: Vec::new() })
    }

    fn put<const N: usize>(&mut self, bytes: [u8; N]) -> &mut Self {
        self.buf.extend_from_slice(&bytes);
        self
    }

    pub fn push_u32(&mut self, v: u32) -> &mut Self {
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.put(b)
    }

    pub fn push_i32(&mut self, v: i32) -> &mut Self {
        self.push_u32(v as u32)
    }

    pub fn push_f32(&mut self, v: f32) -> &mut Self {
        self.push_u32(v.to_bits())
    }

    pub fn push_u64(&mut self, v: u64) -> &mut Self {
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.put(b)
    }

    pub fn push_f64(&mut self, v: f64) -> &mut Self {
        self.push_u64(v.to_bits())
    }

    pub fn push_u16(&mut self, v: u16) -> &mut Self {
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.put(b)
    }

    pub fn push_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn push_text(&mut self, text: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(text);
        self
    }

    /// Validates the accumulated bytes against the compiled format and
    /// returns the finished payload plus the format it was built against.
    pub fn finish(self) -> Result<(CompositeFormat, Vec<u8>)> {
        self.format.validate(&self.buf, self.order)?;
        Ok((self.format, self.buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_round_trip() {
        let mut b = CompositeDataBuilder::new("N(I,2F)", ByteOrder::Little).unwrap();
        b.push_u32(2);
        for i in 0..2 {
            b.push_i32(i);
            b.push_f32(1.0 * i as f32);
            b.push_f32(2.0 * i as f32);
        }
        let (_format, bytes) = b.finish().unwrap();
        assert_eq!(bytes.len(), 4 + 2 * (4 + 4 + 4));
    }
}
