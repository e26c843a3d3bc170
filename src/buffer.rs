//! A growable byte container with Java-NIO-style absolute/relative accessors,
//! mark/position/limit bookkeeping and a byte order. This is the storage
//! primitive every header, record and tree node is encoded into or decoded
//! from (spec §4.1).

use crate::byte_order::ByteOrder;
use crate::error::{err, Result, Status};

#[derive(Clone, Debug)]
pub struct ByteBuffer {
    data: Vec<u8>,
    position: usize,
    limit: usize,
    mark: Option<usize>,
    order: ByteOrder,
}

impl ByteBuffer {
    /// A buffer with `capacity` zeroed bytes, position 0, limit == capacity.
    pub fn with_capacity(capacity: usize, order: ByteOrder) -> Self {
        ByteBuffer {
            data: vec![0u8; capacity],
            position: 0,
            limit: capacity,
            mark: None,
            order,
        }
    }

    /// Wraps an existing owned `Vec<u8>`; position 0, limit == data.len().
    pub fn wrap(data: Vec<u8>, order: ByteOrder) -> Self {
        let limit = data.len();
        ByteBuffer { data, position: 0, limit, mark: None, order }
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return err(Status::BufferOverflow, "position beyond limit");
        }
        self.position = position;
        if let Some(m) = self.mark {
            if m > position {
                self.mark = None;
            }
        }
        Ok(())
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.data.len() {
            return err(Status::BufferOverflow, "limit beyond capacity");
        }
        self.limit = limit;
        if self.position > limit {
            self.position = limit;
        }
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.position)
    }

    pub fn mark(&mut self) {
        self.mark = Some(self.position);
    }

    pub fn reset(&mut self) -> Result<()> {
        match self.mark {
            Some(m) => {
                self.position = m;
                Ok(())
            }
            None => err(Status::BufferUnderflow, "no mark has been set"),
        }
    }

    /// Resets position to 0 and limit to the current position; the classic
    /// "flip" idiom for switching a buffer from writing to reading.
    pub fn flip(&mut self) {
        self.limit = self.position;
        self.position = 0;
        self.mark = None;
    }

    pub fn clear(&mut self) {
        self.position = 0;
        self.limit = self.data.len();
        self.mark = None;
    }

    pub fn rewind(&mut self) {
        self.position = 0;
        self.mark = None;
    }

    /// Grows the backing storage to at least `new_capacity`, preserving all
    /// existing bytes, position and limit markers.
    pub fn expand(&mut self, new_capacity: usize) {
        if new_capacity > self.data.len() {
            self.data.resize(new_capacity, 0);
        }
    }

    /// The full backing storage, ignoring position/limit — used for
    /// zero-copy interop with I/O that wants the raw bytes.
    pub fn array(&self) -> &[u8] {
        &self.data
    }

    pub fn array_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// A non-owning view over `[self.position, self.limit)` with its own,
    /// independent position/limit starting at 0.
    pub fn slice(&self) -> ByteBuffer {
        ByteBuffer::wrap(self.data[self.position..self.limit].to_vec(), self.order)
    }

    /// A full, independent copy sharing position/limit/mark with `self`.
    pub fn duplicate(&self) -> ByteBuffer {
        self.clone()
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<()> {
        if offset + len > self.data.len() {
            return err(Status::BufferOverflow, "absolute access beyond capacity");
        }
        Ok(())
    }

    // --- absolute get ---

    pub fn get_u8_at(&self, offset: usize) -> Result<u8> {
        self.check_bounds(offset, 1)?;
        Ok(self.data[offset])
    }

    pub fn get_u16_at(&self, offset: usize) -> Result<u16> {
        self.check_bounds(offset, 2)?;
        let b = [self.data[offset], self.data[offset + 1]];
        Ok(match self.order {
            ByteOrder::Big => u16::from_be_bytes(b),
            ByteOrder::Little => u16::from_le_bytes(b),
        })
    }

    pub fn get_i16_at(&self, offset: usize) -> Result<i16> {
        Ok(self.get_u16_at(offset)? as i16)
    }

    pub fn get_u32_at(&self, offset: usize) -> Result<u32> {
        self.check_bounds(offset, 4)?;
        let mut b = [0u8; 4];
        b.copy_from_slice(&self.data[offset..offset + 4]);
        Ok(match self.order {
            ByteOrder::Big => u32::from_be_bytes(b),
            ByteOrder::Little => u32::from_le_bytes(b),
        })
    }

    pub fn get_i32_at(&self, offset: usize) -> Result<i32> {
        Ok(self.get_u32_at(offset)? as i32)
    }

    pub fn get_u64_at(&self, offset: usize) -> Result<u64> {
        self.check_bounds(offset, 8)?;
        let mut b = [0u8; 8];
        b.copy_from_slice(&self.data[offset..offset + 8]);
        Ok(match self.order {
            ByteOrder::Big => u64::from_be_bytes(b),
            ByteOrder::Little => u64::from_le_bytes(b),
        })
    }

    pub fn get_i64_at(&self, offset: usize) -> Result<i64> {
        Ok(self.get_u64_at(offset)? as i64)
    }

    pub fn get_f32_at(&self, offset: usize) -> Result<f32> {
        Ok(f32::from_bits(self.get_u32_at(offset)?))
    }

    pub fn get_f64_at(&self, offset: usize) -> Result<f64> {
        Ok(f64::from_bits(self.get_u64_at(offset)?))
    }

    pub fn get_bytes_at(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.check_bounds(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }

    // --- absolute put ---

    pub fn put_u8_at(&mut self, offset: usize, v: u8) -> Result<()> {
        self.check_bounds(offset, 1)?;
        self.data[offset] = v;
        Ok(())
    }

    pub fn put_u16_at(&mut self, offset: usize, v: u16) -> Result<()> {
        self.check_bounds(offset, 2)?;
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.data[offset..offset + 2].copy_from_slice(&b);
        Ok(())
    }

    pub fn put_u32_at(&mut self, offset: usize, v: u32) -> Result<()> {
        self.check_bounds(offset, 4)?;
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.data[offset..offset + 4].copy_from_slice(&b);
        Ok(())
    }

    pub fn put_i32_at(&mut self, offset: usize, v: i32) -> Result<()> {
        self.put_u32_at(offset, v as u32)
    }

    pub fn put_u64_at(&mut self, offset: usize, v: u64) -> Result<()> {
        self.check_bounds(offset, 8)?;
        let b = match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        };
        self.data[offset..offset + 8].copy_from_slice(&b);
        Ok(())
    }

    pub fn put_i64_at(&mut self, offset: usize, v: i64) -> Result<()> {
        self.put_u64_at(offset, v as u64)
    }

    pub fn put_f32_at(&mut self, offset: usize, v: f32) -> Result<()> {
        self.put_u32_at(offset, v.to_bits())
    }

    pub fn put_f64_at(&mut self, offset: usize, v: f64) -> Result<()> {
        self.put_u64_at(offset, v.to_bits())
    }

    pub fn put_bytes_at(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        self.check_bounds(offset, bytes.len())?;
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    // --- relative accessors, driven by position/limit ---

    fn advance(&mut self, n: usize) -> Result<usize> {
        if self.position + n > self.limit {
            return err(Status::BufferUnderflow, "relative access beyond limit");
        }
        let start = self.position;
        self.position += n;
        Ok(start)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        let off = self.advance(1)?;
        self.get_u8_at(off)
    }

    pub fn get_u16(&mut self) -> Result<u16> {
        let off = self.advance(2)?;
        self.get_u16_at(off)
    }

    pub fn get_u32(&mut self) -> Result<u32> {
        let off = self.advance(4)?;
        self.get_u32_at(off)
    }

    pub fn get_u64(&mut self) -> Result<u64> {
        let off = self.advance(8)?;
        self.get_u64_at(off)
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<&[u8]> {
        let off = self.advance(len)?;
        self.get_bytes_at(off, len)
    }

    pub fn put_u8(&mut self, v: u8) -> Result<()> {
        if self.position + 1 > self.data.len() {
            self.expand(self.position + 1);
        }
        let off = self.advance_put(1);
        self.put_u8_at(off, v)?;
        self.extend_limit_if_needed();
        Ok(())
    }

    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        if self.position + 2 > self.data.len() {
            self.expand(self.position + 2);
        }
        let off = self.advance_put(2);
        self.put_u16_at(off, v)?;
        self.extend_limit_if_needed();
        Ok(())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        if self.position + 4 > self.data.len() {
            self.expand(self.position + 4);
        }
        let off = self.advance_put(4);
        self.put_u32_at(off, v)?;
        self.extend_limit_if_needed();
        Ok(())
    }

    pub fn put_u64(&mut self, v: u64) -> Result<()> {
        if self.position + 8 > self.data.len() {
            self.expand(self.position + 8);
        }
        let off = self.advance_put(8);
        self.put_u64_at(off, v)?;
        self.extend_limit_if_needed();
        Ok(())
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.position + bytes.len() > self.data.len() {
            self.expand(self.position + bytes.len());
        }
        let off = self.advance_put(bytes.len());
        self.put_bytes_at(off, bytes)?;
        self.extend_limit_if_needed();
        Ok(())
    }

    /// Expands capacity/limit to cover `n` more bytes from the current
    /// position and advances past them, returning the starting offset.
    /// Used by callers (tree serialization) that want to reserve space for
    /// an absolute-style encoder rather than writing relative values
    /// directly.
    pub fn reserve_and_advance(&mut self, n: usize) -> usize {
        let offset = self.position;
        if offset + n > self.data.len() {
            self.expand(offset + n);
        }
        self.position = offset + n;
        self.extend_limit_if_needed();
        offset
    }

    fn advance_put(&mut self, n: usize) -> usize {
        let start = self.position;
        self.position += n;
        start
    }

    fn extend_limit_if_needed(&mut self) {
        if self.position > self.limit {
            self.limit = self.position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_round_trip() {
        let mut buf = ByteBuffer::with_capacity(0, ByteOrder::Little);
        buf.put_u32(0xdead_beef).unwrap();
        buf.put_u16(0x1234).unwrap();
        buf.set_position(0).unwrap();
        assert_eq!(buf.get_u32().unwrap(), 0xdead_beef);
        assert_eq!(buf.get_u16().unwrap(), 0x1234);
    }

    #[test]
    fn big_endian_absolute() {
        let mut buf = ByteBuffer::with_capacity(4, ByteOrder::Big);
        buf.put_u32_at(0, 0x0102_0304).unwrap();
        assert_eq!(buf.array(), &[1, 2, 3, 4]);
    }

    #[test]
    fn overflow_is_caught() {
        let buf = ByteBuffer::with_capacity(2, ByteOrder::Little);
        assert!(buf.get_u32_at(0).is_err());
    }

    #[test]
    fn mark_reset() {
        let mut buf = ByteBuffer::with_capacity(16, ByteOrder::Little);
        buf.set_position(4).unwrap();
        buf.mark();
        buf.set_position(10).unwrap();
        buf.reset().unwrap();
        assert_eq!(buf.position(), 4);
    }
}
