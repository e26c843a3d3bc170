//! Stack-machine interpreter driving the compiled composite-format program:
//! byte-reorder (`swap`) and pure length validation both walk the same
//! program (spec §4.3).

use crate::byte_order::ByteOrder;
use crate::composite::format::{LeafKind, Opcode, RepeatSource};
use crate::error::{err, Result, Status};

struct Frame {
    start: usize,
    end: usize,
    remaining: u32,
}

/// Reads the repeat count for a `Leaf`/`GroupStart` opcode, consuming bytes
/// from `buf[*pos..]` for the dynamic (`N`/`n`/`m`) forms. When `swap` is
/// set, the consumed bytes are also byte-reordered in place — multiplier
/// values are themselves data on the wire.
fn resolve_repeat(repeat: RepeatSource, buf: &mut [u8], pos: &mut usize, order: ByteOrder, swap: bool) -> Result<u32> {
    match repeat {
        RepeatSource::Fixed(n) => Ok(n),
        RepeatSource::DynamicN => {
            let v = read_u32(buf, *pos, order, swap)?;
            if swap {
                swap_element(buf, *pos, 4)?;
            }
            *pos += 4;
            Ok(v)
        }
        RepeatSource::DynamicLowerN => {
            let v = read_u16(buf, *pos, order, swap)?;
            if swap {
                swap_element(buf, *pos, 2)?;
            }
            *pos += 2;
            Ok(v as u32)
        }
        RepeatSource::DynamicM => {
            let v = *buf.get(*pos).ok_or_else(|| payload_too_short())?;
            *pos += 1;
            Ok(v as u32)
        }
    }
}

fn payload_too_short() -> crate::error::EvioError {
    crate::error::EvioError::new(Status::BadFormat, Some("composite payload shorter than declared"))
}

fn read_u32(buf: &[u8], pos: usize, order: ByteOrder, _swap: bool) -> Result<u32> {
    if pos + 4 > buf.len() {
        return Err(payload_too_short());
    }
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[pos..pos + 4]);
    Ok(match order {
        ByteOrder::Big => u32::from_be_bytes(b),
        ByteOrder::Little => u32::from_le_bytes(b),
    })
}

fn read_u16(buf: &[u8], pos: usize, order: ByteOrder, _swap: bool) -> Result<u16> {
    if pos + 2 > buf.len() {
        return Err(payload_too_short());
    }
    let mut b = [0u8; 2];
    b.copy_from_slice(&buf[pos..pos + 2]);
    Ok(match order {
        ByteOrder::Big => u16::from_be_bytes(b),
        ByteOrder::Little => u16::from_le_bytes(b),
    })
}

fn swap_element(buf: &mut [u8], pos: usize, size: usize) -> Result<()> {
    if pos + size > buf.len() {
        return Err(payload_too_short());
    }
    match size {
        1 => {}
        2 => buf[pos..pos + 2].swap(0, 1),
        4 => {
            buf.swap(pos, pos + 3);
            buf.swap(pos + 1, pos + 2);
        }
        8 => {
            buf.swap(pos, pos + 7);
            buf.swap(pos + 1, pos + 6);
            buf.swap(pos + 2, pos + 5);
            buf.swap(pos + 3, pos + 4);
        }
        _ => unreachable!("leaf element sizes are 1/2/4/8"),
    }
    Ok(())
}

/// Walks `program` over `buf`, either swapping every primitive element in
/// place (`swap = true`) or merely validating that the declared structure
/// consumes exactly `buf.len()` bytes (`swap = false`).
///
/// `order` is the byte order multiplier values (`N`/`n`/`m`) are read in —
/// for a swap pass this is the *source* order, since the multiplier must be
/// interpreted correctly before its own bytes are flipped.
fn walk(buf: &mut [u8], order: ByteOrder, program: &[Opcode], swap: bool) -> Result<usize> {
    let mut stack: Vec<Frame> = Vec::new();
    let mut pc = 0usize;
    let mut pos = 0usize;

    loop {
        if pc >= program.len() {
            match stack.pop() {
                Some(_) => return err(Status::BadFormat, "unmatched '(' in compiled composite program"),
                None => break,
            }
        }
        match &program[pc] {
            Opcode::Leaf { kind, repeat } => {
                let count = resolve_repeat(*repeat, buf, &mut pos, order, swap)?;
                let size = kind.element_size();
                for _ in 0..count {
                    if swap && *kind != LeafKind::Text {
                        swap_element(buf, pos, size)?;
                    } else if pos + size > buf.len() {
                        return Err(payload_too_short());
                    }
                    pos += size;
                }
                pc += 1;
            }
            Opcode::GroupStart { repeat, match_end } => {
                let count = resolve_repeat(*repeat, buf, &mut pos, order, swap)?;
                if count == 0 {
                    pc = match_end + 1;
                } else {
                    stack.push(Frame { start: pc + 1, end: *match_end, remaining: count - 1 });
                    pc += 1;
                }
            }
            Opcode::GroupEnd { match_start } => {
                if let Some(top) = stack.last_mut() {
                    if top.remaining > 0 {
                        top.remaining -= 1;
                        pc = top.start;
                    } else {
                        stack.pop();
                        pc += 1;
                    }
                } else {
                    return err(Status::BadFormat, &format!("unmatched GroupEnd referencing {}", match_start));
                }
            }
        }
    }
    Ok(pos)
}

/// Byte-swaps every primitive element described by `program` within `buf`,
/// in place. An involution: calling twice (once per direction, per spec
/// scenario §8.6) restores the original bytes.
pub fn swap(buf: &mut [u8], order: ByteOrder, program: &[Opcode]) -> Result<()> {
    walk(buf, order, program, true)?;
    Ok(())
}

/// Validates that `buf` is exactly as long as `program` declares, given
/// `order` to interpret any dynamic multiplier values. Used by
/// `CompositeDataBuilder::finish` and by the decode path before a composite
/// payload is accepted.
pub fn validate_length(buf: &[u8], order: ByteOrder, program: &[Opcode]) -> Result<()> {
    let mut scratch = buf.to_vec();
    let consumed = walk(&mut scratch, order, program, false)?;
    if consumed != buf.len() {
        return err(Status::BadFormat, "composite payload length does not match declared format");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite::format::compile;

    fn build_sample() -> Vec<u8> {
        // format "N(I,2F)", N=2: per repeat one i32 and two f32.
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes());
        for rep in 0..2i32 {
            buf.extend_from_slice(&(rep + 1).to_le_bytes());
            buf.extend_from_slice(&(1.5f32 * rep as f32).to_le_bytes());
            buf.extend_from_slice(&(2.5f32 * rep as f32).to_le_bytes());
        }
        buf
    }

    #[test]
    fn swap_is_involution() {
        let program = compile("N(I,2F)").unwrap();
        let original = build_sample();
        let mut once = original.clone();
        swap(&mut once, ByteOrder::Little, &program).unwrap();
        assert_ne!(once, original);
        let mut twice = once.clone();
        swap(&mut twice, ByteOrder::Big, &program).unwrap();
        assert_eq!(twice, original);
    }

    #[test]
    fn validates_exact_length() {
        let program = compile("N(I,2F)").unwrap();
        let buf = build_sample();
        validate_length(&buf, ByteOrder::Little, &program).unwrap();
        let short = &buf[..buf.len() - 1];
        assert!(validate_length(short, ByteOrder::Little, &program).is_err());
    }

    #[test]
    fn zero_repeat_group_is_skipped() {
        let program = compile("N(I,2F)").unwrap();
        let buf = 0u32.to_le_bytes().to_vec();
        validate_length(&buf, ByteOrder::Little, &program).unwrap();
    }
}
