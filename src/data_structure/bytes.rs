//! Bounds-checked little-endian readers/writers over a raw byte region.
//!
//! Every other module reaches for these instead of indexing buffers
//! directly so an out-of-range field access turns into a `CodecError`
//! instead of a panic.
use byteorder::{ByteOrder, LittleEndian};

use crate::error::{CodecError, Result};

fn check_bound(what: &'static str, offset: usize, len: usize, buf_len: usize) -> Result<()> {
    if offset + len > buf_len {
        return Err(CodecError::OutOfRange {
            what,
            index: offset + len,
            bound: buf_len,
        });
    }
    Ok(())
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8> {
    check_bound("read_u8", offset, 1, buf.len())?;
    Ok(buf[offset])
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16> {
    check_bound("read_u16", offset, 2, buf.len())?;
    Ok(LittleEndian::read_u16(&buf[offset..offset + 2]))
}

pub fn read_u24(buf: &[u8], offset: usize) -> Result<u32> {
    check_bound("read_u24", offset, 3, buf.len())?;
    Ok(LittleEndian::read_u24(&buf[offset..offset + 3]))
}

pub fn read_u32(buf: &[u8], offset: usize) -> Result<u32> {
    check_bound("read_u32", offset, 4, buf.len())?;
    Ok(LittleEndian::read_u32(&buf[offset..offset + 4]))
}

pub fn write_u8(buf: &mut [u8], offset: usize, value: u8) -> Result<()> {
    check_bound("write_u8", offset, 1, buf.len())?;
    buf[offset] = value;
    Ok(())
}

pub fn write_u16(buf: &mut [u8], offset: usize, value: u16) -> Result<()> {
    check_bound("write_u16", offset, 2, buf.len())?;
    LittleEndian::write_u16(&mut buf[offset..offset + 2], value);
    Ok(())
}

pub fn write_u24(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    check_bound("write_u24", offset, 3, buf.len())?;
    LittleEndian::write_u24(&mut buf[offset..offset + 3], value);
    Ok(())
}

pub fn write_u32(buf: &mut [u8], offset: usize, value: u32) -> Result<()> {
    check_bound("write_u32", offset, 4, buf.len())?;
    LittleEndian::write_u32(&mut buf[offset..offset + 4], value);
    Ok(())
}

pub fn slice(buf: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    check_bound("slice", offset, len, buf.len())?;
    Ok(&buf[offset..offset + len])
}

pub fn copy_bytes(dst: &mut [u8], dst_offset: usize, src: &[u8]) -> Result<()> {
    check_bound("copy_bytes", dst_offset, src.len(), dst.len())?;
    dst[dst_offset..dst_offset + src.len()].copy_from_slice(src);
    Ok(())
}

pub fn is_all_zero(buf: &[u8]) -> bool {
    buf.iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let buf = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u16(&buf, 0).unwrap(), 0x5678);
        assert_eq!(read_u32(&buf, 0).unwrap(), 0x12345678);
    }

    #[test]
    fn read_past_end_is_out_of_range() {
        let buf = [0u8; 3];
        assert!(read_u32(&buf, 0).is_err());
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut buf = [0u8; 4];
        write_u32(&mut buf, 0, 0xDEADBEEF).unwrap();
        assert_eq!(read_u32(&buf, 0).unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn all_zero_detection() {
        assert!(is_all_zero(&[0, 0, 0]));
        assert!(!is_all_zero(&[0, 1, 0]));
    }
}
