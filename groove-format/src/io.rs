//! Little-endian helpers for the header and seek index

use std::io::{self, Cursor, Read, Write};

use crate::error::FormatError;

/// Size of the bounded buffer used to stream payload bytes
pub(crate) const COPY_BUFFER_SIZE: usize = 64 * 1024;

pub(crate) fn write_i32(out: &mut Vec<u8>, val: i32) {
    out.extend_from_slice(&val.to_le_bytes());
}

pub(crate) fn write_u32(out: &mut Vec<u8>, val: u32) {
    out.extend_from_slice(&val.to_le_bytes());
}

/// Read an i32 in little-endian format
pub(crate) fn read_i32(cursor: &mut Cursor<&[u8]>) -> Result<i32, FormatError> {
    let mut buf = [0u8; 4];
    read_field(cursor, &mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a u32 in little-endian format
pub(crate) fn read_u32(cursor: &mut Cursor<&[u8]>) -> Result<u32, FormatError> {
    let mut buf = [0u8; 4];
    read_field(cursor, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_field(cursor: &mut Cursor<&[u8]>, buf: &mut [u8]) -> Result<(), FormatError> {
    cursor.read_exact(buf).map_err(|_| {
        FormatError::MalformedIndex(format!(
            "field at offset {} runs past end of index region",
            cursor.position()
        ))
    })
}

/// Copy at most `limit` bytes (or everything when `None`) from `src` to `dst`
/// through a fixed-size buffer. Returns the number of bytes copied.
pub(crate) fn copy_bounded<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    limit: Option<u64>,
) -> io::Result<u64> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut copied = 0u64;

    loop {
        let want = match limit {
            Some(limit) => {
                let left = limit - copied;
                if left == 0 {
                    break;
                }
                left.min(buf.len() as u64) as usize
            }
            None => buf.len(),
        };

        let n = match src.read(&mut buf[..want]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        dst.write_all(&buf[..n])?;
        copied += n as u64;
    }

    match limit {
        Some(limit) if copied < limit => Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("payload ended after {copied} of {limit} bytes"),
        )),
        _ => Ok(copied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_le_fields() {
        let data = [0x0A, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(read_i32(&mut cursor).unwrap(), 0x0A);
        assert_eq!(read_u32(&mut cursor).unwrap(), u32::MAX);
        assert!(matches!(
            read_i32(&mut cursor),
            Err(FormatError::MalformedIndex(_))
        ));
    }

    #[test]
    fn test_copy_bounded_spans_buffers() {
        let src: Vec<u8> = (0..(COPY_BUFFER_SIZE * 2 + 17)).map(|i| i as u8).collect();
        let mut out = Vec::new();
        let n = copy_bounded(&mut &src[..], &mut out, None).unwrap();
        assert_eq!(n as usize, src.len());
        assert_eq!(out, src);
    }

    #[test]
    fn test_copy_bounded_limit() {
        let src = [1u8, 2, 3, 4, 5];
        let mut out = Vec::new();
        assert_eq!(copy_bounded(&mut &src[..], &mut out, Some(3)).unwrap(), 3);
        assert_eq!(out, [1, 2, 3]);

        let mut out = Vec::new();
        let err = copy_bounded(&mut &src[..], &mut out, Some(9)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
