//! Container writing

use std::io::{self, Read, Write};

use super::ContainerHeader;
use crate::index::{SeekIndex, serialize_index};
use crate::io::copy_bounded;
use crate::{CONTAINER_HEADER_SIZE, UNENCRYPTED_VERSION};

/// Write an unencrypted container: header, serialized index, then the
/// payload source copied byte for byte.
///
/// Returns the total number of bytes written. On error the sink may hold a
/// partial container, which callers must discard.
pub fn write_container<R: Read, W: Write>(
    index: &SeekIndex,
    payload: &mut R,
    out: &mut W,
) -> io::Result<u64> {
    write_container_with_version(UNENCRYPTED_VERSION, index, payload, out)
}

/// Same as [`write_container`] but with an explicit header version tag.
///
/// The payload is written as given; encrypting it for a non-canonical tag
/// is a separate [`crate::cipher::transform`] step over the result.
pub fn write_container_with_version<R: Read, W: Write>(
    version: i32,
    index: &SeekIndex,
    payload: &mut R,
    out: &mut W,
) -> io::Result<u64> {
    let serialized = serialize_index(index);
    let audio_offset = i32::try_from(CONTAINER_HEADER_SIZE + serialized.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("seek index of {} entries is too large", index.entries.len()),
        )
    })?;

    out.write_all(&ContainerHeader::new(version, audio_offset).to_bytes())?;
    out.write_all(&serialized)?;
    let payload_len = copy_bounded(payload, out, None)?;
    out.flush()?;

    Ok(audio_offset as u64 + payload_len)
}
