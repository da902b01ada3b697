//! Container reading

use std::io::{Read, Seek, SeekFrom};

use super::{Container, ContainerHeader};
use crate::error::FormatError;
use crate::index::deserialize_index;
use crate::{CONTAINER_HEADER_SIZE, is_known_version};

/// Read header and seek index from a container stream.
///
/// The payload is not read; the returned [`Container`] records where it
/// lives. The stream is left positioned at the start of the payload.
pub fn read_container<R: Read + Seek>(reader: &mut R) -> Result<Container, FormatError> {
    let total_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    if total_len < CONTAINER_HEADER_SIZE as u64 {
        return Err(FormatError::Truncated {
            needed: CONTAINER_HEADER_SIZE as u64,
            available: total_len,
        });
    }

    let mut header_bytes = [0u8; CONTAINER_HEADER_SIZE];
    reader.read_exact(&mut header_bytes)?;
    let header = ContainerHeader::from_bytes(&header_bytes).ok_or(FormatError::Truncated {
        needed: CONTAINER_HEADER_SIZE as u64,
        available: total_len,
    })?;

    if !is_known_version(header.version) {
        return Err(FormatError::UnsupportedVersion(header.version));
    }

    if header.audio_offset < CONTAINER_HEADER_SIZE as i32 {
        return Err(FormatError::MalformedIndex(format!(
            "audio offset {} lies inside the container header",
            header.audio_offset
        )));
    }

    let audio_offset = header.audio_offset as u64;
    if audio_offset > total_len {
        return Err(FormatError::Truncated {
            needed: audio_offset,
            available: total_len,
        });
    }

    let mut region = vec![0u8; (audio_offset - CONTAINER_HEADER_SIZE as u64) as usize];
    reader.read_exact(&mut region)?;
    let index = deserialize_index(&region)?;

    Ok(Container {
        version: header.version,
        audio_offset: header.audio_offset,
        index,
        total_len,
    })
}
