//! Container codec
//!
//! # Layout (little-endian)
//! ```text
//! 0x00: version       i32   container version tag (0x0A = unencrypted)
//! 0x04: audio_offset  i32   8 + serialized index length
//! 0x08: seek index          see [`crate::index`]
//! audio_offset..EOF         payload (possibly encrypted)
//! ```
//!
//! The payload is never held by [`Container`]; it is described by offset and
//! length and streamed by whoever needs it.

mod read;
mod write;

#[cfg(test)]
mod tests;

pub use read::read_container;
pub use write::{write_container, write_container_with_version};

use std::io::Cursor;

use crate::error::FormatError;
use crate::index::SeekIndex;
use crate::{CONTAINER_HEADER_SIZE, UNENCRYPTED_VERSION};

/// Fixed 8-byte container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: i32,
    pub audio_offset: i32,
}

impl ContainerHeader {
    pub const SIZE: usize = CONTAINER_HEADER_SIZE;

    pub fn new(version: i32, audio_offset: i32) -> Self {
        Self {
            version,
            audio_offset,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.version.to_le_bytes());
        out[4..8].copy_from_slice(&self.audio_offset.to_le_bytes());
        out
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            version: i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            audio_offset: i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        })
    }
}

/// A parsed container: header, map and the location of its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub version: i32,
    pub audio_offset: i32,
    pub index: SeekIndex,
    /// Length of the whole container stream, header included
    pub total_len: u64,
}

impl Container {
    /// Parse a container held in memory
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        read_container(&mut Cursor::new(bytes))
    }

    pub fn header(&self) -> ContainerHeader {
        ContainerHeader::new(self.version, self.audio_offset)
    }

    pub fn is_encrypted(&self) -> bool {
        self.version != UNENCRYPTED_VERSION
    }

    /// First payload byte, as an absolute offset
    pub fn payload_offset(&self) -> u64 {
        self.audio_offset.max(0) as u64
    }

    pub fn payload_len(&self) -> u64 {
        self.total_len.saturating_sub(self.payload_offset())
    }

    /// Payload slice of the buffer this container was parsed from
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        bytes.get(self.payload_offset() as usize..self.total_len as usize)
    }
}
