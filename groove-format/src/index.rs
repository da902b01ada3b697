//! Seek index ("the map") and its on-disk layout
//!
//! # Layout
//! ```text
//! 0x00: format_version i32
//! 0x04: chunk_size     i32 (> 0)
//! 0x08: entry_count    i32 (n)
//! 0x0C: n x { byte_offset u32, sample_offset u32 }
//! ```

use std::io::Cursor;

use serde::Serialize;

use crate::error::FormatError;
use crate::io::{read_i32, read_u32, write_i32, write_u32};

/// Fixed part of a serialized index (version + chunk size + count)
pub const INDEX_HEADER_SIZE: usize = 12;

/// Serialized size of one [`SeekIndexEntry`]
pub const INDEX_ENTRY_SIZE: usize = 8;

/// "Decoding up to `byte_offset` yields at least `sample_offset` samples."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeekIndexEntry {
    pub byte_offset: u32,
    pub sample_offset: u32,
}

impl SeekIndexEntry {
    pub fn new(byte_offset: u32, sample_offset: u32) -> Self {
        Self {
            byte_offset,
            sample_offset,
        }
    }
}

/// Fixed-stride map from sample positions to payload byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekIndex {
    pub format_version: i32,
    /// Samples covered by each entry
    pub chunk_size: i32,
    pub entries: Vec<SeekIndexEntry>,
}

impl SeekIndex {
    pub fn new(format_version: i32, chunk_size: i32, entries: Vec<SeekIndexEntry>) -> Self {
        Self {
            format_version,
            chunk_size,
            entries,
        }
    }

    /// Bytes this index occupies once serialized
    pub fn serialized_len(&self) -> usize {
        INDEX_HEADER_SIZE + self.entries.len() * INDEX_ENTRY_SIZE
    }

    /// Entry a decoder should start from to reach `sample`.
    ///
    /// Positions past the end of the map resolve to the last entry.
    pub fn entry_for_sample(&self, sample: u64) -> Option<&SeekIndexEntry> {
        if self.chunk_size <= 0 || self.entries.is_empty() {
            return None;
        }
        let slot = (sample / self.chunk_size as u64).min(self.entries.len() as u64 - 1);
        self.entries.get(slot as usize)
    }

    /// True when byte offsets never decrease along the map
    pub fn is_monotonic(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].byte_offset <= w[1].byte_offset)
    }
}

/// Serialize an index to its little-endian on-disk form
pub fn serialize_index(index: &SeekIndex) -> Vec<u8> {
    let mut out = Vec::with_capacity(index.serialized_len());
    write_i32(&mut out, index.format_version);
    write_i32(&mut out, index.chunk_size);
    write_i32(&mut out, index.entries.len() as i32);
    for entry in &index.entries {
        write_u32(&mut out, entry.byte_offset);
        write_u32(&mut out, entry.sample_offset);
    }
    out
}

/// Parse an index region. The region must be exactly
/// `12 + entry_count * 8` bytes long.
pub fn deserialize_index(region: &[u8]) -> Result<SeekIndex, FormatError> {
    if region.len() < INDEX_HEADER_SIZE {
        return Err(FormatError::MalformedIndex(format!(
            "index region is {} bytes, header alone needs {}",
            region.len(),
            INDEX_HEADER_SIZE
        )));
    }

    let mut cursor = Cursor::new(region);
    let format_version = read_i32(&mut cursor)?;
    let chunk_size = read_i32(&mut cursor)?;
    let entry_count = read_i32(&mut cursor)?;

    if chunk_size <= 0 {
        return Err(FormatError::MalformedIndex(format!(
            "chunk size {} is not positive",
            chunk_size
        )));
    }
    if entry_count < 0 {
        return Err(FormatError::MalformedIndex(format!(
            "negative entry count {}",
            entry_count
        )));
    }

    let expected = INDEX_HEADER_SIZE as u64 + entry_count as u64 * INDEX_ENTRY_SIZE as u64;
    if expected != region.len() as u64 {
        return Err(FormatError::MalformedIndex(format!(
            "{} entries need {} bytes, index region has {}",
            entry_count,
            expected,
            region.len()
        )));
    }

    let mut entries = Vec::with_capacity(entry_count as usize);
    for _ in 0..entry_count {
        let byte_offset = read_u32(&mut cursor)?;
        let sample_offset = read_u32(&mut cursor)?;
        entries.push(SeekIndexEntry::new(byte_offset, sample_offset));
    }

    Ok(SeekIndex::new(format_version, chunk_size, entries))
}
