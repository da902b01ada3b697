//! Container validation and payload extraction

use std::io::{self, Read, Seek, SeekFrom, Write};

use serde::Serialize;
use tracing::warn;

use crate::container::Container;
use crate::error::FormatError;
use crate::index::{INDEX_ENTRY_SIZE, INDEX_HEADER_SIZE};
use crate::io::copy_bounded;
use crate::{CONTAINER_HEADER_SIZE, is_known_version, version_name};

/// Summary of a structurally valid container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub version: i32,
    pub version_name: &'static str,
    pub encrypted: bool,
    pub audio_offset: u64,
    pub index_version: i32,
    pub chunk_size: i32,
    pub entry_count: usize,
    pub payload_len: u64,
    pub total_len: u64,
    /// Byte offsets never decrease along the map
    pub monotonic: bool,
    pub max_sample_offset: u32,
}

/// Re-check the header against the parsed map.
///
/// The audio offset is recomputed from the index length and must equal the
/// stored one. Problems a player can survive (a non-monotonic map, entries
/// pointing past the payload) are logged and reported, not rejected.
pub fn validate(container: &Container) -> Result<ValidationReport, FormatError> {
    if !is_known_version(container.version) {
        return Err(FormatError::UnsupportedVersion(container.version));
    }

    if container.audio_offset < CONTAINER_HEADER_SIZE as i32 {
        return Err(FormatError::MalformedIndex(format!(
            "audio offset {} precedes end of header",
            container.audio_offset
        )));
    }
    let audio_offset = container.audio_offset as u64;
    if audio_offset > container.total_len {
        return Err(FormatError::Truncated {
            needed: audio_offset,
            available: container.total_len,
        });
    }

    let index = &container.index;
    if index.chunk_size <= 0 {
        return Err(FormatError::MalformedIndex(format!(
            "chunk size {} is not positive",
            index.chunk_size
        )));
    }

    let derived = (CONTAINER_HEADER_SIZE + INDEX_HEADER_SIZE) as u64
        + index.entries.len() as u64 * INDEX_ENTRY_SIZE as u64;
    if derived != audio_offset {
        return Err(FormatError::MalformedIndex(format!(
            "{} entries imply audio offset {}, header says {}",
            index.entries.len(),
            derived,
            audio_offset
        )));
    }

    let payload_len = container.payload_len();
    let monotonic = index.is_monotonic();
    if !monotonic {
        warn!("Seek index byte offsets are not monotonic");
    }
    if let Some(entry) = index
        .entries
        .iter()
        .find(|e| e.byte_offset as u64 > payload_len)
    {
        warn!(
            byte_offset = entry.byte_offset,
            payload_len, "Seek index entry points past the payload"
        );
    }

    Ok(ValidationReport {
        version: container.version,
        version_name: version_name(container.version).unwrap_or("unknown"),
        encrypted: container.is_encrypted(),
        audio_offset,
        index_version: index.format_version,
        chunk_size: index.chunk_size,
        entry_count: index.entries.len(),
        payload_len,
        total_len: container.total_len,
        monotonic,
        max_sample_offset: index
            .entries
            .iter()
            .map(|e| e.sample_offset)
            .max()
            .unwrap_or(0),
    })
}

/// Copy the payload region verbatim to `out`.
///
/// Encrypted payloads stay encrypted; decryption is a separate
/// [`crate::cipher::transform`] step. Returns the number of bytes copied.
pub fn extract<R: Read + Seek, W: Write>(
    container: &Container,
    reader: &mut R,
    out: &mut W,
) -> io::Result<u64> {
    reader.seek(SeekFrom::Start(container.payload_offset()))?;
    let copied = copy_bounded(reader, out, Some(container.payload_len()))?;
    out.flush()?;
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::container::write_container_with_version;
    use crate::index::{SeekIndex, SeekIndexEntry};

    fn build(version: i32, entries: u32, payload: &[u8]) -> Vec<u8> {
        let index = SeekIndex::new(
            1,
            1024,
            (0..entries)
                .map(|i| SeekIndexEntry::new(i * 10, i * 1024))
                .collect(),
        );
        let mut out = Vec::new();
        write_container_with_version(version, &index, &mut &payload[..], &mut out).unwrap();
        out
    }

    #[test]
    fn test_validate_report() {
        let bytes = build(0x0D, 6, &[7u8; 100]);
        let report = validate(&Container::parse(&bytes).unwrap()).unwrap();

        assert_eq!(report.version, 0x0D);
        assert_eq!(report.version_name, "gen2");
        assert!(report.encrypted);
        assert_eq!(report.audio_offset, 8 + 12 + 6 * 8);
        assert_eq!(report.entry_count, 6);
        assert_eq!(report.chunk_size, 1024);
        assert_eq!(report.payload_len, 100);
        assert_eq!(report.total_len, bytes.len() as u64);
        assert!(report.monotonic);
        assert_eq!(report.max_sample_offset, 5 * 1024);
    }

    #[test]
    fn test_validate_unencrypted_name() {
        let bytes = build(crate::UNENCRYPTED_VERSION, 0, b"");
        let report = validate(&Container::parse(&bytes).unwrap()).unwrap();
        assert_eq!(report.version_name, "unencrypted");
        assert!(!report.encrypted);
        assert_eq!(report.audio_offset, 20);
    }

    #[test]
    fn test_validate_rejects_offset_mismatch() {
        let bytes = build(crate::UNENCRYPTED_VERSION, 3, b"abc");
        let mut container = Container::parse(&bytes).unwrap();
        container.index.entries.pop();
        assert!(matches!(
            validate(&container),
            Err(FormatError::MalformedIndex(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_offsets() {
        let bytes = build(crate::UNENCRYPTED_VERSION, 1, b"abc");
        let container = Container::parse(&bytes).unwrap();

        let mut short = container.clone();
        short.total_len = 10;
        assert!(matches!(
            validate(&short),
            Err(FormatError::Truncated { .. })
        ));

        let mut inside_header = container.clone();
        inside_header.audio_offset = 4;
        assert!(matches!(
            validate(&inside_header),
            Err(FormatError::MalformedIndex(_))
        ));

        let mut unknown = container;
        unknown.version = 0x7F;
        assert!(matches!(
            validate(&unknown),
            Err(FormatError::UnsupportedVersion(0x7F))
        ));
    }

    #[test]
    fn test_validate_reports_non_monotonic_map() {
        let bytes = build(crate::UNENCRYPTED_VERSION, 3, b"abc");
        let mut container = Container::parse(&bytes).unwrap();
        container.index.entries[2].byte_offset = 0;
        container.index.entries[1].byte_offset = 5;
        let report = validate(&container).unwrap();
        assert!(!report.monotonic);
    }

    #[test]
    fn test_extract_copies_payload_verbatim() {
        let payload: Vec<u8> = (0..5000u32).map(|i| (i % 256) as u8).collect();
        let bytes = build(0x0B, 4, &payload);
        let container = Container::parse(&bytes).unwrap();

        let mut out = Vec::new();
        let n = extract(&container, &mut Cursor::new(&bytes), &mut out).unwrap();
        assert_eq!(n, payload.len() as u64);
        assert_eq!(out, payload);
    }

    #[test]
    fn test_extract_short_stream_fails() {
        let bytes = build(crate::UNENCRYPTED_VERSION, 1, b"abcdef");
        let container = Container::parse(&bytes).unwrap();
        let truncated = &bytes[..bytes.len() - 2];

        let mut out = Vec::new();
        let err = extract(&container, &mut Cursor::new(truncated), &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
