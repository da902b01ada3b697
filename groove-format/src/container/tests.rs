//! Tests for the container codec

use std::io::{Cursor, Read};

use super::*;
use crate::index::{SeekIndexEntry, serialize_index};

fn sample_index(entries: u32) -> SeekIndex {
    SeekIndex::new(
        1,
        4096,
        (0..entries)
            .map(|i| SeekIndexEntry::new(i * 700, i * 4096))
            .collect(),
    )
}

fn build(version: i32, index: &SeekIndex, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    write_container_with_version(version, index, &mut &payload[..], &mut out).unwrap();
    out
}

#[test]
fn test_write_then_read_roundtrip() {
    let index = sample_index(5);
    let payload: Vec<u8> = (0..3000u32).map(|i| (i * 7) as u8).collect();

    let mut bytes = Vec::new();
    let written = write_container(&index, &mut &payload[..], &mut bytes).unwrap();
    assert_eq!(written as usize, bytes.len());

    let container = Container::parse(&bytes).unwrap();
    assert_eq!(container.version, crate::UNENCRYPTED_VERSION);
    assert_eq!(container.index, index);
    assert_eq!(container.payload(&bytes).unwrap(), &payload[..]);
    assert_eq!(container.payload_len(), payload.len() as u64);
    assert!(!container.is_encrypted());
}

#[test]
fn test_header_consistency() {
    for n in [0u32, 1, 10, 257] {
        let bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(n), b"payload");
        let header = ContainerHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.audio_offset as u32, 8 + 12 + 8 * n);
        assert_eq!(&bytes[8..header.audio_offset as usize], &serialize_index(&sample_index(n))[..]);
        assert_eq!(&bytes[header.audio_offset as usize..], b"payload");
    }
}

#[test]
fn test_payload_streams_through_bounded_buffer() {
    let payload: Vec<u8> = (0..(crate::io::COPY_BUFFER_SIZE * 3 + 5))
        .map(|i| (i % 251) as u8)
        .collect();
    let bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(2), &payload);
    let container = Container::parse(&bytes).unwrap();
    assert_eq!(container.payload(&bytes).unwrap(), &payload[..]);
}

#[test]
fn test_empty_payload() {
    let bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(1), &[]);
    let container = Container::parse(&bytes).unwrap();
    assert_eq!(container.payload_len(), 0);
    assert_eq!(container.total_len, container.audio_offset as u64);
}

#[test]
fn test_read_leaves_stream_at_payload() {
    let bytes = build(0x0C, &sample_index(3), b"abc");
    let mut cursor = Cursor::new(&bytes[..]);
    let container = read_container(&mut cursor).unwrap();
    assert_eq!(cursor.position(), container.audio_offset as u64);

    let mut rest = Vec::new();
    cursor.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"abc");
}

#[test]
fn test_truncated_header() {
    let result = Container::parse(&[0x0A, 0, 0, 0]);
    assert!(matches!(
        result,
        Err(crate::FormatError::Truncated {
            needed: 8,
            available: 4
        })
    ));
    assert!(matches!(
        Container::parse(&[]),
        Err(crate::FormatError::Truncated { .. })
    ));
}

#[test]
fn test_audio_offset_beyond_stream() {
    let mut bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(4), &[]);
    bytes.truncate(30);
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::Truncated {
            needed: 52,
            available: 30
        })
    ));
}

#[test]
fn test_unsupported_version() {
    let bytes = build(0x42, &sample_index(1), b"x");
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::UnsupportedVersion(0x42))
    ));
}

#[test]
fn test_all_known_versions_read() {
    for tag in crate::known_versions() {
        let bytes = build(tag, &sample_index(2), b"xyz");
        let container = Container::parse(&bytes).unwrap();
        assert_eq!(container.version, tag);
        assert_eq!(container.is_encrypted(), tag != crate::UNENCRYPTED_VERSION);
    }
}

#[test]
fn test_entry_count_must_fill_region() {
    let mut bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(3), b"payload");
    // Claim 4 entries while the header only leaves room for 3
    bytes[16..20].copy_from_slice(&4i32.to_le_bytes());
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::MalformedIndex(_))
    ));
}

#[test]
fn test_audio_offset_inside_header() {
    let mut bytes = build(crate::UNENCRYPTED_VERSION, &sample_index(0), b"");
    bytes[4..8].copy_from_slice(&4i32.to_le_bytes());
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::MalformedIndex(_))
    ));

    bytes[4..8].copy_from_slice(&(-20i32).to_le_bytes());
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::MalformedIndex(_))
    ));
}

#[test]
fn test_index_region_shorter_than_index_header() {
    let mut bytes = ContainerHeader::new(crate::UNENCRYPTED_VERSION, 16).to_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 16]);
    assert!(matches!(
        Container::parse(&bytes),
        Err(crate::FormatError::MalformedIndex(_))
    ));
}

#[test]
fn test_header_bytes() {
    let header = ContainerHeader::new(0x0A, 36);
    let bytes = header.to_bytes();
    assert_eq!(bytes, [0x0A, 0, 0, 0, 36, 0, 0, 0]);
    assert_eq!(ContainerHeader::from_bytes(&bytes), Some(header));
    assert_eq!(ContainerHeader::from_bytes(&bytes[..7]), None);
}
