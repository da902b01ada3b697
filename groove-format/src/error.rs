//! Container, cipher and probe error types

use thiserror::Error;

/// Structural problems found while reading or validating a container
#[derive(Debug, Error)]
pub enum FormatError {
    /// Header carries a version tag this crate does not know
    #[error("unsupported container version: 0x{0:02X}")]
    UnsupportedVersion(i32),

    /// Stream ends before the header or the declared audio offset
    #[error("truncated container: need {needed} bytes, only {available} available")]
    Truncated { needed: u64, available: u64 },

    /// Seek index region does not match its declared entry count
    #[error("malformed seek index: {0}")]
    MalformedIndex(String),

    /// Underlying read failed for a reason other than end of stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key/IV resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// No cipher table entry for this version tag
    #[error("no cipher configured for container version 0x{0:02X}")]
    UnknownVersion(i32),

    /// IV or key selector bytes would come from outside the header/index region
    #[error("cipher parameters at offset {offset} (+{len}) exceed header region of {limit} bytes")]
    IvOutOfRange { offset: usize, len: usize, limit: usize },

    /// Buffer handed to the transform is not the container it was parsed from
    #[error("container buffer is {actual} bytes, expected {expected}")]
    BufferMismatch { expected: u64, actual: u64 },
}

/// Audio decode probe failures
#[derive(Debug, Error)]
pub enum DecodeProbeError {
    /// Decoder could not recognize or open the stream
    #[error("failed to open audio stream: {0}")]
    Open(String),

    /// Stream has no decodable audio track
    #[error("no decodable audio track")]
    NoTrack,

    /// Decoder cannot report how many samples the stream holds
    #[error("audio stream does not report a total sample count")]
    UnknownLength,

    /// A single seek attempt failed
    #[error("seek to sample {target} failed: {reason}")]
    Seek { target: u64, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seek index construction failures
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Probe(#[from] DecodeProbeError),

    /// Chunk size must be a positive number of samples that fits an i32
    #[error("invalid chunk size {0} (must be 1..=2147483647)")]
    InvalidChunkSize(u32),

    /// Entry count does not fit the i32 header field
    #[error("seek index would need {0} entries")]
    TooManyEntries(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FormatError::UnsupportedVersion(0x42).to_string(),
            "unsupported container version: 0x42"
        );
        assert_eq!(
            FormatError::Truncated {
                needed: 8,
                available: 4
            }
            .to_string(),
            "truncated container: need 8 bytes, only 4 available"
        );
        assert_eq!(
            CryptoError::UnknownVersion(0x0A).to_string(),
            "no cipher configured for container version 0x0A"
        );
        assert_eq!(
            BuildError::InvalidChunkSize(0).to_string(),
            "invalid chunk size 0 (must be 1..=2147483647)"
        );
    }

    #[test]
    fn test_probe_error_is_transparent_in_build_error() {
        let err: BuildError = DecodeProbeError::UnknownLength.into();
        assert_eq!(
            err.to_string(),
            "audio stream does not report a total sample count"
        );
    }
}
