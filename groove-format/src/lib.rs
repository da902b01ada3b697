//! Groove-Format: seekable, optionally encrypted audio container
//!
//! A `.gsnd` container wraps an opaque compressed audio bitstream with a
//! fixed-stride seek index and, for platform targets that require it, an
//! AES-256 counter-mode layer over the payload.
//!
//! # Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! 0x00  i32  version tag        (0x0A = unencrypted)
//! 0x04  i32  audio offset       (= 8 + 12 + 8 * entry count)
//! 0x08  i32  index format version
//! 0x0C  i32  chunk size         (samples between entries)
//! 0x10  i32  entry count
//! 0x14  [u32 byte offset, u32 sample offset] * entry count
//! ....  payload, to end of stream
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use groove_format::{SeekIndexBuilder, probe::SymphoniaProbe, write_container};
//!
//! let mut probe = SymphoniaProbe::open(Path::new("song.ogg"))?;
//! let index = SeekIndexBuilder::default().build(&mut probe)?;
//! write_container(&index, &mut File::open("song.ogg")?, &mut File::create("song.gsnd")?)?;
//! ```

mod builder;
pub mod cipher;
pub mod container;
mod error;
pub mod index;
mod io;
pub mod probe;
mod validate;

pub use builder::{Observation, PROBE_STRIDE, SeekIndexBuilder, estimate_byte_offset};
pub use container::{
    Container, ContainerHeader, read_container, write_container, write_container_with_version,
};
pub use error::{BuildError, CryptoError, DecodeProbeError, FormatError};
pub use index::{SeekIndex, SeekIndexEntry, deserialize_index, serialize_index};
pub use probe::AudioDecodeProbe;
pub use validate::{ValidationReport, extract, validate};

/// Fixed header: version tag + audio offset
pub const CONTAINER_HEADER_SIZE: usize = 8;

/// Version tag of a container whose payload is stored in the clear
pub const UNENCRYPTED_VERSION: i32 = 0x0A;

/// Seek index layout version written by [`SeekIndexBuilder`]
pub const SEEK_INDEX_VERSION: i32 = 1;

/// Default samples per seek index entry
pub const DEFAULT_CHUNK_SIZE: u32 = 4096;

/// File extension for containers
pub const CONTAINER_EXT: &str = "gsnd";

/// Whether `tag` is a version this crate can read
pub fn is_known_version(tag: i32) -> bool {
    tag == UNENCRYPTED_VERSION || cipher::cipher_spec(tag).is_some()
}

/// Every readable version tag, unencrypted first
pub fn known_versions() -> impl Iterator<Item = i32> {
    std::iter::once(UNENCRYPTED_VERSION).chain(cipher::CIPHER_TABLE.iter().map(|s| s.tag))
}

/// Human-readable name for a version tag
pub fn version_name(tag: i32) -> Option<&'static str> {
    if tag == UNENCRYPTED_VERSION {
        return Some("unencrypted");
    }
    cipher::cipher_spec(tag).map(|s| s.name)
}

/// Parse a version tag given as a name (`gen2`), hex (`0x0D`) or decimal (`13`)
pub fn parse_version(s: &str) -> Option<i32> {
    let s = s.trim();
    let tag = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16).ok()
    } else if let Ok(n) = s.parse::<i32>() {
        Some(n)
    } else {
        known_versions().find(|&t| version_name(t).is_some_and(|n| n.eq_ignore_ascii_case(s)))
    }?;
    is_known_version(tag).then_some(tag)
}
