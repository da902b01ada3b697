//! Payload cipher resolution and transform
//!
//! Encrypted containers protect the payload region with AES-256 in counter
//! mode. The version tag in the header selects key material and the place
//! in the header/index region the IV is read from (see [`table`]).
//!
//! The transform is an XOR with a keystream, so the same call encrypts and
//! decrypts. It mutates the caller's buffer in place.

pub mod table;

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use tracing::{debug, info};

pub use table::{
    CIPHER_TABLE, CipherVersionSpec, KeyDerivation, KeyMaterial, KeySelector, cipher_spec,
};

use crate::UNENCRYPTED_VERSION;
use crate::container::{Container, ContainerHeader};
use crate::error::{CryptoError, FormatError};

/// AES-256 key
pub type Key = [u8; 32];

/// Cipher block and counter size
pub const BLOCK_SIZE: usize = 16;

/// Full 128-bit big-endian counter, wrapping at 2^128
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Resolved key and initial counter block for one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CipherParams {
    pub key: Key,
    pub counter: [u8; BLOCK_SIZE],
    /// Key slot picked by the selector, for slot-based generations
    pub slot: Option<usize>,
}

/// Derive key and IV for `version` from the container's header/index bytes.
///
/// Returns `Ok(None)` for the canonical unencrypted version.
pub fn resolve(
    version: i32,
    header_region: &[u8],
    red_variant: bool,
) -> Result<Option<CipherParams>, CryptoError> {
    if version == UNENCRYPTED_VERSION {
        return Ok(None);
    }
    let spec = cipher_spec(version).ok_or(CryptoError::UnknownVersion(version))?;

    let iv = header_region
        .get(spec.iv_offset..spec.iv_offset + spec.iv_len)
        .ok_or(CryptoError::IvOutOfRange {
            offset: spec.iv_offset,
            len: spec.iv_len,
            limit: header_region.len(),
        })?;
    let mut counter = [0u8; BLOCK_SIZE];
    counter[..iv.len()].copy_from_slice(iv);

    let slot = match spec.selector {
        KeySelector::None => None,
        KeySelector::ByteAtOffsetModulo { offset, modulus } => {
            let byte = header_region
                .get(offset)
                .ok_or(CryptoError::IvOutOfRange {
                    offset,
                    len: 1,
                    limit: header_region.len(),
                })?;
            Some((byte % modulus) as usize)
        }
    };

    let base = match spec.keys {
        KeyMaterial::Single(key) => key,
        KeyMaterial::Paired(pair) if red_variant => &pair.red,
        KeyMaterial::Paired(pair) => &pair.plain,
        KeyMaterial::Slots(slots) => &slots[slot.unwrap_or(0) % slots.len()],
    };

    let key = match spec.derivation {
        KeyDerivation::Identity => *base,
        KeyDerivation::XorWithMasher => xor_masher(base),
    };

    debug!(
        version = spec.name,
        red_variant,
        slot = ?slot,
        "Resolved payload cipher"
    );

    Ok(Some(CipherParams { key, counter, slot }))
}

fn xor_masher(base: &Key) -> Key {
    let mut key = *base;
    for (k, m) in key.iter_mut().zip(table::MASHER.iter()) {
        *k ^= m;
    }
    key
}

/// XOR `data` with the AES-CTR keystream starting at `counter`.
///
/// Block `n` of the keystream is `AES(key, counter + n)`; a trailing partial
/// block uses only as many keystream bytes as remain.
pub fn apply_keystream(key: &Key, counter: &[u8; BLOCK_SIZE], data: &mut [u8]) {
    let mut cipher = Aes256Ctr::new(key.into(), counter.into());
    cipher.apply_keystream(data);
}

/// Encrypt or decrypt the payload of `container` inside `data`.
///
/// `data` must be the complete container stream `container` was parsed
/// from. Only `data[audio_offset..]` is modified. Unencrypted containers
/// are left untouched.
pub fn transform(
    container: &Container,
    data: &mut [u8],
    red_variant: bool,
) -> Result<(), CryptoError> {
    if data.len() as u64 != container.total_len {
        return Err(CryptoError::BufferMismatch {
            expected: container.total_len,
            actual: data.len() as u64,
        });
    }

    let (header_region, payload) = data.split_at_mut(container.payload_offset() as usize);
    let Some(params) = resolve(container.version, header_region, red_variant)? else {
        return Ok(());
    };

    apply_keystream(&params.key, &params.counter, payload);
    info!(
        version = container.version,
        bytes = payload.len(),
        "Transformed container payload"
    );
    Ok(())
}

/// Rewrite the version tag of a container held in `data`
pub fn retag(data: &mut [u8], version: i32) -> Result<(), FormatError> {
    let mut header = ContainerHeader::from_bytes(data).ok_or(FormatError::Truncated {
        needed: ContainerHeader::SIZE as u64,
        available: data.len() as u64,
    })?;
    header.version = version;
    data[..ContainerHeader::SIZE].copy_from_slice(&header.to_bytes());
    Ok(())
}
