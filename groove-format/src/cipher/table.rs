//! Frozen per-version cipher configuration
//!
//! One [`CipherVersionSpec`] per encrypted container version. Key bytes,
//! IV locations and the masher constant must match what the game engine
//! expects byte for byte; they are fixtures, not derivable values.
//!
//! | tag  | generation | keys             | IV          | working key        |
//! |------|------------|------------------|-------------|--------------------|
//! | 0x0B | legacy     | single           | 8 @ 0x08    | as stored          |
//! | 0x0C | gen1       | plain/red pair   | 8 @ 0x08    | as stored          |
//! | 0x0D | gen2       | plain/red pair   | 8 @ 0x0C    | as stored          |
//! | 0x0E | gen3       | plain/red pair   | 8 @ 0x08    | as stored          |
//! | 0x0F | gen4       | plain/red pair   | 8 @ 0x0C    | as stored          |
//! | 0x10 | derived    | 4 slots          | 4 @ 0x10    | slot ^ masher      |

use super::Key;

/// How the stored key bytes become the working key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDerivation {
    Identity,
    XorWithMasher,
}

/// Where the key slot index comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySelector {
    None,
    /// `container[offset] % modulus`
    ByteAtOffsetModulo { offset: usize, modulus: u8 },
}

/// Plain and red-variant keys of one hardware generation
#[derive(Debug)]
pub struct KeyPair {
    pub plain: Key,
    pub red: Key,
}

#[derive(Debug, Clone, Copy)]
pub enum KeyMaterial {
    /// One key regardless of variant
    Single(&'static Key),
    /// Chosen by the red-variant flag
    Paired(&'static KeyPair),
    /// Chosen by the key selector
    Slots(&'static [Key]),
}

#[derive(Debug, Clone, Copy)]
pub struct CipherVersionSpec {
    pub tag: i32,
    pub name: &'static str,
    pub keys: KeyMaterial,
    /// Absolute container offset of the IV bytes
    pub iv_offset: usize,
    /// 4 or 8
    pub iv_len: usize,
    pub derivation: KeyDerivation,
    pub selector: KeySelector,
}

/// Every encrypted container version, keyed by tag
pub static CIPHER_TABLE: [CipherVersionSpec; 6] = [
    CipherVersionSpec {
        tag: 0x0B,
        name: "legacy",
        keys: KeyMaterial::Single(&LEGACY_KEY),
        iv_offset: 0x08,
        iv_len: 8,
        derivation: KeyDerivation::Identity,
        selector: KeySelector::None,
    },
    CipherVersionSpec {
        tag: 0x0C,
        name: "gen1",
        keys: KeyMaterial::Paired(&GEN1_KEYS),
        iv_offset: 0x08,
        iv_len: 8,
        derivation: KeyDerivation::Identity,
        selector: KeySelector::None,
    },
    CipherVersionSpec {
        tag: 0x0D,
        name: "gen2",
        keys: KeyMaterial::Paired(&GEN2_KEYS),
        iv_offset: 0x0C,
        iv_len: 8,
        derivation: KeyDerivation::Identity,
        selector: KeySelector::None,
    },
    CipherVersionSpec {
        tag: 0x0E,
        name: "gen3",
        keys: KeyMaterial::Paired(&GEN3_KEYS),
        iv_offset: 0x08,
        iv_len: 8,
        derivation: KeyDerivation::Identity,
        selector: KeySelector::None,
    },
    CipherVersionSpec {
        tag: 0x0F,
        name: "gen4",
        keys: KeyMaterial::Paired(&GEN4_KEYS),
        iv_offset: 0x0C,
        iv_len: 8,
        derivation: KeyDerivation::Identity,
        selector: KeySelector::None,
    },
    CipherVersionSpec {
        tag: 0x10,
        name: "derived",
        keys: KeyMaterial::Slots(&DERIVED_SLOTS),
        iv_offset: 0x10,
        iv_len: 4,
        derivation: KeyDerivation::XorWithMasher,
        selector: KeySelector::ByteAtOffsetModulo {
            offset: 0x10,
            modulus: 4,
        },
    },
];

/// Look up the cipher configuration for a version tag
pub fn cipher_spec(tag: i32) -> Option<&'static CipherVersionSpec> {
    CIPHER_TABLE.iter().find(|spec| spec.tag == tag)
}

// =============================================================================
// Key material
// =============================================================================

/// Legacy generation key (shared by both variants)
static LEGACY_KEY: Key = [
    0xF6, 0xD3, 0xBF, 0xD8, 0xBE, 0x35, 0xEF, 0xF1,
    0xB5, 0x12, 0xC2, 0x79, 0xCD, 0x27, 0xAF, 0xCA,
    0xC5, 0x02, 0xF1, 0x56, 0x5F, 0x0F, 0x85, 0x9A,
    0xC9, 0xEE, 0x2C, 0xB6, 0x27, 0x9E, 0x1C, 0x82,
];

static GEN1_KEYS: KeyPair = KeyPair {
    plain: [
        0xC5, 0x4A, 0x67, 0x2F, 0x12, 0xA3, 0x9D, 0xCF,
        0x7B, 0x70, 0x87, 0x69, 0x4C, 0x0D, 0xBC, 0x66,
        0x26, 0xF0, 0x70, 0x2F, 0x55, 0x67, 0x7A, 0x33,
        0x03, 0xC3, 0x6F, 0xDB, 0x3E, 0xB4, 0x51, 0x08,
    ],
    red: [
        0xC8, 0x28, 0xAC, 0xCE, 0xBD, 0xEE, 0x02, 0xDA,
        0x16, 0x3D, 0x9D, 0x22, 0x70, 0xCB, 0x58, 0x26,
        0xF9, 0x19, 0x48, 0x70, 0xF0, 0x6A, 0x2D, 0xAC,
        0x38, 0xB7, 0x15, 0x64, 0x3B, 0xCA, 0xDB, 0x66,
    ],
};

static GEN2_KEYS: KeyPair = KeyPair {
    plain: [
        0xAF, 0x58, 0xE9, 0xDA, 0xD9, 0xB6, 0x06, 0x99,
        0xAB, 0x38, 0x67, 0xB6, 0x97, 0x1E, 0x94, 0x99,
        0x1C, 0xE7, 0x31, 0xCF, 0x81, 0x26, 0x03, 0x6F,
        0x0D, 0x12, 0x12, 0xED, 0xF7, 0x83, 0xA4, 0x2A,
    ],
    red: [
        0xEA, 0xF5, 0x40, 0xC6, 0x07, 0xC8, 0x74, 0x20,
        0x61, 0x2D, 0xB6, 0x64, 0x75, 0x70, 0x1C, 0x72,
        0x9E, 0x62, 0xC2, 0xCA, 0xED, 0x68, 0x38, 0xD7,
        0x06, 0x7F, 0x1D, 0xED, 0xD5, 0xFF, 0x56, 0xB0,
    ],
};

static GEN3_KEYS: KeyPair = KeyPair {
    plain: [
        0x9A, 0x90, 0x73, 0x7C, 0x95, 0x2B, 0x01, 0xF0,
        0x17, 0x06, 0x31, 0x7F, 0x52, 0xF4, 0x77, 0x24,
        0x3F, 0xC7, 0x94, 0x7C, 0xBF, 0xB1, 0x1C, 0xEF,
        0xB1, 0x17, 0x61, 0x76, 0x19, 0xD8, 0x13, 0xC9,
    ],
    red: [
        0x39, 0xF2, 0xDA, 0xFA, 0xC1, 0x54, 0x0D, 0xF3,
        0xB0, 0x1E, 0xBA, 0xB6, 0xBE, 0xEF, 0x9B, 0xAB,
        0xFA, 0x6E, 0x0E, 0xB7, 0x43, 0x8E, 0xA9, 0x91,
        0x41, 0x9C, 0x90, 0x84, 0xAA, 0xC5, 0xFD, 0x86,
    ],
};

static GEN4_KEYS: KeyPair = KeyPair {
    plain: [
        0xC3, 0xBB, 0xC1, 0x48, 0x2A, 0x23, 0x2A, 0xD8,
        0xE4, 0xDD, 0x3F, 0x38, 0x7C, 0x73, 0xDA, 0x77,
        0x92, 0xDF, 0x91, 0xA2, 0xA6, 0x96, 0x0C, 0x79,
        0x2C, 0xB5, 0x74, 0x42, 0xD0, 0x9D, 0xA3, 0x70,
    ],
    red: [
        0x7A, 0xB0, 0x43, 0x13, 0x19, 0xF3, 0x50, 0x22,
        0x30, 0x0D, 0x66, 0x06, 0xDE, 0xAB, 0xB8, 0x02,
        0xD6, 0x2E, 0x06, 0xAD, 0x15, 0x93, 0xDB, 0x5A,
        0x3F, 0xEB, 0x6A, 0x72, 0x8C, 0x6B, 0x03, 0x32,
    ],
};

/// Base key slots of the derived generation
static DERIVED_SLOTS: [Key; 4] = [
    [
        0x07, 0x73, 0x39, 0x10, 0xEB, 0xF9, 0x8D, 0x84,
        0xB8, 0xA5, 0x21, 0x6B, 0x7C, 0x91, 0x68, 0x1F,
        0xF5, 0x28, 0xA2, 0xBB, 0xD9, 0x47, 0x1A, 0x6B,
        0xD3, 0x6E, 0xC0, 0xF7, 0x34, 0xB2, 0xEF, 0xFD,
    ],
    [
        0xA1, 0xDE, 0xC3, 0x18, 0xD8, 0x81, 0x61, 0x97,
        0xF8, 0x22, 0xE5, 0xD5, 0x76, 0xF0, 0x08, 0xE9,
        0x8E, 0x1E, 0x5A, 0x4E, 0xEE, 0x04, 0x65, 0x16,
        0xD9, 0x9A, 0x4E, 0x08, 0xFD, 0x5F, 0x04, 0x12,
    ],
    [
        0x42, 0xDA, 0x1E, 0x40, 0x05, 0xAB, 0x3D, 0xB5,
        0xD7, 0xA1, 0xBA, 0x18, 0xAF, 0x15, 0xE2, 0x16,
        0x12, 0xE6, 0x77, 0x0D, 0x15, 0x12, 0x03, 0xCD,
        0xB1, 0xDD, 0xEB, 0x2D, 0x0D, 0x32, 0x66, 0x9A,
    ],
    [
        0xF7, 0x75, 0x7D, 0x62, 0x98, 0x12, 0xDF, 0x48,
        0x77, 0x12, 0xAC, 0x98, 0x91, 0xCF, 0x1F, 0x9A,
        0xA0, 0x34, 0xB6, 0x50, 0x37, 0x4C, 0x12, 0x81,
        0x4A, 0x31, 0xB1, 0x08, 0xFB, 0x32, 0x19, 0x83,
    ],
];

/// XORed over the selected slot to form the derived working key
pub(crate) static MASHER: Key = [
    0xB3, 0x9E, 0x62, 0xD2, 0x96, 0x4E, 0x28, 0x18,
    0x61, 0xCD, 0x78, 0x25, 0x31, 0x57, 0x3C, 0x7E,
    0x8A, 0xA7, 0x43, 0x2E, 0xF1, 0xCD, 0xDF, 0xA6,
    0xE5, 0x64, 0x21, 0xA7, 0x66, 0x4E, 0xE6, 0xE7,
];
