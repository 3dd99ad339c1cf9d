//! # imzo_hash
//! Checksum and hash primitives behind E-IMZO sign requests: the GOST R 34.11-94 hash
//! (CryptoPro parameters) and the table driven CRC-32, each over text or hex input.
//!
//! ```
//! assert_eq!(
//!     imzo_hash::hash("abc").unwrap(),
//!     "b285056dbf18d7392d7677369524dd14747459ed8143997e163b2986f92fd42c"
//! );
//! assert_eq!(imzo_hash::crc32_calc("123456789"), "cbf43926");
//! ```
pub mod crc32;
pub mod encoding;
pub mod error;
pub mod gost_hash;
pub mod magma;

pub use error::{Error, Result};
pub use gost_hash::{Digest, GostHash};

/// GOST R 34.11-94 digest of text, as 64 lowercase hex characters.
///
/// Text outside the basic multilingual plane is rejected with
/// [`Error::UnsupportedCodepoint`]; see [`hash_utf16`] for the legacy byte-exact path.
pub fn hash(text: &str) -> Result<String> {
    let bytes = encoding::expand_text(text)?;
    Ok(gost_hash::digest(bytes).to_hex())
}

/// GOST R 34.11-94 digest of raw UTF-16 code units, expanded the way legacy clients do.
pub fn hash_utf16(units: &[u16]) -> String {
    let bytes = encoding::expand_code_units(units.iter().copied());
    gost_hash::digest(bytes).to_hex()
}

/// GOST R 34.11-94 digest of the bytes a hex string encodes.
///
/// Malformed hex fails with [`Error::InvalidHexInput`] instead of being digested.
pub fn hash_hex(hex: &str) -> Result<String> {
    let bytes = encoding::decode_hex(hex)?;
    Ok(gost_hash::digest(bytes).to_hex())
}

/// CRC-32 of text as lowercase hex, 1 to 8 digits with no zero padding.
pub fn crc32_calc(text: &str) -> String {
    crc32::calc(text)
}

/// CRC-32 of the bytes a hex string encodes, always 8 lowercase hex digits.
pub fn crc32_calc_hex(hex: &str) -> Result<String> {
    crc32::calc_hex(hex)
}
