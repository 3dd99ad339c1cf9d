//! # Input encodings
//! Turns caller strings into the byte sequences that get digested. Text goes through the
//! legacy expansion of 16-bit code units into one to three bytes; hex goes through a strict
//! decoder.
use crate::error::{Error, Result};
use tracing::debug;

/// Expand one code unit the legacy way. Surrogates are not paired up: each half is emitted
/// as its own three byte sequence.
fn expand_code_unit(unit: u16, out: &mut Vec<u8>) {
    match unit {
        0x0000..=0x007f => out.push(unit as u8),
        0x0080..=0x07ff => {
            out.push(0xc0 | (unit >> 6) as u8);
            out.push(0x80 | (unit & 0x3f) as u8);
        }
        _ => {
            out.push(0xe0 | (unit >> 12) as u8);
            out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
            out.push(0x80 | (unit & 0x3f) as u8);
        }
    }
}

/// Expand a sequence of UTF-16 code units exactly as legacy clients do, lone and paired
/// surrogates included.
pub fn expand_code_units<I>(units: I) -> Vec<u8>
where
    I: IntoIterator<Item = u16>,
{
    let units = units.into_iter();
    let mut out = Vec::with_capacity(units.size_hint().0);

    for unit in units {
        expand_code_unit(unit, &mut out);
    }

    out
}

/// Expand text made of basic multilingual plane characters.
///
/// For such text the result coincides with UTF-8. Characters above U+FFFF are rejected with
/// [`Error::UnsupportedCodepoint`]: the legacy expansion would encode their surrogate halves
/// separately, which no UTF-8 consumer reads back as the same character. Use
/// [`expand_code_units`] when the legacy bytes are really wanted.
pub fn expand_text(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());

    for (offset, ch) in text.char_indices() {
        let unit = u16::try_from(u32::from(ch))
            .map_err(|_| Error::UnsupportedCodepoint { ch, offset })?;
        expand_code_unit(unit, &mut out);
    }

    Ok(out)
}

/// Decode a hex string two characters per byte. Both letter cases are accepted.
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    hex::decode(input).map_err(|err| {
        debug!(%err, len = input.len(), "rejecting hex input");
        Error::InvalidHexInput(err)
    })
}
