//! # CRC-32
//! Table driven CRC-32 (IEEE 802.3, reflected polynomial 0xEDB88320) with the two legacy
//! entry points used when building sign requests.
//!
//! [`calc`] renders its result in hex *without* zero padding, [`calc_hex`] pads to eight
//! digits. Both run the same accumulation; the differing widths are what existing consumers
//! expect and must stay as they are.
use crate::encoding::decode_hex;
use crate::error::Result;

const CRC32_POLY: u32 = 0xEDB8_8320;

/// Pre-computed CRC32 lookup table (256 entries).
pub const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
}

pub static TABLE: [u32; 256] = make_table();

/// Incremental CRC32 state.
#[derive(Clone, Debug)]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self { state: 0xFFFF_FFFF }
    }
}

impl Crc32 {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push(&mut self, b: u8) {
        let idx = ((self.state ^ b as u32) & 0xFF) as usize;
        self.state = (self.state >> 8) ^ TABLE[idx];
    }

    pub fn update(&mut self, data: &[u8]) {
        for &b in data {
            self.push(b);
        }
    }

    pub fn update_iter(&mut self, data: impl IntoIterator<Item = u8>) {
        for b in data {
            self.push(b);
        }
    }

    pub fn finalize(&self) -> u32 {
        self.state ^ 0xFFFF_FFFF
    }
}

/// Compute CRC32 of a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = Crc32::new();
    c.update(data);
    c.finalize()
}

/// Checksum of text, one byte per character, as lowercase hex with no leading zeros.
///
/// Each UTF-16 code unit contributes its low byte only, as in legacy clients; for the ASCII
/// identifiers this is called with, that is the text itself.
pub fn calc(text: &str) -> String {
    let mut c = Crc32::new();
    c.update_iter(text.encode_utf16().map(|unit| unit as u8));
    format!("{:x}", c.finalize())
}

/// Like [`calc`], over raw bytes.
pub fn calc_bytes(data: &[u8]) -> String {
    format!("{:x}", crc32(data))
}

/// Checksum of the bytes a hex string encodes, as eight lowercase hex digits.
///
/// Fails with [`crate::Error::InvalidHexInput`] on odd length or non-hex characters.
pub fn calc_hex(hex: &str) -> Result<String> {
    let bytes = decode_hex(hex)?;
    Ok(format!("{:08x}", crc32(&bytes)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    #[test]
    fn table_matches_published_entries() {
        assert_eq!(TABLE[0], 0x0000_0000);
        assert_eq!(TABLE[1], 0x7707_3096);
        assert_eq!(TABLE[2], 0xEE0E_612C);
        assert_eq!(TABLE[3], 0x9909_51BA);
        assert_eq!(TABLE[128], 0xEDB8_8320);
        assert_eq!(TABLE[255], 0x2D02_EF8D);
        assert_eq!(make_table(), TABLE);
    }

    #[test]
    fn test_crc32_known_vectors() {
        assert_eq!(crc32(b""), 0x0000_0000);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b"hello"), 0x3610_A686);
        assert_eq!(
            crc32(b"The quick brown fox jumps over the lazy dog"),
            0x414F_A339
        );
    }

    #[test]
    fn test_crc32_incremental() {
        let data = b"123456789";
        let mut c = Crc32::new();
        c.update(&data[..4]);
        c.update(&data[4..]);
        assert_eq!(c.finalize(), 0xCBF4_3926);
    }

    #[test]
    fn calc_is_unpadded() {
        assert_eq!(calc("123456789"), "cbf43926");
        assert_eq!(calc(""), "0");
    }

    #[test]
    fn calc_hex_is_padded() {
        assert_eq!(calc_hex("313233343536373839").unwrap(), "cbf43926");
        assert_eq!(calc_hex("").unwrap(), "00000000");
        assert_eq!(calc_hex("68656C6C6F").unwrap(), "3610a686");
    }

    #[test]
    fn calc_takes_low_byte_of_each_character() {
        // U+0131 has low byte 0x31, the digit '1'.
        assert_eq!(calc("\u{131}23456789"), calc("123456789"));
    }

    #[test]
    fn calc_hex_rejects_malformed_input() {
        assert!(matches!(calc_hex("123"), Err(Error::InvalidHexInput(_))));
        assert!(matches!(calc_hex("12g4"), Err(Error::InvalidHexInput(_))));
    }
}
