//! # Magma
//! This module implements the GOST 28147-89 block cipher (Magma) in the form the GOST R 34.11-94
//! compression function needs: encryption only, 32 bit half blocks, and the CryptoPro S-box
//! parameter set folded into four byte-indexed lookup tables.

/// Eight 4-bit substitution tables. Row `i` substitutes the `i`-th nibble of a half block,
/// counting from the least significant one.
pub type SBoxSet = [[u8; 16]; 8];

/// Eight 32 bit round keys, derived per compression step.
pub type MagmaKey = [u32; 8];

/// CryptoPro S-box parameter set (RFC 4357).
pub const CRYPTOPRO_SBOX: SBoxSet = [
    [10, 4, 5, 6, 8, 1, 3, 7, 13, 12, 14, 0, 9, 2, 11, 15],
    [5, 15, 4, 0, 2, 13, 11, 9, 1, 7, 6, 3, 12, 14, 10, 8],
    [7, 15, 12, 14, 9, 4, 1, 0, 3, 11, 5, 2, 6, 10, 8, 13],
    [4, 10, 7, 12, 0, 15, 2, 8, 14, 1, 6, 5, 13, 11, 9, 3],
    [7, 6, 4, 11, 9, 12, 2, 10, 1, 8, 0, 14, 15, 13, 3, 5],
    [7, 6, 2, 4, 13, 9, 15, 0, 10, 1, 5, 11, 8, 14, 12, 3],
    [13, 14, 4, 1, 7, 0, 5, 10, 3, 12, 8, 15, 6, 2, 9, 11],
    [1, 3, 10, 9, 5, 11, 4, 15, 8, 6, 7, 14, 13, 0, 2, 12],
];

/// Expanded form of [`CRYPTOPRO_SBOX`], built at compile time.
pub static EXPANDED_SBOX: ExpandedSBox = expand_sbox(&CRYPTOPRO_SBOX);

/// Four tables of 256 words. Table `j` maps byte `j` of a half block straight to its
/// substituted nibble pair, already rotated left by 11 into its final position, so
/// `S(x) <<< 11` becomes four lookups and three XORs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedSBox([[u32; 256]; 4]);

impl ExpandedSBox {
    pub fn tables(&self) -> &[[u32; 256]; 4] {
        &self.0
    }

    /// The Magma round function `f(x) = S(x) <<< 11`.
    #[inline(always)]
    pub fn substitute(&self, x: u32) -> u32 {
        self.0[0][(x & 0xff) as usize]
            ^ self.0[1][((x >> 8) & 0xff) as usize]
            ^ self.0[2][((x >> 16) & 0xff) as usize]
            ^ self.0[3][(x >> 24) as usize]
    }
}

/// Fold an S-box set into byte-indexed lookup tables.
///
/// Byte `j` of the input covers nibbles `2j` (low) and `2j + 1` (high). Each table entry
/// holds both substituted nibbles shifted to where `<<< 11` puts them; nibble 5 lands on
/// bit 31 and wraps, hence the rotation for table 2.
pub const fn expand_sbox(sbox: &SBoxSet) -> ExpandedSBox {
    let mut tables = [[0u32; 256]; 4];
    let mut hi = 0;

    while hi < 16 {
        let ax = (sbox[1][hi] as u32) << 15;
        let bx = (sbox[3][hi] as u32) << 23;
        let cx = (sbox[5][hi] as u32).rotate_left(31);
        let dx = (sbox[7][hi] as u32) << 7;

        let mut lo = 0;
        while lo < 16 {
            let i = (hi << 4) | lo;
            tables[0][i] = ax | ((sbox[0][lo] as u32) << 11);
            tables[1][i] = bx | ((sbox[2][lo] as u32) << 19);
            tables[2][i] = cx | ((sbox[4][lo] as u32) << 27);
            tables[3][i] = dx | ((sbox[6][lo] as u32) << 3);
            lo += 1;
        }
        hi += 1;
    }

    ExpandedSBox(tables)
}

/// Yields the 32 round keys of an encryption in order: `k0..k7` three times, then `k7..k0`.
pub struct KeySchedule<'a> {
    key: &'a MagmaKey,
    round_num: usize,
}

impl<'a> KeySchedule<'a> {
    pub fn new(key: &'a MagmaKey) -> KeySchedule<'a> {
        KeySchedule { key, round_num: 0 }
    }
}

impl<'a> Iterator for KeySchedule<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = match self.round_num {
            0..=23 => self.round_num & 0b111,
            24..=31 => 7 - (self.round_num & 0b111),
            _ => return None,
        };
        self.round_num += 1;

        Some(self.key[idx])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = 32usize.saturating_sub(self.round_num);
        (left, Some(left))
    }
}

impl<'a> ExactSizeIterator for KeySchedule<'a> {}

/// A GOST block cipher keyed with eight round keys. Works on 64 bit blocks given as two
/// little-endian words `[n1, n2]`.
pub struct Magma<'s> {
    key: MagmaKey,
    sbox: &'s ExpandedSBox,
}

impl Magma<'static> {
    /// Returns a cipher using the CryptoPro parameter set.
    pub fn new(key: MagmaKey) -> Magma<'static> {
        Magma::with_sbox(key, &EXPANDED_SBOX)
    }
}

impl<'s> Magma<'s> {
    pub fn with_sbox(key: MagmaKey, sbox: &'s ExpandedSBox) -> Magma<'s> {
        Magma { key, sbox }
    }

    pub fn key_schedule(&self) -> KeySchedule<'_> {
        KeySchedule::new(&self.key)
    }

    /// Encrypt a single block.
    ///
    /// Rounds alternate which half they update instead of physically swapping the halves, so
    /// after 32 rounds `n2` holds the first output word and `n1` the second.
    pub fn encrypt_block(&self, block: [u32; 2]) -> [u32; 2] {
        let [mut n1, mut n2] = block;

        for (round, round_key) in self.key_schedule().enumerate() {
            if round & 1 == 0 {
                n2 ^= self.sbox.substitute(round_key.wrapping_add(n1));
            } else {
                n1 ^= self.sbox.substitute(round_key.wrapping_add(n2));
            }
        }

        [n2, n1]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // Nibble by nibble substitution followed by the rotation, without any tables.
    fn naive_round_function(x: u32, sbox: &SBoxSet) -> u32 {
        let mut v = 0u32;
        for (i, row) in sbox.iter().enumerate() {
            let nibble = ((x >> (4 * i)) & 0xf) as usize;
            v |= (row[nibble] as u32) << (4 * i);
        }
        v.rotate_left(11)
    }

    #[test]
    fn expanded_sbox_matches_naive_substitution() {
        let samples = [
            0u32, 1, 0xff, 0x100, 0xdead_beef, 0x0123_4567, 0x89ab_cdef, 0xffff_ffff, 0x8000_0000,
        ];

        for &x in samples.iter() {
            assert_eq!(
                EXPANDED_SBOX.substitute(x),
                naive_round_function(x, &CRYPTOPRO_SBOX),
                "Table lookup differs from the S-box definition for {:#010x}",
                x
            );
        }

        for x in (0..=u32::MAX).step_by(0x0101_0101 / 3) {
            assert_eq!(EXPANDED_SBOX.substitute(x), naive_round_function(x, &CRYPTOPRO_SBOX));
        }
    }

    #[test]
    fn expand_sbox_is_stable() {
        assert_eq!(expand_sbox(&CRYPTOPRO_SBOX), expand_sbox(&CRYPTOPRO_SBOX));
        assert_eq!(&expand_sbox(&CRYPTOPRO_SBOX), &EXPANDED_SBOX);
    }

    #[test]
    fn key_schedule_test() {
        let key = [0, 1, 2, 3, 4, 5, 6, 7];
        let expected: [u32; 32] = [
            0, 1, 2, 3, 4, 5, 6, 7, //
            0, 1, 2, 3, 4, 5, 6, 7, //
            0, 1, 2, 3, 4, 5, 6, 7, //
            7, 6, 5, 4, 3, 2, 1, 0,
        ];

        let schedule = KeySchedule::new(&key);
        assert_eq!(schedule.len(), 32);
        assert_eq!(schedule.collect::<Vec<_>>(), expected, "Key schedule is broken");
    }

    #[test]
    fn encryption_depends_on_every_round_key() {
        let block = [0x0123_4567, 0x89ab_cdef];
        let base = Magma::new([0; 8]).encrypt_block(block);

        for i in 0..8 {
            let mut key = [0u32; 8];
            key[i] = 1;
            assert_ne!(Magma::new(key).encrypt_block(block), base, "Round key {} is unused", i);
        }
    }

    #[test]
    fn encryption_matches_swapping_feistel() {
        // Textbook form: swap the halves after every round, undo the last swap on output.
        fn reference(block: [u32; 2], key: &MagmaKey) -> [u32; 2] {
            let (mut a, mut b) = (block[0], block[1]);
            let order = (0..3).flat_map(|_| 0..8).chain((0..8).rev());
            for i in order {
                let t = b ^ naive_round_function(a.wrapping_add(key[i]), &CRYPTOPRO_SBOX);
                b = a;
                a = t;
            }
            [b, a]
        }

        let key = [
            0x7330_3b6f, 0x0af2_b38e, 0x77f3_2e24, 0x6c66_d71c, 0xf4e0_58b6, 0x1c1f_2e9c,
            0x0b4b_7d2c, 0xa31f_9d11,
        ];
        for &block in [[0, 0], [0x0123_4567, 0x89ab_cdef], [u32::MAX, 1]].iter() {
            assert_eq!(Magma::new(key).encrypt_block(block), reference(block, &key));
        }
    }
}
