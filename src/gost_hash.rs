//! # GOST hash function
//! This module implements the GOST R 34.11-94 hash function with the CryptoPro parameter set.
//! All 256 bit values are handled as eight little-endian 32 bit words, word 0 holding bytes
//! 0..4 of the byte form.
use crate::magma::{Magma, MagmaKey};
use std::{fmt, io};
use tracing::trace;

/// Size of a message block (and of the digest) in bytes.
pub const BLOCK_SIZE: usize = 32;

/// 256 bit value as eight little-endian words.
pub type Block = [u32; 8];
pub type State = Block;

/// `C_3` of the key generation, the only non-zero round constant.
const C3: Block = [
    0xff00ff00, 0xff00ff00, 0x00ff00ff, 0x00ff00ff, 0x00ffff00, 0xff0000ff, 0x000000ff,
    0xff00ffff,
];

fn xor(x: &Block, y: &Block) -> Block {
    let mut res = *x;
    for (r, y) in res.iter_mut().zip(y.iter()) {
        *r ^= *y;
    }
    res
}

fn block_from_bytes(bytes: &[u8]) -> Block {
    debug_assert_eq!(bytes.len(), BLOCK_SIZE, "Message block must be of 32 bytes");
    let mut block = [0u32; 8];
    for (w, chunk) in block.iter_mut().zip(bytes.chunks_exact(4)) {
        *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    block
}

/// P transformation: byte `i` of round key word `k` is byte `k mod 4` of word
/// `2i + k / 4`. On the byte form this is `phi(i + 1 + 4(k - 1)) = 8i + k`.
pub fn p(w: &Block) -> MagmaKey {
    let mut key = [0u32; 8];

    for (k, out) in key.iter_mut().enumerate() {
        let shift = 8 * (k & 0b11);
        for i in 0..4 {
            let byte = (w[2 * i + (k >> 2)] >> shift) & 0xff;
            *out |= byte << (8 * i);
        }
    }

    key
}

/// A transformation: `y4 || y3 || y2 || y1 -> (y1 xor y2) || y4 || y3 || y2`, with `y1` the
/// low 64 bits.
pub fn a(x: &Block) -> Block {
    let mut s = [0u32; 8];
    s[..6].copy_from_slice(&x[2..]);
    s[6] = x[0] ^ x[2];
    s[7] = x[1] ^ x[3];
    s
}

/// One round of the psi shift register over sixteen 16-bit words `g0..g15`: everything
/// shifts down by one and `g15` becomes `g0 ^ g1 ^ g2 ^ g3 ^ g12 ^ g15`.
pub fn psi(x: &mut Block) {
    let feedback = x[0] ^ (x[0] >> 16) ^ x[1] ^ (x[1] >> 16) ^ x[6] ^ (x[7] >> 16);

    for i in 0..7 {
        x[i] = (x[i] >> 16) | (x[i + 1] << 16);
    }
    x[7] = (x[7] >> 16) | (feedback << 16);
}

pub fn psi_pow(x: &Block, n: usize) -> Block {
    let mut tmp = *x;
    for _ in 0..n {
        psi(&mut tmp);
    }
    tmp
}

/// The four encryption keys of one compression step.
fn key_gen(h: &State, m: &Block) -> [MagmaKey; 4] {
    let mut u = *h;
    let mut v = *m;
    let mut keys = [[0u32; 8]; 4];

    keys[0] = p(&xor(&u, &v));
    for (j, key) in keys.iter_mut().enumerate().skip(1) {
        u = a(&u);
        if j == 2 {
            u = xor(&u, &C3);
        }
        v = a(&a(&v));
        *key = p(&xor(&u, &v));
    }

    keys
}

// h_i = psi^61(h_i-1 xor psi(m xor psi^12(s)))
fn output_transformation(s: &Block, h: &State, m: &Block) -> State {
    let mut res = xor(&psi_pow(s, 12), m);
    psi(&mut res);
    psi_pow(&xor(h, &res), 61)
}

/// Gost compression function.
/// **Takes** a state and a message block as input and **returns** the next state.
pub fn compress(h: &State, m: &Block) -> State {
    let keys = key_gen(h, m);
    let mut s = [0u32; 8];

    for (i, key) in keys.iter().enumerate() {
        let out = Magma::new(*key).encrypt_block([h[2 * i], h[2 * i + 1]]);
        s[2 * i..2 * i + 2].copy_from_slice(&out);
    }

    output_transformation(&s, h, m)
}

/// 256 bit addition modulo 2^256, carry moving from word 0 upwards.
pub fn add_block(sum: &mut Block, m: &Block) {
    let mut carry = false;

    for (s, m) in sum.iter_mut().zip(m.iter()) {
        let (x, c1) = s.overflowing_add(*m);
        let (x, c2) = x.overflowing_add(carry as u32);
        *s = x;
        carry = c1 | c2;
    }
}

/// A GOST R 34.11-94 digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Digest([u8; BLOCK_SIZE]);

impl Digest {
    fn from_state(state: &State) -> Digest {
        let mut out = [0u8; BLOCK_SIZE];
        for (chunk, w) in out.chunks_exact_mut(4).zip(state.iter()) {
            chunk.copy_from_slice(&w.to_le_bytes());
        }
        Digest(out)
    }

    pub fn as_bytes(&self) -> &[u8; BLOCK_SIZE] {
        &self.0
    }

    /// 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Digest> for [u8; BLOCK_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{:02x}", b))
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{:02X}", b))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

/// Streaming GOST R 34.11-94 hasher.
///
/// Input may be fed in chunks of any size; the digest only depends on the concatenation.
/// [`GostHash::finalize`] consumes the session, so a finalized state can't be updated again.
#[derive(Clone, Debug, Default)]
pub struct GostHash {
    hash: State,
    sum: Block,
    buffer: [u8; BLOCK_SIZE],
    length: u64,
}

impl GostHash {
    pub fn new() -> GostHash {
        GostHash::default()
    }

    /// Number of bytes fed so far.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn process_block(&mut self, bytes: &[u8]) {
        let block = block_from_bytes(bytes);
        add_block(&mut self.sum, &block);
        self.hash = compress(&self.hash, &block);
    }

    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        let mut data = data.as_ref();
        let index = (self.length % BLOCK_SIZE as u64) as usize;
        self.length = self.length.wrapping_add(data.len() as u64);

        // fill partial block
        if index != 0 {
            let left = BLOCK_SIZE - index;
            if data.len() < left {
                self.buffer[index..index + data.len()].copy_from_slice(data);
                return;
            }
            self.buffer[index..].copy_from_slice(&data[..left]);
            let pending = self.buffer;
            self.process_block(&pending);
            data = &data[left..];
        }

        let mut chunks = data.chunks_exact(BLOCK_SIZE);
        for chunk in &mut chunks {
            self.process_block(chunk);
        }
        let rest = chunks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
    }

    pub fn chain_update(mut self, data: impl AsRef<[u8]>) -> Self {
        self.update(data);
        self
    }

    pub fn finalize(mut self) -> Digest {
        self.finish()
    }

    pub fn finalize_reset(&mut self) -> Digest {
        let digest = self.finish();
        self.reset();
        digest
    }

    pub fn reset(&mut self) {
        *self = GostHash::default();
    }

    fn finish(&mut self) -> Digest {
        let index = (self.length % BLOCK_SIZE as u64) as usize;

        // pad the last block with zeroes and hash it
        if index > 0 {
            self.buffer[index..].fill(0);
            let pending = self.buffer;
            self.process_block(&pending);
        }

        trace!(
            bytes = self.length,
            blocks = self.length.div_ceil(BLOCK_SIZE as u64),
            "finalizing GOST R 34.11-94 digest"
        );

        // hash the bit length and the sum
        let mut length_block = [0u32; 8];
        length_block[0] = (self.length << 3) as u32;
        length_block[1] = (self.length >> 29) as u32;
        self.hash = compress(&self.hash, &length_block);
        self.hash = compress(&self.hash, &self.sum);

        Digest::from_state(&self.hash)
    }
}

impl io::Write for GostHash {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Digest of a byte string in one call.
pub fn digest(data: impl AsRef<[u8]>) -> Digest {
    GostHash::new().chain_update(data).finalize()
}
