//! # MD5 Message-Digest Implementation
//!
//! A pure Rust implementation of the classical MD5 hash (RFC 1321). Output is bit-exact with
//! the reference algorithm: 16-byte digests, rendered as 32 lowercase hex characters.
//!
//! **Note**: MD5 is cryptographically broken. Collisions are practical to produce, so it must not
//! be used where an adversary controls the input. It remains useful for checksums, cache keys and
//! interoperability with protocols that mandate it. For security use SHA-2 or SHA-3.
//!
//! ## Key Features
//! - **One-shot** helpers: [`md5_digest`], [`md5_hex`] and [`md5_hex_into`] for caller-owned buffers.
//! - **Streaming**: feed data incrementally with [`Md5::update`] and then [`Md5::finalize`].
//!   [`Md5`] also implements [`std::io::Write`], so readers can be piped through it.
//! - **Typed digests**: [`Digest`] formats as lower/upper hex and parses back from hex.
//! - **Batch** hashing of independent messages on the `rayon` thread pool.
//!
//! ## Bit length
//! The message length is carried as a 64-bit bit count. Inputs of 2^61 bytes or more wrap that
//! counter modulo 2^64, exactly like the reference algorithm.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::cs::error::{Error, Result};

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_OUTPUT_SIZE: usize = 16;

/// Length of the hex rendering of a digest.
pub const MD5_HEX_SIZE: usize = MD5_OUTPUT_SIZE * 2;

/// MD5 processes its input in 512-bit blocks.
pub const MD5_BLOCK_SIZE: usize = 64;

/// Initial (A, B, C, D).
const INIT_STATE: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

/// K[i] = floor(2^32 * abs(sin(i + 1))) for i = 0..63
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Left-rotate amounts for each of the 64 steps.
#[rustfmt::skip]
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22,
    5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9, 14, 20,
    4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23,
    6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

/// A 128-bit MD5 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; MD5_OUTPUT_SIZE]);

impl Digest {
    /// Hashes `message` in one shot.
    pub fn compute(message: &[u8]) -> Self {
        let mut hasher = Md5::new();
        hasher.update(message);
        hasher.finalize()
    }

    /// Parses a digest from 32 hex characters (either case).
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = [0u8; MD5_OUTPUT_SIZE];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Digest(bytes))
    }

    /// Lowercase hex rendering, most-significant nibble first.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; MD5_OUTPUT_SIZE] {
        &self.0
    }
}

impl From<Digest> for [u8; MD5_OUTPUT_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl From<[u8; MD5_OUTPUT_SIZE]> for Digest {
    fn from(bytes: [u8; MD5_OUTPUT_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Digest::from_hex(s)
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:x})", self)
    }
}

/// A streaming MD5 context.
///
/// Bytes can be fed in any number of [`update`](Md5::update) calls with arbitrary split points;
/// the final digest only depends on the concatenated input.
#[derive(Debug, Clone)]
pub struct Md5 {
    /// Chaining state (A, B, C, D).
    state: [u32; 4],
    /// Partial block awaiting compression.
    buffer: [u8; MD5_BLOCK_SIZE],
    buffer_len: usize,
    /// Bytes absorbed so far, mod 2^64.
    length: u64,
}

impl Default for Md5 {
    fn default() -> Self {
        Self {
            state: INIT_STATE,
            buffer: [0u8; MD5_BLOCK_SIZE],
            buffer_len: 0,
            length: 0,
        }
    }
}

impl Md5 {
    /// Creates a new MD5 context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs `data` into the running hash.
    pub fn update(&mut self, data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);
        self.absorb(data);
    }

    /// Applies the final padding and returns the digest, consuming the context.
    pub fn finalize(mut self) -> Digest {
        let length = self.length;
        let bit_length = length.wrapping_mul(8);
        let zeros = zero_padding(length);

        // 0x80, up to 63 zero bytes, 8-byte length
        let mut tail = [0u8; 1 + 63 + 8];
        tail[0] = 0x80;
        tail[1 + zeros..9 + zeros].copy_from_slice(&bit_length.to_le_bytes());
        self.absorb(&tail[..9 + zeros]);
        debug_assert_eq!(self.buffer_len, 0);

        trace!("md5 finalized after {} bytes", length);

        let mut output = [0u8; MD5_OUTPUT_SIZE];
        for (chunk, word) in output.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Digest(output)
    }

    /// Resets the context to its initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of bytes absorbed so far (mod 2^64).
    pub fn len(&self) -> u64 {
        self.length
    }

    /// True if nothing has been absorbed yet.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Hashes everything `reader` yields until EOF.
    pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
        let mut hasher = Md5::new();
        io::copy(&mut reader, &mut hasher)?;
        Ok(hasher.finalize())
    }

    /// Buffers `data` and compresses every full block, without touching the length counter.
    fn absorb(&mut self, data: &[u8]) {
        let mut input = data;

        if self.buffer_len > 0 {
            let take = (MD5_BLOCK_SIZE - self.buffer_len).min(input.len());
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&input[..take]);
            self.buffer_len += take;
            input = &input[take..];

            if self.buffer_len < MD5_BLOCK_SIZE {
                return;
            }
            compress(&mut self.state, &self.buffer);
            self.buffer_len = 0;
        }

        let mut blocks = input.chunks_exact(MD5_BLOCK_SIZE);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }

        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffer_len = rest.len();
    }
}

impl Write for Md5 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs the 64 steps over one 64-byte block and chains the result into `state`.
fn compress(state: &mut [u32; 4], block: &[u8]) {
    let mut m = [0u32; 16];
    for (word, bytes) in m.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let [mut a, mut b, mut c, mut d] = *state;

    for i in 0..64 {
        let (f, g) = match i / 16 {
            0 => ((b & c) | (!b & d), i),
            1 => ((d & b) | (!d & c), (5 * i + 1) % 16),
            2 => (b ^ c ^ d, (3 * i + 5) % 16),
            _ => (c ^ (b | !d), (7 * i) % 16),
        };

        let rotated = f
            .wrapping_add(a)
            .wrapping_add(K[i])
            .wrapping_add(m[g])
            .rotate_left(S[i]);

        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(rotated);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}

/// Number of zero bytes between the 0x80 marker and the length field.
fn zero_padding(len: u64) -> usize {
    // (55 - len) mod 64, kept non-negative
    (119 - (len % MD5_BLOCK_SIZE as u64) as usize) % MD5_BLOCK_SIZE
}

/// Length of the padded message for an input of `len` bytes.
///
/// Always a multiple of 64 and strictly greater than `len`.
pub fn padded_len(len: usize) -> usize {
    len + 9 + zero_padding(len as u64)
}

/// Builds the padded message: `message || 0x80 || 0x00* || le64(bit length)`.
pub fn pad_message(message: &[u8]) -> Vec<u8> {
    let bit_length = (message.len() as u64).wrapping_mul(8);
    let mut padded = Vec::with_capacity(padded_len(message.len()));
    padded.extend_from_slice(message);
    padded.push(0x80);
    padded.resize(padded.len() + zero_padding(message.len() as u64), 0);
    padded.extend_from_slice(&bit_length.to_le_bytes());
    padded
}

/// Computes the MD5 digest of `data` in a single shot.
pub fn md5_digest(data: &[u8]) -> [u8; MD5_OUTPUT_SIZE] {
    Digest::compute(data).0
}

/// Computes the MD5 digest of `data` as 32 lowercase hex characters.
pub fn md5_hex(data: &[u8]) -> String {
    Digest::compute(data).to_hex()
}

/// Writes the lowercase hex digest of `data` into a caller-owned buffer.
///
/// `out` must hold at least 32 bytes. When it holds 33 or more, a NUL terminator is written
/// after the hex characters. Returns the number of bytes written, terminator included.
pub fn md5_hex_into(data: &[u8], out: &mut [u8]) -> Result<usize> {
    if out.len() < MD5_HEX_SIZE {
        warn!(
            "md5 output buffer too small: {} bytes, need {}",
            out.len(),
            MD5_HEX_SIZE
        );
        return Err(Error::BufferTooSmall {
            required: MD5_HEX_SIZE,
            actual: out.len(),
        });
    }

    let hex = Digest::compute(data).to_hex();
    out[..MD5_HEX_SIZE].copy_from_slice(hex.as_bytes());
    match out.get_mut(MD5_HEX_SIZE) {
        Some(terminator) => {
            *terminator = 0;
            Ok(MD5_HEX_SIZE + 1)
        }
        None => Ok(MD5_HEX_SIZE),
    }
}

/// Hashes independent messages in parallel. Output order matches input order.
pub fn md5_digest_batch(messages: &[&[u8]]) -> Vec<Digest> {
    debug!("md5 batch of {} messages", messages.len());
    messages.par_iter().map(|m| Digest::compute(m)).collect()
}
