//! FIPS 197 key expansion.
//!
//! Both backends consume the schedules produced here; the AES-NI backend
//! only reloads the words into vector registers. Keeping a single source of
//! round-key material is what makes backend equivalence a structural
//! property instead of something each backend has to re-prove.

use crate::errors::InvalidKeyLength;
use crate::soft::{gmul, SBOX};

/// Enough words for AES-256: 4 * (14 + 1).
pub(crate) const MAX_SCHEDULE_WORDS: usize = 60;

/// Expanded round-key material for one direction.
///
/// `words` holds `4 * (rounds + 1)` big-endian words; the tail is unused
/// for the smaller key sizes. A decrypt-oriented schedule stores the round
/// keys in reverse order with the inverse MixColumns transform applied to
/// every round key except the first and last, so decryption walks the
/// schedule front to back exactly like encryption does.
#[derive(Clone)]
pub(crate) struct RoundKeys {
    pub(crate) words: [u32; MAX_SCHEDULE_WORDS],
    pub(crate) rounds: usize,
}

impl RoundKeys {
    #[inline]
    pub(crate) fn round_key(&self, round: usize) -> [u32; 4] {
        let base = round * 4;
        [
            self.words[base],
            self.words[base + 1],
            self.words[base + 2],
            self.words[base + 3],
        ]
    }
}

#[cfg(feature = "zeroize")]
impl Drop for RoundKeys {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.words);
    }
}

const RCON: [u32; 10] = [
    0x0100_0000,
    0x0200_0000,
    0x0400_0000,
    0x0800_0000,
    0x1000_0000,
    0x2000_0000,
    0x4000_0000,
    0x8000_0000,
    0x1b00_0000,
    0x3600_0000,
];

#[inline]
fn rot_word(w: u32) -> u32 {
    w.rotate_left(8)
}

#[inline]
fn sub_word(w: u32) -> u32 {
    let b = w.to_be_bytes();
    u32::from_be_bytes([
        SBOX[b[0] as usize],
        SBOX[b[1] as usize],
        SBOX[b[2] as usize],
        SBOX[b[3] as usize],
    ])
}

/// Inverse MixColumns applied to a single schedule word (one state column).
#[inline]
fn inv_mix_word(w: u32) -> u32 {
    let [a0, a1, a2, a3] = w.to_be_bytes();
    u32::from_be_bytes([
        gmul(a0, 0x0e) ^ gmul(a1, 0x0b) ^ gmul(a2, 0x0d) ^ gmul(a3, 0x09),
        gmul(a0, 0x09) ^ gmul(a1, 0x0e) ^ gmul(a2, 0x0b) ^ gmul(a3, 0x0d),
        gmul(a0, 0x0d) ^ gmul(a1, 0x09) ^ gmul(a2, 0x0e) ^ gmul(a3, 0x0b),
        gmul(a0, 0x0b) ^ gmul(a1, 0x0d) ^ gmul(a2, 0x09) ^ gmul(a3, 0x0e),
    ])
}

/// Expands `key` into an encrypt-oriented schedule.
pub(crate) fn expand_encrypt(key: &[u8]) -> Result<RoundKeys, InvalidKeyLength> {
    let (nk, rounds) = match key.len() {
        16 => (4, 10),
        24 => (6, 12),
        32 => (8, 14),
        _ => return Err(InvalidKeyLength),
    };

    let mut words = [0u32; MAX_SCHEDULE_WORDS];
    for (i, chunk) in key.chunks_exact(4).enumerate() {
        words[i] = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }

    let total = 4 * (rounds + 1);
    for i in nk..total {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp = sub_word(rot_word(temp)) ^ RCON[i / nk - 1];
        } else if nk == 8 && i % nk == 4 {
            // AES-256 takes an extra SubWord halfway through each stride.
            temp = sub_word(temp);
        }
        words[i] = words[i - nk] ^ temp;
    }

    Ok(RoundKeys { words, rounds })
}

/// Expands `key` into a decrypt-oriented schedule (reversed order, inverse
/// MixColumns on all interior round keys).
pub(crate) fn expand_decrypt(key: &[u8]) -> Result<RoundKeys, InvalidKeyLength> {
    let enc = expand_encrypt(key)?;
    let rounds = enc.rounds;

    let mut words = [0u32; MAX_SCHEDULE_WORDS];
    for round in 0..=rounds {
        let src = (rounds - round) * 4;
        let dst = round * 4;
        words[dst..dst + 4].copy_from_slice(&enc.words[src..src + 4]);
    }
    for round in 1..rounds {
        let base = round * 4;
        for w in words[base..base + 4].iter_mut() {
            *w = inv_mix_word(*w);
        }
    }

    Ok(RoundKeys { words, rounds })
}
