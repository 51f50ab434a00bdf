//! AES block cipher core (FIPS 197): key scheduling plus the raw 16-byte
//! block permutation, with runtime backend selection.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! This crate implements only the low-level block cipher function and is
//! intended as a building block for the mode crates in this workspace. It
//! provides no authentication and no mode of operation; do not use it
//! directly in applications.
//!
//! # Backends
//!
//! A portable table-driven implementation is always available. On
//! x86/x86_64 an AES-NI implementation is selected instead when the CPU
//! supports it; detection runs once per process and every context created
//! afterwards binds to the detected backend. Both backends consume the same
//! expanded key schedule and produce byte-identical output.
//!
//! Building with `RUSTFLAGS="--cfg aes_force_soft"` pins the portable
//! backend regardless of CPU support.
//!
//! # Example
//! ```
//! use aes_core::AesEnc;
//!
//! let enc = AesEnc::new(&[0u8; 16]).unwrap();
//! let mut block = [0u8; 16];
//! enc.encrypt_block(&mut block);
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

use cfg_if::cfg_if;

mod errors;
mod schedule;
mod soft;

cfg_if! {
    if #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))] {
        mod autodetect;
        mod ni;
    }
}

pub use errors::InvalidKeyLength;

/// AES block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// A single AES block.
pub type Block = [u8; BLOCK_SIZE];

/// The implementation a cipher context was bound to at key-set time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Portable table-driven implementation.
    Soft,
    /// AES-NI hardware instructions.
    AesNi,
}

enum Inner {
    Soft(schedule::RoundKeys),
    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
    Ni(ni::NiKeys),
}

impl Inner {
    fn bind(rk: schedule::RoundKeys) -> Self {
        #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
        {
            if autodetect::aesni_available() {
                // SAFETY: the probe confirmed AES-NI (and with it SSE2).
                return Inner::Ni(unsafe { ni::NiKeys::from_schedule(&rk) });
            }
        }
        Inner::Soft(rk)
    }

    fn backend(&self) -> Backend {
        match self {
            Inner::Soft(_) => Backend::Soft,
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
            Inner::Ni(_) => Backend::AesNi,
        }
    }
}

/// Encrypt-direction AES context.
///
/// Holds an expanded encryption schedule for a 128/192/256-bit key and the
/// backend bound at construction time.
pub struct AesEnc {
    inner: Inner,
    rounds: usize,
}

impl AesEnc {
    /// Expands `key` (16, 24 or 32 bytes) into an encryption context.
    pub fn new(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        let rk = schedule::expand_encrypt(key)?;
        let rounds = rk.rounds;
        Ok(Self {
            inner: Inner::bind(rk),
            rounds,
        })
    }

    /// Encrypts one block in place.
    #[inline]
    pub fn encrypt_block(&self, block: &mut Block) {
        match &self.inner {
            Inner::Soft(rk) => soft::encrypt_block(rk, block),
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
            // SAFETY: the Ni variant is only constructed after the probe.
            Inner::Ni(k) => unsafe { ni::encrypt_block(k, block) },
        }
    }

    /// Encrypts a batch of blocks in place.
    ///
    /// The AES-NI backend runs eight independent round chains at a time;
    /// the portable backend processes blocks sequentially. Output is
    /// identical either way.
    pub fn encrypt_blocks(&self, blocks: &mut [Block]) {
        match &self.inner {
            Inner::Soft(rk) => {
                for block in blocks {
                    soft::encrypt_block(rk, block);
                }
            }
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
            Inner::Ni(k) => {
                let mut chunks = blocks.chunks_exact_mut(ni::PAR_BLOCKS);
                for chunk in &mut chunks {
                    // SAFETY: the Ni variant is only constructed after the probe.
                    unsafe { ni::encrypt8(k, chunk) };
                }
                for block in chunks.into_remainder() {
                    // SAFETY: as above.
                    unsafe { ni::encrypt_block(k, block) };
                }
            }
        }
    }

    /// Number of cipher rounds (10, 12 or 14).
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The backend this context was bound to.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.inner.backend()
    }
}

impl core::fmt::Debug for AesEnc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AesEnc { .. }")
    }
}

/// Decrypt-direction AES context.
///
/// Carries the inverse-transformed schedule; see [`AesEnc`] for the
/// backend-binding behavior.
pub struct AesDec {
    inner: Inner,
    rounds: usize,
}

impl AesDec {
    /// Expands `key` (16, 24 or 32 bytes) into a decryption context.
    pub fn new(key: &[u8]) -> Result<Self, InvalidKeyLength> {
        let rk = schedule::expand_decrypt(key)?;
        let rounds = rk.rounds;
        Ok(Self {
            inner: Inner::bind(rk),
            rounds,
        })
    }

    /// Decrypts one block in place.
    #[inline]
    pub fn decrypt_block(&self, block: &mut Block) {
        match &self.inner {
            Inner::Soft(rk) => soft::decrypt_block(rk, block),
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
            // SAFETY: the Ni variant is only constructed after the probe.
            Inner::Ni(k) => unsafe { ni::decrypt_block(k, block) },
        }
    }

    /// Decrypts a batch of blocks in place.
    pub fn decrypt_blocks(&self, blocks: &mut [Block]) {
        match &self.inner {
            Inner::Soft(rk) => {
                for block in blocks {
                    soft::decrypt_block(rk, block);
                }
            }
            #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
            Inner::Ni(k) => {
                let mut chunks = blocks.chunks_exact_mut(ni::PAR_BLOCKS);
                for chunk in &mut chunks {
                    // SAFETY: the Ni variant is only constructed after the probe.
                    unsafe { ni::decrypt8(k, chunk) };
                }
                for block in chunks.into_remainder() {
                    // SAFETY: as above.
                    unsafe { ni::decrypt_block(k, block) };
                }
            }
        }
    }

    /// Number of cipher rounds (10, 12 or 14).
    #[inline]
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The backend this context was bound to.
    #[inline]
    pub fn backend(&self) -> Backend {
        self.inner.backend()
    }
}

impl core::fmt::Debug for AesDec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AesDec { .. }")
    }
}

/// XORs `src` into `dst` byte by byte.
///
/// Shared helper for the mode crates; lengths must match.
#[inline]
pub fn xor_in_place(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= *s;
    }
}

/// Constant-time equality for authentication tags and integrity values.
///
/// Accumulates the XOR of every byte pair before a single final test, so
/// the comparison never exits early on the first mismatching byte.
/// Returns `false` for mismatched lengths.
#[inline]
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod backend_tests {
    use super::*;

    /// Deterministic xorshift64* generator for randomized sweeps.
    struct Rng(u64);

    impl Rng {
        fn next_block(&mut self) -> Block {
            let mut out = [0u8; 16];
            for chunk in out.chunks_exact_mut(8) {
                self.0 ^= self.0 << 13;
                self.0 ^= self.0 >> 7;
                self.0 ^= self.0 << 17;
                chunk.copy_from_slice(&self.0.to_le_bytes());
            }
            out
        }

        fn fill(&mut self, buf: &mut [u8]) {
            for chunk in buf.chunks_mut(16) {
                let b = self.next_block();
                let n = chunk.len();
                chunk.copy_from_slice(&b[..n]);
            }
        }
    }

    #[test]
    fn encrypt_then_decrypt_roundtrip() {
        let mut rng = Rng(0x9e3779b97f4a7c15);
        for key_len in [16usize, 24, 32] {
            let mut key = [0u8; 32];
            rng.fill(&mut key[..key_len]);
            let enc = AesEnc::new(&key[..key_len]).unwrap();
            let dec = AesDec::new(&key[..key_len]).unwrap();
            for _ in 0..3500 {
                let block = rng.next_block();
                let mut work = block;
                enc.encrypt_block(&mut work);
                assert_ne!(work, block);
                dec.decrypt_block(&mut work);
                assert_eq!(work, block);
            }
        }
    }

    #[test]
    fn blocks_api_matches_single_block_api() {
        let mut rng = Rng(0x1234_5678_9abc_def0);
        let enc = AesEnc::new(&[7u8; 32]).unwrap();
        let dec = AesDec::new(&[7u8; 32]).unwrap();
        // 27 blocks: exercises both the 8-wide path and the remainder.
        let mut batch = [[0u8; 16]; 27];
        for b in batch.iter_mut() {
            *b = rng.next_block();
        }
        let mut singles = batch;
        enc.encrypt_blocks(&mut batch);
        for b in singles.iter_mut() {
            enc.encrypt_block(b);
        }
        assert_eq!(batch, singles);
        dec.decrypt_blocks(&mut batch);
        for b in singles.iter_mut() {
            dec.decrypt_block(b);
        }
        assert_eq!(batch, singles);
    }

    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), not(aes_force_soft)))]
    #[test]
    fn soft_and_ni_backends_agree() {
        if !crate::autodetect::aesni_available() {
            return;
        }
        let mut rng = Rng(0xdead_beef_cafe_f00d);
        for key_len in [16usize, 24, 32] {
            let mut key = [0u8; 32];
            rng.fill(&mut key[..key_len]);

            let enc_rk = crate::schedule::expand_encrypt(&key[..key_len]).unwrap();
            let dec_rk = crate::schedule::expand_decrypt(&key[..key_len]).unwrap();
            // SAFETY: guarded by the probe above.
            let ni_enc = unsafe { crate::ni::NiKeys::from_schedule(&enc_rk) };
            // SAFETY: as above.
            let ni_dec = unsafe { crate::ni::NiKeys::from_schedule(&dec_rk) };

            for _ in 0..400 {
                let block = rng.next_block();

                let mut soft_out = block;
                crate::soft::encrypt_block(&enc_rk, &mut soft_out);
                let mut ni_out = block;
                // SAFETY: guarded by the probe above.
                unsafe { crate::ni::encrypt_block(&ni_enc, &mut ni_out) };
                assert_eq!(soft_out, ni_out);

                let mut soft_back = soft_out;
                crate::soft::decrypt_block(&dec_rk, &mut soft_back);
                let mut ni_back = ni_out;
                // SAFETY: as above.
                unsafe { crate::ni::decrypt_block(&ni_dec, &mut ni_back) };
                assert_eq!(soft_back, ni_back);
                assert_eq!(soft_back, block);
            }
        }
    }
}
