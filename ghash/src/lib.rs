//! GHASH universal hash over GF(2^128) (NIST SP 800-38D), keyed by the
//! hash subkey H.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! GHASH is not a cryptographic hash or a standalone MAC; it is only
//! secure inside a construction like GCM that masks its output. This crate
//! exists as a building block for the AEAD crate in this workspace.
//!
//! # Backends
//!
//! Three interchangeable multiplication strategies produce identical
//! results:
//!
//! - a bitwise shift-and-add reference,
//! - a 4-bit precomputed table (the portable default),
//! - carry-less multiplication (x86/x86_64 with PCLMULQDQ), with
//!   precomputed powers of H and one reduction per four-block batch.
//!
//! Detection runs once per process; each [`GHash`] binds its backend at
//! construction. `--cfg ghash_force_table` or `--cfg ghash_force_soft`
//! pins a portable backend at compile time.
//!
//! # Example
//! ```
//! use ghash::GHash;
//!
//! let h = [0x42u8; 16];
//! let mut hasher = GHash::new(&h);
//! hasher.update(b"some associated data");
//! hasher.update(b"some ciphertext");
//! let digest = hasher.finalize(20 * 8, 15 * 8);
//! assert_ne!(digest, [0u8; 16]);
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

use cfg_if::cfg_if;

mod soft;
mod table;

cfg_if! {
    if #[cfg(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        not(ghash_force_soft),
        not(ghash_force_table)
    ))] {
        mod clmul;
        cpufeatures::new!(clmul_cpuid, "pclmulqdq", "ssse3");
    }
}

/// GHASH block size in bytes.
pub const BLOCK_SIZE: usize = 16;

/// The multiplication strategy a [`GHash`] instance was bound to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Bitwise shift-and-add reference.
    Soft,
    /// 4-bit precomputed table.
    Table,
    /// Carry-less multiply with batched reduction.
    Clmul,
}

#[derive(Clone)]
enum Inner {
    #[cfg_attr(not(any(test, ghash_force_soft)), allow(dead_code))]
    Soft(soft::Key),
    Table(table::Key),
    #[cfg(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        not(ghash_force_soft),
        not(ghash_force_table)
    ))]
    Clmul(clmul::Key),
}

cfg_if! {
    if #[cfg(ghash_force_soft)] {
        impl Inner {
            fn bind(h: &[u8; BLOCK_SIZE]) -> Self {
                Inner::Soft(soft::Key::new(h))
            }
        }
    } else {
        impl Inner {
            fn bind(h: &[u8; BLOCK_SIZE]) -> Self {
                #[cfg(all(
                    any(target_arch = "x86", target_arch = "x86_64"),
                    not(ghash_force_table)
                ))]
                {
                    if clmul_cpuid::get() {
                        // SAFETY: the probe confirmed PCLMULQDQ and SSSE3.
                        return Inner::Clmul(unsafe { clmul::Key::new(h) });
                    }
                }
                Inner::Table(table::Key::new(h))
            }
        }
    }
}

/// Streaming GHASH state.
///
/// Each [`update`](Self::update) call absorbs one zero-padded region
/// (associated data, then ciphertext, in GCM's usage);
/// [`finalize`](Self::finalize) folds in the bit-length block and returns
/// the 16-byte digest.
#[derive(Clone)]
pub struct GHash {
    inner: Inner,
    y: [u8; BLOCK_SIZE],
}

impl GHash {
    /// Creates a hasher keyed by the subkey `h`, binding the backend chosen
    /// by the process-wide capability probe.
    pub fn new(h: &[u8; BLOCK_SIZE]) -> Self {
        Self {
            inner: Inner::bind(h),
            y: [0u8; BLOCK_SIZE],
        }
    }

    /// The backend this instance was bound to.
    pub fn backend(&self) -> Backend {
        match &self.inner {
            Inner::Soft(_) => Backend::Soft,
            Inner::Table(_) => Backend::Table,
            #[cfg(all(
                any(target_arch = "x86", target_arch = "x86_64"),
                not(ghash_force_soft),
                not(ghash_force_table)
            ))]
            Inner::Clmul(_) => Backend::Clmul,
        }
    }

    /// Absorbs one region of data, zero-padding its trailing partial block.
    pub fn update(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        match &self.inner {
            Inner::Soft(key) => {
                let mut y = u128::from_be_bytes(self.y);
                for chunk in data.chunks(BLOCK_SIZE) {
                    y = key.absorb(y, pad_block(chunk));
                }
                self.y = y.to_be_bytes();
            }
            Inner::Table(key) => {
                let mut y = u128::from_be_bytes(self.y);
                for chunk in data.chunks(BLOCK_SIZE) {
                    y = key.absorb(y, pad_block(chunk));
                }
                self.y = y.to_be_bytes();
            }
            #[cfg(all(
                any(target_arch = "x86", target_arch = "x86_64"),
                not(ghash_force_soft),
                not(ghash_force_table)
            ))]
            // SAFETY: the Clmul variant is only constructed after the probe.
            Inner::Clmul(key) => unsafe { key.update(&mut self.y, data) },
        }
    }

    /// Folds in the two 64-bit bit lengths and returns the digest.
    pub fn finalize(mut self, len_a_bits: u64, len_c_bits: u64) -> [u8; BLOCK_SIZE] {
        let mut len_block = [0u8; BLOCK_SIZE];
        len_block[..8].copy_from_slice(&len_a_bits.to_be_bytes());
        len_block[8..].copy_from_slice(&len_c_bits.to_be_bytes());
        self.update(&len_block);
        self.y
    }
}

impl core::fmt::Debug for GHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("GHash { .. }")
    }
}

#[inline]
fn pad_block(chunk: &[u8]) -> u128 {
    let mut block = [0u8; BLOCK_SIZE];
    block[..chunk.len()].copy_from_slice(chunk);
    u128::from_be_bytes(block)
}
