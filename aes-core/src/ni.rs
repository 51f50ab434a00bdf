//! AES-NI backend for x86/x86_64.
//!
//! One `AESENC`/`AESDEC` per round; round keys come from the portable
//! schedule (a decrypt schedule already carries the inverse MixColumns
//! transform `AESDEC` expects, so no `AESIMC` pass is needed here). The
//! 8-block entry points issue independent round chains so the CPU can
//! overlap them; callers funnel bulk work through those.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::schedule::RoundKeys;
use crate::Block;

pub(crate) const PAR_BLOCKS: usize = 8;

/// Round keys loaded into vector registers, one per round.
#[derive(Clone)]
pub(crate) struct NiKeys {
    keys: [__m128i; 15],
    rounds: usize,
}

impl NiKeys {
    /// Loads the portable schedule into vector form.
    ///
    /// # Safety
    /// The caller must have verified via the CPU feature probe that SSE2 is
    /// available (always true on x86_64, checked alongside AES-NI on x86).
    #[target_feature(enable = "sse2")]
    pub(crate) unsafe fn from_schedule(rk: &RoundKeys) -> Self {
        let mut keys = [_mm_setzero_si128(); 15];
        for (round, key) in keys.iter_mut().enumerate().take(rk.rounds + 1) {
            let mut bytes = [0u8; 16];
            for (chunk, word) in bytes
                .chunks_exact_mut(4)
                .zip(rk.words[round * 4..round * 4 + 4].iter())
            {
                chunk.copy_from_slice(&word.to_be_bytes());
            }
            *key = _mm_loadu_si128(bytes.as_ptr().cast());
        }
        Self {
            keys,
            rounds: rk.rounds,
        }
    }
}

#[cfg(feature = "zeroize")]
impl Drop for NiKeys {
    fn drop(&mut self) {
        let p = self.keys.as_mut_ptr().cast::<u8>();
        for i in 0..core::mem::size_of::<[__m128i; 15]>() {
            // SAFETY: `p` covers exactly the `keys` array, written bytewise.
            unsafe { core::ptr::write_volatile(p.add(i), 0) };
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}

/// # Safety
/// Requires AES-NI and SSE2, as established by the feature probe.
#[target_feature(enable = "sse2")]
#[target_feature(enable = "aes")]
pub(crate) unsafe fn encrypt_block(k: &NiKeys, block: &mut Block) {
    let mut b = _mm_loadu_si128(block.as_ptr().cast());
    b = _mm_xor_si128(b, k.keys[0]);
    for round in 1..k.rounds {
        b = _mm_aesenc_si128(b, k.keys[round]);
    }
    b = _mm_aesenclast_si128(b, k.keys[k.rounds]);
    _mm_storeu_si128(block.as_mut_ptr().cast(), b);
}

/// # Safety
/// Requires AES-NI and SSE2, as established by the feature probe.
#[target_feature(enable = "sse2")]
#[target_feature(enable = "aes")]
pub(crate) unsafe fn decrypt_block(k: &NiKeys, block: &mut Block) {
    let mut b = _mm_loadu_si128(block.as_ptr().cast());
    b = _mm_xor_si128(b, k.keys[0]);
    for round in 1..k.rounds {
        b = _mm_aesdec_si128(b, k.keys[round]);
    }
    b = _mm_aesdeclast_si128(b, k.keys[k.rounds]);
    _mm_storeu_si128(block.as_mut_ptr().cast(), b);
}

/// Encrypts exactly [`PAR_BLOCKS`] blocks with interleaved round chains.
///
/// # Safety
/// Requires AES-NI and SSE2, as established by the feature probe.
#[target_feature(enable = "sse2")]
#[target_feature(enable = "aes")]
pub(crate) unsafe fn encrypt8(k: &NiKeys, blocks: &mut [Block]) {
    debug_assert_eq!(blocks.len(), PAR_BLOCKS);
    let mut b = [_mm_setzero_si128(); PAR_BLOCKS];
    for (v, block) in b.iter_mut().zip(blocks.iter()) {
        *v = _mm_xor_si128(_mm_loadu_si128(block.as_ptr().cast()), k.keys[0]);
    }
    for round in 1..k.rounds {
        let key = k.keys[round];
        for v in b.iter_mut() {
            *v = _mm_aesenc_si128(*v, key);
        }
    }
    let last = k.keys[k.rounds];
    for (v, block) in b.iter_mut().zip(blocks.iter_mut()) {
        *v = _mm_aesenclast_si128(*v, last);
        _mm_storeu_si128(block.as_mut_ptr().cast(), *v);
    }
}

/// Decrypts exactly [`PAR_BLOCKS`] blocks with interleaved round chains.
///
/// # Safety
/// Requires AES-NI and SSE2, as established by the feature probe.
#[target_feature(enable = "sse2")]
#[target_feature(enable = "aes")]
pub(crate) unsafe fn decrypt8(k: &NiKeys, blocks: &mut [Block]) {
    debug_assert_eq!(blocks.len(), PAR_BLOCKS);
    let mut b = [_mm_setzero_si128(); PAR_BLOCKS];
    for (v, block) in b.iter_mut().zip(blocks.iter()) {
        *v = _mm_xor_si128(_mm_loadu_si128(block.as_ptr().cast()), k.keys[0]);
    }
    for round in 1..k.rounds {
        let key = k.keys[round];
        for v in b.iter_mut() {
            *v = _mm_aesdec_si128(*v, key);
        }
    }
    let last = k.keys[k.rounds];
    for (v, block) in b.iter_mut().zip(blocks.iter_mut()) {
        *v = _mm_aesdeclast_si128(*v, last);
        _mm_storeu_si128(block.as_mut_ptr().cast(), *v);
    }
}
