//! Carry-less-multiply backend (PCLMULQDQ).
//!
//! Blocks are loaded byte-reversed so the register holds the bit-reflected
//! field element; the multiply is the Intel schoolbook sequence (four
//! CLMULs plus the one-bit alignment shift) followed by the folded
//! reduction. Powers H^1..H^4 are precomputed so a four-block batch
//! accumulates four 256-bit partial products and pays for a single
//! reduction — the reduce step is linear, so the XOR of products reduces
//! to the same value as reducing each one.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use crate::BLOCK_SIZE;

/// Blocks folded per reduction.
pub(crate) const BATCH_BLOCKS: usize = 4;

#[derive(Clone)]
pub(crate) struct Key {
    /// `h[i]` holds the byte-reversed H^(i+1).
    h: [__m128i; BATCH_BLOCKS],
}

/// # Safety
/// Requires SSSE3 (byte shuffle), as established by the feature probe.
#[inline]
#[target_feature(enable = "sse2")]
#[target_feature(enable = "ssse3")]
unsafe fn bswap(v: __m128i) -> __m128i {
    let mask = _mm_set_epi8(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15);
    _mm_shuffle_epi8(v, mask)
}

/// 128x128 carry-less product as an unreduced (lo, hi) 256-bit pair.
///
/// # Safety
/// Requires PCLMULQDQ, as established by the feature probe.
#[inline]
#[target_feature(enable = "sse2")]
#[target_feature(enable = "pclmulqdq")]
unsafe fn mul_parts(a: __m128i, b: __m128i) -> (__m128i, __m128i) {
    let t3 = _mm_clmulepi64_si128(a, b, 0x00);
    let t4 = _mm_clmulepi64_si128(a, b, 0x10);
    let t5 = _mm_clmulepi64_si128(a, b, 0x01);
    let t6 = _mm_clmulepi64_si128(a, b, 0x11);

    let mid = _mm_xor_si128(t4, t5);
    let lo = _mm_xor_si128(t3, _mm_slli_si128(mid, 8));
    let hi = _mm_xor_si128(t6, _mm_srli_si128(mid, 8));
    (lo, hi)
}

/// One-bit alignment shift of the 256-bit product, then reduction modulo
/// x^128 + x^7 + x^2 + x + 1.
///
/// # Safety
/// Requires SSE2, as established by the feature probe.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn shift_reduce(lo: __m128i, hi: __m128i) -> __m128i {
    // Shift the whole 256-bit value left by one bit.
    let lo_carry = _mm_srli_epi32(lo, 31);
    let hi_carry = _mm_srli_epi32(hi, 31);
    let lo = _mm_slli_epi32(lo, 1);
    let hi = _mm_slli_epi32(hi, 1);

    let cross = _mm_srli_si128(lo_carry, 12);
    let hi_fill = _mm_slli_si128(hi_carry, 4);
    let lo_fill = _mm_slli_si128(lo_carry, 4);
    let lo = _mm_or_si128(lo, lo_fill);
    let hi = _mm_or_si128(_mm_or_si128(hi, hi_fill), cross);

    // Fold the low 128 bits into the high half.
    let t7 = _mm_slli_epi32(lo, 31);
    let t8 = _mm_slli_epi32(lo, 30);
    let t9 = _mm_slli_epi32(lo, 25);
    let t7 = _mm_xor_si128(_mm_xor_si128(t7, t8), t9);
    let t8 = _mm_srli_si128(t7, 4);
    let t7 = _mm_slli_si128(t7, 12);
    let lo = _mm_xor_si128(lo, t7);

    let t2 = _mm_srli_epi32(lo, 1);
    let t4 = _mm_srli_epi32(lo, 2);
    let t5 = _mm_srli_epi32(lo, 7);
    let t2 = _mm_xor_si128(_mm_xor_si128(t2, t4), _mm_xor_si128(t5, t8));
    let lo = _mm_xor_si128(lo, t2);
    _mm_xor_si128(hi, lo)
}

/// Fully reduced product.
///
/// # Safety
/// Requires PCLMULQDQ, as established by the feature probe.
#[inline]
#[target_feature(enable = "sse2")]
#[target_feature(enable = "pclmulqdq")]
unsafe fn mul(a: __m128i, b: __m128i) -> __m128i {
    let (lo, hi) = mul_parts(a, b);
    shift_reduce(lo, hi)
}

impl Key {
    /// # Safety
    /// Requires SSSE3 and PCLMULQDQ, as established by the feature probe.
    #[target_feature(enable = "sse2")]
    #[target_feature(enable = "ssse3")]
    #[target_feature(enable = "pclmulqdq")]
    pub(crate) unsafe fn new(h_bytes: &[u8; 16]) -> Self {
        let h1 = bswap(_mm_loadu_si128(h_bytes.as_ptr().cast()));
        let h2 = mul(h1, h1);
        let h3 = mul(h2, h1);
        let h4 = mul(h3, h1);
        Self {
            h: [h1, h2, h3, h4],
        }
    }

    /// Absorbs `data` into the accumulator `y`, zero-padding the trailing
    /// partial block.
    ///
    /// # Safety
    /// Requires SSSE3 and PCLMULQDQ, as established by the feature probe.
    #[target_feature(enable = "sse2")]
    #[target_feature(enable = "ssse3")]
    #[target_feature(enable = "pclmulqdq")]
    pub(crate) unsafe fn update(&self, y: &mut [u8; 16], data: &[u8]) {
        let mut acc = bswap(_mm_loadu_si128(y.as_ptr().cast()));

        let mut batches = data.chunks_exact(BLOCK_SIZE * BATCH_BLOCKS);
        for batch in &mut batches {
            let x0 = _mm_xor_si128(bswap(_mm_loadu_si128(batch.as_ptr().cast())), acc);
            let x1 = bswap(_mm_loadu_si128(batch[16..].as_ptr().cast()));
            let x2 = bswap(_mm_loadu_si128(batch[32..].as_ptr().cast()));
            let x3 = bswap(_mm_loadu_si128(batch[48..].as_ptr().cast()));

            // Highest power meets the oldest block.
            let (mut lo, mut hi) = mul_parts(x0, self.h[3]);
            let (l, h) = mul_parts(x1, self.h[2]);
            lo = _mm_xor_si128(lo, l);
            hi = _mm_xor_si128(hi, h);
            let (l, h) = mul_parts(x2, self.h[1]);
            lo = _mm_xor_si128(lo, l);
            hi = _mm_xor_si128(hi, h);
            let (l, h) = mul_parts(x3, self.h[0]);
            lo = _mm_xor_si128(lo, l);
            hi = _mm_xor_si128(hi, h);

            acc = shift_reduce(lo, hi);
        }

        for chunk in batches.remainder().chunks(BLOCK_SIZE) {
            let mut buf = [0u8; BLOCK_SIZE];
            buf[..chunk.len()].copy_from_slice(chunk);
            let x = _mm_xor_si128(bswap(_mm_loadu_si128(buf.as_ptr().cast())), acc);
            let (lo, hi) = mul_parts(x, self.h[0]);
            acc = shift_reduce(lo, hi);
        }

        _mm_storeu_si128(y.as_mut_ptr().cast(), bswap(acc));
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Key {
    fn drop(&mut self) {
        let p = self.h.as_mut_ptr().cast::<u8>();
        for i in 0..core::mem::size_of::<[__m128i; BATCH_BLOCKS]>() {
            // SAFETY: `p` covers exactly the `h` array, written bytewise.
            unsafe { core::ptr::write_volatile(p.add(i), 0) };
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}
