//! Galois/Counter Mode (NIST SP 800-38D).

use aes_core::{ct_eq, xor_in_place, AesEnc, Block, BLOCK_SIZE};
use ghash::GHash;

use crate::errors::Error;
use crate::tag::{Tag, MAX_TAG_LEN, MIN_TAG_LEN};

/// Counter blocks generated per cipher dispatch.
const PAR_BLOCKS: usize = 8;

/// GCM key context.
///
/// Holds the encryption schedule and the GHASH state keyed by
/// H = E_K(0^128), both computed once at construction. The GHASH
/// multiplication tables are derived from H here and reused (cloned) for
/// every message; they only change when the key changes, i.e. by building
/// a new `Gcm`.
pub struct Gcm {
    cipher: AesEnc,
    ghash: GHash,
}

impl Gcm {
    /// Expands `key` (16/24/32 bytes) and derives the hash subkey.
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        let cipher = AesEnc::new(key)?;
        let mut h = [0u8; BLOCK_SIZE];
        cipher.encrypt_block(&mut h);
        let ghash = GHash::new(&h);
        Ok(Self { cipher, ghash })
    }

    /// Encrypts `buf` in place and returns the authentication tag
    /// (`tag_len` ∈ 4..=16).
    ///
    /// `iv` may be any non-empty length; 12 bytes is the standard fast
    /// path. A (key, iv) pair must never be reused across messages — that
    /// is the caller's responsibility and is not detectable here.
    pub fn seal(
        &self,
        iv: &[u8],
        aad: &[u8],
        buf: &mut [u8],
        tag_len: usize,
    ) -> Result<Tag, Error> {
        if !(MIN_TAG_LEN..=MAX_TAG_LEN).contains(&tag_len) {
            return Err(Error::InvalidLength);
        }
        check_message_len(buf.len())?;
        let j0 = self.j0(iv)?;
        self.gctr(&j0, buf);
        let tag = self.compute_tag(&j0, aad, buf);
        Ok(Tag::new(tag, tag_len))
    }

    /// Verifies `tag` over `buf` (ciphertext) and `aad`, then decrypts
    /// `buf` in place.
    ///
    /// The expected tag is recomputed from the received ciphertext before
    /// any decryption happens and compared in constant time; on mismatch
    /// the buffer is zeroed and no plaintext is ever produced.
    pub fn open(&self, iv: &[u8], aad: &[u8], buf: &mut [u8], tag: &[u8]) -> Result<(), Error> {
        if !(MIN_TAG_LEN..=MAX_TAG_LEN).contains(&tag.len()) {
            return Err(Error::InvalidLength);
        }
        check_message_len(buf.len())?;
        let j0 = self.j0(iv)?;
        let expected = self.compute_tag(&j0, aad, buf);
        if !ct_eq(tag, &expected[..tag.len()]) {
            for byte in buf.iter_mut() {
                *byte = 0;
            }
            return Err(Error::AuthFailure);
        }
        self.gctr(&j0, buf);
        Ok(())
    }

    /// Derives the pre-counter block from the IV: `iv ‖ 0^31 ‖ 1` for the
    /// 12-byte fast path, GHASH with the length block appended otherwise.
    fn j0(&self, iv: &[u8]) -> Result<Block, Error> {
        if iv.is_empty() {
            return Err(Error::InvalidLength);
        }
        if iv.len() == 12 {
            let mut j0 = [0u8; BLOCK_SIZE];
            j0[..12].copy_from_slice(iv);
            j0[15] = 1;
            Ok(j0)
        } else {
            let mut g = self.ghash.clone();
            g.update(iv);
            Ok(g.finalize(0, (iv.len() as u64) * 8))
        }
    }

    /// CTR layer: keystream from `inc32(j0)` onwards, low 32 bits
    /// incremented big-endian per SP 800-38D.
    fn gctr(&self, j0: &Block, buf: &mut [u8]) {
        let mut counter = *j0;
        inc32(&mut counter);

        let mut data: &mut [u8] = buf;
        let mut ks = [[0u8; BLOCK_SIZE]; PAR_BLOCKS];
        while !data.is_empty() {
            let blocks = ((data.len() + BLOCK_SIZE - 1) / BLOCK_SIZE).min(PAR_BLOCKS);
            for block in ks[..blocks].iter_mut() {
                *block = counter;
                inc32(&mut counter);
            }
            self.cipher.encrypt_blocks(&mut ks[..blocks]);

            let take = (blocks * BLOCK_SIZE).min(data.len());
            let (head, rest) = data.split_at_mut(take);
            for (chunk, block) in head.chunks_mut(BLOCK_SIZE).zip(ks.iter()) {
                xor_in_place(chunk, &block[..chunk.len()]);
            }
            data = rest;
        }
    }

    fn compute_tag(&self, j0: &Block, aad: &[u8], ciphertext: &[u8]) -> [u8; BLOCK_SIZE] {
        let mut g = self.ghash.clone();
        g.update(aad);
        g.update(ciphertext);
        let mut s = g.finalize((aad.len() as u64) * 8, (ciphertext.len() as u64) * 8);

        let mut ek = *j0;
        self.cipher.encrypt_block(&mut ek);
        xor_in_place(&mut s, &ek);
        s
    }
}

impl core::fmt::Debug for Gcm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Gcm { .. }")
    }
}

/// The 32-bit counter in the low four bytes must not wrap within one
/// message.
fn check_message_len(len: usize) -> Result<(), Error> {
    if len as u64 > (u64::from(u32::MAX) - 2) * BLOCK_SIZE as u64 {
        return Err(Error::InvalidLength);
    }
    Ok(())
}

/// Increments the low 32 bits of the counter block, big-endian.
#[inline]
fn inc32(counter: &mut Block) {
    let mut word = u32::from_be_bytes([counter[12], counter[13], counter[14], counter[15]]);
    word = word.wrapping_add(1);
    counter[12..].copy_from_slice(&word.to_be_bytes());
}
