//! Counter with CBC-MAC (NIST SP 800-38C / RFC 3610).
//!
//! Authentication is a CBC chain over the format block B0, the
//! length-prefixed associated data and the message; encryption is a
//! counter keystream whose blocks mirror B0's length-field layout with
//! the flags byte reduced to L−1. Independent of GCM and GHASH.

use aes_core::{ct_eq, xor_in_place, AesEnc, Block, BLOCK_SIZE};

use crate::errors::Error;
use crate::tag::{Tag, MAX_TAG_LEN, MIN_TAG_LEN};

/// Counter blocks generated per cipher dispatch.
const PAR_BLOCKS: usize = 8;

/// CCM key context.
pub struct Ccm {
    cipher: AesEnc,
}

impl Ccm {
    /// Expands `key` (16/24/32 bytes).
    pub fn new(key: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            cipher: AesEnc::new(key)?,
        })
    }

    /// Encrypts `buf` in place and returns the authentication tag.
    ///
    /// `nonce` must be 7–13 bytes; the implied length field is
    /// L = 15 − nonce length, and the message must fit in L bytes.
    /// `tag_len` must be an even value in 4..=16. A (key, nonce) pair must
    /// never be reused.
    pub fn seal(
        &self,
        nonce: &[u8],
        aad: &[u8],
        buf: &mut [u8],
        tag_len: usize,
    ) -> Result<Tag, Error> {
        validate(nonce, aad, tag_len, buf.len())?;
        let l = 15 - nonce.len();

        let mac = self.cbc_mac(nonce, aad, buf, tag_len, l);
        self.ctr_crypt(nonce, l, buf);

        let mut tag = mac;
        xor_in_place(&mut tag, &self.s0(nonce, l));
        Ok(Tag::new(tag, tag_len))
    }

    /// Decrypts `buf` in place and verifies `tag`.
    ///
    /// The MAC is recomputed over the decrypted message and compared in
    /// constant time; on mismatch the buffer is zeroed before the error
    /// returns, so unauthenticated plaintext never escapes.
    pub fn open(&self, nonce: &[u8], aad: &[u8], buf: &mut [u8], tag: &[u8]) -> Result<(), Error> {
        validate(nonce, aad, tag.len(), buf.len())?;
        let l = 15 - nonce.len();

        self.ctr_crypt(nonce, l, buf);
        let mac = self.cbc_mac(nonce, aad, buf, tag.len(), l);

        let mut expected = mac;
        xor_in_place(&mut expected, &self.s0(nonce, l));
        if !ct_eq(tag, &expected[..tag.len()]) {
            for byte in buf.iter_mut() {
                *byte = 0;
            }
            return Err(Error::AuthFailure);
        }
        Ok(())
    }

    /// CBC-MAC over B0, the length-prefixed associated data, then the
    /// message, each region zero-padded to the block boundary.
    fn cbc_mac(&self, nonce: &[u8], aad: &[u8], msg: &[u8], tag_len: usize, l: usize) -> Block {
        let mut b0 = [0u8; BLOCK_SIZE];
        let mut flags = ((l - 1) as u8) | ((((tag_len - 2) / 2) as u8) << 3);
        if !aad.is_empty() {
            flags |= 0x40;
        }
        b0[0] = flags;
        b0[1..1 + nonce.len()].copy_from_slice(nonce);
        let len_bytes = (msg.len() as u64).to_be_bytes();
        b0[BLOCK_SIZE - l..].copy_from_slice(&len_bytes[8 - l..]);

        let mut x = b0;
        self.cipher.encrypt_block(&mut x);

        if !aad.is_empty() {
            let mut prefix = [0u8; 6];
            let prefix_len = if aad.len() < 0xff00 {
                prefix[..2].copy_from_slice(&(aad.len() as u16).to_be_bytes());
                2
            } else {
                prefix[0] = 0xff;
                prefix[1] = 0xfe;
                prefix[2..6].copy_from_slice(&(aad.len() as u32).to_be_bytes());
                6
            };
            self.mac_region(&mut x, &prefix[..prefix_len], aad);
        }
        self.mac_region(&mut x, &[], msg);
        x
    }

    /// Chains one zero-padded region (a virtual `head ‖ tail`
    /// concatenation) into the MAC state.
    fn mac_region(&self, x: &mut Block, head: &[u8], tail: &[u8]) {
        let total = head.len() + tail.len();
        let mut off = 0;
        while off < total {
            let mut block = [0u8; BLOCK_SIZE];
            for (i, byte) in block.iter_mut().enumerate() {
                let pos = off + i;
                if pos >= total {
                    break;
                }
                *byte = if pos < head.len() {
                    head[pos]
                } else {
                    tail[pos - head.len()]
                };
            }
            xor_in_place(x, &block);
            self.cipher.encrypt_block(x);
            off += BLOCK_SIZE;
        }
    }

    /// Counter block A_i: flags byte L−1, nonce, block index in the last
    /// L bytes.
    fn a_block(nonce: &[u8], l: usize, i: u64) -> Block {
        let mut a = [0u8; BLOCK_SIZE];
        a[0] = (l - 1) as u8;
        a[1..1 + nonce.len()].copy_from_slice(nonce);
        let idx = i.to_be_bytes();
        a[BLOCK_SIZE - l..].copy_from_slice(&idx[8 - l..]);
        a
    }

    /// E_K(A_0), the block that masks the MAC into the tag.
    fn s0(&self, nonce: &[u8], l: usize) -> Block {
        let mut s0 = Self::a_block(nonce, l, 0);
        self.cipher.encrypt_block(&mut s0);
        s0
    }

    /// Counter keystream over the message, starting at A_1.
    fn ctr_crypt(&self, nonce: &[u8], l: usize, buf: &mut [u8]) {
        let mut index = 1u64;
        let mut data: &mut [u8] = buf;
        let mut ks = [[0u8; BLOCK_SIZE]; PAR_BLOCKS];
        while !data.is_empty() {
            let blocks = ((data.len() + BLOCK_SIZE - 1) / BLOCK_SIZE).min(PAR_BLOCKS);
            for block in ks[..blocks].iter_mut() {
                *block = Self::a_block(nonce, l, index);
                index += 1;
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
}

impl core::fmt::Debug for Ccm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Ccm { .. }")
    }
}

fn validate(nonce: &[u8], aad: &[u8], tag_len: usize, msg_len: usize) -> Result<(), Error> {
    if !(7..=13).contains(&nonce.len()) {
        return Err(Error::InvalidLength);
    }
    if !(MIN_TAG_LEN..=MAX_TAG_LEN).contains(&tag_len) || tag_len % 2 != 0 {
        return Err(Error::InvalidLength);
    }
    let l = 15 - nonce.len();
    // The message length must fit the L-byte length field.
    if l < 8 && (msg_len as u128) >= (1u128 << (8 * l)) {
        return Err(Error::InvalidLength);
    }
    // Associated data beyond the 0xFFFE-prefixed 32-bit encoding is
    // unreachable with in-memory slices on supported targets.
    if aad.len() as u128 > u128::from(u32::MAX) {
        return Err(Error::InvalidLength);
    }
    Ok(())
}
