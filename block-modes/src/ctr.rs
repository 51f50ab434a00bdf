//! Counter mode with leftover-keystream continuation (NIST SP 800-38A).
//!
//! The counter is the full 16-byte register, incremented big-endian with
//! carry through every byte. Partial-block calls bank the unused keystream
//! suffix so a stream of arbitrary-length chunks produces the same output
//! as one contiguous call.

use aes_core::{xor_in_place, AesEnc, Block, BLOCK_SIZE};

use crate::errors::Error;

/// Keystream blocks generated per cipher dispatch; lines up with the
/// AES-NI parallel width.
const PAR_BLOCKS: usize = 8;

/// Streaming CTR context.
pub struct Ctr {
    cipher: AesEnc,
    counter: Block,
    leftover: Block,
    pos: Option<u8>,
}

impl Ctr {
    /// Builds a context from `key` (16/24/32 bytes) and the initial
    /// counter block.
    pub fn new(key: &[u8], iv: &Block) -> Result<Self, Error> {
        Ok(Self {
            cipher: AesEnc::new(key)?,
            counter: *iv,
            leftover: [0u8; BLOCK_SIZE],
            pos: None,
        })
    }

    /// Installs a new counter block and discards banked keystream.
    pub fn set_iv(&mut self, iv: &Block) {
        self.counter = *iv;
        self.leftover = [0u8; BLOCK_SIZE];
        self.pos = None;
    }

    /// Encrypts or decrypts `data` in place (the operations coincide).
    pub fn apply_keystream(&mut self, mut data: &mut [u8]) {
        // Leftover bytes from the previous partial call come first.
        if let Some(pos) = self.pos {
            let pos = pos as usize;
            let take = data.len().min(BLOCK_SIZE - pos);
            let (head, rest) = data.split_at_mut(take);
            xor_in_place(head, &self.leftover[pos..pos + take]);
            data = rest;
            self.pos = if pos + take == BLOCK_SIZE {
                None
            } else {
                Some((pos + take) as u8)
            };
            if data.is_empty() {
                return;
            }
        }

        // Bulk keystream, PAR_BLOCKS counters per dispatch.
        let mut ks = [[0u8; BLOCK_SIZE]; PAR_BLOCKS];
        while data.len() >= BLOCK_SIZE {
            let take = (data.len() / BLOCK_SIZE).min(PAR_BLOCKS);
            for block in ks[..take].iter_mut() {
                *block = self.counter;
                increment(&mut self.counter);
            }
            self.cipher.encrypt_blocks(&mut ks[..take]);
            let (head, rest) = data.split_at_mut(take * BLOCK_SIZE);
            for (chunk, block) in head.chunks_exact_mut(BLOCK_SIZE).zip(ks[..take].iter()) {
                xor_in_place(chunk, block);
            }
            data = rest;
        }

        // Final partial block: bank the unused keystream suffix.
        if !data.is_empty() {
            self.leftover = self.counter;
            increment(&mut self.counter);
            self.cipher.encrypt_block(&mut self.leftover);
            let n = data.len();
            xor_in_place(data, &self.leftover[..n]);
            self.pos = Some(n as u8);
        }
    }
}

impl core::fmt::Debug for Ctr {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Ctr { .. }")
    }
}

/// Big-endian increment with carry through all 16 bytes.
#[inline]
fn increment(counter: &mut Block) {
    for byte in counter.iter_mut().rev() {
        let (sum, carry) = byte.overflowing_add(1);
        *byte = sum;
        if !carry {
            break;
        }
    }
}

#[cfg(feature = "zeroize")]
impl Drop for Ctr {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.counter);
        zeroize::Zeroize::zeroize(&mut self.leftover);
    }
}
