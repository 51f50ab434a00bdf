//! Cipher Block Chaining (NIST SP 800-38A).

use aes_core::{xor_in_place, AesDec, AesEnc, Block, BLOCK_SIZE};

use crate::errors::Error;

/// CBC encryption context: cipher plus the running IV register.
pub struct CbcEnc {
    cipher: AesEnc,
    iv: Block,
}

impl CbcEnc {
    /// Builds a context from `key` (16/24/32 bytes) and the initial IV.
    pub fn new(key: &[u8], iv: &Block) -> Result<Self, Error> {
        Ok(Self {
            cipher: AesEnc::new(key)?,
            iv: *iv,
        })
    }

    /// Replaces the IV register, starting a new message.
    pub fn set_iv(&mut self, iv: &Block) {
        self.iv = *iv;
    }

    /// Encrypts `buf` in place.
    ///
    /// Only whole blocks are processed; trailing bytes short of a block
    /// are left untouched. Padding is the caller's concern.
    pub fn encrypt(&mut self, buf: &mut [u8]) {
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            xor_in_place(block, &self.iv);
            let block: &mut Block = block.try_into().expect("chunk is one block");
            self.cipher.encrypt_block(block);
            self.iv = *block;
        }
    }
}

/// CBC decryption context.
pub struct CbcDec {
    cipher: AesDec,
    iv: Block,
}

impl CbcDec {
    /// Builds a context from `key` (16/24/32 bytes) and the initial IV.
    pub fn new(key: &[u8], iv: &Block) -> Result<Self, Error> {
        Ok(Self {
            cipher: AesDec::new(key)?,
            iv: *iv,
        })
    }

    /// Replaces the IV register, starting a new message.
    pub fn set_iv(&mut self, iv: &Block) {
        self.iv = *iv;
    }

    /// Decrypts `buf` in place.
    ///
    /// Rejects inputs that are not a multiple of the block size. Each
    /// ciphertext block is saved before transforming so the buffer may
    /// have been produced in place by the encrypt side.
    pub fn decrypt(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        if buf.len() % BLOCK_SIZE != 0 {
            return Err(Error::InvalidLength);
        }
        for block in buf.chunks_exact_mut(BLOCK_SIZE) {
            let block: &mut Block = block.try_into().expect("chunk is one block");
            let saved = *block;
            self.cipher.decrypt_block(block);
            xor_in_place(block, &self.iv);
            self.iv = saved;
        }
        Ok(())
    }
}

impl core::fmt::Debug for CbcEnc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CbcEnc { .. }")
    }
}

impl core::fmt::Debug for CbcDec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("CbcDec { .. }")
    }
}

#[cfg(feature = "zeroize")]
impl Drop for CbcEnc {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.iv);
    }
}

#[cfg(feature = "zeroize")]
impl Drop for CbcDec {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.iv);
    }
}
