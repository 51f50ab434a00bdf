//! XTS tweakable mode for fixed-size sectors (IEEE P1619) with
//! ciphertext stealing.
//!
//! Two fully independent keys: the tweak key encrypts the sector value
//! once, after which the tweak advances algebraically (GF(2^128) doubling
//! with the 0x87 feedback) per block and never touches data directly.

use aes_core::{xor_in_place, AesDec, AesEnc, Block, BLOCK_SIZE};

use crate::errors::Error;

/// XTS context: data-key schedules for both directions plus the
/// tweak-encryption schedule.
pub struct Xts {
    enc: AesEnc,
    dec: AesDec,
    tweak_enc: AesEnc,
}

/// Builds the 16-byte tweak block for a sector number (little-endian, the
/// P1619 data-unit layout).
pub fn tweak_from_sector(sector: u64) -> Block {
    let mut tweak = [0u8; BLOCK_SIZE];
    tweak[..8].copy_from_slice(&sector.to_le_bytes());
    tweak
}

/// Advances the tweak by one block position: multiply by x over
/// GF(2^128), 0x87 into the low byte on overflow.
#[inline]
fn double_tweak(tweak: &mut Block) {
    let mut carry = 0u8;
    for byte in tweak.iter_mut() {
        let next = *byte >> 7;
        *byte = (*byte << 1) | carry;
        carry = next;
    }
    if carry != 0 {
        tweak[0] ^= 0x87;
    }
}

impl core::fmt::Debug for Xts {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Xts { .. }")
    }
}

impl Xts {
    /// Builds a context from independent data and tweak keys (each
    /// 16/24/32 bytes).
    pub fn new(data_key: &[u8], tweak_key: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            enc: AesEnc::new(data_key)?,
            dec: AesDec::new(data_key)?,
            tweak_enc: AesEnc::new(tweak_key)?,
        })
    }

    /// Encrypts one sector in place under `tweak`.
    ///
    /// Inputs shorter than one block are rejected; lengths that are not a
    /// multiple of the block size use ciphertext stealing, so the output
    /// occupies exactly the input length.
    pub fn encrypt_sector(&self, tweak: &Block, buf: &mut [u8]) -> Result<(), Error> {
        if buf.len() < BLOCK_SIZE {
            return Err(Error::InvalidLength);
        }
        let mut t = *tweak;
        self.tweak_enc.encrypt_block(&mut t);

        let full = buf.len() / BLOCK_SIZE;
        let tail = buf.len() % BLOCK_SIZE;
        let whole = if tail == 0 { full } else { full - 1 };

        for block in buf[..whole * BLOCK_SIZE].chunks_exact_mut(BLOCK_SIZE) {
            let block: &mut Block = block.try_into().expect("chunk is one block");
            xor_in_place(block, &t);
            self.enc.encrypt_block(block);
            xor_in_place(block, &t);
            double_tweak(&mut t);
        }

        if tail != 0 {
            // Ciphertext stealing: the last full block's ciphertext donates
            // its suffix to pad the partial block, and the two swap places.
            let last_off = whole * BLOCK_SIZE;
            let tail_off = last_off + BLOCK_SIZE;

            let mut cc: Block = buf[last_off..tail_off].try_into().expect("full block");
            xor_in_place(&mut cc, &t);
            self.enc.encrypt_block(&mut cc);
            xor_in_place(&mut cc, &t);
            double_tweak(&mut t);

            let mut pp = [0u8; BLOCK_SIZE];
            pp[..tail].copy_from_slice(&buf[tail_off..]);
            pp[tail..].copy_from_slice(&cc[tail..]);

            buf[tail_off..].copy_from_slice(&cc[..tail]);

            xor_in_place(&mut pp, &t);
            self.enc.encrypt_block(&mut pp);
            xor_in_place(&mut pp, &t);
            buf[last_off..tail_off].copy_from_slice(&pp);
        }
        Ok(())
    }

    /// Decrypts one sector in place under `tweak`.
    pub fn decrypt_sector(&self, tweak: &Block, buf: &mut [u8]) -> Result<(), Error> {
        if buf.len() < BLOCK_SIZE {
            return Err(Error::InvalidLength);
        }
        let mut t = *tweak;
        self.tweak_enc.encrypt_block(&mut t);

        let full = buf.len() / BLOCK_SIZE;
        let tail = buf.len() % BLOCK_SIZE;
        let whole = if tail == 0 { full } else { full - 1 };

        for block in buf[..whole * BLOCK_SIZE].chunks_exact_mut(BLOCK_SIZE) {
            let block: &mut Block = block.try_into().expect("chunk is one block");
            xor_in_place(block, &t);
            self.dec.decrypt_block(block);
            xor_in_place(block, &t);
            double_tweak(&mut t);
        }

        if tail != 0 {
            // Undo the stealing swap: the stolen position decrypts under
            // the tweak one step ahead of the donor block's tweak.
            let last_off = whole * BLOCK_SIZE;
            let tail_off = last_off + BLOCK_SIZE;

            let t_last = t;
            let mut t_next = t;
            double_tweak(&mut t_next);

            let mut pp: Block = buf[last_off..tail_off].try_into().expect("full block");
            xor_in_place(&mut pp, &t_next);
            self.dec.decrypt_block(&mut pp);
            xor_in_place(&mut pp, &t_next);

            let mut cc = [0u8; BLOCK_SIZE];
            cc[..tail].copy_from_slice(&buf[tail_off..]);
            cc[tail..].copy_from_slice(&pp[tail..]);

            buf[tail_off..].copy_from_slice(&pp[..tail]);

            xor_in_place(&mut cc, &t_last);
            self.dec.decrypt_block(&mut cc);
            xor_in_place(&mut cc, &t_last);
            buf[last_off..tail_off].copy_from_slice(&cc);
        }
        Ok(())
    }
}
