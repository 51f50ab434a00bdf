//! RFC 3394 AES key wrap.
//!
//! Six passes over the 8-byte half-blocks; each step encrypts the
//! accumulator alongside one half-block and folds the round counter into
//! the accumulator's high half. Unwrap runs the schedule backwards and
//! checks the recovered accumulator against the integrity constant.

use aes_core::{ct_eq, AesDec, AesEnc, BLOCK_SIZE};

use crate::errors::Error;

/// Default integrity constant (RFC 3394 section 2.2.3.1).
pub const DEFAULT_IV: [u8; 8] = [0xa6; 8];

const SEMIBLOCK: usize = 8;

/// Wraps `data` (a multiple of 8 bytes, at least 16) under `kek`, writing
/// `data.len() + 8` bytes into `out`. Returns the number of bytes written.
///
/// `iv` overrides the default integrity constant; pass `None` for the
/// RFC 3394 value.
pub fn wrap(kek: &[u8], data: &[u8], iv: Option<&[u8; 8]>, out: &mut [u8]) -> Result<usize, Error> {
    if data.len() % SEMIBLOCK != 0 || data.len() < 2 * SEMIBLOCK {
        return Err(Error::InvalidLength);
    }
    let wrapped_len = data.len() + SEMIBLOCK;
    if out.len() < wrapped_len {
        return Err(Error::BufferTooSmall);
    }
    let cipher = AesEnc::new(kek)?;

    let n = data.len() / SEMIBLOCK;
    let mut a = *iv.unwrap_or(&DEFAULT_IV);
    out[SEMIBLOCK..wrapped_len].copy_from_slice(data);

    let mut block = [0u8; BLOCK_SIZE];
    for j in 0..6u64 {
        for i in 1..=n as u64 {
            let off = SEMIBLOCK * i as usize;
            block[..SEMIBLOCK].copy_from_slice(&a);
            block[SEMIBLOCK..].copy_from_slice(&out[off..off + SEMIBLOCK]);
            cipher.encrypt_block(&mut block);

            let counter = n as u64 * j + i;
            a.copy_from_slice(&block[..SEMIBLOCK]);
            for (byte, c) in a.iter_mut().zip(counter.to_be_bytes()) {
                *byte ^= c;
            }
            out[off..off + SEMIBLOCK].copy_from_slice(&block[SEMIBLOCK..]);
        }
    }
    out[..SEMIBLOCK].copy_from_slice(&a);
    Ok(wrapped_len)
}

/// Unwraps `data` (a multiple of 8 bytes, at least 24) under `kek`,
/// writing `data.len() - 8` bytes into `out`. Returns the number of bytes
/// written.
///
/// On an integrity mismatch the output buffer is zeroed and
/// [`Error::IntegrityCheckFailed`] is returned; no key material escapes.
pub fn unwrap(
    kek: &[u8],
    data: &[u8],
    iv: Option<&[u8; 8]>,
    out: &mut [u8],
) -> Result<usize, Error> {
    if data.len() % SEMIBLOCK != 0 || data.len() < 3 * SEMIBLOCK {
        return Err(Error::InvalidLength);
    }
    let unwrapped_len = data.len() - SEMIBLOCK;
    if out.len() < unwrapped_len {
        return Err(Error::BufferTooSmall);
    }
    let cipher = AesDec::new(kek)?;

    let n = unwrapped_len / SEMIBLOCK;
    let mut a: [u8; SEMIBLOCK] = data[..SEMIBLOCK].try_into().expect("8-byte slice");
    out[..unwrapped_len].copy_from_slice(&data[SEMIBLOCK..]);

    let mut block = [0u8; BLOCK_SIZE];
    for j in (0..6u64).rev() {
        for i in (1..=n as u64).rev() {
            let counter = n as u64 * j + i;
            for (byte, c) in a.iter_mut().zip(counter.to_be_bytes()) {
                *byte ^= c;
            }
            let off = SEMIBLOCK * (i as usize - 1);
            block[..SEMIBLOCK].copy_from_slice(&a);
            block[SEMIBLOCK..].copy_from_slice(&out[off..off + SEMIBLOCK]);
            cipher.decrypt_block(&mut block);

            a.copy_from_slice(&block[..SEMIBLOCK]);
            out[off..off + SEMIBLOCK].copy_from_slice(&block[SEMIBLOCK..]);
        }
    }

    let expected = iv.unwrap_or(&DEFAULT_IV);
    if !ct_eq(&a, expected) {
        for byte in out[..unwrapped_len].iter_mut() {
            *byte = 0;
        }
        return Err(Error::IntegrityCheckFailed);
    }
    Ok(unwrapped_len)
}
