//! Error types.
use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// Failure modes of the unauthenticated modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Key length was not 16, 24 or 32 bytes.
    InvalidKeyLength,
    /// Input length violated the mode's constraint (CBC decrypt not a
    /// multiple of the block size, XTS input shorter than one block, key
    /// wrap input not a multiple of 8 or below the minimum).
    InvalidLength,
    /// The caller-supplied output buffer is too small for the result.
    BufferTooSmall,
    /// Key unwrap recovered an accumulator that does not match the
    /// expected integrity constant; the output buffer has been zeroed.
    IntegrityCheckFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength => f.write_str("invalid AES key length"),
            Error::InvalidLength => f.write_str("input length not valid for this mode"),
            Error::BufferTooSmall => f.write_str("output buffer too small"),
            Error::IntegrityCheckFailed => f.write_str("key unwrap integrity check failed"),
        }
    }
}

impl From<aes_core::InvalidKeyLength> for Error {
    fn from(_: aes_core::InvalidKeyLength) -> Self {
        Error::InvalidKeyLength
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}
