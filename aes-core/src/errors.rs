//! Error types.
use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// The key passed to [`AesEnc::new`](crate::AesEnc::new) or
/// [`AesDec::new`](crate::AesDec::new) was not 16, 24 or 32 bytes long.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InvalidKeyLength;

impl fmt::Display for InvalidKeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid AES key length (expected 16, 24 or 32 bytes)")
    }
}

#[cfg(feature = "std")]
impl error::Error for InvalidKeyLength {}
