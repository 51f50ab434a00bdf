//! Error types.
use core::fmt;
#[cfg(feature = "std")]
use std::error;

/// Failure modes of the authenticated modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Key length was not 16, 24 or 32 bytes.
    InvalidKeyLength,
    /// Nonce length, tag length or message length outside the mode's
    /// allowed range.
    InvalidLength,
    /// Tag verification failed; the buffer has been zeroed and no
    /// plaintext was released.
    AuthFailure,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKeyLength => f.write_str("invalid AES key length"),
            Error::InvalidLength => f.write_str("argument length not valid for this mode"),
            Error::AuthFailure => f.write_str("authentication tag mismatch"),
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
