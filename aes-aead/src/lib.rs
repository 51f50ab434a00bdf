//! AES authenticated encryption: GCM (NIST SP 800-38D) and CCM
//! (SP 800-38C / RFC 3610).
//!
//! Both modes work on in-place buffers, produce truncatable 4–16 byte
//! tags, verify in constant time and zero the buffer on authentication
//! failure — unauthenticated plaintext is never released.
//!
//! The underlying block cipher and GHASH bind their accelerated or
//! portable backends once per process; see the `aes-core` and `ghash`
//! crates.
//!
//! # Example
//! ```
//! use aes_aead::Gcm;
//!
//! let gcm = Gcm::new(&[0u8; 16]).unwrap();
//! let mut msg = *b"hello world";
//! let tag = gcm.seal(&[0u8; 12], b"header", &mut msg, 16).unwrap();
//!
//! gcm.open(&[0u8; 12], b"header", &mut msg, tag.as_ref()).unwrap();
//! assert_eq!(&msg, b"hello world");
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod ccm;
mod errors;
mod gcm;
mod tag;

pub use ccm::Ccm;
pub use errors::Error;
pub use gcm::Gcm;
pub use tag::{Tag, MAX_TAG_LEN, MIN_TAG_LEN};
