//! Unauthenticated AES modes of operation built on [`aes_core`]: CBC,
//! streaming CTR, XTS with ciphertext stealing, and RFC 3394 key wrap.
//!
//! # ⚠️ Security Warning: Hazmat!
//!
//! None of these modes authenticate the ciphertext (key wrap's integrity
//! constant detects accidental corruption, not a substitute for an AEAD).
//! For authenticated encryption use the `aes-aead` crate.
//!
//! Contexts mutate their IV/counter state in place and must be driven
//! sequentially; distinct contexts are independent and may run on
//! different threads freely.
//!
//! # Example
//! ```
//! use block_modes::Ctr;
//!
//! let key = [0u8; 16];
//! let iv = [1u8; 16];
//! let mut msg = *b"streaming counter mode";
//!
//! let mut ctr = Ctr::new(&key, &iv).unwrap();
//! ctr.apply_keystream(&mut msg);
//!
//! let mut ctr = Ctr::new(&key, &iv).unwrap();
//! ctr.apply_keystream(&mut msg);
//! assert_eq!(&msg, b"streaming counter mode");
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod cbc;
mod ctr;
mod errors;
pub mod kw;
mod xts;

pub use cbc::{CbcDec, CbcEnc};
pub use ctr::Ctr;
pub use errors::Error;
pub use xts::{tweak_from_sector, Xts};

pub use aes_core::{Block, BLOCK_SIZE};
