//! Authentication tag value.

use core::fmt;

/// Shortest tag either AEAD will produce or accept.
pub const MIN_TAG_LEN: usize = 4;
/// Longest (untruncated) tag.
pub const MAX_TAG_LEN: usize = 16;

/// A 4–16 byte authentication tag.
///
/// Holds the truncated value produced by `seal`; compare received tags
/// with [`aes_core::ct_eq`] (the `open` operations do this internally).
#[derive(Copy, Clone)]
pub struct Tag {
    bytes: [u8; MAX_TAG_LEN],
    len: u8,
}

impl Tag {
    pub(crate) fn new(full: [u8; MAX_TAG_LEN], len: usize) -> Self {
        debug_assert!((MIN_TAG_LEN..=MAX_TAG_LEN).contains(&len));
        let mut bytes = [0u8; MAX_TAG_LEN];
        bytes[..len].copy_from_slice(&full[..len]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    /// Tag length in bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false; tags are at least [`MIN_TAG_LEN`] bytes.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tags are public values; printing them is fine.
        write!(f, "Tag(")?;
        for byte in self.as_ref() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        aes_core::ct_eq(self.as_ref(), other.as_ref())
    }
}

impl Eq for Tag {}
