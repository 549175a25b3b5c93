use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A fixed-size byte array that is zeroed when dropped.
///
/// Holds raw private key scalars on their way out of a signing key.
#[derive(Clone)]
pub struct ZeroizingArray<const N: usize>([u8; N]);

impl<const N: usize> ZeroizingArray<N> {
    pub fn new(data: [u8; N]) -> Self {
        Self(data)
    }

    /// Borrows the inner array.
    pub fn as_array(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> Deref for ZeroizingArray<N> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> From<[u8; N]> for ZeroizingArray<N> {
    fn from(data: [u8; N]) -> Self {
        Self::new(data)
    }
}

impl<const N: usize> Zeroize for ZeroizingArray<N> {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl<const N: usize> Drop for ZeroizingArray<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for ZeroizingArray<N> {}

impl<const N: usize> fmt::Debug for ZeroizingArray<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZeroizingArray<{N}>(<redacted>)")
    }
}

/// A `String` wrapper that is zeroed when dropped.
///
/// Used for exported key material such as a private key rendered as hex.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ZeroizingString(String);

impl ZeroizingString {
    pub fn new(data: String) -> Self {
        Self(data)
    }

    /// Lowercase hex encoding of `bytes`, without a `0x` prefix.
    pub fn hex_encode(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Deref for ZeroizingString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<String> for ZeroizingString {
    fn from(data: String) -> Self {
        Self::new(data)
    }
}

impl fmt::Debug for ZeroizingString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ZeroizingString(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroizing_array_deref() {
        let arr = ZeroizingArray::new([1u8, 2, 3, 4]);
        assert_eq!(&*arr, &[1, 2, 3, 4]);
        assert_eq!(arr.as_array(), &[1, 2, 3, 4]);
    }

    #[test]
    fn zeroizing_array_manual_zeroize() {
        let mut arr: ZeroizingArray<32> = [0xAA; 32].into();
        arr.zeroize();
        assert_eq!(arr.as_array(), &[0u8; 32]);
    }

    #[test]
    fn zeroizing_array_debug_is_redacted() {
        let arr = ZeroizingArray::new([0x42u8; 32]);
        let debug = format!("{arr:?}");
        assert!(!debug.contains("42"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn zeroizing_string_hex_encode() {
        let zs = ZeroizingString::hex_encode(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(&*zs, "deadbeef");
        assert_eq!(zs.len(), 8);
    }

    #[test]
    fn zeroizing_string_manual_zeroize() {
        let mut zs: ZeroizingString = String::from("sensitive").into();
        zs.zeroize();
        assert!(zs.is_empty());
    }

    #[test]
    fn zeroizing_string_debug_is_redacted() {
        let zs = ZeroizingString::new("fad9c885".into());
        assert!(!format!("{zs:?}").contains("fad9"));
    }
}
