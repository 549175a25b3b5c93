//! Keccak-256, the pre-NIST SHA-3 variant Ethereum hashes everything with.

use sha3::{Digest, Keccak256};

use crate::error::EthError;
use crate::hex_util;

/// A 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// `keccak256("")`.
pub const KECCAK_EMPTY: Hash = [
    0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7, 0x03, 0xc0,
    0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04, 0x5d, 0x85, 0xa4, 0x70,
];

/// Hashes `data` with Keccak-256.
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash {
    Keccak256::digest(data.as_ref()).into()
}

/// Copies a byte slice into a [`Hash`], rejecting anything but 32 bytes.
pub fn hash_from_slice(bytes: &[u8]) -> Result<Hash, EthError> {
    bytes
        .try_into()
        .map_err(|_| EthError::InvalidHashLength(bytes.len()))
}

/// Parses a 64-digit hex hash, `0x` prefix optional.
pub fn parse_hash(s: &str) -> Result<Hash, EthError> {
    hex_util::decode_fixed::<32>(s)
}

/// Renders a hash as `0x`-prefixed lowercase hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    hex_util::encode_prefixed(hash)
}
