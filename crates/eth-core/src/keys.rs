//! secp256k1 key material: random generation, hex import/export, and public
//! key derivation.

use std::fmt;

use crypto_utils::random::random_bytes_fixed;
use crypto_utils::CryptoError;
use crypto_utils::zeroizing::{ZeroizingArray, ZeroizingString};
use k256::ecdsa::{SigningKey, VerifyingKey};
use zeroize::Zeroize;

use crate::address::Address;
use crate::error::EthError;
use crate::hex_util;

/// Draws beyond this many out-of-range scalars mean the RNG is broken.
const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// A secp256k1 private scalar in `[1, n - 1]`.
///
/// The wrapped `SigningKey` zeroes itself on drop. `Debug` never prints the
/// scalar.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Generates a fresh key from the OS entropy source.
    pub fn generate() -> Result<Self, EthError> {
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let mut candidate = random_bytes_fixed::<32>()?;
            let parsed = SigningKey::from_bytes((&candidate).into());
            candidate.zeroize();
            if let Ok(key) = parsed {
                return Ok(Self(key));
            }
        }
        Err(EthError::Entropy(CryptoError::EntropyUnavailable(
            "random source produced no valid scalar".into(),
        )))
    }

    /// Imports a raw 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EthError> {
        if bytes.len() != 32 {
            return Err(EthError::InvalidKeyFormat(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        SigningKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| EthError::InvalidKeyFormat("scalar out of range [1, n-1]".into()))
    }

    /// Imports a key from 64 hex digits, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, EthError> {
        let mut bytes = hex_util::decode_fixed::<32>(s)
            .map_err(|e| EthError::InvalidKeyFormat(e.to_string()))?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(*self.0.verifying_key())
    }

    pub fn address(&self) -> Address {
        self.public_key().address()
    }

    /// Exports the raw scalar. The returned buffer is zeroed on drop.
    pub fn to_bytes(&self) -> ZeroizingArray<32> {
        ZeroizingArray::new(self.0.to_bytes().into())
    }

    /// Exports the scalar as 64 lowercase hex digits without a prefix.
    pub fn to_hex(&self) -> ZeroizingString {
        ZeroizingString::hex_encode(&self.to_bytes())
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// A secp256k1 curve point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parses a SEC1 encoding: 33-byte compressed or 65-byte uncompressed.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, EthError> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(EthError::InvalidPublicKey(format!(
                "expected 33 or 65 bytes, got {}",
                bytes.len()
            )));
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| EthError::InvalidPublicKey("point is not on the secp256k1 curve".into()))
    }

    /// `0x04 || X || Y`.
    pub fn to_uncompressed(&self) -> [u8; 65] {
        let point = self.0.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// `0x02|0x03 || X`.
    pub fn to_compressed(&self) -> [u8; 33] {
        let point = self.0.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub fn to_uncompressed_hex(&self) -> String {
        hex_util::encode_prefixed(self.to_uncompressed())
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(self)
    }

    pub(crate) fn from_verifying_key(key: VerifyingKey) -> Self {
        Self(key)
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }
}

/// Generates a random private key.
pub fn generate_key() -> Result<PrivateKey, EthError> {
    PrivateKey::generate()
}

/// Multiplies the curve generator by the private scalar.
pub fn derive_public_key(key: &PrivateKey) -> PublicKey {
    key.public_key()
}

/// Imports a private key from hex.
pub fn import_private_key(s: &str) -> Result<PrivateKey, EthError> {
    PrivateKey::from_hex(s)
}
