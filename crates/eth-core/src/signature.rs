//! ECDSA over secp256k1: signing a 32-byte hash, recovering the signer, and
//! plain `(r, s)` verification against a known public key.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, VerifyingKey};

use crate::address::Address;
use crate::error::EthError;
use crate::hash::{hash_from_slice, Hash};
use crate::hex_util;
use crate::keys::{PrivateKey, PublicKey};

/// A recoverable signature: `r || s || recovery_id` with `recovery_id` in
/// `{0, 1}`.
///
/// Transaction signatures carry a chain-adjusted `v` instead; see
/// [`crate::transaction::SignedTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl Signature {
    /// Parses the 65-byte `r || s || recovery_id` layout.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EthError> {
        if bytes.len() != 65 {
            return Err(EthError::InvalidSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self {
            r,
            s,
            recovery_id: bytes[64],
        })
    }

    pub fn from_hex(s: &str) -> Result<Self, EthError> {
        Self::from_bytes(&hex_util::decode_prefixed(s)?)
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.recovery_id;
        out
    }

    /// The 64-byte `r || s` form without a recovery id.
    pub fn to_rs_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s);
        out
    }

    pub fn to_hex(&self) -> String {
        hex_util::encode_prefixed(self.to_bytes())
    }
}

/// Signs a 32-byte hash with RFC 6979 deterministic nonces.
///
/// The produced `s` is always in the lower half of the curve order.
pub fn sign(hash: &[u8], key: &PrivateKey) -> Result<Signature, EthError> {
    let hash = hash_from_slice(hash)?;

    let (signature, recovery_id): (K256Signature, RecoveryId) = key
        .signing_key()
        .sign_prehash(&hash)
        .map_err(|e| EthError::SigningFailed(e.to_string()))?;

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature.r().to_bytes());
    s.copy_from_slice(&signature.s().to_bytes());

    Ok(Signature {
        r,
        s,
        recovery_id: recovery_id.is_y_odd() as u8,
    })
}

/// Recovers the public key that produced `signature` over `hash`.
pub fn recover_public_key(hash: &[u8], signature: &Signature) -> Result<PublicKey, EthError> {
    let hash = hash_from_slice(hash)?;
    if signature.recovery_id > 1 {
        return Err(EthError::InvalidSignature(format!(
            "recovery id {} out of range",
            signature.recovery_id
        )));
    }
    let sig = parse_canonical(&signature.to_rs_bytes())?;
    recover_with_id(&hash, &sig, signature.recovery_id)
}

/// Recovers the signer's address.
pub fn recover_address(hash: &[u8], signature: &Signature) -> Result<Address, EthError> {
    recover_public_key(hash, signature).map(|pk| pk.address())
}

/// Recovers every candidate public key for an `r || s` signature with no
/// recovery id, trying parity 0 then 1.
pub fn recover_candidates(hash: &[u8], rs: &[u8]) -> Result<Vec<PublicKey>, EthError> {
    let hash = hash_from_slice(hash)?;
    let sig = parse_canonical(rs)?;

    let candidates: Vec<PublicKey> = (0..=1)
        .filter_map(|id| recover_with_id(&hash, &sig, id).ok())
        .collect();

    if candidates.is_empty() {
        return Err(EthError::InvalidSignature(
            "no recovery id yields a valid public key".into(),
        ));
    }
    Ok(candidates)
}

/// Finds the recovery id under which `rs` recovers to `expected`, returning
/// the completed signature.
pub fn complete_signature(
    hash: &[u8],
    rs: &[u8],
    expected: &PublicKey,
) -> Result<Signature, EthError> {
    let hash = hash_from_slice(hash)?;
    let sig = parse_canonical(rs)?;

    for id in 0..=1u8 {
        if recover_with_id(&hash, &sig, id).is_ok_and(|pk| pk == *expected) {
            let mut r = [0u8; 32];
            let mut s = [0u8; 32];
            r.copy_from_slice(&rs[..32]);
            s.copy_from_slice(&rs[32..]);
            return Ok(Signature {
                r,
                s,
                recovery_id: id,
            });
        }
    }
    Err(EthError::InvalidSignature(
        "signature does not recover to the expected key under either parity".into(),
    ))
}

/// Checks a 64-byte `r || s` signature against an uncompressed (or compressed)
/// public key without using a recovery id.
///
/// Malformed keys or signatures, including high-`s` ones, verify as `false`.
pub fn verify(public_key: &[u8], hash: &[u8], signature: &[u8]) -> bool {
    if hash.len() != 32 || signature.len() != 64 {
        return false;
    }
    let Ok(key) = VerifyingKey::from_sec1_bytes(public_key) else {
        return false;
    };
    let Ok(sig) = parse_canonical(signature) else {
        return false;
    };
    key.verify_prehash(hash, &sig).is_ok()
}

/// Recovery-based check: does `signature` recover to `expected`?
pub fn verify_signer(
    hash: &[u8],
    signature: &Signature,
    expected: &PublicKey,
) -> Result<bool, EthError> {
    Ok(recover_public_key(hash, signature)? == *expected)
}

/// Parses `r || s`, rejecting zero or out-of-range scalars and high `s`.
fn parse_canonical(rs: &[u8]) -> Result<K256Signature, EthError> {
    if rs.len() != 64 {
        return Err(EthError::InvalidSignature(format!(
            "expected 64 bytes of r || s, got {}",
            rs.len()
        )));
    }
    let sig = K256Signature::from_slice(rs)
        .map_err(|_| EthError::InvalidSignature("r or s is zero or not below n".into()))?;
    if sig.normalize_s().is_some() {
        return Err(EthError::InvalidSignature("non-canonical high s".into()));
    }
    Ok(sig)
}

fn recover_with_id(hash: &Hash, sig: &K256Signature, id: u8) -> Result<PublicKey, EthError> {
    let recovery_id = RecoveryId::from_byte(id)
        .ok_or_else(|| EthError::InvalidSignature(format!("recovery id {id} out of range")))?;
    VerifyingKey::recover_from_prehash(hash, sig, recovery_id)
        .map(PublicKey::from_verifying_key)
        .map_err(|_| EthError::InvalidSignature("public key recovery failed".into()))
}
