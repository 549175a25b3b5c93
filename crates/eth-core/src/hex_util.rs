//! `0x`-prefixed hex helpers shared by keys, addresses, hashes and signatures.

use crate::error::EthError;

/// Strips a leading `0x` or `0X`, returning `None` if neither is present.
pub fn strip_prefix(s: &str) -> Option<&str> {
    s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
}

/// Encodes bytes as lowercase hex with a `0x` prefix.
pub fn encode_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes `0x`-prefixed hex of any even length. Digits are case-insensitive.
pub fn decode_prefixed(s: &str) -> Result<Vec<u8>, EthError> {
    let digits = strip_prefix(s)
        .ok_or_else(|| EthError::InvalidHex("missing 0x prefix".into()))?;
    hex::decode(digits).map_err(|e| EthError::InvalidHex(e.to_string()))
}

/// Decodes exactly `N` bytes of hex, with or without a `0x` prefix.
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], EthError> {
    let digits = strip_prefix(s).unwrap_or(s);
    if digits.len() != N * 2 {
        return Err(EthError::InvalidHex(format!(
            "expected {} hex characters, got {}",
            N * 2,
            digits.len()
        )));
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| EthError::InvalidHex(e.to_string()))?;
    Ok(out)
}
