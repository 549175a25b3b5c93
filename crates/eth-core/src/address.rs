use std::fmt;
use std::str::FromStr;

use alloy_rlp::{Encodable, RlpEncodable};

use crate::error::EthError;
use crate::hash::keccak256;
use crate::keys::PublicKey;
use crate::rlp::RlpAddress;

/// A 20-byte Ethereum account address.
///
/// Equality is byte-wise, so checksummed and lowercase spellings of the same
/// address compare equal once parsed. `Display` renders the EIP-55 form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, EthError> {
        let arr: [u8; 20] = bytes.try_into().map_err(|_| {
            EthError::InvalidAddress(format!("expected 20 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// `last20(keccak256(uncompressed_pubkey[1..]))`.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        Self::from_uncompressed_pubkey_unchecked(&public_key.to_uncompressed())
    }

    /// Derives the address from a 65-byte uncompressed key.
    ///
    /// The leading `0x04` marker is not part of the hashed input.
    pub fn from_uncompressed_pubkey(uncompressed_pubkey: &[u8; 65]) -> Result<Self, EthError> {
        if uncompressed_pubkey[0] != 0x04 {
            return Err(EthError::InvalidPublicKey(
                "uncompressed key must start with 0x04".into(),
            ));
        }
        Ok(Self::from_uncompressed_pubkey_unchecked(uncompressed_pubkey))
    }

    fn from_uncompressed_pubkey_unchecked(uncompressed_pubkey: &[u8; 65]) -> Self {
        let hash = keccak256(&uncompressed_pubkey[1..]);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Self(addr)
    }

    /// The address a contract-creation transaction from `self` with `nonce`
    /// deploys to: `last20(keccak256(rlp([sender, nonce])))`.
    pub fn create(&self, nonce: u64) -> Address {
        let fields = CreateFields {
            sender: RlpAddress::from(self),
            nonce,
        };
        let mut buf = Vec::with_capacity(fields.length());
        fields.encode(&mut buf);

        let hash = keccak256(&buf);
        let mut addr = [0u8; 20];
        addr.copy_from_slice(&hash[12..]);
        Self(addr)
    }

    /// EIP-55 mixed-case rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

#[derive(RlpEncodable)]
struct CreateFields {
    sender: RlpAddress,
    nonce: u64,
}

impl FromStr for Address {
    type Err = EthError;

    /// Accepts `0x` + 40 hex digits in any case. The checksum is not verified;
    /// use [`validate_address`] for that.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = parse_hex_part(s)?;
        let mut addr = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut addr)
            .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;
        Ok(Self(addr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// Derives the address of a public key.
pub fn derive_address(public_key: &PublicKey) -> Address {
    Address::from_public_key(public_key)
}

/// Derives the address a contract deployed by `sender` at `nonce` will live at.
pub fn contract_address(sender: &Address, nonce: u64) -> Address {
    sender.create(nonce)
}

fn parse_hex_part(address: &str) -> Result<&str, EthError> {
    let hex_part = crate::hex_util::strip_prefix(address)
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(hex_part)
}

/// Validates an Ethereum address string.
///
/// All-lowercase and all-uppercase forms carry no checksum and are accepted.
/// Mixed case must match the EIP-55 checksum.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let hex_part = parse_hex_part(address)?;

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    let parsed: Address = address.parse()?;
    Ok(parsed.to_checksum()[2..] == *hex_part)
}

/// Applies EIP-55 mixed-case checksum encoding to an address string.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    Ok(address.parse::<Address>()?.to_checksum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::PrivateKey;

    #[test]
    fn eip55_checksum_known_addresses() {
        let cases = [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ];

        for expected in &cases {
            let lower = format!("0x{}", expected[2..].to_lowercase());
            assert_eq!(&checksum_address(&lower).unwrap(), expected);
        }
    }

    #[test]
    fn checksum_and_lowercase_parse_equal() {
        let a: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let b: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        let c: Address = "0X5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn display_is_checksummed_fixed_length() {
        let addr: Address = "0x000000000000000000000000000000000000dead".parse().unwrap();
        let shown = addr.to_string();
        assert_eq!(shown.len(), 42);
        assert_eq!(shown.to_lowercase(), "0x000000000000000000000000000000000000dead");
        assert_eq!(format!("{addr:#x}"), "0x000000000000000000000000000000000000dead");
    }

    #[test]
    fn validate_valid_checksummed_address() {
        assert!(validate_address("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap());
    }

    #[test]
    fn validate_single_case_addresses() {
        assert!(validate_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap());
        assert!(validate_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED").unwrap());
    }

    #[test]
    fn validate_bad_checksum_returns_false() {
        assert!(!validate_address("0x5AAEB6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap());
    }

    #[test]
    fn parse_errors() {
        assert!("0x5aAeb6053F".parse::<Address>().is_err());
        assert!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
        assert!("0xGGGGb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
    }

    #[test]
    fn from_slice_checks_length() {
        assert!(Address::from_slice(&[1u8; 20]).is_ok());
        assert!(Address::from_slice(&[1u8; 32]).is_err());
    }

    #[test]
    fn pubkey_to_address_known_vector() {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;

        let key = PrivateKey::from_bytes(&privkey).unwrap();
        let address = derive_address(&key.public_key());
        assert_eq!(address.to_string(), "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
    }

    #[test]
    fn hashing_the_04_marker_gives_a_different_address() {
        let mut privkey = [0u8; 32];
        privkey[31] = 1;
        let public = PrivateKey::from_bytes(&privkey).unwrap().public_key();
        let uncompressed = public.to_uncompressed();

        let hash = keccak256(uncompressed);
        let wrong = Address::from_slice(&hash[12..]).unwrap();

        assert_ne!(wrong, derive_address(&public));
        assert_eq!(
            Address::from_uncompressed_pubkey(&uncompressed).unwrap(),
            derive_address(&public)
        );
    }

    #[test]
    fn invalid_uncompressed_prefix_errors() {
        let mut key = [0u8; 65];
        key[0] = 0x03;
        assert!(Address::from_uncompressed_pubkey(&key).is_err());
    }

    #[test]
    fn contract_address_known_vectors() {
        let sender: Address = "0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0".parse().unwrap();
        assert_eq!(
            format!("{:#x}", contract_address(&sender, 0)),
            "0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d"
        );
        assert_eq!(
            format!("{:#x}", contract_address(&sender, 1)),
            "0x343c43a37d37dff08ae8c4a11544c718abb4fcf8"
        );
    }
}
