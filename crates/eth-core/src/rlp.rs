//! `Encodable` wrappers for the fixed-width values that appear in legacy
//! transaction and contract-creation RLP lists.

use alloy_primitives::U256;
use alloy_rlp::{BufMut, Encodable};

use crate::address::Address;

/// A 20-byte address encoded as an RLP string.
#[derive(Debug, Clone)]
pub(crate) struct RlpAddress(pub(crate) [u8; 20]);

impl From<&Address> for RlpAddress {
    fn from(address: &Address) -> Self {
        Self(*address.as_bytes())
    }
}

impl Encodable for RlpAddress {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

/// The `to` field: an address, or the empty string for contract creation.
#[derive(Debug, Clone)]
pub(crate) struct RlpTo(pub(crate) Option<[u8; 20]>);

impl Encodable for RlpTo {
    fn encode(&self, out: &mut dyn BufMut) {
        match &self.0 {
            Some(addr) => addr.as_slice().encode(out),
            None => out.put_u8(alloy_rlp::EMPTY_STRING_CODE),
        }
    }

    fn length(&self) -> usize {
        match &self.0 {
            Some(addr) => addr.as_slice().length(),
            None => 1,
        }
    }
}

/// A 256-bit integer that encodes as minimal big-endian bytes with leading
/// zeros stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
pub(crate) struct RlpU256(pub(crate) [u8; 32]);

impl RlpU256 {
    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl From<[u8; 32]> for RlpU256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<U256> for RlpU256 {
    fn from(value: U256) -> Self {
        Self(value.to_be_bytes::<32>())
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}

/// Arbitrary bytes encoded as an RLP string (never as a list).
#[derive(Debug, Clone)]
pub(crate) struct RlpBytes(pub(crate) Vec<u8>);

impl Encodable for RlpBytes {
    fn encode(&self, out: &mut dyn BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}
