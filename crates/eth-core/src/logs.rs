//! Matching and decoding of contract event logs.
//!
//! Logs arrive from a node; this module only inspects them. `topics[0]` of a
//! non-anonymous event is `keccak256` of its canonical signature, indexed
//! arguments occupy the remaining topics, and the rest is ABI-encoded in
//! `data`.

use alloy_primitives::U256;

use crate::abi::validate_signature_text;
use crate::address::Address;
use crate::error::EthError;
use crate::hash::{keccak256, Hash};

/// One event log as reported by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    /// Up to four topics; the first is the event signature hash when present.
    pub topics: Vec<Hash>,
    pub data: Vec<u8>,
    pub block_hash: Hash,
    pub block_number: u64,
    pub tx_hash: Hash,
    /// Position within the block, used to keep receipt order.
    pub log_index: u64,
}

/// Selects logs emitted by one contract for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFilter {
    pub address: Address,
    pub topic0: Hash,
}

impl LogFilter {
    pub fn new(address: Address, topic0: Hash) -> Self {
        Self { address, topic0 }
    }

    /// Filter for `event_signature` on `address`, validating the text first.
    pub fn for_event(address: Address, event_signature: &str) -> Result<Self, EthError> {
        Ok(Self::new(address, event_topic_hash_checked(event_signature)?))
    }

    pub fn matches(&self, log: &LogEntry) -> bool {
        matches_filter(log, &self.address, &self.topic0)
    }

    /// The matching logs, in the order they were given.
    pub fn select<'a>(
        &'a self,
        logs: impl IntoIterator<Item = &'a LogEntry> + 'a,
    ) -> impl Iterator<Item = &'a LogEntry> + 'a {
        logs.into_iter().filter(move |log| self.matches(log))
    }
}

/// `keccak256(signature)`. Same canonical-form rule as function selectors.
pub fn event_topic_hash(signature: &str) -> Hash {
    keccak256(signature.as_bytes())
}

/// [`event_topic_hash`] after checking the signature text is canonical.
pub fn event_topic_hash_checked(signature: &str) -> Result<Hash, EthError> {
    validate_signature_text(signature)?;
    Ok(event_topic_hash(signature))
}

/// True iff the log comes from `address` and its first topic is `topic_hash`.
pub fn matches_filter(log: &LogEntry, address: &Address, topic_hash: &Hash) -> bool {
    log.address == *address && log.topics.first() == Some(topic_hash)
}

/// Splits `data` into consecutive chunks of `field_sizes` bytes.
///
/// The sizes must cover `data` exactly.
pub fn decode_fixed_fields<'a>(
    data: &'a [u8],
    field_sizes: &[usize],
) -> Result<Vec<&'a [u8]>, EthError> {
    let expected = field_sizes
        .iter()
        .try_fold(0usize, |acc, &size| acc.checked_add(size))
        .ok_or(EthError::DataLengthMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;
    if expected != data.len() {
        return Err(EthError::DataLengthMismatch {
            expected,
            actual: data.len(),
        });
    }

    let mut fields = Vec::with_capacity(field_sizes.len());
    let mut rest = data;
    for &size in field_sizes {
        let (field, tail) = rest.split_at(size);
        fields.push(field);
        rest = tail;
    }
    Ok(fields)
}

/// Reads an indexed `address` topic: 12 zero bytes then the address.
pub fn topic_to_address(topic: &Hash) -> Result<Address, EthError> {
    if topic[..12].iter().any(|&b| b != 0) {
        return Err(EthError::InvalidAddress(
            "topic has non-zero bytes above the low 20".into(),
        ));
    }
    Address::from_slice(&topic[12..])
}

/// Reads a big-endian unsigned word of at most 32 bytes.
pub fn decode_uint(word: &[u8]) -> Result<U256, EthError> {
    U256::try_from_be_slice(word).ok_or_else(|| {
        EthError::ValueTooLarge(format!("{} bytes exceed a uint256", word.len()))
    })
}

/// Renders a `bytes32` string value: trailing NUL padding dropped, invalid
/// UTF-8 replaced.
pub fn bytes32_to_string(word: &[u8]) -> String {
    let end = word.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&word[..end]).into_owned()
}
