use alloy_primitives::U256;

use crate::abi::{encode_function_call, AbiParam};
use crate::address::Address;
use crate::error::EthError;
use crate::hash::Hash;
use crate::logs::{decode_fixed_fields, decode_uint, topic_to_address, LogEntry};

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Function selector for `approve(address,uint256)`: `0x095ea7b3`.
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// `keccak256("Transfer(address,address,uint256)")`.
pub const TRANSFER_EVENT_TOPIC: Hash = [
    0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68, 0xfc, 0x37, 0x8d, 0xaa,
    0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16, 0x28, 0xf5, 0x5a, 0x4d, 0xf5, 0x23, 0xb3, 0xef,
];

/// Encodes an ERC-20 `transfer(address,uint256)` call.
///
/// Returns the 68-byte calldata: selector, padded recipient, padded amount.
pub fn encode_transfer(to: &Address, amount: U256) -> Vec<u8> {
    let params = [AbiParam::Address(*to), AbiParam::Uint(amount)];
    encode_function_call(TRANSFER_SELECTOR, &params)
}

/// Encodes an ERC-20 `balanceOf(address)` call.
pub fn encode_balance_of(owner: &Address) -> Vec<u8> {
    encode_function_call(BALANCE_OF_SELECTOR, &[AbiParam::Address(*owner)])
}

/// Encodes an ERC-20 `approve(address,uint256)` call.
pub fn encode_approve(spender: &Address, amount: U256) -> Vec<u8> {
    let params = [AbiParam::Address(*spender), AbiParam::Uint(amount)];
    encode_function_call(APPROVE_SELECTOR, &params)
}

/// Decodes the single `uint256` returned by `balanceOf` and similar views.
pub fn decode_uint256(data: &[u8]) -> Result<U256, EthError> {
    let fields = decode_fixed_fields(data, &[32])?;
    decode_uint(fields[0])
}

/// A decoded `Transfer(address indexed from, address indexed to, uint256 value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

impl TransferEvent {
    /// Decodes `log` if it is an ERC-20 `Transfer`; `Ok(None)` for any other
    /// event.
    pub fn from_log(log: &LogEntry) -> Result<Option<Self>, EthError> {
        if log.topics.first() != Some(&TRANSFER_EVENT_TOPIC) {
            return Ok(None);
        }
        // ERC-721 shares the topic but indexes the token id (4 topics, no data).
        if log.topics.len() != 3 {
            return Ok(None);
        }

        Ok(Some(Self {
            token: log.address,
            from: topic_to_address(&log.topics[1])?,
            to: topic_to_address(&log.topics[2])?,
            value: decode_uint256(&log.data)?,
        }))
    }
}
