//! Minimal ABI encoding for EVM function calls.
//!
//! Covers the static word types contract calls and ERC-20 transfers need:
//! addresses and unsigned integers left-padded to 32 bytes, and `bytes32`
//! values right-padded. There is no ABI JSON parsing and no dynamic types.

use alloy_primitives::{I256, U256};

use crate::address::Address;
use crate::error::EthError;
use crate::hash::keccak256;

/// One 32-byte ABI word.
pub type Word = [u8; 32];

/// A single ABI-encoded parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiParam {
    /// A 20-byte address, left-padded to 32 bytes.
    Address(Address),
    /// A `uint256`, big-endian.
    Uint(U256),
    /// A `bytes32` value, already a full word.
    FixedBytes(Word),
}

impl AbiParam {
    pub fn encode(&self) -> Word {
        match self {
            AbiParam::Address(addr) => encode_address_arg(addr),
            AbiParam::Uint(value) => encode_uint_arg(*value),
            AbiParam::FixedBytes(word) => *word,
        }
    }
}

/// First four bytes of `keccak256(signature)`.
///
/// `signature` must already be canonical, `name(type1,type2)` with no spaces
/// or argument names. This function does not check; a malformed text such as
/// `transfer(address,uint256` silently yields an unrelated selector. Use
/// [`function_selector_checked`] when the text is not a compile-time constant.
pub fn function_selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// [`function_selector`] after [`validate_signature_text`].
pub fn function_selector_checked(signature: &str) -> Result<[u8; 4], EthError> {
    validate_signature_text(signature)?;
    Ok(function_selector(signature))
}

/// Checks the canonical `name(type,type,...)` shape.
///
/// The name must be an identifier, the text must end in the one closing
/// parenthesis that matches the opening one, and no whitespace or empty type
/// slots may appear. Type names themselves are not checked against the ABI
/// grammar.
pub fn validate_signature_text(signature: &str) -> Result<(), EthError> {
    let invalid = |reason: &str| EthError::InvalidAbiSignature(format!("{signature:?}: {reason}"));

    if signature.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    let open = signature
        .find('(')
        .ok_or_else(|| invalid("missing opening parenthesis"))?;
    let name = &signature[..open];
    let mut name_chars = name.chars();
    match name_chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return Err(invalid("name must start with a letter, '_' or '$'")),
    }
    if !name_chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(invalid("name is not an identifier"));
    }
    if !signature.ends_with(')') {
        return Err(invalid("missing closing parenthesis"));
    }

    let args = &signature[open + 1..signature.len() - 1];
    let mut depth = 0i32;
    for c in args.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(invalid("unbalanced parentheses"));
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(invalid("unbalanced parentheses"));
    }
    if !args.is_empty() && args.split(',').any(str::is_empty) {
        return Err(invalid("empty argument type"));
    }
    Ok(())
}

/// Left-pads `value` with zero bytes to a 32-byte word.
pub fn pad_left_32(value: &[u8]) -> Result<Word, EthError> {
    if value.len() > 32 {
        return Err(EthError::ValueTooLarge(format!(
            "{} bytes do not fit in a 32-byte word",
            value.len()
        )));
    }
    let mut word = [0u8; 32];
    word[32 - value.len()..].copy_from_slice(value);
    Ok(word)
}

/// Right-pads `value` with zero bytes to a 32-byte word, as `bytes32`
/// arguments are laid out.
pub fn pad_right_32(value: &[u8]) -> Result<Word, EthError> {
    if value.len() > 32 {
        return Err(EthError::ValueTooLarge(format!(
            "{} bytes do not fit in a 32-byte word",
            value.len()
        )));
    }
    let mut word = [0u8; 32];
    word[..value.len()].copy_from_slice(value);
    Ok(word)
}

/// 12 zero bytes followed by the 20 address bytes.
pub fn encode_address_arg(address: &Address) -> Word {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Big-endian `uint256` word.
pub fn encode_uint_arg(value: U256) -> Word {
    value.to_be_bytes::<32>()
}

/// Encodes a signed integer into a `uint256` slot, refusing negatives.
pub fn encode_int_as_uint_arg(value: I256) -> Result<Word, EthError> {
    if value.is_negative() {
        return Err(EthError::NegativeValue(value.to_string()));
    }
    Ok(encode_uint_arg(value.into_raw()))
}

/// `selector || args[0] || args[1] || ...`.
pub fn build_call_data(selector: [u8; 4], args: &[Word]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * 32);
    data.extend_from_slice(&selector);
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

/// Encodes a call from a selector and typed parameters.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let words: Vec<Word> = params.iter().map(AbiParam::encode).collect();
    build_call_data(selector, &words)
}
