//! Ethereum account and transaction core.
//!
//! This crate provides:
//! - Keccak-256 hashing
//! - secp256k1 key generation and import, with EIP-55 checksummed addresses
//! - Recoverable ECDSA signing, public key recovery and plain verification
//! - Minimal ABI call data encoding and ERC-20 helpers
//! - Legacy transactions signed with EIP-155 replay protection
//! - Event log matching and fixed-width field decoding
//! - EVM network definitions and decimal unit conversion
//!
//! Nothing here performs I/O. Node access goes through [`client::NodeClient`].

pub mod abi;
pub mod address;
pub mod chains;
pub mod client;
pub mod erc20;
pub mod error;
pub mod hash;
pub mod hex_util;
pub mod keys;
pub mod logs;
pub mod signature;
pub mod transaction;
pub mod units;

mod rlp;

pub use address::Address;
pub use error::EthError;
pub use hash::{keccak256, Hash};
pub use keys::{PrivateKey, PublicKey};
pub use signature::Signature;
pub use transaction::{
    HashedTransaction, SignedTransaction, TransactionBuilder, UnsignedTransaction,
};
