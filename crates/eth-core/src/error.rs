use crypto_utils::CryptoError;
use thiserror::Error;

/// Errors raised by key handling, signing, encoding and log decoding.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("key generation failed: {0}")]
    Entropy(#[from] CryptoError),

    #[error("invalid private key: {0}")]
    InvalidKeyFormat(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid hash length: expected 32 bytes, got {0}")]
    InvalidHashLength(usize),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid abi signature text: {0}")]
    InvalidAbiSignature(String),

    #[error("value too large: {0}")]
    ValueTooLarge(String),

    #[error("negative value: {0}")]
    NegativeValue(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("incomplete transaction: missing {0}")]
    IncompleteTransaction(&'static str),

    #[error("missing chain id: transactions must be signed for a specific chain")]
    MissingChainId,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("data length mismatch: fields cover {expected} bytes, data has {actual}")]
    DataLengthMismatch { expected: usize, actual: usize },

    #[error("node client error: {0}")]
    Collaborator(String),
}
