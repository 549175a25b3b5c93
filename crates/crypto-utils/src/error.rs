use thiserror::Error;

/// Errors from the low-level crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),
}
