//! # crypto-utils
//!
//! Secure random generation and zeroize-on-drop containers for key material.

pub mod error;
pub mod random;
pub mod zeroizing;

pub use error::CryptoError;
