//! Error types for the token crate.

use thiserror::Error;

/// Errors that can occur during sealed token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Key material has the wrong length.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key material could not be decoded from text.
    #[error("key material is not valid hex or base64")]
    InvalidKeyEncoding,

    /// Token does not parse as the expected wire structure.
    #[error("malformed token: {0}")]
    Format(&'static str),

    /// Authentication tag verification failed. Carries no detail: the
    /// cipher reports none, and callers must not learn whether the key
    /// or the ciphertext was wrong.
    #[error("token failed authentication")]
    Integrity,

    /// Encryption failed while sealing claims.
    #[error("failed to seal claims")]
    Seal,

    /// Claims could not be serialized or deserialized.
    #[error("claims serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (reading/writing key files).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
