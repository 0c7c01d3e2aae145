//! Sealing key management.

use crate::error::TokenError;
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use std::fmt;
use std::path::Path;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length in bytes of a sealing key (256-bit).
pub const KEY_LENGTH: usize = 32;

/// A symmetric key used to seal and open tokens.
///
/// Key bytes are zeroized when the value is dropped, and `Debug` is
/// redacted so the key cannot leak through logs or panic messages.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SealingKey([u8; KEY_LENGTH]);

impl SealingKey {
    /// Generate a new random key from the process CSPRNG.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let mut bytes = [0u8; KEY_LENGTH];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create a key from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        let bytes: [u8; KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| TokenError::InvalidKeyLength {
                    expected: KEY_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(bytes))
    }

    /// Parse a key from text: hex, base64url, or standard base64.
    pub fn from_encoded(text: &str) -> Result<Self, TokenError> {
        let text = text.trim();

        if text.len() == KEY_LENGTH * 2 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
            let bytes = hex::decode(text).map_err(|_| TokenError::InvalidKeyEncoding)?;
            return Self::from_bytes(&bytes);
        }
        if let Ok(bytes) = general_purpose::URL_SAFE_NO_PAD.decode(text) {
            return Self::from_bytes(&bytes);
        }
        if let Ok(bytes) = general_purpose::STANDARD.decode(text) {
            return Self::from_bytes(&bytes);
        }

        Err(TokenError::InvalidKeyEncoding)
    }

    /// Load a key from a file holding either raw bytes or encoded text.
    pub fn load_from_file(path: &Path) -> Result<Self, TokenError> {
        let data = std::fs::read(path)?;
        let key = if data.len() == KEY_LENGTH {
            Self::from_bytes(&data)?
        } else {
            let text =
                std::str::from_utf8(&data).map_err(|_| TokenError::InvalidKeyEncoding)?;
            Self::from_encoded(text)?
        };
        tracing::debug!(path = %path.display(), "sealing key loaded from file");
        Ok(key)
    }

    /// Save the key to a file as hex, owner-readable only on Unix.
    pub fn save_to_file(&self, path: &Path) -> Result<(), TokenError> {
        let encoded = self.to_hex();

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;

            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(encoded.as_bytes())?;
        }

        #[cfg(not(unix))]
        std::fs::write(path, &encoded)?;

        tracing::debug!(path = %path.display(), "sealing key saved");
        Ok(())
    }

    /// Hex-encode the key bytes (sensitive - only for secure storage).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SealingKey(***)")
    }
}
