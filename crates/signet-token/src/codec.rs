//! Sealed token encoding and verification.

use crate::claims::Claims;
use crate::error::TokenError;
use crate::key::SealingKey;
use base64::{Engine as _, engine::general_purpose};
use chacha20poly1305::aead::{Aead, Payload};
use chacha20poly1305::{Key, KeyInit, XChaCha20Poly1305, XNonce};
use rand::RngCore;

/// Version and purpose header carried by every token and bound as AEAD
/// associated data. Decoding rejects any other header.
pub const TOKEN_HEADER: &str = "v1.local.";

/// XChaCha20-Poly1305 nonce length in bytes.
const NONCE_LENGTH: usize = 24;

/// Poly1305 authentication tag length in bytes.
const TAG_LENGTH: usize = 16;

/// Seals claims into opaque token strings and opens them back.
///
/// Pure and stateless apart from the key: a single codec can be shared
/// across threads and called concurrently without coordination.
#[derive(Debug)]
pub struct TokenCodec {
    key: SealingKey,
}

impl TokenCodec {
    /// Create a codec sealing with the given key.
    pub fn new(key: SealingKey) -> Self {
        Self { key }
    }

    /// Seal claims into a token string.
    ///
    /// A fresh random nonce is drawn on every call, so sealing the same
    /// claims twice yields two different tokens. No claims validation
    /// happens here - encode is a pure transform.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let plaintext = serde_json::to_vec(claims)?;

        let mut nonce = [0u8; NONCE_LENGTH];
        rand::rng().fill_bytes(&mut nonce);

        let cipher = XChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()));
        let ciphertext = cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: &plaintext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Seal)?;

        let mut body = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        body.extend_from_slice(&nonce);
        body.extend_from_slice(&ciphertext);

        Ok(format!(
            "{TOKEN_HEADER}{}",
            general_purpose::URL_SAFE_NO_PAD.encode(body)
        ))
    }

    /// Open a token string back into claims.
    ///
    /// The authentication tag is verified before a single claim byte is
    /// interpreted; unauthenticated plaintext never escapes. Fails
    /// closed on any version, format, or integrity mismatch.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let body = token
            .strip_prefix(TOKEN_HEADER)
            .ok_or(TokenError::Format("unsupported version header"))?;

        let raw = general_purpose::URL_SAFE_NO_PAD
            .decode(body)
            .map_err(|_| TokenError::Format("body is not base64url"))?;

        if raw.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(TokenError::Format("body too short"));
        }

        let (nonce, ciphertext) = raw.split_at(NONCE_LENGTH);
        let cipher = XChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()));
        let plaintext = cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: TOKEN_HEADER.as_bytes(),
                },
            )
            .map_err(|_| TokenError::Integrity)?;

        Ok(serde_json::from_slice(&plaintext)?)
    }
}
