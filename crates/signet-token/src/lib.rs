//! # signet-token
//!
//! Sealed bearer token encoding and verification for Signet.
//!
//! This crate provides functionality for:
//! - Managing 256-bit sealing keys (generation, text and file loading, zeroized drop)
//! - Sealing a claims set into an opaque `v1.local.` token string
//! - Opening a token string back into claims, authenticating it first
//!
//! ## Token format
//!
//! ```text
//! v1.local.<base64url( nonce[24] || ciphertext || tag[16] )>
//! ```
//!
//! Tokens are sealed with XChaCha20-Poly1305 under a fresh random nonce
//! per call. The `v1.local.` header is bound as associated data, so a
//! body only verifies under the exact header it was sealed with. The
//! whole claims payload is encrypted, not just integrity-protected:
//! nothing inside a token is readable without the key.
//!
//! Opening checks the authentication tag before interpreting any claim
//! and fails closed on any format, version, or integrity mismatch. The
//! codec carries no claims policy - whether a decoded claims set is
//! acceptable (subject present, not expired) is the caller's decision.

pub mod claims;
pub mod codec;
pub mod error;
pub mod key;

pub use claims::Claims;
pub use codec::{TOKEN_HEADER, TokenCodec};
pub use error::TokenError;
pub use key::{KEY_LENGTH, SealingKey};
