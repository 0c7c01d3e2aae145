//! Error types for the authentication gate.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use signet_token::TokenError;
use thiserror::Error;

/// Infrastructure failure inside an identity resolver.
///
/// Distinct from "no such subject", which resolvers report as
/// `Ok(None)`: this means the backend itself is unavailable.
#[derive(Debug, Error)]
#[error("identity resolver failure: {0}")]
pub struct ResolverError(#[from] pub anyhow::Error);

impl ResolverError {
    /// Wrap a backend error.
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(err.into())
    }
}

/// Errors produced while authenticating a request or issuing a token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Scheme prefix present but the token substring was empty.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// The token failed to decode. Format and integrity failures both
    /// collapse into this one variant; the cause stays attached for
    /// server-side logs and is never shown to the client.
    #[error("invalid token")]
    InvalidToken {
        #[source]
        source: TokenError,
    },

    /// Claims carry no subject.
    #[error("token has no subject")]
    MissingSubject,

    /// Claims carry no expiry.
    #[error("token has no expiry")]
    MissingExpiry,

    /// The token's expiry is in the past.
    #[error("token has expired")]
    Expired,

    /// Claims are valid but the subject resolves to no identity.
    #[error("unknown subject")]
    UnknownSubject,

    /// The identity resolver itself failed.
    #[error(transparent)]
    Resolver(#[from] ResolverError),

    /// Invalid gate configuration or issuance parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// Sealing failed while minting a token.
    #[error("token issuance failed")]
    Issuance {
        #[source]
        source: TokenError,
    },
}

impl AuthError {
    /// Stable diagnostic code for logs. Never part of the client body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedHeader => "malformed_header",
            Self::InvalidToken { .. } => "invalid_token",
            Self::MissingSubject => "missing_subject",
            Self::MissingExpiry => "missing_expiry",
            Self::Expired => "token_expired",
            Self::UnknownSubject => "unknown_subject",
            Self::Resolver(_) => "resolver_error",
            Self::Config(_) => "config_error",
            Self::Issuance { .. } => "issuance_failed",
        }
    }

    /// Whether this failure is the client's fault (a bad credential) as
    /// opposed to a server-side fault.
    pub fn is_client_fault(&self) -> bool {
        !matches!(
            self,
            Self::Resolver(_) | Self::Config(_) | Self::Issuance { .. }
        )
    }

    /// HTTP status this failure maps to.
    pub fn status_code(&self) -> StatusCode {
        if self.is_client_fault() {
            StatusCode::UNAUTHORIZED
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Every client failure gets the same body: the wire must not
        // reveal why a credential was rejected.
        if self.is_client_fault() {
            (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "error": "authentication failed" })),
            )
                .into_response()
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal server error" })),
            )
                .into_response()
        }
    }
}

/// 401 challenge for requests that presented no bearer credential at
/// all.
pub(crate) fn challenge_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({ "error": "authentication required" })),
    )
        .into_response()
}
