//! The per-request authentication state machine.

use crate::config::GateConfig;
use crate::error::AuthError;
use crate::resolver::{IdentityResolver, Subject};
use chrono::{Duration, Utc};
use signet_token::{Claims, SealingKey, TokenCodec};

/// The bearer scheme prefix, matched case-sensitively.
const BEARER_PREFIX: &str = "Bearer ";

/// Authenticates bearer requests and issues tokens.
///
/// Immutable after construction: share one gate behind an `Arc` across
/// all request handlers. Every call is independent - no locks, no
/// internal state beyond the sealing key inside the codec.
#[derive(Debug)]
pub struct AuthGate<R: IdentityResolver> {
    codec: TokenCodec,
    resolver: R,
    default_ttl: Duration,
}

impl<R: IdentityResolver> AuthGate<R> {
    /// Create a gate with the default 24 hour issuance TTL.
    pub fn new(key: SealingKey, resolver: R) -> Self {
        Self {
            codec: TokenCodec::new(key),
            resolver,
            default_ttl: Duration::hours(24),
        }
    }

    /// Override the default issuance TTL.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Build a gate from configuration. Fails fast when no sealing key
    /// is configured rather than at the first request.
    pub fn from_config(config: &GateConfig, resolver: R) -> Result<Self, AuthError> {
        let key = config
            .resolve_key()
            .map_err(|e| AuthError::Config(format!("sealing key unusable: {e}")))?
            .ok_or_else(|| AuthError::Config("no sealing key configured".to_string()))?;
        let default_ttl = config.resolve_default_ttl()?;

        Ok(Self {
            codec: TokenCodec::new(key),
            resolver,
            default_ttl,
        })
    }

    /// Authenticate an `Authorization` header value.
    ///
    /// `Ok(None)` means the request carries no credential of this
    /// scheme; the gate expresses no opinion and another scheme may
    /// still authenticate the request. Every `Err` is terminal.
    pub async fn authenticate(
        &self,
        header: Option<&str>,
    ) -> Result<Option<R::Identity>, AuthError> {
        let Some(header) = header else {
            return Ok(None);
        };
        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Err(AuthError::MalformedHeader);
        }

        // Past this point every decode failure looks the same to the
        // caller; the source only feeds server-side logs.
        let claims = self
            .codec
            .decode(token)
            .map_err(|source| AuthError::InvalidToken { source })?;

        if !claims.has_subject() {
            return Err(AuthError::MissingSubject);
        }
        let Some(exp) = claims.exp else {
            return Err(AuthError::MissingExpiry);
        };
        if exp < Utc::now() {
            return Err(AuthError::Expired);
        }

        match self.resolver.lookup(&claims.sub).await? {
            Some(identity) => {
                tracing::debug!(
                    subject = %claims.sub,
                    jti = claims.jti.as_deref().unwrap_or("-"),
                    "bearer token accepted"
                );
                Ok(Some(identity))
            }
            None => Err(AuthError::UnknownSubject),
        }
    }

    /// Issue a token for an identity, valid for `ttl` (or the gate's
    /// default when `None`).
    pub fn issue_token(
        &self,
        identity: &R::Identity,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        self.issue_token_for(identity.subject(), ttl)
    }

    /// Issue a token for a bare subject string.
    pub fn issue_token_for(
        &self,
        subject: &str,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        if subject.is_empty() {
            return Err(AuthError::Config(
                "token subject must not be empty".to_string(),
            ));
        }
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl <= Duration::zero() {
            return Err(AuthError::Config(format!(
                "token ttl must be positive, got {}s",
                ttl.num_seconds()
            )));
        }

        let claims = Claims::new(subject, ttl);
        let token = self
            .codec
            .encode(&claims)
            .map_err(|source| AuthError::Issuance { source })?;

        tracing::debug!(
            subject = %subject,
            jti = claims.jti.as_deref().unwrap_or("-"),
            ttl_seconds = ttl.num_seconds(),
            "token issued"
        );
        Ok(token)
    }
}
