//! Token claims.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Claims carried inside a sealed token.
///
/// The two claims the authentication policy cares about (`sub`, `exp`)
/// are typed fields; anything else rides in `extra` and passes through
/// the codec untouched. Deserialization is deliberately lenient - a
/// token missing `sub` or `exp` still decodes, and rejecting it is the
/// gate's policy decision, not the codec's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the principal this token was issued for.
    #[serde(default)]
    pub sub: String,

    /// Absolute expiry instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<DateTime<Utc>>,

    /// When the token was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<DateTime<Utc>>,

    /// Token id. Safe to log, unlike the token itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Application-defined claims, passed through opaquely.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims for a subject, expiring `ttl` from now. Stamps
    /// `iat` and a fresh `jti`.
    pub fn new(sub: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: sub.into(),
            exp: Some(now + ttl),
            iat: Some(now),
            jti: Some(Uuid::new_v4().to_string()),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an application-defined claim.
    pub fn with_claim(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Whether the subject claim is present and non-empty.
    pub fn has_subject(&self) -> bool {
        !self.sub.is_empty()
    }

    /// Whether the expiry instant is strictly in the past. Claims
    /// without an expiry are not expired; rejecting those is a separate
    /// policy call.
    pub fn is_expired(&self) -> bool {
        self.exp.is_some_and(|exp| exp < Utc::now())
    }
}
