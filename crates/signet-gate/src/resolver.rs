//! Identity resolution boundary.

use crate::error::ResolverError;
use async_trait::async_trait;
use std::collections::HashMap;

/// A principal with a stable subject identifier.
///
/// The subject string is written into the `sub` claim at issuance and
/// looked up again at verification.
pub trait Subject {
    /// Stable, non-empty subject string for this principal.
    fn subject(&self) -> &str;
}

impl Subject for String {
    fn subject(&self) -> &str {
        self
    }
}

/// Backend that resolves a `sub` claim to an application identity.
///
/// `Ok(None)` means the subject is unknown. `Err` means the backend
/// itself failed (connectivity, timeout); the two stay distinct all the
/// way to the HTTP status.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// The identity produced on successful lookup.
    type Identity: Subject + Send + Sync;

    /// Look up the identity behind a subject claim.
    async fn lookup(&self, subject: &str) -> Result<Option<Self::Identity>, ResolverError>;
}

/// In-memory resolver backed by a `HashMap`.
///
/// The reference backend for tests and small deployments; applications
/// with a real user store implement [`IdentityResolver`] over it
/// directly.
#[derive(Debug, Clone)]
pub struct MemoryResolver<I> {
    identities: HashMap<String, I>,
}

impl<I: Subject> MemoryResolver<I> {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self {
            identities: HashMap::new(),
        }
    }

    /// Register an identity under its subject.
    pub fn insert(&mut self, identity: I) {
        self.identities
            .insert(identity.subject().to_string(), identity);
    }
}

impl<I> Default for MemoryResolver<I> {
    fn default() -> Self {
        Self {
            identities: HashMap::new(),
        }
    }
}

#[async_trait]
impl<I> IdentityResolver for MemoryResolver<I>
where
    I: Subject + Clone + Send + Sync,
{
    type Identity = I;

    async fn lookup(&self, subject: &str) -> Result<Option<I>, ResolverError> {
        Ok(self.identities.get(subject).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_resolver_lookup() {
        let mut resolver = MemoryResolver::new();
        resolver.insert("alice".to_string());

        let found = resolver.lookup("alice").await.unwrap();
        assert_eq!(found.as_deref(), Some("alice"));

        let missing = resolver.lookup("bob").await.unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_string_subjects() {
        let name = "alice".to_string();
        assert_eq!(name.subject(), "alice");
    }
}
