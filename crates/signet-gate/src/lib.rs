//! # signet-gate
//!
//! Bearer authentication gate for Signet.
//!
//! This crate provides functionality for:
//! - Authenticating `Authorization: Bearer` headers against sealed tokens
//! - Enforcing the claims policy (subject present, expiry mandatory and checked)
//! - Resolving subjects to application identities through an injected backend
//! - Issuing tokens with a configurable default lifetime
//! - Mounting the gate as axum middleware
//!
//! ## Authentication pipeline
//!
//! A request walks a fixed line: extract the bearer token, open it with
//! [`signet_token::TokenCodec`], validate the claims, resolve the
//! subject. A request without a bearer credential is not a failure -
//! [`AuthGate::authenticate`] returns `Ok(None)` and another scheme may
//! still apply. Every other deviation is a typed [`AuthError`], and all
//! client failures surface as one uniform response: the wire never
//! says why a token was rejected. Resolver and configuration faults
//! stay separate and map to server errors instead.

pub mod config;
pub mod error;
pub mod gate;
pub mod middleware;
pub mod resolver;

pub use config::GateConfig;
pub use error::{AuthError, ResolverError};
pub use gate::AuthGate;
pub use middleware::{Authenticated, optional_bearer, require_bearer};
pub use resolver::{IdentityResolver, MemoryResolver, Subject};
