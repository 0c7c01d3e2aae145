//! Axum middleware over the authentication gate.

use crate::error::{AuthError, challenge_response};
use crate::gate::AuthGate;
use crate::resolver::IdentityResolver;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

/// An authenticated principal, inserted into request extensions by the
/// middleware and read back by handlers via
/// `Extension<Authenticated<I>>`.
#[derive(Debug, Clone)]
pub struct Authenticated<I>(pub I);

/// Require a valid bearer token on every request.
///
/// On success the resolved identity is attached to the request as an
/// [`Authenticated`] extension; everything else is rejected before the
/// inner service runs.
pub async fn require_bearer<R>(
    State(gate): State<Arc<AuthGate<R>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    R: IdentityResolver + 'static,
    R::Identity: Clone + Send + Sync + 'static,
{
    match gate.authenticate(bearer_header(&request)).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(Authenticated(identity));
            next.run(request).await
        }
        Ok(None) => {
            tracing::debug!("request carried no bearer credential");
            challenge_response()
        }
        Err(err) => {
            log_rejection(&err);
            err.into_response()
        }
    }
}

/// Authenticate a bearer token when one is present, but let anonymous
/// requests through.
///
/// Optional means the credential is optional, not that bad credentials
/// are tolerated: a presented-but-invalid token is still rejected.
pub async fn optional_bearer<R>(
    State(gate): State<Arc<AuthGate<R>>>,
    mut request: Request,
    next: Next,
) -> Response
where
    R: IdentityResolver + 'static,
    R::Identity: Clone + Send + Sync + 'static,
{
    match gate.authenticate(bearer_header(&request)).await {
        Ok(Some(identity)) => {
            request.extensions_mut().insert(Authenticated(identity));
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(err) => {
            log_rejection(&err);
            err.into_response()
        }
    }
}

/// Read the `Authorization` header as text. Header values that are not
/// visible ASCII cannot form a bearer line and count as absent.
fn bearer_header(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

fn log_rejection(err: &AuthError) {
    if err.is_client_fault() {
        tracing::debug!(code = err.code(), "bearer authentication rejected");
    } else {
        tracing::warn!(code = err.code(), error = %err, "bearer authentication fault");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{MemoryResolver, Subject};
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use axum::routing::get;
    use axum::{Extension, Router, middleware};
    use chrono::Duration;
    use signet_token::SealingKey;
    use tower::ServiceExt;

    #[derive(Debug, Clone)]
    struct TestUser {
        name: String,
    }

    impl Subject for TestUser {
        fn subject(&self) -> &str {
            &self.name
        }
    }

    async fn whoami(Extension(user): Extension<Authenticated<TestUser>>) -> String {
        user.0.name
    }

    async fn maybe_whoami(user: Option<Extension<Authenticated<TestUser>>>) -> String {
        match user {
            Some(Extension(Authenticated(user))) => user.name,
            None => "anonymous".to_string(),
        }
    }

    fn test_gate() -> Arc<AuthGate<MemoryResolver<TestUser>>> {
        let mut resolver = MemoryResolver::new();
        resolver.insert(TestUser {
            name: "alice".to_string(),
        });
        Arc::new(AuthGate::new(SealingKey::generate(), resolver))
    }

    fn protected_app(gate: Arc<AuthGate<MemoryResolver<TestUser>>>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(gate, require_bearer))
    }

    fn open_app(gate: Arc<AuthGate<MemoryResolver<TestUser>>>) -> Router {
        Router::new()
            .route("/whoami", get(maybe_whoami))
            .layer(middleware::from_fn_with_state(gate, optional_bearer))
    }

    fn get_request(token: Option<&str>) -> HttpRequest<Body> {
        let builder = HttpRequest::builder().uri("/whoami");
        let builder = match token {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
            None => builder,
        };
        builder.body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_credential_is_challenged() {
        let app = protected_app(test_gate());

        let response = app.oneshot(get_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() {
        let gate = test_gate();
        let token = gate
            .issue_token_for("alice", Some(Duration::hours(1)))
            .unwrap();
        let app = protected_app(gate);

        let response = app.oneshot(get_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
    }

    #[tokio::test]
    async fn test_invalid_token_gets_uniform_401() {
        let app = protected_app(test_gate());

        let response = app.oneshot(get_request(Some("tampered"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "authentication failed");
    }

    #[tokio::test]
    async fn test_distinct_failures_are_indistinguishable_on_the_wire() {
        let gate = test_gate();
        let ghost_token = gate
            .issue_token_for("ghost", Some(Duration::hours(1)))
            .unwrap();
        let app = protected_app(gate);

        // A decode failure and a policy failure (unknown subject) must
        // produce byte-identical responses.
        let invalid = app
            .clone()
            .oneshot(get_request(Some("tampered")))
            .await
            .unwrap();
        let unknown = app.oneshot(get_request(Some(&ghost_token))).await.unwrap();

        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(invalid).await, body_string(unknown).await);
    }

    #[tokio::test]
    async fn test_optional_layer_allows_anonymous() {
        let app = open_app(test_gate());

        let response = app.oneshot(get_request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_optional_layer_still_rejects_bad_tokens() {
        let app = open_app(test_gate());

        let response = app.oneshot(get_request(Some("tampered"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_optional_layer_authenticates_when_token_present() {
        let gate = test_gate();
        let token = gate
            .issue_token_for("alice", Some(Duration::hours(1)))
            .unwrap();
        let app = open_app(gate);

        let response = app.oneshot(get_request(Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "alice");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_challenged_not_crashed() {
        let app = protected_app(test_gate());

        let request = HttpRequest::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
