//! Email verification endpoint.

use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    response::Redirect,
};
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::IntoParams;

use crate::veriform::auth::{AuthBindings, VerificationRequest, VerifyError};

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyEmailQuery {
    /// Signed verification token from the emailed link.
    pub token: String,
    /// Post-verification destination hint.
    pub redirect: Option<String>,
}

/// Mark the authenticated user's email address as verified.
///
/// Already-verified users are redirected without touching the token service;
/// everyone else goes through exactly one fulfillment call. Fulfillment
/// failures propagate untouched to the response pipeline.
#[utoipa::path(
    get,
    path = "/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 303, description = "Verified, redirecting to the intended destination"),
        (status = 403, description = "Invalid verification token", body = String),
        (status = 410, description = "Expired verification token", body = String),
    ),
    tag = "verify"
)]
#[instrument(skip(headers, auth, query))]
pub async fn verify_email(
    headers: HeaderMap,
    auth: Extension<Arc<AuthBindings>>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Redirect, VerifyError> {
    let principal = auth
        .sessions
        .current_principal(&headers)
        .await
        .ok_or(VerifyError::PreconditionViolated)?;

    let destination = auth.redirector.intended(query.redirect.as_deref());

    if principal.verified {
        debug!(user_id = %principal.user_id, "email already verified");

        return Ok(Redirect::to(&destination));
    }

    let request = VerificationRequest {
        principal,
        token: SecretString::from(query.token),
        intended: query.redirect,
    };

    auth.fulfiller.fulfill(&request).await?;

    Ok(Redirect::to(&destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::veriform::auth::{Principal, Redirector, SessionReader, TokenFulfiller};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ulid::Ulid;
    use uuid::Uuid;

    struct FixedSession(Option<Principal>);

    #[async_trait::async_trait]
    impl SessionReader for FixedSession {
        async fn current_principal(&self, _headers: &HeaderMap) -> Option<Principal> {
            self.0.clone()
        }
    }

    #[derive(Clone, Copy)]
    enum Outcome {
        Fulfilled,
        Invalid,
        Expired,
    }

    struct CountingFulfiller {
        calls: AtomicUsize,
        outcome: Outcome,
    }

    #[async_trait::async_trait]
    impl TokenFulfiller for CountingFulfiller {
        async fn fulfill(&self, _request: &VerificationRequest) -> Result<(), VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.outcome {
                Outcome::Fulfilled => Ok(()),
                Outcome::Invalid => Err(VerifyError::TokenInvalid),
                Outcome::Expired => Err(VerifyError::TokenExpired),
            }
        }
    }

    struct DashboardRedirector;

    impl Redirector for DashboardRedirector {
        fn intended(&self, hint: Option<&str>) -> String {
            format!("{}?verified=1", hint.unwrap_or("/dashboard"))
        }
    }

    fn principal(verified: bool) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            email: "user@veriform.dev".to_string(),
            verified,
        }
    }

    fn bindings(
        principal: Option<Principal>,
        outcome: Outcome,
    ) -> (Arc<AuthBindings>, Arc<CountingFulfiller>) {
        let fulfiller = Arc::new(CountingFulfiller {
            calls: AtomicUsize::new(0),
            outcome,
        });

        let bindings = Arc::new(AuthBindings {
            sessions: Arc::new(FixedSession(principal)),
            fulfiller: fulfiller.clone(),
            redirector: Arc::new(DashboardRedirector),
        });

        (bindings, fulfiller)
    }

    fn query(redirect: Option<&str>) -> Query<VerifyEmailQuery> {
        Query(VerifyEmailQuery {
            token: Ulid::new().to_string(),
            redirect: redirect.map(ToString::to_string),
        })
    }

    #[tokio::test]
    async fn already_verified_skips_fulfillment() {
        let (auth, fulfiller) = bindings(Some(principal(true)), Outcome::Fulfilled);

        let response = verify_email(HeaderMap::new(), Extension(auth), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(fulfiller.calls.load(Ordering::SeqCst), 0);

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/dashboard?verified=1");
        assert!(location.ends_with("?verified=1"));
    }

    #[tokio::test]
    async fn unverified_fulfills_then_redirects() {
        let (auth, fulfiller) = bindings(Some(principal(false)), Outcome::Fulfilled);

        let response = verify_email(HeaderMap::new(), Extension(auth), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(fulfiller.calls.load(Ordering::SeqCst), 1);

        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert_eq!(location, "/dashboard?verified=1");
    }

    #[tokio::test]
    async fn redirect_hint_wins_over_dashboard() {
        let (auth, _) = bindings(Some(principal(true)), Outcome::Fulfilled);

        let response = verify_email(
            HeaderMap::new(),
            Extension(auth),
            query(Some("/settings/profile")),
        )
        .await
        .into_response();

        assert_eq!(
            response.headers().get("location").unwrap(),
            "/settings/profile?verified=1"
        );
    }

    #[tokio::test]
    async fn invalid_token_propagates() {
        let (auth, fulfiller) = bindings(Some(principal(false)), Outcome::Invalid);

        let response = verify_email(HeaderMap::new(), Extension(auth), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(fulfiller.calls.load(Ordering::SeqCst), 1);
        assert!(response.headers().get("location").is_none());
    }

    #[tokio::test]
    async fn expired_token_propagates() {
        let (auth, _) = bindings(Some(principal(false)), Outcome::Expired);

        let response = verify_email(HeaderMap::new(), Extension(auth), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::GONE);
        assert!(response.headers().get("location").is_none());
    }

    #[tokio::test]
    async fn missing_principal_is_a_precondition_violation() {
        let (auth, fulfiller) = bindings(None, Outcome::Fulfilled);

        let response = verify_email(HeaderMap::new(), Extension(auth), query(None))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fulfiller.calls.load(Ordering::SeqCst), 0);
    }
}
