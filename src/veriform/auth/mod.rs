//! Seams between the verification flow and the surrounding auth framework.
//!
//! The handler only ever talks to these three contracts; concrete services
//! bind to them at the boundary so tests can substitute fixtures.

pub mod service;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Authenticated user context resolved by route middleware.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
    /// Current email-verification flag, owned by the identity store.
    pub verified: bool,
}

/// One verification attempt: built at the framework boundary, consumed once.
#[derive(Debug)]
pub struct VerificationRequest {
    pub principal: Principal,
    pub token: SecretString,
    pub intended: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("no authenticated principal")]
    PreconditionViolated,
    #[error("invalid verification token")]
    TokenInvalid,
    #[error("verification token expired")]
    TokenExpired,
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::PreconditionViolated => {
                // Route middleware must authenticate before the handler runs.
                error!("verify-email reached without an authenticated principal");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::TokenInvalid => StatusCode::FORBIDDEN,
            Self::TokenExpired => StatusCode::GONE,
        };

        (status, self.to_string()).into_response()
    }
}

/// Resolves the authenticated principal for the current request.
#[async_trait::async_trait]
pub trait SessionReader: Send + Sync {
    async fn current_principal(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Validates the signed token and marks the email verified as one side effect.
#[async_trait::async_trait]
pub trait TokenFulfiller: Send + Sync {
    async fn fulfill(&self, request: &VerificationRequest) -> Result<(), VerifyError>;
}

/// Builds the post-verification destination, `?verified=1` marker included.
pub trait Redirector: Send + Sync {
    fn intended(&self, hint: Option<&str>) -> String;
}

/// Concrete seam bindings, handed to the router as a single extension.
#[derive(Clone)]
pub struct AuthBindings {
    pub sessions: Arc<dyn SessionReader>,
    pub fulfiller: Arc<dyn TokenFulfiller>,
    pub redirector: Arc<dyn Redirector>,
}
