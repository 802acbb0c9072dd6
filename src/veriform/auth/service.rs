//! Production bindings for the auth seams.

use super::{
    Principal, Redirector, SessionReader, TokenFulfiller, VerificationRequest, VerifyError,
};
use crate::veriform::APP_USER_AGENT;
use anyhow::{anyhow, Result};
use axum::http::HeaderMap;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, instrument};
use ulid::Ulid;
use url::Url;
use uuid::Uuid;

/// Normalize a base URL into `scheme://host:port` + endpoint
fn endpoint_url(base: &str, endpoint: &str) -> Result<String> {
    let url = Url::parse(base)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {}", scheme)),
        },
    };

    Ok(format!("{scheme}://{host}:{port}{endpoint}"))
}

/// Fulfills verification by delegating to the token service, which owns token
/// expiry, the verified flag, the timestamp and the domain event.
pub struct TokenServiceFulfiller {
    client: Client,
    fulfill_url: String,
}

impl TokenServiceFulfiller {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().user_agent(APP_USER_AGENT).build()?,
            fulfill_url: endpoint_url(base_url, "/fulfill")?,
        })
    }
}

#[async_trait::async_trait]
impl TokenFulfiller for TokenServiceFulfiller {
    #[instrument(skip(self, request))]
    async fn fulfill(&self, request: &VerificationRequest) -> Result<(), VerifyError> {
        let token = request.token.expose_secret();

        // Malformed tokens are rejected before any network round trip
        if Ulid::from_string(token).is_err() {
            return Err(VerifyError::TokenInvalid);
        }

        let payload = json!({
            "token": token,
            "user_id": request.principal.user_id,
        });

        match self
            .client
            .post(&self.fulfill_url)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::ACCEPTED || status == StatusCode::NO_CONTENT {
                    Ok(())
                } else if status == StatusCode::GONE {
                    Err(VerifyError::TokenExpired)
                } else {
                    error!("token fulfillment rejected: {}", status);

                    Err(VerifyError::TokenInvalid)
                }
            }
            Err(e) => {
                error!("error calling token service: {:?}", e);

                Err(VerifyError::TokenInvalid)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user_id: Uuid,
    email: String,
    verified: bool,
}

/// Resolves the principal by forwarding the request credentials to the
/// session service.
pub struct SessionServiceReader {
    client: Client,
    session_url: String,
}

impl SessionServiceReader {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().user_agent(APP_USER_AGENT).build()?,
            session_url: endpoint_url(base_url, "/session")?,
        })
    }
}

#[async_trait::async_trait]
impl SessionReader for SessionServiceReader {
    #[instrument(skip(self, headers))]
    async fn current_principal(&self, headers: &HeaderMap) -> Option<Principal> {
        let mut request = self.client.get(&self.session_url);

        for name in ["authorization", "cookie"] {
            if let Some(value) = headers.get(name).and_then(|v| v.to_str().ok()) {
                request = request.header(name, value);
            }
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<SessionResponse>().await {
                    Ok(session) => Some(Principal {
                        user_id: session.user_id,
                        email: session.email,
                        verified: session.verified,
                    }),
                    Err(e) => {
                        error!("invalid session payload: {:?}", e);

                        None
                    }
                }
            }
            Ok(response) => {
                error!("session lookup failed: {}", response.status());

                None
            }
            Err(e) => {
                error!("error calling session service: {:?}", e);

                None
            }
        }
    }
}

/// Sends completed verifications to the intended destination, falling back to
/// the dashboard. Only same-site hints are honored.
pub struct IntendedRedirector {
    dashboard: String,
}

impl IntendedRedirector {
    #[must_use]
    pub fn new(dashboard: impl Into<String>) -> Self {
        Self {
            dashboard: dashboard.into(),
        }
    }
}

impl Redirector for IntendedRedirector {
    fn intended(&self, hint: Option<&str>) -> String {
        let destination = hint
            .filter(|h| h.starts_with('/') && !h.starts_with("//"))
            .unwrap_or(self.dashboard.as_str());

        format!("{destination}?verified=1")
    }
}
