//! Identity resolution through the hosted auth provider.
//!
//! Tokens are opaque at this layer: the provider either returns a principal
//! or it doesn't. Callers cannot distinguish a rejected token from an
//! unreachable provider; both surface as 401 at the API boundary.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

/// Authenticated principal resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("provider rejected token: {0}")]
    Rejected(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Shape of the provider's `/auth/v1/user` payload. Extra fields ignored.
#[derive(Debug, Deserialize)]
struct AuthUserPayload {
    id: Uuid,
    email: Option<String>,
}

/// GoTrue-style auth server reached over HTTP.
pub struct AuthServer {
    client: reqwest::Client,
    user_url: Url,
    anon_key: String,
}

impl AuthServer {
    pub fn new(backend_url: &str, anon_key: impl Into<String>) -> Result<Self, IdentityError> {
        let base = Url::parse(backend_url)
            .map_err(|e| IdentityError::Unavailable(format!("invalid backend URL: {}", e)))?;
        let user_url = base
            .join("auth/v1/user")
            .map_err(|e| IdentityError::Unavailable(format!("invalid auth path: {}", e)))?;
        Ok(Self {
            client: reqwest::Client::new(),
            user_url,
            anon_key: anon_key.into(),
        })
    }
}

#[async_trait]
impl IdentityProvider for AuthServer {
    async fn resolve(&self, token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(self.user_url.clone())
            .header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(IdentityError::Rejected(format!(
                "status {}",
                response.status()
            )));
        }

        let payload: AuthUserPayload = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("malformed user payload: {}", e)))?;

        Ok(Identity {
            id: payload.id,
            email: payload.email,
        })
    }
}
