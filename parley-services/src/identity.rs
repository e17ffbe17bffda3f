use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Request")]
    Request(reqwest::Error),
    #[error("Status")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
}

/// The managed-auth contract: a bearer token either maps to a user id or it
/// does not. Transport failure is distinct from an invalid token.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, bearer_token: &str)
        -> Result<Option<VerifiedIdentity>, IdentityError>;
}

pub struct HttpIdentityVerifier {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityVerifier {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(
        &self,
        bearer_token: &str,
    ) -> Result<Option<VerifiedIdentity>, IdentityError> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .bearer_auth(bearer_token)
            .header("apikey", &self.api_key)
            .timeout(VERIFY_TIMEOUT)
            .send()
            .await
            .map_err(IdentityError::Request)?;

        match response.status().as_u16() {
            200 => {
                let user: AuthUser = response.json().await.map_err(IdentityError::Request)?;
                Ok(Some(VerifiedIdentity { user_id: user.id }))
            }
            401 | 403 => Ok(None),
            status => Err(IdentityError::Status(status)),
        }
    }
}
