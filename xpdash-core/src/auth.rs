//! Credential exchange — username/password for a session token.
//!
//! The exchange is a single `POST` carrying `Authorization: Basic
//! base64(identifier:secret)`. A success status returns the token as a bare
//! JSON string. Session state changes only on success.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{header, Client};
use thiserror::Error;

use crate::session::{Session, SessionError};

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials { status: u16 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("could not persist session: {0}")]
    Session(#[from] SessionError),
}

/// Encode `identifier:secret` for a Basic authorization header.
pub fn basic_credentials(identifier: &str, secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", identifier, secret))
}

#[derive(Debug, Clone)]
pub struct CredentialExchanger {
    client: Client,
    auth_url: String,
    session: Session,
}

impl CredentialExchanger {
    pub fn new(auth_url: impl Into<String>, session: Session, timeout: Duration) -> Result<Self, CredentialError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            auth_url: auth_url.into(),
            session,
        })
    }

    /// Exchange credentials for a token, persist it, and return it.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<String, CredentialError> {
        let response = self
            .client
            .post(&self.auth_url)
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", basic_credentials(identifier, secret)),
            )
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint = %self.auth_url, "Credential exchange rejected");
            return Err(CredentialError::InvalidCredentials {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let token: String = serde_json::from_str(&body).map_err(|e| {
            CredentialError::InvalidResponse(format!("expected a JSON string token: {}", e))
        })?;
        if token.is_empty() {
            return Err(CredentialError::InvalidResponse("empty token".to_string()));
        }

        self.session.save(&token)?;
        tracing::info!(endpoint = %self.auth_url, "Signed in");

        Ok(token)
    }

    /// Sign out. Clearing an already-empty session is fine.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.clear()?;
        tracing::info!("Signed out");
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
