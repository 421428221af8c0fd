//! Client for the third-party form relay endpoint.

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use shared::protocol::ContactFields;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("form relay endpoint is not configured")]
    NotConfigured,
    #[error("form relay unavailable: {0}")]
    Unavailable(String),
}

/// Raw reply from the relay. The body is kept as bytes so the form flow can
/// attempt error extraction without failing the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RelayReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait FormRelay: Send + Sync {
    async fn post(&self, fields: &ContactFields) -> Result<RelayReply, RelayError>;
}

pub struct HttpFormRelay {
    http: Client,
    endpoint: String,
}

impl HttpFormRelay {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl FormRelay for HttpFormRelay {
    async fn post(&self, fields: &ContactFields) -> Result<RelayReply, RelayError> {
        let res = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(fields)
            .send()
            .await?;
        let status = res.status().as_u16();
        let body = res.bytes().await?.to_vec();
        debug!(status, body_len = body.len(), "form relay replied");
        Ok(RelayReply { status, body })
    }
}

/// Stand-in used when no endpoint is configured; every post fails as a
/// transport error.
pub struct MissingFormRelay;

#[async_trait]
impl FormRelay for MissingFormRelay {
    async fn post(&self, _fields: &ContactFields) -> Result<RelayReply, RelayError> {
        Err(RelayError::NotConfigured)
    }
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
