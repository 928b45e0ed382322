use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::config::FetchConfig;

/// Failure kinds surfaced to the UI. Display strings are short descriptions
/// of the failure kind, never transport internals.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network unreachable")]
    Network,
    #[error("server error {0}")]
    Server(u16),
    #[error("malformed response")]
    MalformedResponse,
}

/// Source of raw analytics reports. The orchestrator is generic over this
/// seam so tests can script responses without a server.
#[async_trait]
pub trait ReportSource: Send {
    async fn fetch_report(&mut self) -> Result<Value, FetchError>;
}

pub struct HttpReportSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpReportSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|_| FetchError::Network)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_report(&mut self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|_| FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Server(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|_| FetchError::MalformedResponse)
    }
}
