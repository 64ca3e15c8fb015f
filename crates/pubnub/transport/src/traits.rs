//! Transport traits.

use std::time::Duration;

/// A request ready to be sent to the service origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// Scheme and host, e.g. `https://ps.pndsn.com`.
    pub base_url: String,
    /// Absolute path.
    pub path: String,
    /// Percent-encoded query parameters.
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl TransportRequest {
    /// Full request URL.
    pub fn url(&self) -> String {
        let endpoint = pubnub_core::Endpoint {
            path: self.path.clone(),
            query: self.query.clone(),
        };
        format!("{}{}", self.base_url, endpoint.path_and_query())
    }
}

/// Raw service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status_code: u16,
    pub body: Vec<u8>,
    /// URL the response was received from.
    pub url: String,
}

/// Failure to obtain a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Sends push API requests.
#[trait_variant::make(Send)]
pub trait Transport: Send + Sync {
    /// Send a request and return the raw response.
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
