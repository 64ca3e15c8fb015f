//! HTTP transport using reqwest.

use color_eyre::eyre::WrapErr as _;

use crate::{Transport, TransportError, TransportRequest, TransportResponse};

/// Transport sending GET requests over HTTP(S).
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a new HTTP transport.
    pub fn new() -> color_eyre::eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(pubnub_core::PNSDK)
            .build()
            .wrap_err("failed to create HTTP client")?;

        Ok(Self::with_client(client))
    }

    /// Use an existing reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = reqwest::Url::parse(&request.url())
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        tracing::debug!(path = %request.path, "sending request");

        let response = self
            .client
            .get(url)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(map_error)?;

        let status_code = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.bytes().await.map_err(map_error)?;

        tracing::debug!(status = status_code, bytes = body.len(), "received response");

        Ok(TransportResponse {
            status_code,
            body: body.to_vec(),
            url,
        })
    }
}

fn map_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}
