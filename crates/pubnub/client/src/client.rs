//! Client core: request dispatch and status classification.

use std::sync::Arc;

use pubnub_core::{
    AckStatus, AuditOutcome, Config, EnabledChannels, ErrorData, PushRequest, RequestError,
    Status, StatusCategory,
};
use pubnub_transport::{
    HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};

/// PubNub client.
///
/// Cloning is cheap; clones share configuration and transport.
pub struct PubNub<T = HttpTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    config: Config,
    transport: T,
}

impl<T> Clone for PubNub<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PubNub<HttpTransport> {
    /// Create a client sending requests over HTTP.
    pub fn new(config: Config) -> color_eyre::eyre::Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: Transport> PubNub<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            inner: Arc::new(Inner { config, transport }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Send a request and classify the outcome as an acknowledgment.
    ///
    /// Also accepts a request taken from a previous status to re-issue it.
    pub async fn execute(&self, request: PushRequest) -> AckStatus {
        let response = match self.dispatch(&request).await {
            Ok(response) => response,
            Err(status) => return status,
        };

        let decoded = if request.operation().is_mutation() {
            pubnub_core::decode_ack(response.status_code, &response.body)
        } else {
            pubnub_core::decode_enabled_channels(response.status_code, &response.body).map(|_| ())
        };

        let status = match decoded {
            Ok(()) => Status::acknowledged(request, response.status_code, response.url),
            Err(err) => Status::failure(
                request,
                err.category,
                response.status_code,
                Some(response.url),
                err.data,
            ),
        };
        log_status(&status);
        status
    }

    /// Send an audit request. Mutating requests are rejected without being sent.
    pub async fn audit(&self, request: PushRequest) -> AuditOutcome {
        let operation = request.operation();
        if operation.is_mutation() {
            let status = Status::rejected(request, &RequestError::NotAnAudit(operation));
            log_status(&status);
            return Err(status);
        }

        let response = self.dispatch(&request).await?;

        match pubnub_core::decode_enabled_channels(response.status_code, &response.body) {
            Ok(channels) => {
                tracing::debug!(count = channels.len(), "push enabled channels received");
                Ok(EnabledChannels {
                    channels,
                    status_code: response.status_code,
                })
            }
            Err(err) => {
                let status = Status::failure(
                    request,
                    err.category,
                    response.status_code,
                    Some(response.url),
                    err.data,
                );
                log_status(&status);
                Err(status)
            }
        }
    }

    /// Validate, build and send a request. Any failure before a response is
    /// received is returned as an error status.
    async fn dispatch(&self, request: &PushRequest) -> Result<TransportResponse, Status> {
        let config = self.config();
        let endpoint = match request.endpoint(config) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                let status = Status::rejected(request.clone(), &e);
                log_status(&status);
                return Err(status);
            }
        };

        let transport_request = TransportRequest {
            base_url: config.base_url(),
            path: endpoint.path,
            query: endpoint.query,
            timeout: config.request_timeout(),
        };

        tracing::debug!(
            operation = %request.operation(),
            push_type = %request.push_type(),
            channels = request.channels().names().len(),
            "dispatching push request"
        );

        self.inner
            .transport
            .send(&transport_request)
            .await
            .map_err(|e| {
                let category = match &e {
                    TransportError::Timeout => StatusCategory::Timeout,
                    TransportError::Network(_) => StatusCategory::NetworkIssues,
                    TransportError::InvalidRequest(_) => StatusCategory::BadRequest,
                };
                let status = Status::failure(
                    request.clone(),
                    category,
                    0,
                    Some(transport_request.url()),
                    ErrorData {
                        information: e.to_string(),
                        ..Default::default()
                    },
                );
                log_status(&status);
                status
            })
    }
}

fn log_status(status: &Status) {
    if status.is_error() {
        tracing::warn!(
            operation = %status.operation(),
            category = ?status.category(),
            status_code = status.status_code(),
            error = status.error_data().map(|d| d.information.as_str()).unwrap_or_default(),
            "push request failed"
        );
    }
}
