//! Request statuses and results.

use crate::{Operation, PushRequest, RequestError};

/// Classification of a request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    /// Service accepted the request.
    Acknowledgment,
    /// Malformed input or rejected parameters.
    BadRequest,
    /// Keyset or auth key lacks permission.
    AccessDenied,
    Timeout,
    NetworkIssues,
    /// Response body could not be decoded.
    MalformedResponse,
    Unknown,
}

impl StatusCategory {
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Acknowledgment)
    }

    /// Category for an HTTP status code.
    pub fn from_http_status(code: u16) -> Self {
        match code {
            200..=299 => Self::Acknowledgment,
            400 => Self::BadRequest,
            403 => Self::AccessDenied,
            _ => Self::Unknown,
        }
    }
}

/// Error detail reported by the service or the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorData {
    /// Human readable description.
    pub information: String,
    /// Channels the service reported as affected.
    pub channels: Vec<String>,
    /// Service component that produced the error.
    pub service: Option<String>,
}

/// Outcome of a push API call.
#[derive(Debug, Clone)]
pub struct Status {
    category: StatusCategory,
    status_code: u16,
    url: Option<String>,
    error_data: Option<ErrorData>,
    request: PushRequest,
}

/// Status of a mutating operation.
pub type AckStatus = Status;

/// Status on the failure path of the audit operation.
pub type ErrorStatus = Status;

impl Status {
    /// Create a successful status.
    pub fn acknowledged(request: PushRequest, status_code: u16, url: impl Into<String>) -> Self {
        Self {
            category: StatusCategory::Acknowledgment,
            status_code,
            url: Some(url.into()),
            error_data: None,
            request,
        }
    }

    /// Create a failed status.
    pub fn failure(
        request: PushRequest,
        category: StatusCategory,
        status_code: u16,
        url: Option<String>,
        error_data: ErrorData,
    ) -> Self {
        Self {
            category,
            status_code,
            url,
            error_data: Some(error_data),
            request,
        }
    }

    /// Status for a request rejected before it was sent.
    pub fn rejected(request: PushRequest, error: &RequestError) -> Self {
        Self::failure(
            request,
            StatusCategory::BadRequest,
            0,
            None,
            ErrorData {
                information: error.to_string(),
                ..Default::default()
            },
        )
    }

    pub fn operation(&self) -> Operation {
        self.request.operation()
    }

    pub fn category(&self) -> StatusCategory {
        self.category
    }

    pub fn is_error(&self) -> bool {
        self.category.is_error()
    }

    /// HTTP status code, or 0 when no response was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// URL the request was sent to.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn error_data(&self) -> Option<&ErrorData> {
        self.error_data.as_ref()
    }

    /// Request this status was produced for. Pass it back to the client to re-issue.
    pub fn request(&self) -> &PushRequest {
        &self.request
    }

    pub fn into_request(self) -> PushRequest {
        self.request
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.operation(), self.category)?;
        if self.status_code != 0 {
            write!(f, " (HTTP {})", self.status_code)?;
        }
        if let Some(data) = &self.error_data {
            write!(f, ": {}", data.information)?;
        }
        Ok(())
    }
}

/// Result of the push audit operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledChannels {
    /// Channels with push notifications enabled for the token.
    pub channels: Vec<String>,
    pub status_code: u16,
}

/// Outcome of the push audit operation.
pub type AuditOutcome = Result<EnabledChannels, ErrorStatus>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PushToken;

    #[test]
    fn test_http_categories() {
        assert_eq!(
            StatusCategory::from_http_status(200),
            StatusCategory::Acknowledgment
        );
        assert_eq!(StatusCategory::from_http_status(400), StatusCategory::BadRequest);
        assert_eq!(StatusCategory::from_http_status(403), StatusCategory::AccessDenied);
        assert_eq!(StatusCategory::from_http_status(502), StatusCategory::Unknown);
    }

    #[test]
    fn test_rejected_status_keeps_request() {
        let request = PushRequest::add(vec!["a"], PushToken::default());
        let status = Status::rejected(request.clone(), &RequestError::EmptyToken);

        assert!(status.is_error());
        assert_eq!(status.category(), StatusCategory::BadRequest);
        assert_eq!(status.status_code(), 0);
        assert_eq!(status.operation(), Operation::AddPushNotificationsOnChannels);
        assert_eq!(status.request(), &request);
        assert_eq!(
            status.to_string(),
            "add push notifications on channels: BadRequest: device push token is empty"
        );
    }
}
