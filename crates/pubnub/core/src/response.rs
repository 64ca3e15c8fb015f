//! Push API response decoding.
//!
//! Mutations answer `[1, "Modified Channels"]`, the audit answers a JSON array
//! of channel names. Failures come either as an error object
//! (`{"error": true, "status": 403, "message": "...", "payload": {"channels": [...]}}`)
//! or as the legacy `[0, "message"]` array.

use serde::Deserialize;
use serde_json::Value;

use crate::{ErrorData, StatusCategory};

/// Decoded service-side failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub category: StatusCategory,
    pub data: ErrorData,
}

impl ServiceError {
    fn new(category: StatusCategory, information: impl Into<String>) -> Self {
        Self {
            category,
            data: ErrorData {
                information: information.into(),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    service: Option<String>,
    #[serde(default)]
    payload: Option<ErrorPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    channels: Vec<String>,
}

/// Decode the response to a mutating request.
pub fn decode_ack(status_code: u16, body: &[u8]) -> Result<(), ServiceError> {
    let value = parse(status_code, body)?;
    match &value {
        Value::Array(items) if items.first().and_then(Value::as_i64) == Some(1) => Ok(()),
        Value::Array(items) if items.first().and_then(Value::as_i64) == Some(0) => {
            Err(legacy_error(status_code, items))
        }
        Value::Object(_) => match error_body(status_code, &value) {
            Some(err) => Err(err),
            None => Ok(()),
        },
        _ => Err(ServiceError::new(
            StatusCategory::MalformedResponse,
            "unexpected acknowledgment body",
        )),
    }
}

/// Decode the response to an audit request into channel names.
pub fn decode_enabled_channels(status_code: u16, body: &[u8]) -> Result<Vec<String>, ServiceError> {
    let value = parse(status_code, body)?;
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(channel) => Ok(channel),
                other => Err(ServiceError::new(
                    StatusCategory::MalformedResponse,
                    format!("unexpected channel entry: {other}"),
                )),
            })
            .collect(),
        Value::Object(_) => match error_body(status_code, &value) {
            Some(err) => Err(err),
            None => Err(ServiceError::new(
                StatusCategory::MalformedResponse,
                "audit response is not a channel list",
            )),
        },
        _ => Err(ServiceError::new(
            StatusCategory::MalformedResponse,
            "audit response is not a channel list",
        )),
    }
}

/// Parse the body, turning non-2xx responses into errors.
fn parse(status_code: u16, body: &[u8]) -> Result<Value, ServiceError> {
    let parsed = serde_json::from_slice::<Value>(body);
    let category = StatusCategory::from_http_status(status_code);

    if !category.is_error() {
        return parsed.map_err(|e| {
            ServiceError::new(
                StatusCategory::MalformedResponse,
                format!("failed to parse response: {e}"),
            )
        });
    }

    let err = match &parsed {
        Ok(value @ Value::Object(_)) => error_body(status_code, value),
        Ok(Value::Array(items)) => Some(legacy_error(status_code, items)),
        _ => None,
    };

    Err(err.unwrap_or_else(|| {
        let text = String::from_utf8_lossy(body);
        let information = if text.trim().is_empty() {
            format!("HTTP {status_code}")
        } else {
            text.trim().to_string()
        };
        ServiceError::new(category, information)
    }))
}

/// Decode an error object, or `None` if it does not describe an error.
fn error_body(status_code: u16, value: &Value) -> Option<ServiceError> {
    let body = ErrorBody::deserialize(value).ok()?;
    let http_error = StatusCategory::from_http_status(status_code).is_error();
    if !body.error && !http_error {
        return None;
    }

    let code = body.status.unwrap_or(status_code);
    let category = match StatusCategory::from_http_status(code) {
        StatusCategory::Acknowledgment => StatusCategory::BadRequest,
        category => category,
    };

    Some(ServiceError {
        category,
        data: ErrorData {
            information: body.message.unwrap_or_else(|| format!("HTTP {code}")),
            channels: body.payload.unwrap_or_default().channels,
            service: body.service,
        },
    })
}

fn legacy_error(status_code: u16, items: &[Value]) -> ServiceError {
    let category = match StatusCategory::from_http_status(status_code) {
        StatusCategory::Acknowledgment => StatusCategory::BadRequest,
        category => category,
    };
    let information = items
        .get(1)
        .and_then(Value::as_str)
        .unwrap_or("request rejected")
        .to_string();
    ServiceError::new(category, information)
}
