//! Push management handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use pubnub_core::{PushEnvironment, PushToken, PushType};

use crate::{RegistrationKey, SandboxState};

type Params = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Api {
    V1,
    V2,
}

/// Error response in the service's error object format.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
    service: &'static str,
    channels: Vec<String>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            service: "Push",
            channels: Vec::new(),
        }
    }

    fn forbidden(channels: Vec<String>) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: "Forbidden".to_string(),
            service: "Access Manager",
            channels,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, message = %self.message, "rejecting request");
        let body = json!({
            "error": true,
            "status": self.status.as_u16(),
            "service": self.service,
            "message": self.message,
            "payload": { "channels": self.channels },
        });
        (self.status, Json(body)).into_response()
    }
}

/// Add, remove or list channels for a legacy registration.
pub async fn modify_v1(
    State(state): State<SandboxState>,
    Path((sub_key, token)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    respond(modify(&state, Api::V1, sub_key, &token, &params))
}

/// Add, remove or list channels for an apns2 registration.
pub async fn modify_v2(
    State(state): State<SandboxState>,
    Path((sub_key, token)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    respond(modify(&state, Api::V2, sub_key, &token, &params))
}

/// Remove a legacy registration from every channel.
pub async fn remove_device_v1(
    State(state): State<SandboxState>,
    Path((sub_key, token)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    respond(remove_device(&state, Api::V1, sub_key, &token, &params))
}

/// Remove an apns2 registration from every channel.
pub async fn remove_device_v2(
    State(state): State<SandboxState>,
    Path((sub_key, token)): Path<(String, String)>,
    Query(params): Query<Params>,
) -> Response {
    respond(remove_device(&state, Api::V2, sub_key, &token, &params))
}

fn respond(result: Result<serde_json::Value, ApiError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    }
}

fn modify(
    state: &SandboxState,
    api: Api,
    sub_key: String,
    token: &str,
    params: &Params,
) -> Result<serde_json::Value, ApiError> {
    let key = registration_key(api, sub_key, token, params)?;

    let add = params.get("add").map(|list| split_channels(list)).transpose()?;
    let remove = params
        .get("remove")
        .map(|list| split_channels(list))
        .transpose()?;

    let touched: Vec<String> = add
        .iter()
        .chain(remove.iter())
        .flatten()
        .cloned()
        .collect();
    authorize(state, params, touched)?;

    if add.is_none() && remove.is_none() {
        return Ok(json!(state.channels(&key)));
    }

    if let Some(channels) = &add {
        state.add(&key, channels);
        tracing::info!(token = %key.token, count = channels.len(), "channels added");
    }
    if let Some(channels) = &remove {
        state.remove(&key, channels);
        tracing::info!(token = %key.token, count = channels.len(), "channels removed");
    }

    Ok(json!([1, "Modified Channels"]))
}

fn remove_device(
    state: &SandboxState,
    api: Api,
    sub_key: String,
    token: &str,
    params: &Params,
) -> Result<serde_json::Value, ApiError> {
    let key = registration_key(api, sub_key, token, params)?;
    authorize(state, params, Vec::new())?;

    state.remove_device(&key);
    tracing::info!(token = %key.token, "device removed");

    Ok(json!([1, "Removed Device"]))
}

fn authorize(state: &SandboxState, params: &Params, channels: Vec<String>) -> Result<(), ApiError> {
    if state.is_authorized(params.get("auth").map(String::as_str)) {
        Ok(())
    } else {
        Err(ApiError::forbidden(channels))
    }
}

fn registration_key(
    api: Api,
    sub_key: String,
    token: &str,
    params: &Params,
) -> Result<RegistrationKey, ApiError> {
    let token = PushToken::from_hex(token)
        .ok()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::bad_request("Invalid device token"))?;

    let push_type: PushType = params
        .get("type")
        .ok_or_else(|| ApiError::bad_request("Missing type"))?
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid type argument"))?;

    let (environment, topic) = match (api, push_type) {
        (Api::V1, PushType::Apns2) => {
            return Err(ApiError::bad_request("apns2 requires the v2 endpoint"));
        }
        (Api::V1, _) => (None, None),
        (Api::V2, PushType::Apns2) => {
            let environment: PushEnvironment = match params.get("environment") {
                Some(value) => value
                    .parse()
                    .map_err(|_| ApiError::bad_request("Invalid environment"))?,
                None => PushEnvironment::default(),
            };
            let topic = params
                .get("topic")
                .filter(|topic| !topic.is_empty())
                .ok_or_else(|| ApiError::bad_request("Missing topic"))?;
            (Some(environment), Some(topic.clone()))
        }
        (Api::V2, _) => return Err(ApiError::bad_request("Invalid type argument")),
    };

    Ok(RegistrationKey {
        sub_key,
        push_type,
        token: token.to_hex(),
        environment,
        topic,
    })
}

fn split_channels(list: &str) -> Result<Vec<String>, ApiError> {
    let channels: Vec<String> = list.split(',').map(str::to_string).collect();
    if channels.iter().any(String::is_empty) {
        return Err(ApiError::bad_request("Invalid channel name"));
    }
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt as _;

    use super::*;
    use crate::push_router;

    async fn get(state: &SandboxState, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = push_router(state.clone())
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let state = SandboxState::new();
        let (status, body) = get(
            &state,
            "/v1/push/sub-key/demo/devices/ABCD?add=wwdc,google.io&type=apns",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([1, "Modified Channels"]));

        let (_, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd?type=apns").await;
        assert_eq!(body, json!(["wwdc", "google.io"]));

        // Other push types are separate registrations.
        let (_, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd?type=gcm").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_remove_device() {
        let state = SandboxState::new();
        get(&state, "/v1/push/sub-key/demo/devices/abcd?add=a,b&type=apns").await;

        let (status, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd/remove?type=apns").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([1, "Removed Device"]));

        let (_, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd?type=apns").await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let state = SandboxState::new();

        let (status, body) = get(&state, "/v1/push/sub-key/demo/devices/xyz?type=apns").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid device token");

        let (status, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing type");

        let (status, body) = get(
            &state,
            "/v2/push/sub-key/demo/devices-apns2/abcd?type=apns2&environment=production",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Missing topic");

        let (status, _) = get(&state, "/v1/push/sub-key/demo/devices/abcd?add=a,,b&type=apns").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apns2_environments_are_separate() {
        let state = SandboxState::new();
        get(
            &state,
            "/v2/push/sub-key/demo/devices-apns2/abcd?add=a&type=apns2&environment=production&topic=com.example",
        )
        .await;

        let (_, body) = get(
            &state,
            "/v2/push/sub-key/demo/devices-apns2/abcd?type=apns2&environment=development&topic=com.example",
        )
        .await;
        assert_eq!(body, json!([]));

        let (_, body) = get(
            &state,
            "/v2/push/sub-key/demo/devices-apns2/abcd?type=apns2&environment=production&topic=com.example",
        )
        .await;
        assert_eq!(body, json!(["a"]));
    }

    #[tokio::test]
    async fn test_forbidden_without_auth() {
        let state = SandboxState::new().with_auth_key("secret");

        let (status, body) = get(&state, "/v1/push/sub-key/demo/devices/abcd?add=a&type=apns").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["payload"]["channels"], json!(["a"]));

        let (status, _) = get(
            &state,
            "/v1/push/sub-key/demo/devices/abcd?add=a&type=apns&auth=secret",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
