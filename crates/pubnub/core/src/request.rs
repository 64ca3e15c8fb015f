//! Push registration requests.

use crate::{Channels, Config, PNSDK, PushEnvironment, PushOptions, PushToken, PushType};

/// Push API operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AddPushNotificationsOnChannels,
    RemovePushNotificationsFromChannels,
    RemoveAllPushNotifications,
    PushNotificationEnabledChannels,
}

impl Operation {
    /// Check if this operation changes registration state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::PushNotificationEnabledChannels)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AddPushNotificationsOnChannels => "add push notifications on channels",
            Self::RemovePushNotificationsFromChannels => "remove push notifications from channels",
            Self::RemoveAllPushNotifications => "remove all push notifications",
            Self::PushNotificationEnabledChannels => "push notification enabled channels",
        };
        f.write_str(name)
    }
}

/// Reasons a request is rejected before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("device push token is empty")]
    EmptyToken,
    #[error("at least one channel is required")]
    NoChannels,
    #[error("channel name is empty")]
    EmptyChannelName,
    #[error("channel name contains a comma: {0}")]
    InvalidChannelName(String),
    #[error("apns2 requires a topic")]
    MissingTopic,
    #[error("subscribe key is empty")]
    MissingSubscribeKey,
    #[error("{0} is not an audit request")]
    NotAnAudit(Operation),
}

/// A composed push API request.
///
/// Statuses keep the request they were produced for, so a failed call can be
/// re-issued as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRequest {
    operation: Operation,
    channels: Channels,
    token: PushToken,
    push_type: PushType,
    environment: PushEnvironment,
    topic: Option<String>,
}

impl PushRequest {
    fn new(operation: Operation, channels: Channels, token: PushToken) -> Self {
        let defaults = PushOptions::default();
        Self {
            operation,
            channels,
            token,
            push_type: defaults.push_type,
            environment: defaults.environment,
            topic: defaults.topic,
        }
    }

    /// Enable push notifications for `token` on `channels`.
    pub fn add<S: Into<String>>(channels: Vec<S>, token: impl Into<PushToken>) -> Self {
        let channels = Channels::Named(channels.into_iter().map(Into::into).collect());
        Self::new(Operation::AddPushNotificationsOnChannels, channels, token.into())
    }

    /// Disable push notifications for `token` on `channels`.
    ///
    /// [`Channels::All`] or an empty channel list produces the same request as
    /// [`PushRequest::remove_all`].
    pub fn remove(channels: impl Into<Channels>, token: impl Into<PushToken>) -> Self {
        match channels.into() {
            Channels::All => Self::remove_all(token),
            Channels::Named(names) if names.is_empty() => Self::remove_all(token),
            named => Self::new(
                Operation::RemovePushNotificationsFromChannels,
                named,
                token.into(),
            ),
        }
    }

    /// Disable push notifications for `token` on every channel.
    pub fn remove_all(token: impl Into<PushToken>) -> Self {
        Self::new(
            Operation::RemoveAllPushNotifications,
            Channels::All,
            token.into(),
        )
    }

    /// List channels with push notifications enabled for `token`.
    pub fn enabled_channels(token: impl Into<PushToken>) -> Self {
        Self::new(
            Operation::PushNotificationEnabledChannels,
            Channels::All,
            token.into(),
        )
    }

    /// Set push type, environment and topic.
    pub fn with_options(mut self, options: &PushOptions) -> Self {
        self.push_type = options.push_type;
        self.environment = options.environment;
        self.topic = options.topic.clone();
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    pub fn token(&self) -> &PushToken {
        &self.token
    }

    pub fn push_type(&self) -> PushType {
        self.push_type
    }

    pub fn environment(&self) -> PushEnvironment {
        self.environment
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Check the request can be sent.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.token.is_empty() {
            return Err(RequestError::EmptyToken);
        }

        if self.operation == Operation::AddPushNotificationsOnChannels
            && self.channels.names().is_empty()
        {
            return Err(RequestError::NoChannels);
        }

        for name in self.channels.names() {
            if name.is_empty() {
                return Err(RequestError::EmptyChannelName);
            }
            if name.contains(',') {
                return Err(RequestError::InvalidChannelName(name.clone()));
            }
        }

        if self.push_type == PushType::Apns2 && self.topic.as_deref().is_none_or(str::is_empty) {
            return Err(RequestError::MissingTopic);
        }

        Ok(())
    }

    /// Build the endpoint path and query for this request.
    ///
    /// Each call generates a fresh `requestid`.
    pub fn endpoint(&self, config: &Config) -> Result<Endpoint, RequestError> {
        self.validate()?;
        if config.subscribe_key.is_empty() {
            return Err(RequestError::MissingSubscribeKey);
        }

        let sub_key = urlencoding::encode(&config.subscribe_key);
        let token = self.token.to_hex();
        let mut path = match self.push_type {
            PushType::Apns2 => format!("/v2/push/sub-key/{sub_key}/devices-apns2/{token}"),
            _ => format!("/v1/push/sub-key/{sub_key}/devices/{token}"),
        };

        let mut query = Vec::new();
        match self.operation {
            Operation::AddPushNotificationsOnChannels => {
                query.push(("add".to_string(), self.joined_channels()));
            }
            Operation::RemovePushNotificationsFromChannels => {
                query.push(("remove".to_string(), self.joined_channels()));
            }
            Operation::RemoveAllPushNotifications => path.push_str("/remove"),
            Operation::PushNotificationEnabledChannels => {}
        }

        query.push(("type".to_string(), self.push_type.as_str().to_string()));
        if self.push_type == PushType::Apns2 {
            query.push((
                "environment".to_string(),
                self.environment.as_str().to_string(),
            ));
            if let Some(topic) = &self.topic {
                query.push(("topic".to_string(), urlencoding::encode(topic).into_owned()));
            }
        }

        query.push(("uuid".to_string(), urlencoding::encode(&config.uuid).into_owned()));
        query.push(("pnsdk".to_string(), urlencoding::encode(PNSDK).into_owned()));
        query.push(("requestid".to_string(), uuid::Uuid::new_v4().to_string()));
        if let Some(auth) = config.auth_key.as_deref().filter(|key| !key.is_empty()) {
            query.push(("auth".to_string(), urlencoding::encode(auth).into_owned()));
        }

        Ok(Endpoint { path, query })
    }

    fn joined_channels(&self) -> String {
        self.channels
            .names()
            .iter()
            .map(|name| urlencoding::encode(name).into_owned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Path and already percent-encoded query of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Endpoint {
    /// Get a query parameter value.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render `path?query` relative to the origin.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}
