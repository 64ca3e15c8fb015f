//! PubNub Client
//!
//! Client core and the APNS API group for managing push notification
//! registrations of a device token.

mod apns;
mod client;

pub use client::*;

pub use pubnub_core::{
    AckStatus, AuditOutcome, Channels, Config, ConfigError, EnabledChannels, ErrorData,
    ErrorStatus, Operation, PushEnvironment, PushOptions, PushRequest, PushToken, PushType,
    RequestError, Status, StatusCategory,
};
pub use pubnub_transport::{HttpTransport, Transport};
