//! PubNub Core Types
//!
//! Configuration, push registration requests, statuses and response
//! decoding for the push-notification management API group.

mod config;
mod push;
mod request;
mod response;
mod status;

pub use config::*;
pub use push::*;
pub use request::*;
pub use response::*;
pub use status::*;

/// SDK identifier sent with every request.
pub const PNSDK: &str = concat!("PubNub-Rust/", env!("CARGO_PKG_VERSION"));
