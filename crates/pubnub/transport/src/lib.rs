//! PubNub Transport
//!
//! HTTP delivery of push API requests.

mod http;
mod traits;

pub use http::*;
pub use traits::*;
