//! Remote chat service client

pub mod client;
pub mod error;

pub use client::{HttpChatApi, HttpConnector};
pub use error::{ApiError, ApiResult, FALLBACK_MESSAGE};
