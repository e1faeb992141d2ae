//! Authenticated REST API client.

mod client;
mod error;

pub use client::{validate_image, ApiClient};
pub use error::{ApiError, SESSION_TIMEOUT_CODE};
