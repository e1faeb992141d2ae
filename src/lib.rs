//! Stashbook core - client library for a personal goods-inventory and
//! wishlist application.
//!
//! This crate holds everything below the UI: the session manager and auth
//! backend boundary, the idle/activity watchdog, the authenticated API
//! client with its retry policy, domain models, and configuration.

pub mod api;
pub mod auth;
pub mod config;
pub mod events;
pub mod models;
pub mod utils;

use std::io;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub use api::{ApiClient, ApiError};
pub use auth::{
    ActivitySignal, AuthBackend, AuthError, HttpAuthBackend, IdleWatchdog, SessionManager,
};
pub use config::Config;
pub use events::{AuthRejectedKind, LogoutReason, SessionEvent, SessionEvents};

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
