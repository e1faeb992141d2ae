//! Session lifecycle events.
//!
//! The core never navigates or renders; when the session is torn down it
//! emits a `SessionEvent` and the embedding UI decides what the user sees
//! (typically: show a notice and route to the login screen).

use tokio::sync::mpsc;
use tracing::debug;

/// Why the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The idle watchdog hit its deadline.
    IdleTimeout,
    /// The user asked to log out.
    UserRequested,
}

/// How an unauthorized response should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejectedKind {
    /// The backend flagged the session as timed out (`SESSION_TIMEOUT`).
    SessionTimeout,
    /// Any other authentication failure.
    Unauthorized,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Session ended; the UI should route to the login entry point.
    LoggedOut { reason: LogoutReason },
    /// An API call was rejected with 401 and the session was torn down.
    AuthRejected {
        kind: AuthRejectedKind,
        message: Option<String>,
    },
    /// The bearer token was silently renewed.
    TokenRefreshed,
}

/// Cheap-clone sender half of the session event channel.
///
/// Events are fire-and-forget: if nobody is listening (headless use, tests
/// that don't care) emission is a no-op rather than an error.
#[derive(Clone)]
pub struct SessionEvents {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionEvents {
    /// Create the channel, returning the sender and the receiver the UI
    /// event loop should drain.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: SessionEvent) {
        if self.tx.send(event).is_err() {
            debug!("session event dropped: no receiver");
        }
    }
}
