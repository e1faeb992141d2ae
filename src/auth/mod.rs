//! Authentication: session management, auth backend boundary, idle watchdog.

mod backend;
mod session;
mod watchdog;

pub use backend::{AuthBackend, AuthError, AuthSession, AuthUser, HttpAuthBackend, SignupOutcome};
pub use session::{PersistedSession, SessionManager, SessionStore};
pub use watchdog::{ActivitySignal, IdleWatchdog};

#[cfg(test)]
pub(crate) use session::tests::StubBackend;
