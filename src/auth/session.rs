//! Session manager: the single source of truth for the bearer token.
//!
//! Only this component mutates the token. The API client and the idle
//! watchdog hold cheap clones and either read the token or invoke the
//! operations here; they never write it themselves. The one escape hatch is
//! `set_token`, used when a backend-initiated refresh hands us a new
//! credential from outside.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::events::{SessionEvent, SessionEvents};

use super::backend::{AuthBackend, AuthError, SignupOutcome};

/// Session file name in the session directory
const SESSION_FILE: &str = "session.json";

/// Token persisted across process restarts (the cookie analog).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

/// On-disk persistence for the session token.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn load(&self) -> Result<Option<PersistedSession>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .context("Failed to read session file")?;
        let persisted: PersistedSession = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(persisted))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        let persisted = PersistedSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&persisted)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

struct SessionInner {
    backend: Arc<dyn AuthBackend>,
    token: RwLock<Option<String>>,
    store: Option<SessionStore>,
    events: SessionEvents,
}

/// Clone is cheap - all state lives behind one Arc.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

impl SessionManager {
    /// `store` is None for headless contexts (nothing to reconcile with, the
    /// persistence operations become no-ops).
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        store: Option<SessionStore>,
        events: SessionEvents,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                backend,
                token: RwLock::new(None),
                store,
                events,
            }),
        }
    }

    /// Current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Exchange credentials for a session and store its token.
    /// Backend errors propagate unchanged; the stored token is untouched on
    /// failure. No retries here - retry policy belongs to the API client.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let session = self.inner.backend.sign_in(email, password).await?;
        info!("login succeeded");
        self.write_token(Some(session.access_token));
        Ok(())
    }

    /// End the session. The backend sign-out is best effort; the local token
    /// is cleared unconditionally.
    pub async fn logout(&self) {
        if let Some(token) = self.token() {
            if let Err(e) = self.inner.backend.sign_out(&token).await {
                warn!(error = %e, "backend sign-out failed, clearing local session anyway");
            }
        }
        self.write_token(None);
        info!("logged out");
    }

    /// Direct token mutation for externally-originated refresh events.
    /// Does not call the backend.
    pub fn set_token(&self, token: Option<String>) {
        self.write_token(token);
    }

    /// Obtain a fresh token using the live session. On failure the error
    /// propagates and the existing token is kept - an expired-but-present
    /// token is the watchdog's problem, not ours.
    pub async fn refresh_token(&self) -> Result<(), AuthError> {
        let token = self.token().ok_or(AuthError::NoSession)?;
        let session = self.inner.backend.refresh_session(&token).await?;
        self.write_token(Some(session.access_token));
        self.inner.events.emit(SessionEvent::TokenRefreshed);
        Ok(())
    }

    /// Reconcile the persisted token and the backend's live session into the
    /// in-memory token. Returns whether a token is now present. A no-op when
    /// no store is configured.
    pub async fn sync_session(&self) -> Result<bool, AuthError> {
        if self.is_authenticated() {
            return Ok(true);
        }

        let Some(store) = &self.inner.store else {
            return Ok(false);
        };

        let persisted = match store.load() {
            Ok(Some(p)) => p,
            Ok(None) => return Ok(false),
            Err(e) => {
                warn!(error = %e, "failed to load persisted session");
                return Ok(false);
            }
        };

        match self.inner.backend.get_session(&persisted.token).await? {
            Some(session) => {
                debug!("restored session from store");
                // The backend may have rotated the token; adopt its value
                self.write_token(Some(session.access_token));
                Ok(true)
            }
            None => {
                debug!("persisted token no longer valid, discarding");
                if let Err(e) = store.clear() {
                    warn!(error = %e, "failed to clear stale session file");
                }
                Ok(false)
            }
        }
    }

    /// Register a new user. The returned session (if any) is not adopted;
    /// callers log in explicitly.
    pub async fn signup(&self, email: &str, password: &str) -> Result<SignupOutcome, AuthError> {
        self.inner.backend.sign_up(email, password).await
    }

    fn write_token(&self, token: Option<String>) {
        if let Some(store) = &self.inner.store {
            let result = match &token {
                Some(t) => store.save(t),
                None => store.clear(),
            };
            if let Err(e) = result {
                warn!(error = %e, "failed to persist session change");
            }
        }
        *self.inner.token.write().unwrap_or_else(|e| e.into_inner()) = token;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::backend::AuthSession;

    /// Scriptable auth backend for session and watchdog tests.
    #[derive(Default)]
    pub struct StubBackend {
        pub sign_in_result: Mutex<Option<Result<AuthSession, AuthError>>>,
        pub refresh_result: Mutex<Option<Result<AuthSession, AuthError>>>,
        pub live_session: Mutex<Option<AuthSession>>,
        pub sign_out_fails: std::sync::atomic::AtomicBool,
        pub sign_out_calls: AtomicU32,
        pub refresh_calls: AtomicU32,
    }

    impl StubBackend {
        pub fn with_sign_in_token(token: &str) -> Self {
            let stub = Self::default();
            *stub.sign_in_result.lock().unwrap() = Some(Ok(AuthSession {
                access_token: token.to_string(),
            }));
            stub
        }
    }

    #[async_trait]
    impl AuthBackend for StubBackend {
        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession, AuthError> {
            self.sign_in_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AuthError::NoSession))
        }

        async fn sign_out(&self, _token: &str) -> Result<(), AuthError> {
            self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
            if self.sign_out_fails.load(Ordering::SeqCst) {
                Err(AuthError::Backend {
                    status: 500,
                    message: "sign-out exploded".into(),
                })
            } else {
                Ok(())
            }
        }

        async fn get_session(&self, _token: &str) -> Result<Option<AuthSession>, AuthError> {
            Ok(self.live_session.lock().unwrap().clone())
        }

        async fn refresh_session(&self, _token: &str) -> Result<AuthSession, AuthError> {
            self.refresh_calls.fetch_add(1, Ordering::SeqCst);
            self.refresh_result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(AuthError::NoSession))
        }

        async fn sign_up(&self, email: &str, _password: &str) -> Result<SignupOutcome, AuthError> {
            Ok(SignupOutcome {
                user: Some(crate::auth::backend::AuthUser {
                    id: Some(1),
                    email: Some(email.to_string()),
                }),
                session: None,
            })
        }
    }

    pub fn manager_with(backend: StubBackend) -> (SessionManager, SessionEvents) {
        let (events, _rx) = SessionEvents::channel();
        let manager = SessionManager::new(Arc::new(backend), None, events.clone());
        (manager, events)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (manager, _) = manager_with(StubBackend::with_sign_in_token("T"));
        manager.login("user@example.com", "correct-pw").await.unwrap();
        assert_eq!(manager.token().as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_token_unchanged() {
        let stub = StubBackend::default();
        *stub.sign_in_result.lock().unwrap() = Some(Err(AuthError::InvalidCredentials {
            status: 401,
            message: "wrong password".into(),
        }));
        let (manager, _) = manager_with(stub);
        manager.set_token(Some("previous".into()));

        let err = manager.login("user@example.com", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials { .. }));
        assert_eq!(manager.token().as_deref(), Some("previous"));
    }

    #[tokio::test]
    async fn test_logout_clears_token_even_when_backend_fails() {
        let stub = StubBackend::default();
        stub.sign_out_fails.store(true, Ordering::SeqCst);
        let (manager, _) = manager_with(stub);
        manager.set_token(Some("T".into()));

        manager.logout().await;
        assert_eq!(manager.token(), None);
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_backend() {
        let (manager, _) = manager_with(StubBackend::default());
        manager.logout().await;
        assert_eq!(manager.token(), None);
    }

    #[tokio::test]
    async fn test_refresh_updates_token_and_emits_event() {
        let stub = StubBackend::default();
        *stub.refresh_result.lock().unwrap() = Some(Ok(AuthSession {
            access_token: "T2".into(),
        }));
        let (events, mut rx) = SessionEvents::channel();
        let manager = SessionManager::new(Arc::new(stub), None, events);
        manager.set_token(Some("T1".into()));

        manager.refresh_token().await.unwrap();
        assert_eq!(manager.token().as_deref(), Some("T2"));
        assert!(matches!(rx.try_recv(), Ok(SessionEvent::TokenRefreshed)));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_token() {
        let stub = StubBackend::default();
        *stub.refresh_result.lock().unwrap() = Some(Err(AuthError::Backend {
            status: 500,
            message: "refresh broke".into(),
        }));
        let (manager, _) = manager_with(stub);
        manager.set_token(Some("T1".into()));

        assert!(manager.refresh_token().await.is_err());
        assert_eq!(manager.token().as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_refresh_without_session() {
        let (manager, _) = manager_with(StubBackend::default());
        assert!(matches!(
            manager.refresh_token().await,
            Err(AuthError::NoSession)
        ));
    }

    #[tokio::test]
    async fn test_sync_session_restores_persisted_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.save("persisted-token").unwrap();

        let stub = StubBackend::default();
        *stub.live_session.lock().unwrap() = Some(AuthSession {
            access_token: "persisted-token".into(),
        });
        let (events, _rx) = SessionEvents::channel();
        let manager = SessionManager::new(Arc::new(stub), Some(store), events);

        assert!(manager.sync_session().await.unwrap());
        assert_eq!(manager.token().as_deref(), Some("persisted-token"));
    }

    #[tokio::test]
    async fn test_sync_session_discards_dead_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        store.save("stale").unwrap();

        let (events, _rx) = SessionEvents::channel();
        let manager =
            SessionManager::new(Arc::new(StubBackend::default()), Some(store), events);

        assert!(!manager.sync_session().await.unwrap());
        assert_eq!(manager.token(), None);
        // The stale file is gone too
        let store = SessionStore::new(dir.path().to_path_buf());
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sync_session_is_noop_without_store() {
        let (manager, _) = manager_with(StubBackend::default());
        assert!(!manager.sync_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_removes_persisted_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().to_path_buf());
        let (events, _rx) = SessionEvents::channel();
        let manager =
            SessionManager::new(Arc::new(StubBackend::default()), Some(store), events);

        manager.set_token(Some("T".into()));
        assert!(SessionStore::new(dir.path().to_path_buf())
            .load()
            .unwrap()
            .is_some());

        manager.logout().await;
        assert!(SessionStore::new(dir.path().to_path_buf())
            .load()
            .unwrap()
            .is_none());
    }
}
