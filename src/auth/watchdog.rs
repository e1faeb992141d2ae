//! Idle/activity watchdog.
//!
//! Watches for qualifying activity signals and enforces the idle timeout:
//! with no activity for the configured window the session is logged out and
//! a `LoggedOut` event is emitted for the UI to route on. Shortly before the
//! idle deadline a refresh check fires; if any activity was seen since the
//! last check, the token is silently renewed.
//!
//! Each Active period is one tokio task that owns both deadlines, so there
//! is never more than one live idle deadline or refresh deadline; stopping
//! the watchdog tears the task down and every timer with it.

use std::sync::Arc;

use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::config::{ActivityTrigger, WatchdogConfig};
use crate::events::{LogoutReason, SessionEvent, SessionEvents};

use super::session::SessionManager;

/// Handle used to report qualifying activity to the watchdog.
///
/// With the `ApiActivity` trigger the API client pulses this after each
/// completed authenticated request; with the `Interaction` trigger the
/// embedding UI pulses it from its input handling. Pulses while the watchdog
/// is inactive are harmless.
#[derive(Clone)]
pub struct ActivitySignal {
    notify: Arc<Notify>,
}

impl ActivitySignal {
    fn new() -> Self {
        Self {
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn pulse(&self) {
        self.notify.notify_one();
    }

    #[cfg(test)]
    pub(crate) async fn notified(&self) {
        self.notify.notified().await;
    }
}

struct WatchTask {
    // Consumed on stop; a stopped task cannot be stopped twice
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

pub struct IdleWatchdog {
    config: WatchdogConfig,
    session: SessionManager,
    events: SessionEvents,
    signal: ActivitySignal,
    task: Option<WatchTask>,
}

impl IdleWatchdog {
    pub fn new(config: WatchdogConfig, session: SessionManager, events: SessionEvents) -> Self {
        Self {
            config,
            session,
            events,
            signal: ActivitySignal::new(),
            task: None,
        }
    }

    /// Signal handle for whoever produces qualifying activity.
    pub fn activity_signal(&self) -> ActivitySignal {
        self.signal.clone()
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.handle.is_finished())
    }

    /// Enter the Active state. A no-op while already watching.
    pub fn start_watching(&mut self) {
        if self.is_active() {
            return;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(watch(
            self.config.clone(),
            self.session.clone(),
            self.events.clone(),
            self.signal.notify.clone(),
            stop_rx,
        ));
        self.task = Some(WatchTask {
            stop: stop_tx,
            handle,
        });
        debug!(
            idle_minutes = self.config.idle_timeout_minutes,
            trigger = ?self.config.trigger,
            "watchdog started"
        );
    }

    /// Leave the Active state, cancelling both deadlines. A no-op while
    /// already inactive.
    pub async fn stop_watching(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        // Send fails if the task already exited on its own; either way the
        // join below observes a finished task and no timers remain.
        let _ = task.stop.send(());
        if let Err(e) = task.handle.await {
            warn!(error = %e, "watchdog task panicked");
        }
        debug!("watchdog stopped");
    }
}

async fn watch(
    config: WatchdogConfig,
    session: SessionManager,
    events: SessionEvents,
    activity: Arc<Notify>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let idle_timeout = config.idle_timeout();
    let refresh_after = config.refresh_deadline();
    let refresh_enabled = config.trigger == ActivityTrigger::ApiActivity;

    let idle = time::sleep(idle_timeout);
    let refresh = time::sleep(refresh_after);
    tokio::pin!(idle, refresh);

    let mut refresh_armed = refresh_enabled;
    let mut had_activity = false;

    loop {
        tokio::select! {
            _ = &mut stop_rx => break,

            _ = activity.notified() => {
                // Sliding window: both deadlines restart from this instant
                had_activity = true;
                let now = Instant::now();
                idle.as_mut().reset(now + idle_timeout);
                if refresh_enabled {
                    refresh.as_mut().reset(now + refresh_after);
                    refresh_armed = true;
                }
            }

            _ = &mut idle => {
                info!(
                    minutes = config.idle_timeout_minutes,
                    "no activity within idle window, logging out"
                );
                session.logout().await;
                events.emit(SessionEvent::LoggedOut {
                    reason: LogoutReason::IdleTimeout,
                });
                break;
            }

            _ = &mut refresh, if refresh_armed => {
                // Fires once per activity window; re-armed on the next signal
                refresh_armed = false;
                if had_activity {
                    match session.refresh_token().await {
                        Ok(()) => info!("token refreshed ahead of idle deadline"),
                        Err(e) => warn!(error = %e, "pre-deadline token refresh failed"),
                    }
                }
                had_activity = false;
            }
        }
    }
}
