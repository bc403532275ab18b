//! Single-writer session state machine.
//!
//! All mutation of the composite session state (connectivity, active flag,
//! event log) happens here, one event at a time. The health poll, the
//! command runner, and the stream viewer only produce events; the main loop
//! feeds them through `apply`, so no two results ever interleave.

use crate::client::{ClientError, HealthStatus};
use crate::model::{ConnectivityState, EventLog, SessionState};

/// Operator command against the remote detection loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
}

/// A completed asynchronous result, ready to be applied.
#[derive(Debug)]
pub enum SessionEvent {
    /// A health poll finished. `stamp` is the session version captured when
    /// the poll was issued; results stamped before a command commit are
    /// stale and get discarded.
    HealthChecked {
        stamp: u64,
        outcome: Result<HealthStatus, ClientError>,
    },
    /// A start/stop request finished.
    CommandFinished {
        command: Command,
        outcome: Result<(), ClientError>,
    },
    /// The live stream broke mid-flight.
    StreamFailed { detail: String },
}

/// Owns the operator-facing session state and the event log.
pub struct SessionController {
    pub connectivity: ConnectivityState,
    session: SessionState,
    pub log: EventLog,
}

impl SessionController {
    pub fn new() -> Self {
        Self {
            connectivity: ConnectivityState::Checking,
            session: SessionState::default(),
            log: EventLog::new(),
        }
    }

    pub fn active(&self) -> bool {
        self.session.active()
    }

    pub fn version(&self) -> u64 {
        self.session.version()
    }

    /// Start may only be requested while idle and reachable.
    pub fn can_start(&self) -> bool {
        !self.session.active() && self.connectivity.is_connected()
    }

    /// Stop may only be requested while the loop is believed running.
    pub fn can_stop(&self) -> bool {
        self.session.active()
    }

    /// The stream is held exactly while the loop runs and the service is
    /// reachable.
    pub fn stream_wanted(&self) -> bool {
        self.session.active() && self.connectivity.is_connected()
    }

    /// Apply one completed event. Returns true if visible state changed.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::HealthChecked { stamp, outcome } => self.apply_health(stamp, outcome),
            SessionEvent::CommandFinished { command, outcome } => {
                self.apply_command(command, outcome);
                true
            }
            SessionEvent::StreamFailed { detail } => self.apply_stream_failure(&detail),
        }
    }

    /// Polling is silent: connectivity and reconciliation only, no log.
    fn apply_health(&mut self, stamp: u64, outcome: Result<HealthStatus, ClientError>) -> bool {
        let before = self.connectivity;
        let mut reconciled = false;
        match outcome {
            Ok(HealthStatus::Alive { running }) => {
                self.connectivity = ConnectivityState::Connected;
                if let Some(running) = running {
                    if self.session.reconcile(running, stamp) {
                        tracing::info!(running, "session state reconciled from poll");
                        reconciled = true;
                    }
                }
            }
            Ok(HealthStatus::RouteMissing) => {
                // The route is gone but something answered; the service is up.
                self.connectivity = ConnectivityState::Connected;
            }
            Err(e) => {
                tracing::debug!(error = %e, "health poll failed");
                self.connectivity = ConnectivityState::Disconnected;
            }
        }
        reconciled || self.connectivity != before
    }

    fn apply_command(&mut self, command: Command, outcome: Result<(), ClientError>) {
        match (command, outcome) {
            (Command::Start, Ok(())) => {
                self.session.force(true);
                self.log.append("System initialized. Camera stream active.");
            }
            (Command::Start, Err(ClientError::Service { status })) => {
                tracing::warn!(status, "start rejected");
                self.log
                    .append("Error: Could not start system. Check backend logs.");
            }
            (Command::Start, Err(ClientError::Transport(detail))) => {
                tracing::warn!(%detail, "start unreachable");
                self.log
                    .append("Error: Could not start system. Is the backend running?");
            }
            (Command::Stop, outcome) => {
                // A failed stop still converges to "stopped" locally: the UI
                // must never be left believing the loop runs after the
                // operator halted it. The failure surfaces via the log only.
                self.session.force(false);
                match outcome {
                    Ok(()) => self.log.append("System halted."),
                    Err(ClientError::Service { status }) => {
                        tracing::warn!(status, "stop rejected");
                        self.log
                            .append("Error: Could not stop system. Check backend logs.");
                    }
                    Err(ClientError::Transport(detail)) => {
                        tracing::warn!(%detail, "stop unreachable");
                        self.log.append("Error: Could not stop system.");
                    }
                }
            }
        }
    }

    /// The stream may only degrade connectivity; the next successful poll
    /// restores it.
    fn apply_stream_failure(&mut self, detail: &str) -> bool {
        tracing::warn!(%detail, "live stream failed");
        let changed = self.connectivity != ConnectivityState::Disconnected;
        self.connectivity = ConnectivityState::Disconnected;
        changed
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> ClientError {
        ClientError::Transport("connection refused".into())
    }

    fn connected(controller: &mut SessionController, running: Option<bool>) {
        let event = SessionEvent::HealthChecked {
            stamp: controller.version(),
            outcome: Ok(HealthStatus::Alive { running }),
        };
        controller.apply(event);
    }

    #[test]
    fn poll_success_sets_connected_and_reconciles() {
        let mut c = SessionController::new();
        connected(&mut c, Some(true));
        assert_eq!(c.connectivity, ConnectivityState::Connected);
        assert!(c.active());
        assert!(c.log.is_empty()); // polling is silent
    }

    #[test]
    fn poll_404_means_connected_without_reconcile() {
        let mut c = SessionController::new();
        let changed = c.apply(SessionEvent::HealthChecked {
            stamp: c.version(),
            outcome: Ok(HealthStatus::RouteMissing),
        });
        assert!(changed);
        assert_eq!(c.connectivity, ConnectivityState::Connected);
        assert!(!c.active());
    }

    #[test]
    fn poll_service_error_and_transport_both_disconnect() {
        for outcome in [
            Err(ClientError::Service { status: 500 }),
            Err(transport()),
        ] {
            let mut c = SessionController::new();
            c.apply(SessionEvent::HealthChecked { stamp: 0, outcome });
            assert_eq!(c.connectivity, ConnectivityState::Disconnected);
            assert!(c.log.is_empty());
        }
    }

    #[test]
    fn repeated_poll_failures_stay_silent() {
        let mut c = SessionController::new();
        for _ in 0..3 {
            c.apply(SessionEvent::HealthChecked {
                stamp: 0,
                outcome: Err(transport()),
            });
            assert_eq!(c.connectivity, ConnectivityState::Disconnected);
        }
        assert!(c.log.is_empty());
    }

    #[test]
    fn start_success_activates_and_logs() {
        let mut c = SessionController::new();
        connected(&mut c, Some(false));
        c.apply(SessionEvent::CommandFinished {
            command: Command::Start,
            outcome: Ok(()),
        });
        assert!(c.active());
        assert_eq!(c.log.len(), 1);
        assert!(
            c.log
                .entries()
                .next()
                .unwrap()
                .message
                .contains("initialized")
        );
    }

    #[test]
    fn start_failure_leaves_inactive_and_logs_error() {
        for outcome in [
            Err(ClientError::Service { status: 500 }),
            Err(transport()),
        ] {
            let mut c = SessionController::new();
            connected(&mut c, Some(false));
            c.apply(SessionEvent::CommandFinished {
                command: Command::Start,
                outcome,
            });
            assert!(!c.active());
            assert_eq!(c.log.len(), 1);
            assert!(c.log.entries().next().unwrap().message.starts_with("Error"));
        }
    }

    #[test]
    fn stop_always_deactivates() {
        for outcome in [
            Ok(()),
            Err(ClientError::Service { status: 500 }),
            Err(transport()),
        ] {
            let mut c = SessionController::new();
            connected(&mut c, Some(true));
            assert!(c.active());
            c.apply(SessionEvent::CommandFinished {
                command: Command::Stop,
                outcome,
            });
            assert!(!c.active());
            assert_eq!(c.log.len(), 1);
        }
    }

    #[test]
    fn stale_poll_cannot_overwrite_command_commit() {
        let mut c = SessionController::new();
        connected(&mut c, Some(false));
        let stale_stamp = c.version();

        c.apply(SessionEvent::CommandFinished {
            command: Command::Start,
            outcome: Ok(()),
        });
        assert!(c.active());

        // A poll issued before the command lands now, claiming not-running.
        c.apply(SessionEvent::HealthChecked {
            stamp: stale_stamp,
            outcome: Ok(HealthStatus::Alive {
                running: Some(false),
            }),
        });
        assert!(c.active(), "stale poll must be discarded");
        assert_eq!(c.connectivity, ConnectivityState::Connected);
    }

    #[test]
    fn stream_failure_only_degrades_connectivity() {
        let mut c = SessionController::new();
        connected(&mut c, Some(true));
        let changed = c.apply(SessionEvent::StreamFailed {
            detail: "mid-stream disconnect".into(),
        });
        assert!(changed);
        assert_eq!(c.connectivity, ConnectivityState::Disconnected);
        assert!(c.active(), "active belief survives until reconciled");
        assert!(c.log.is_empty());
        assert!(!c.stream_wanted());
    }

    #[test]
    fn start_preconditions() {
        let mut c = SessionController::new();
        assert!(!c.can_start(), "not reachable yet");
        connected(&mut c, Some(false));
        assert!(c.can_start());
        c.apply(SessionEvent::CommandFinished {
            command: Command::Start,
            outcome: Ok(()),
        });
        assert!(!c.can_start(), "already active");
        assert!(c.can_stop());
    }
}
