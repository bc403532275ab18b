use serde::Deserialize;

/// Reachability of the detection service, as last observed.
///
/// Only health polls move this in either direction; a stream failure may
/// additionally force it to `Disconnected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityState {
    /// Startup state, before the first poll completes.
    Checking,
    Connected,
    Disconnected,
}

impl ConnectivityState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectivityState::Connected)
    }
}

/// Operator-facing belief about whether the remote detection loop is running.
///
/// Every applied mutation bumps `version`. Asynchronous results are stamped
/// with the version current at issue time; a result whose stamp no longer
/// matches lost the race to a newer mutation and must be discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionState {
    active: bool,
    version: u64,
}

impl SessionState {
    pub fn active(&self) -> bool {
        self.active
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Commit an operator command result. Commands carry the latest intent
    /// and always supersede in-flight polls.
    pub fn force(&mut self, active: bool) {
        self.active = active;
        self.version += 1;
    }

    /// Apply a server-reported running flag observed at `stamp`. Returns true
    /// if the flag was applied and changed the local belief.
    pub fn reconcile(&mut self, running: bool, stamp: u64) -> bool {
        if stamp != self.version || running == self.active {
            return false;
        }
        self.active = running;
        self.version += 1;
        true
    }
}

/// Liveness reply from the service root. Extra fields are ignored; `running`
/// may be absent, in which case the reply confirms reachability only.
#[derive(Debug, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    pub running: Option<bool>,
}
