use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use crate::client::{ClientError, DetectorClient};
use crate::session::SessionEvent;

/// Periodic liveness poll against the service root.
///
/// Ticks are driven by the main loop at a fixed interval, no backoff or
/// jitter. At most one poll is in flight at a time; results come back
/// through `take_event` and are applied by the session controller. Once the
/// loop exits nothing polls and nothing applies.
pub struct HealthMonitor {
    client: DetectorClient,
    rt: Arc<tokio::runtime::Runtime>,
    interval: Duration,
    last_poll: Instant,
    in_flight: Option<Receiver<SessionEvent>>,
}

impl HealthMonitor {
    pub fn new(
        client: DetectorClient,
        rt: Arc<tokio::runtime::Runtime>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            rt,
            interval,
            // Backdated so the first loop iteration polls immediately.
            last_poll: Instant::now() - interval,
            in_flight: None,
        }
    }

    /// Issue a poll if the interval elapsed. `stamp` is the session version
    /// at issue time; the controller discards the result if the session
    /// moved while the poll was in flight. Returns true when the tick fired.
    pub fn maybe_poll(&mut self, stamp: u64) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_poll) < self.interval {
            return false;
        }
        self.last_poll = now;

        if self.in_flight.is_some() {
            // Previous poll still pending; keep the cadence, skip this tick.
            return true;
        }

        let (tx, rx) = std::sync::mpsc::channel();
        self.in_flight = Some(rx);
        let client = self.client.clone();
        self.rt.handle().spawn(async move {
            let outcome = client.health().await;
            let _ = tx.send(SessionEvent::HealthChecked { stamp, outcome });
        });
        true
    }

    /// Fetch a completed poll, if any.
    pub fn take_event(&mut self) -> Option<SessionEvent> {
        let rx = self.in_flight.as_ref()?;
        match rx.try_recv() {
            Ok(event) => {
                self.in_flight = None;
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = None;
                Some(SessionEvent::HealthChecked {
                    stamp: 0, // unused for failures
                    outcome: Err(ClientError::Transport("health task dropped".into())),
                })
            }
        }
    }
}
