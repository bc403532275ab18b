use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::DetectorClient;
use crate::model::{StreamEvent, StreamStats};

/// Outcome of draining the frame channel for one loop iteration.
#[derive(Default)]
pub struct StreamPoll {
    pub changed: bool,
    pub failure: Option<String>,
}

struct LiveStream {
    rx: mpsc::Receiver<StreamEvent>,
    task: JoinHandle<()>,
    stats: StreamStats,
}

/// Manages attachment to the live MJPEG stream.
///
/// Attachment is derived state: the viewer holds a connection exactly while
/// the session is active and the service reachable. Each attach uses a fresh
/// cache-busting token so a stale or half-open connection is never reused
/// across a state transition.
pub struct StreamViewer {
    client: DetectorClient,
    rt: Arc<tokio::runtime::Runtime>,
    attach_seq: u64,
    live: Option<LiveStream>,
}

impl StreamViewer {
    pub fn new(client: DetectorClient, rt: Arc<tokio::runtime::Runtime>) -> Self {
        Self {
            client,
            rt,
            attach_seq: 0,
            live: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.live.is_some()
    }

    pub fn stats(&self) -> Option<&StreamStats> {
        self.live.as_ref().map(|l| &l.stats)
    }

    /// Align attachment with the wanted state. Returns true if it changed.
    pub fn reconcile(&mut self, wanted: bool) -> bool {
        match (wanted, self.live.is_some()) {
            (true, false) => {
                self.attach();
                true
            }
            (false, true) => {
                self.detach();
                true
            }
            _ => false,
        }
    }

    fn attach(&mut self) {
        self.attach_seq += 1;
        tracing::info!(seq = self.attach_seq, "attaching live stream");
        let (rx, task) = self.client.open_stream(self.attach_seq, self.rt.handle());
        self.live = Some(LiveStream {
            rx,
            task,
            stats: StreamStats::new(),
        });
    }

    /// Drop the connection immediately; queued frames are discarded.
    fn detach(&mut self) {
        if let Some(live) = self.live.take() {
            tracing::info!("detaching live stream");
            live.task.abort();
        }
    }

    /// Drain pending stream events. On failure the viewer detaches itself
    /// and reports the detail; the caller feeds it back into connectivity.
    pub fn poll(&mut self) -> StreamPoll {
        let mut result = StreamPoll::default();
        let Some(live) = self.live.as_mut() else {
            return result;
        };

        // Drain up to 100 events per iteration to avoid starving the UI.
        for _ in 0..100 {
            match live.rx.try_recv() {
                Ok(StreamEvent::Frame { len }) => {
                    live.stats.record_frame(len);
                    result.changed = true;
                }
                Ok(StreamEvent::Failed { detail }) => {
                    result.failure = Some(detail);
                    break;
                }
                Ok(StreamEvent::Ended) => {
                    // A close while still wanted is a lost connection.
                    result.failure = Some("stream ended by server".to_string());
                    break;
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    result.failure = Some("stream reader stopped".to_string());
                    break;
                }
            }
        }

        if result.failure.is_some() {
            self.detach();
            result.changed = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn viewer() -> StreamViewer {
        let rt = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .worker_threads(1)
                .build()
                .unwrap(),
        );
        // Never contacted in these tests beyond a doomed connect attempt.
        let client = DetectorClient::new("http://127.0.0.1:9", Duration::from_millis(100)).unwrap();
        StreamViewer::new(client, rt)
    }

    #[test]
    fn reconcile_attaches_and_detaches() {
        let mut v = viewer();
        assert!(!v.is_attached());

        assert!(v.reconcile(true));
        assert!(v.is_attached());
        assert!(v.stats().is_some());
        assert!(!v.reconcile(true), "already attached");

        assert!(v.reconcile(false));
        assert!(!v.is_attached());
        assert!(v.stats().is_none());
        assert!(!v.reconcile(false), "already detached");
    }

    #[test]
    fn reattach_uses_fresh_token() {
        let mut v = viewer();
        v.reconcile(true);
        v.reconcile(false);
        v.reconcile(true);
        assert_eq!(v.attach_seq, 2);
    }
}
