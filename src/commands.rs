use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::client::{ClientError, DetectorClient};
use crate::session::{Command, SessionEvent};

/// Runs start/stop requests off the UI thread, one at a time.
///
/// The single-flight token is the pending receiver itself: a second request
/// while one is in flight is dropped. Commands never retry; the next health
/// poll is the only mechanism that corrects a stale belief.
pub struct CommandRunner {
    client: DetectorClient,
    rt: Arc<tokio::runtime::Runtime>,
    in_flight: Option<(Command, Receiver<Result<(), ClientError>>)>,
}

impl CommandRunner {
    pub fn new(client: DetectorClient, rt: Arc<tokio::runtime::Runtime>) -> Self {
        Self {
            client,
            rt,
            in_flight: None,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Dispatch a command. Ignored while another command is pending.
    pub fn request(&mut self, command: Command) {
        if self.in_flight.is_some() {
            return;
        }
        tracing::info!(?command, "dispatching command");

        let (tx, rx) = std::sync::mpsc::channel();
        self.in_flight = Some((command, rx));
        let client = self.client.clone();
        self.rt.handle().spawn(async move {
            let outcome = match command {
                Command::Start => client.start().await,
                Command::Stop => client.stop().await,
            };
            let _ = tx.send(outcome);
        });
    }

    /// Fetch a finished command, if any.
    pub fn take_event(&mut self) -> Option<SessionEvent> {
        let (command, rx) = self.in_flight.as_ref()?;
        let command = *command;
        match rx.try_recv() {
            Ok(outcome) => {
                self.in_flight = None;
                Some(SessionEvent::CommandFinished { command, outcome })
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = None;
                Some(SessionEvent::CommandFinished {
                    command,
                    outcome: Err(ClientError::Transport("command task dropped".into())),
                })
            }
        }
    }
}
