use crate::session::SessionEvent;

use super::App;

impl App {
    /// Issue the periodic health poll when due. Returns true on the tick so
    /// the clock refreshes even when nothing changed.
    pub fn process_tick(&mut self) -> bool {
        self.health.maybe_poll(self.controller.version())
    }

    /// Apply a completed health poll, if any.
    pub fn poll_health(&mut self) -> bool {
        match self.health.take_event() {
            Some(event) => self.controller.apply(event),
            None => false,
        }
    }

    /// Apply a finished start/stop command, if any.
    pub fn poll_commands(&mut self) -> bool {
        match self.commands.take_event() {
            Some(event) => self.controller.apply(event),
            None => false,
        }
    }

    /// Keep the stream aligned with session state and drain its events.
    pub fn poll_stream(&mut self) -> bool {
        let mut changed = self.stream.reconcile(self.controller.stream_wanted());
        let poll = self.stream.poll();
        changed |= poll.changed;
        if let Some(detail) = poll.failure {
            changed |= self.controller.apply(SessionEvent::StreamFailed { detail });
        }
        changed
    }
}
