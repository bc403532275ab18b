// Re-export all model types from submodules.

pub use log::{EVENT_LOG_CAPACITY, EventLog, LogEntry};
pub use session::{ConnectivityState, HealthBody, SessionState};
pub use stream::{StreamEvent, StreamStats};

mod log;
mod session;
mod stream;
