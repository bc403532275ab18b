mod dashboard;
mod header;
mod logs;
mod shared;

use std::io::{self, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Color, ResetColor, SetForegroundColor},
    terminal,
};

use crate::model::{ConnectivityState, EventLog, StreamStats};

pub use shared::{safe_truncate, truncate_str};

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 60;
pub const MIN_ROWS: u16 = 16;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard() -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = std::io::stdout();
            execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(Color::Yellow))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render_dashboard(
        connectivity: ConnectivityState,
        active: bool,
        stream: Option<&StreamStats>,
        can_start: bool,
        can_stop: bool,
        command_in_flight: bool,
        log: &EventLog,
    ) -> io::Result<()> {
        dashboard::render_dashboard(
            connectivity,
            active,
            stream,
            can_start,
            can_stop,
            command_in_flight,
            log,
        )
    }
}
