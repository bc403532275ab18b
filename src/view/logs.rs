use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, ResetColor, SetForegroundColor},
};

use crate::model::EventLog;

use super::shared::{safe_truncate, write_section_header, writeln};

pub fn render_log_panel(out: &mut impl Write, log: &EventLog) -> io::Result<()> {
    writeln(out, "")?;
    write_section_header(out, "  SYSTEM LOGS")?;

    if log.is_empty() {
        queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
        writeln(out, "    Waiting for events...")?;
        queue!(io::stdout(), ResetColor)?;
        return Ok(());
    }

    let width = crossterm::terminal::size()?.0 as usize;
    for entry in log.entries() {
        let line = format!("    [{}] {}", entry.time_label(), entry.message);
        let is_error = entry.message.starts_with("Error");
        if is_error {
            queue!(io::stdout(), SetForegroundColor(Color::Red))?;
        }
        writeln(out, safe_truncate(&line, width))?;
        if is_error {
            queue!(io::stdout(), ResetColor)?;
        }
    }
    Ok(())
}
