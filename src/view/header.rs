use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{Attribute, Color, ResetColor, SetAttribute, SetForegroundColor},
    terminal,
};

use crate::model::ConnectivityState;

pub fn render_header(
    out: &mut impl Write,
    connectivity: ConnectivityState,
    time: &str,
) -> io::Result<()> {
    write!(out, "  ")?;
    queue!(io::stdout(), SetAttribute(Attribute::Bold))?;
    write!(out, "Vigil")?;
    queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, " Live Control")?;
    queue!(io::stdout(), ResetColor)?;

    // Connectivity badge
    let (label, color) = match connectivity {
        ConnectivityState::Connected => ("● BACKEND CONNECTED", Color::Green),
        ConnectivityState::Disconnected => ("● BACKEND OFFLINE", Color::Red),
        ConnectivityState::Checking => ("● CHECKING...", Color::Yellow),
    };
    write!(out, "   ")?;
    queue!(io::stdout(), SetForegroundColor(color))?;
    write!(out, "{}", label)?;
    queue!(io::stdout(), ResetColor)?;

    // Right-align the clock
    let size = terminal::size()?;
    let time_str = format!("vigil - {} ", time);
    let col = (size.0 as usize).saturating_sub(time_str.len());
    queue!(io::stdout(), cursor::MoveTo(col as u16, 0))?;
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}", time_str)?;
    queue!(io::stdout(), ResetColor)?;

    write!(out, "\r\n")?;
    // Separator
    let sep: String = "─".repeat(size.0 as usize);
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}\r\n", sep)?;
    queue!(io::stdout(), ResetColor)?;

    Ok(())
}
