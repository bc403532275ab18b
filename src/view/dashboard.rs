use std::io::{self, Write, stdout};

use crossterm::{
    cursor, execute, queue,
    style::{Color, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::model::{ConnectivityState, EventLog, StreamStats};

use super::header::render_header;
use super::logs::render_log_panel;
use super::shared::{format_bytes, format_number, write_section_header, writeln};

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
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let time = chrono::Local::now().format("%H:%M:%S").to_string();
    render_header(&mut out, connectivity, &time)?;

    let size = crossterm::terminal::size()?;

    writeln(&mut out, "")?;
    write_section_header(&mut out, "  LIVE FEED")?;

    match stream {
        Some(stats) => {
            queue!(io::stdout(), SetForegroundColor(Color::Green))?;
            writeln(&mut out, "    ● LIVE")?;
            queue!(io::stdout(), ResetColor)?;
            writeln(
                &mut out,
                &format!(
                    "    frames: {:<12} rate: {:.1} fps",
                    format_number(stats.frames),
                    stats.fps()
                ),
            )?;
            writeln(
                &mut out,
                &format!(
                    "    data:   {:<12} last frame: {}",
                    format_bytes(stats.bytes),
                    format_bytes(stats.last_frame_len as u64)
                ),
            )?;
        }
        None => {
            let placeholder = match connectivity {
                ConnectivityState::Connected => "SYSTEM STANDBY",
                ConnectivityState::Disconnected => "WAITING FOR SERVER CONNECTION...",
                ConnectivityState::Checking => "CHECKING CONNECTION...",
            };
            queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
            writeln(&mut out, &format!("    {}", placeholder))?;
            queue!(io::stdout(), ResetColor)?;
        }
    }

    let cam_state = if active { "ACTIVE" } else { "OFFLINE" };
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    writeln(&mut out, &format!("    CAM_01: {}", cam_state))?;
    queue!(io::stdout(), ResetColor)?;

    writeln(&mut out, "")?;
    write_section_header(&mut out, "  CONTROLS")?;

    write!(out, "    ")?;
    let start_color = if can_start { Color::Green } else { Color::DarkGrey };
    queue!(io::stdout(), SetForegroundColor(start_color))?;
    write!(out, "[s] START SYSTEM")?;
    queue!(io::stdout(), ResetColor)?;
    write!(out, "   ")?;
    let stop_color = if can_stop { Color::Red } else { Color::DarkGrey };
    queue!(io::stdout(), SetForegroundColor(stop_color))?;
    write!(out, "[x] STOP SYSTEM")?;
    queue!(io::stdout(), ResetColor)?;
    write!(out, "\r\n")?;

    if command_in_flight {
        queue!(io::stdout(), SetForegroundColor(Color::Yellow))?;
        writeln(&mut out, "    command in flight...")?;
        queue!(io::stdout(), ResetColor)?;
    }

    render_log_panel(&mut out, log)?;

    if connectivity == ConnectivityState::Disconnected {
        writeln(&mut out, "")?;
        queue!(io::stdout(), SetForegroundColor(Color::Yellow))?;
        writeln(
            &mut out,
            "  Backend not detected. Ensure the detection service is running at the configured URL.",
        )?;
        queue!(io::stdout(), ResetColor)?;
    }

    // Footer
    let help = "q/Esc: Quit | s: Start | x: Stop";
    let help_y = size.1.saturating_sub(1);
    queue!(
        out,
        cursor::MoveTo(1, help_y),
        SetForegroundColor(Color::DarkGrey),
        crossterm::style::Print(format!("{:<width$}", help, width = size.0 as usize)),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}
