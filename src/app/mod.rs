mod event_loop;
mod input;
mod render;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use crate::client::DetectorClient;
use crate::commands::CommandRunner;
use crate::health::HealthMonitor;
use crate::session::SessionController;
use crate::stream::StreamViewer;
use crate::view::Presenter;

/// Runtime configuration, resolved from the command line.
#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
}

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Main application state.
pub struct App {
    pub controller: SessionController,
    pub health: HealthMonitor,
    pub commands: CommandRunner,
    pub stream: StreamViewer,
    pub tick_rate: Duration,
}

impl App {
    pub fn new(options: &Options, rt: Arc<tokio::runtime::Runtime>) -> io::Result<Self> {
        let client = DetectorClient::new(&options.base_url, options.request_timeout)
            .map_err(|e| io::Error::other(e.to_string()))?;
        Ok(Self {
            controller: SessionController::new(),
            health: HealthMonitor::new(client.clone(), Arc::clone(&rt), options.poll_interval),
            commands: CommandRunner::new(client.clone(), Arc::clone(&rt)),
            stream: StreamViewer::new(client, rt),
            tick_rate: options.poll_interval,
        })
    }
}

/// Run the application. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(options: &Options, should_quit: Arc<AtomicBool>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;

    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
            .expect("Failed to create tokio runtime"),
    );

    let mut app = match App::new(options, Arc::clone(&rt)) {
        Ok(app) => app,
        Err(e) => {
            restore_terminal();
            return Err(e);
        }
    };
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }

        let now = Instant::now();

        if app.process_tick() {
            needs_render = true;
        }
        if app.poll_health() {
            needs_render = true;
        }
        if app.poll_commands() {
            needs_render = true;
        }
        if app.poll_stream() {
            needs_render = true;
        }

        if needs_render {
            if Presenter::render_size_guard()? {
                needs_render = false;
                let timeout = app.tick_rate.saturating_sub(now.elapsed());
                if crossterm::event::poll(timeout.min(Duration::from_millis(100)))? {
                    let _ = crossterm::event::read()?;
                }
                continue;
            }

            render::render(&mut app)?;
            needs_render = false;
        }

        let timeout = app.tick_rate.saturating_sub(now.elapsed());
        if crossterm::event::poll(timeout.min(Duration::from_millis(100)))? {
            if let crossterm::event::Event::Key(key_event) = crossterm::event::read()? {
                match input::handle_key(&mut app, key_event) {
                    Some(input::InputResult::Quit) => break,
                    Some(input::InputResult::Consumed) => needs_render = true,
                    None => {}
                }
            }
        }
    }

    // Past this point nothing applies state: in-flight polls, commands, and
    // stream reads are abandoned with their channels.
    restore_terminal();
    Ok(())
}
