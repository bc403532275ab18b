use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::Parser;

use vigil::app;

/// Terminal control client for a remote camera detection service.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about)]
struct Cli {
    /// Base URL of the detection service
    #[arg(long, default_value = "http://localhost:8000")]
    url: String,

    /// Health poll interval in seconds
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Timeout in seconds for health and control requests
    #[arg(long, default_value_t = 4)]
    request_timeout: u64,

    /// Append diagnostic logs to this file (the TUI owns the terminal)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    // The guard must outlive the app so buffered log lines get flushed.
    let _log_guard = match cli.log_file.as_deref() {
        Some(path) => Some(init_tracing(path)?),
        None => None,
    };

    let should_quit = Arc::new(AtomicBool::new(false));
    for sig in signal_hook::consts::TERM_SIGNALS {
        signal_hook::flag::register(*sig, Arc::clone(&should_quit))?;
    }

    let options = app::Options {
        base_url: cli.url,
        poll_interval: Duration::from_secs(cli.poll_interval.max(1)),
        request_timeout: Duration::from_secs(cli.request_timeout.max(1)),
    };

    app::run(&options, should_quit)
}

fn init_tracing(path: &Path) -> io::Result<tracing_appender::non_blocking::WorkerGuard> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let file = path
        .file_name()
        .ok_or_else(|| io::Error::other("log file path has no file name"))?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}
