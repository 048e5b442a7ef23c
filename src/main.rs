// main.rs

mod app;
mod button;
mod config;
mod error;
mod todo;
mod tui;

use crate::app::App;
use crate::config::{Config, DEFAULT_LOG_FILTER};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

// The alternate screen owns stdout/stderr, so logs go to a file.
fn init_tracing(cfg: &Config) -> io::Result<()> {
    if let Some(dir) = cfg.log_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env();
    if let Err(e) = init_tracing(&cfg) {
        eprintln!("Logging disabled ({}): {}", cfg.log_path.display(), e);
    }
    tracing::info!("starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = tui::run_app(&mut terminal, &mut app);

    // Restore terminal state
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(%err, "event loop failed");
        eprintln!("Application error: {}", err);
    }

    tracing::info!("exiting");
    Ok(())
}
