mod api;
mod app;
mod components;
mod config;
mod logging;
mod models;
mod notify;
mod routes;
mod tui;

use anyhow::Result;
use api::{HttpApi, Requests};
use app::App;
use clap::Parser;
use config::Config;
use crossterm::{
    event::DisableMouseCapture,
    terminal::{self, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use tui::Tui;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    let _log_guard = logging::init(&config.log_file)?;

    let api = HttpApi::new(&config.base_url)?;
    tracing::info!(base_url = %api.base_url(), "using patient services API");
    let start = config.start_route();

    let _guard = CleanupGuard;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let mut tui = Tui::new(terminal, config.tick_rate);
    tui.init()?;

    let mut app = App::new(Requests::background(Arc::new(api)), start);
    let res = app.run(&mut tui);

    tui.exit()?;

    if let Err(e) = res {
        tracing::error!(error = %e, "application error");
        eprintln!("Application Error: {e}");
    }
    Ok(())
}

struct CleanupGuard;

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        // Ignore errors during cleanup
        let _ = terminal::disable_raw_mode();
        let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
    }
}
