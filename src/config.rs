//! Command-line and environment configuration.

use crate::api::DEFAULT_BASE_URL;
use crate::routes::Route;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "clinicals", version, about = "Manage patients and clinical data from the terminal")]
pub struct Config {
    /// Base URL of the patient services API.
    #[arg(long, env = "CLINICALS_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the screen to open first, e.g. `/patients` or `/clinical-data/edit/4`.
    #[arg(long, env = "CLINICALS_START_ROUTE", default_value = "/")]
    pub route: String,

    /// File that receives the application log.
    #[arg(long, env = "CLINICALS_LOG_FILE", default_value = "clinicals.log")]
    pub log_file: PathBuf,

    /// Frames per second of the event loop.
    #[arg(long, default_value_t = 30.0)]
    pub tick_rate: f64,
}

impl Config {
    /// The initial route; unknown paths fall back to the landing page.
    pub fn start_route(&self) -> Route {
        Route::parse(&self.route).unwrap_or_else(|| {
            tracing::warn!(path = %self.route, "unknown start route, opening home");
            Route::Home
        })
    }
}
