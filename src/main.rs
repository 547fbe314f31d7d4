mod clock;
mod color;
mod config;
mod constants;
mod displays;
mod fonts;
mod gui;
mod overlay;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use config::Cli;

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut cli = Cli::parse();
    sanitize_colors(&mut cli);
    info!(?cli, "starting overlay clock");

    let displays = displays::resolve_displays();
    for (index, d) in displays.iter().enumerate() {
        info!(index, display = %d, "display available");
    }

    gui::run_gui(cli, displays)
}

/// Replace unparseable start-up colors with the defaults
fn sanitize_colors(cli: &mut Cli) {
    use constants::clock::{DEFAULT_BG_COLOR, DEFAULT_FG_COLOR};

    for (value, default) in [
        (&mut cli.bg_color, DEFAULT_BG_COLOR),
        (&mut cli.fg_color, DEFAULT_FG_COLOR),
    ] {
        if let Err(e) = color::parse_color(value) {
            warn!(error = %e, fallback = default, "Ignoring start-up color");
            *value = default.to_string();
        }
    }
}
