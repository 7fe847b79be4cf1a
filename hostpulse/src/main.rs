//! Entry point for the hostpulse TUI. Parses args and runs the App.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hostpulse::app::App;
use hostpulse::theme::{config_dir, load_theme};

pub const DEFAULT_URL: &str = "ws://localhost:9500/ws";

#[derive(Debug, Parser)]
#[command(name = "hostpulse", version, about = "Live dashboard for a hostpulse agent")]
struct Args {
    /// Agent WebSocket URL
    #[arg(default_value = DEFAULT_URL)]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The alternate screen owns stdout, so logs go to a file next to the settings.
    let log_dir = config_dir();
    std::fs::create_dir_all(&log_dir)?;
    let (writer, _log_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, "hostpulse.log"));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hostpulse=info")),
        )
        .with_ansi(false)
        .with_writer(writer)
        .init();

    let mut app = App::new(load_theme());
    app.run(&args.url).await
}
