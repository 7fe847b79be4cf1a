//! Entry point for hostpulse_agent. Parses args, starts the monitor and serves `/ws`.

use std::io::ErrorKind;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hostpulse_agent::config::AgentArgs;
use hostpulse_agent::monitor::{Monitor, MONITOR_INTERVAL};
use hostpulse_agent::probe::SysinfoProbe;
use hostpulse_agent::state::AppState;
use hostpulse_agent::ws;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hostpulse_agent=info")),
        )
        .init();

    // Any panic, in main or a spawned task, terminates the process with 1.
    std::panic::set_hook(Box::new(|panic| {
        error!("uncaught panic: {panic}");
        std::process::exit(1);
    }));

    let args = AgentArgs::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: AgentArgs) -> anyhow::Result<()> {
    let addr = args.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == ErrorKind::AddrInUse => {
            anyhow::bail!(
                "port {} is already in use; free it first (e.g. lsof -ti:{} | xargs kill -9)",
                args.port,
                args.port
            );
        }
        Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to listen on {addr}"))),
    };

    let monitor = Monitor::new(SysinfoProbe::new());
    let sampler = monitor.start(MONITOR_INTERVAL);

    info!("hostpulse agent running at ws://{}/ws", listener.local_addr()?);
    ws::serve(listener, AppState::new(monitor), shutdown_signal()).await?;

    sampler.stop();
    info!("server closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}
