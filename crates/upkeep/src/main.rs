use std::sync::Arc;

use futures::{stream::FuturesUnordered, StreamExt};
use tokio::task;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let state = SharedState::from(Arc::new(State::new(config)));

    tracing::info!("starting cron jobs");

    let triggers = schedule::triggers()?;

    let mut tasks = FuturesUnordered::new();

    for trigger in triggers.clone() {
        let state = state.clone();
        tasks.push(task::spawn(async move {
            serve_trigger(&state, trigger).await?;
            Ok::<(), anyhow::Error>(())
        }));
    }

    // initial run on startup, outside the recurring schedule
    tasks.push({
        let state = state.clone();
        task::spawn(async move {
            run_startup(&state.maintenance(), &triggers).await;
            Ok::<(), anyhow::Error>(())
        })
    });

    tokio::select! {
        _ = shutdown_signal() => {}
        res = async {
            while let Some(result) = tasks.next().await {
                result??
            }
            Ok::<(), anyhow::Error>(())
        } => res?,
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

mod config;
mod schedule;
mod services;

mod state;
pub use crate::state::{SharedState, State};
use crate::{
    config::Config,
    schedule::{run_startup, serve_trigger},
    services::maintenance::MaintenanceState,
};
