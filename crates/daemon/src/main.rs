//! Waitroom Daemon - Main Entry Point
//! Hosts one patient's queue simulator behind JSON-RPC

mod config;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{DaemonConfig, LogFormat};
use waitroom_api_rpc::{EventJournal, RpcServer};
use waitroom_core::application::QueueSimulator;
use waitroom_core::port::id_provider::UuidProvider;
use waitroom_core::port::random_source::StdRandomSource;
use waitroom_core::port::time_provider::SystemTimeProvider;
use waitroom_core::port::{RandomSource, TimeProvider};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const JOURNAL_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("waitroom=info"))?;

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .try_init()?;
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .try_init()?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration (before logging, which depends on it)
    let config = DaemonConfig::from_env()?;

    // 2. Initialize logging
    init_logging(config.log_format)?;
    info!("Waitroom daemon v{} starting...", VERSION);

    // 3. Setup dependencies (DI wiring)
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let random: Box<dyn RandomSource> = match config.seed {
        Some(seed) => {
            info!(seed, "Using seeded random source");
            Box::new(StdRandomSource::seeded(seed))
        }
        None => Box::new(StdRandomSource::from_entropy()),
    };

    let simulator = Arc::new(
        QueueSimulator::for_new_patient(
            config.simulator.clone(),
            &UuidProvider,
            time_provider,
            random,
        )
        .map_err(|e| anyhow::anyhow!("Simulator setup failed: {}", e))?,
    );
    info!(
        patient_id = %simulator.snapshot().patient_id,
        tick_interval_ms = config.simulator.tick_interval.as_millis() as u64,
        "Queue simulator created"
    );

    // 4. Event journal (subscribes before anything can emit)
    let journal = Arc::new(EventJournal::new(config.event_history));
    let journal_handle = journal.spawn_recorder(simulator.subscribe());

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_server = RpcServer::new(config.rpc.clone(), simulator.clone(), journal.clone());
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Open the simulated feed
    if config.autostart {
        simulator
            .start()
            .map_err(|e| anyhow::anyhow!("Simulator start failed: {}", e))?;
    } else {
        info!("Autostart disabled; call queue.start.v1 to open the feed");
    }

    info!("System ready. Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 8. Graceful shutdown
    simulator.stop();
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;

    // Dropping the last simulator handle closes the event channel and ends the recorder
    drop(simulator);
    match tokio::time::timeout(JOURNAL_DRAIN_TIMEOUT, journal_handle).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Journal recorder task failed"),
        Err(_) => warn!(
            timeout_secs = JOURNAL_DRAIN_TIMEOUT.as_secs(),
            "Journal recorder still running, event channel not closed"
        ),
    }

    info!(recorded_events = journal.len(), "Shutdown complete.");
    Ok(())
}
