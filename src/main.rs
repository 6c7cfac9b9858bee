//! line-relay - line-oriented relay from files and sockets to files and sockets
//!
//! This is the composition root that wires together all the components.

use line_relay::adapters::{build_destination, build_source};
use line_relay::infrastructure::shutdown_signal;
use line_relay::{load_config, RelayOptions, RelayService, ShutdownController};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    cfg.validate()?;

    tracing::info!(
        "starting line-relay sources={} destinations={} queue_capacity={}",
        cfg.sources.len(),
        cfg.destinations.len(),
        cfg.queue_capacity
    );

    // ===== COMPOSITION ROOT =====

    // 1. Create adapters (nothing is opened until first use)
    let sources = cfg.sources.iter().map(build_source).collect();
    let destinations = cfg
        .destinations
        .iter()
        .map(|spec| build_destination(spec, cfg.append_newline))
        .collect();

    // 2. Create application service
    let service = RelayService::new(sources, destinations, RelayOptions::from(&cfg));

    // 3. Wire OS signals to cooperative shutdown and run
    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let snapshot = service.run(shutdown).await;
    tracing::info!(
        "line-relay stopped imported={} exported={} bytes={}",
        snapshot.records_imported,
        snapshot.records_exported,
        snapshot.bytes_exported
    );

    Ok(())
}
