// Draft room server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config
// 3. Load the athlete catalog
// 4. Create the session and coordinator
// 5. Spawn the WebSocket server task
// 6. Run the coordinator loop until ctrl-c

use draftroom::catalog;
use draftroom::config;
use draftroom::coordinator::Coordinator;
use draftroom::draft::session::DraftSession;
use draftroom::ws_server;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Draft room server starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: port={}, pick clock {}s, roster cap {}",
        config.port, config.pick_duration_seconds, config.roster_cap
    );

    // 3. Load the athlete catalog
    let catalog = catalog::load(&config.rankings_path)
        .with_context(|| format!("failed to load rankings from {}", config.rankings_path))?;

    // 4. Create the session and coordinator
    let session = DraftSession::new(catalog, config.roster_cap, config.trend_bonus);
    let coordinator = Coordinator::new(session, config.clone());

    // 5. Spawn the WebSocket server task
    let (conn_tx, conn_rx) = mpsc::channel(256);
    let listener = ws_server::bind(config.port)
        .await
        .with_context(|| format!("failed to bind WebSocket server on port {}", config.port))?;
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_server::run(listener, conn_tx).await {
            error!("WebSocket server error: {e}");
        }
    });

    // 6. Run the coordinator loop until ctrl-c
    info!("Draft room ready on 127.0.0.1:{}", config.port);
    tokio::select! {
        result = coordinator.run(conn_rx) => {
            if let Err(e) = result {
                error!("Coordinator error: {e}");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-c received, shutting down");
        }
    }

    ws_handle.abort();
    info!("Draft room server shut down cleanly");
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("draftroom=info,warn")),
        )
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
