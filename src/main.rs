//! Steep - A wall-clock-accurate countdown timer service
//!
//! This is the main entry point for the steep application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use steep::{
    config::Config,
    state::AppState,
    api::create_router,
    services::keep_awake_from_config,
    tasks::{alerter_task, ticker_task, wake_up_recovery_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("steep={},tower_http=info", config.log_level()))
        .init();

    info!("Starting steep server v0.2.0");
    info!(
        "Configuration: host={}, port={}, duration={}m{}s, tick={}ms",
        config.host, config.port, config.minutes, config.seconds, config.tick_ms
    );

    // Pick the keep-awake backend for the configured command
    let keep_awake = keep_awake_from_config(config.keep_awake_command.as_deref());

    // Create application state with the initial duration applied
    let state = Arc::new(AppState::new(&config, keep_awake));

    // Start the background tasks
    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    let alerter_state = Arc::clone(&state);
    tokio::spawn(async move {
        alerter_task(alerter_state).await;
    });

    let recovery_state = Arc::clone(&state);
    tokio::spawn(async move {
        wake_up_recovery_task(recovery_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start           - Start or resume the countdown");
    info!("  POST /pause           - Pause the countdown");
    info!("  POST /toggle          - Pause when running, start otherwise");
    info!("  POST /stop            - Stop and rewind to the configured duration");
    info!("  POST /reset           - Stop and re-apply the configured duration");
    info!("  POST /resync          - Recompute remaining time from the wall clock");
    info!("  POST /duration        - Set the countdown duration");
    info!("  POST /preset/:minutes - Set a whole-minute preset duration");
    info!("  POST /alert/test      - Run the configured alert command");
    info!("  GET  /status          - Check current status");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
