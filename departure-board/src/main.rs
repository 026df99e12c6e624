use departure_board::board::RefreshTimer;
use departure_board::config::BoardConfig;
use departure_board::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Static assets shipped with the crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(BoardConfig::from_env()).await {
        error!(error = %e, "departure board stopped");
        std::process::exit(1);
    }
}

async fn run(config: BoardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = config.backend()?;
    let bind = config.bind;
    let station = config.station.clone();
    let refresh_interval = config.refresh_interval;

    let (state, _follower) = AppState::new(backend, config);

    // Initial load runs in the background so the page is served at once
    let board = state.board.clone();
    tokio::spawn(async move {
        board.select_station(station).await;
    });

    let timer = RefreshTimer::start(
        state.board.clone(),
        state.connectivity.clone(),
        refresh_interval,
    );

    let app = create_router(state.clone(), STATIC_DIR);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Departure board listening on http://{bind}");

    // Stop the board before draining connections
    let board = state.board.clone();
    let shutdown = async move {
        shutdown_signal().await;
        board.close().await;
        drop(timer);
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("ctrl-c received, shutting down");
}
