use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use figboard_shared::geometry::DEFAULT_SURFACE_WIDTH;
use tower_http::trace::TraceLayer;

mod boards;
mod handlers;
mod logging;
mod logic;
mod state;
mod storage;

use crate::boards::flush_dirty_boards;
use crate::handlers::{
    command_handler, create_board_handler, export_handler, health_handler, hit_handler,
    import_handler,
};
use crate::state::AppState;
use crate::storage::FileStorage;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    board_dir: Option<PathBuf>,
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
    /// Ray extent for hit-testing, in board units.
    #[arg(long, default_value_t = DEFAULT_SURFACE_WIDTH)]
    surface_width: f64,
    #[arg(long, default_value_t = 60)]
    autosave_secs: u64,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/boards", post(create_board_handler))
        .route(
            "/boards/:board_id",
            get(export_handler).put(import_handler),
        )
        .route("/boards/:board_id/commands", post(command_handler))
        .route("/boards/:board_id/hit", get(hit_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    let board_dir = args
        .board_dir
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../boards"));
    tokio::fs::create_dir_all(&board_dir)
        .await
        .with_context(|| format!("failed to create board dir {}", board_dir.display()))?;
    anyhow::ensure!(
        args.surface_width.is_finite() && args.surface_width > 0.0,
        "surface width must be a positive number"
    );
    let state = AppState::new(
        Arc::new(FileStorage::new(board_dir.clone())),
        args.surface_width,
    );

    let backup_state = state.clone();
    let autosave = Duration::from_secs(args.autosave_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(autosave);
        loop {
            interval.tick().await;
            let saved = flush_dirty_boards(&backup_state).await;
            if saved > 0 {
                tracing::info!(saved, "autosave");
            }
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        board_dir = %board_dir.display(),
        surface_width = args.surface_width,
        "figure board running at http://localhost:{}",
        args.port
    );
    axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    let saved = flush_dirty_boards(&state).await;
    tracing::info!(saved, "final save done");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
