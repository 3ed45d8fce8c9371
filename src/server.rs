//! HTTP server: axum with permissive CORS over the api routes.

use crate::{api::api_router, error::Result, state::AppState};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router().layer(cors).with_state(state)
}

async fn bind(bind_address: &str, port: u16) -> Result<(TcpListener, u16)> {
    let listener = TcpListener::bind(format!("{}:{}", bind_address, port)).await?;
    let actual_port = listener.local_addr()?.port();
    log::info!(
        "HTTP server listening on http://{}:{}",
        bind_address,
        actual_port
    );
    Ok((listener, actual_port))
}

/// Serves on a background task and returns the bound port (useful with port 0)
pub async fn spawn_server(bind_address: &str, port: u16, state: AppState) -> Result<u16> {
    let (listener, actual_port) = bind(bind_address, port).await?;
    let app = app(state);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("HTTP server exited with error: {}", e);
        }
    });

    Ok(actual_port)
}

/// Serves until the process is stopped
pub async fn serve(bind_address: &str, port: u16, state: AppState) -> Result<()> {
    let (listener, _) = bind(bind_address, port).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
