use axum::{Router, routing::get};
use sea_orm::DatabaseConnection;

use std::net::SocketAddr;

use crate::budget;

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/budget",
            get(budget::get).post(budget::save).delete(budget::clear),
        )
        .with_state(state)
}

pub async fn run_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState { db })).await
}

pub fn spawn_with_listener(
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
