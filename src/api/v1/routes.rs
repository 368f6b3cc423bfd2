/*
 * Responsibility
 * - URL 構造を定義
 * - /health, /client, /client/{id}
 */
use axum::{
    Router,
    routing::{get, options},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    clients::{client_options, create_client, delete_client, show_client},
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/client", options(client_options).post(create_client))
        .route("/client/{id}", get(show_client).delete(delete_client))
}
