use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Mount the session resource routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/sessions",
            post(handlers::sessions::create).get(handlers::sessions::list),
        )
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_one)
                .patch(handlers::sessions::update_config)
                .delete(handlers::sessions::delete_one),
        )
        .route(
            "/sessions/{id}/transport",
            post(handlers::transport::execute),
        )
        .route("/sessions/{id}/pause", post(handlers::lifecycle::pause))
        .route("/sessions/{id}/resume", post(handlers::lifecycle::resume))
        .route(
            "/sessions/{id}/complete",
            post(handlers::lifecycle::complete),
        )
        .route(
            "/sessions/{id}/advance-round",
            post(handlers::lifecycle::advance_round),
        )
        .route("/sessions/{id}/calls", get(handlers::calls::list))
        .route("/sessions/{id}/cards", get(handlers::cards::list))
        .route("/sessions/{id}/events", get(handlers::events::list))
}
