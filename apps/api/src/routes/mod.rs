pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::worksheet::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Worksheet API
        .route(
            "/api/v1/worksheets/paginate",
            post(handlers::handle_paginate),
        )
        .route(
            "/api/v1/worksheets/generate",
            post(handlers::handle_generate),
        )
        .with_state(state)
}
