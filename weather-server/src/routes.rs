//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

pub const WEATHER_ENDPOINT: &str = "/content/api/v1/integration/weather";

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_page))
        .route(WEATHER_ENDPOINT, post(handlers::weather))
        .with_state(state)
}
