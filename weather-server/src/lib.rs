//! HTTP front-end for the weather proxy service.
//!
//! This crate focuses on:
//! - Routing and request extraction (axum)
//! - Translating `WeatherError` into HTTP responses
//! - Shared state for handlers

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{WEATHER_ENDPOINT, create_router};
pub use state::AppState;
