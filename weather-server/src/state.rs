//! Application state shared across handlers

use std::sync::Arc;

use weather_core::WeatherService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Validates requests and talks to the upstream provider
    pub service: Arc<WeatherService>,
}

impl AppState {
    pub fn new(service: WeatherService) -> Self {
        Self { service: Arc::new(service) }
    }
}
