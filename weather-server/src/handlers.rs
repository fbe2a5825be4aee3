//! Request handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Html,
};
use serde_json::Value;
use tracing::{info, instrument};
use weather_core::{WeatherRequest, WeatherResponse};

use crate::{error::ApiError, state::AppState};

pub const HOME_PAGE: &str = "<p><h2>KMA L2: Weather SaaS.</h2></p>";

/// Static greeting, no authentication.
pub async fn home_page() -> Html<&'static str> {
    Html(HOME_PAGE)
}

/// Validate the body, look up the forecast and return one day of it.
#[instrument(skip_all)]
pub async fn weather(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let Json(body) = payload?;
    let request = WeatherRequest::from_json(body)?;

    let response = state.service.handle(&request).await?;
    info!(location = %response.location, date = %response.date, "Weather lookup served");

    Ok(Json(response))
}
