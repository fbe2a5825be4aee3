//! Core library for the weather proxy service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The upstream forecast provider (Visual Crossing)
//! - Request validation and response reshaping
//! - Shared domain models and the caller-visible error type
//!
//! It is used by `weather-server`, but can also be reused by other binaries.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{Config, ServerConfig, UpstreamConfig};
pub use error::{InvalidUsage, WeatherError};
pub use model::{DailyWeather, WeatherQuery, WeatherRequest, WeatherResponse};
pub use provider::{UnitGroup, WeatherProvider, visualcrossing::VisualCrossingProvider};
pub use service::{WeatherService, lookup};
