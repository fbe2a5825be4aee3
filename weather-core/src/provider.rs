use crate::{Config, WeatherError, provider::visualcrossing::VisualCrossingProvider};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::{convert::TryFrom, fmt::Debug};

pub mod visualcrossing;

/// Unit system requested from the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum UnitGroup {
    #[default]
    Metric,
    Us,
    Uk,
    Base,
}

impl UnitGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitGroup::Metric => "metric",
            UnitGroup::Us => "us",
            UnitGroup::Uk => "uk",
            UnitGroup::Base => "base",
        }
    }

    pub const fn all() -> &'static [UnitGroup] {
        &[UnitGroup::Metric, UnitGroup::Us, UnitGroup::Uk, UnitGroup::Base]
    }
}

impl std::fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitGroup {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitGroup::Metric),
            "us" => Ok(UnitGroup::Us),
            "uk" => Ok(UnitGroup::Uk),
            "base" => Ok(UnitGroup::Base),
            _ => Err(anyhow::anyhow!(
                "Unknown unit group '{value}'. Supported unit groups: metric, us, uk, base."
            )),
        }
    }
}

impl TryFrom<String> for UnitGroup {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UnitGroup::try_from(value.as_str())
    }
}

/// Upstream forecast source.
///
/// Implementations return the provider's JSON document unmodified. Any
/// upstream status other than `200 OK` is reported as [`WeatherError::Usage`]
/// carrying the upstream body and status code.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, location: &str, date: &str, unit: UnitGroup)
    -> Result<Value, WeatherError>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.weather_api_key()?;

    Ok(Box::new(VisualCrossingProvider::new(
        api_key.to_owned(),
        config.upstream.base_url.clone(),
    )))
}
