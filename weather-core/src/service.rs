use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, instrument};

use crate::{
    Config, WeatherError, WeatherRequest, WeatherResponse,
    model::WeatherQuery,
    provider::{UnitGroup, WeatherProvider, provider_from_config},
};

/// Validates weather requests and answers them from the upstream provider.
#[derive(Debug, Clone)]
pub struct WeatherService {
    api_token: String,
    unit: UnitGroup,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(api_token: String, unit: UnitGroup, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { api_token, unit, provider }
    }

    /// Build the service and its provider from config. Fails when either
    /// secret is missing.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_token = config.api_token()?.to_owned();
        let provider = provider_from_config(config)?;

        Ok(Self::new(api_token, config.upstream.unit_group, Arc::from(provider)))
    }

    pub fn unit(&self) -> UnitGroup {
        self.unit
    }

    #[instrument(skip_all)]
    pub async fn handle(&self, request: &WeatherRequest) -> Result<WeatherResponse, WeatherError> {
        let query = request.validate(&self.api_token)?;
        lookup(self.provider.as_ref(), query, self.unit).await
    }
}

/// Answer an already validated query from `provider`. The timestamp is taken
/// before the upstream call.
#[instrument(skip(provider, query), fields(location = %query.location, date = %query.date))]
pub async fn lookup(
    provider: &dyn WeatherProvider,
    query: WeatherQuery,
    unit: UnitGroup,
) -> Result<WeatherResponse, WeatherError> {
    let requested_at = Utc::now();

    let forecast = provider.fetch(&query.location, &query.date, unit).await?;
    debug!("Upstream forecast received");

    Ok(WeatherResponse::new(query, requested_at, &forecast))
}
