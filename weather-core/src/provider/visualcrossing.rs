use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{InvalidUsage, WeatherError};

use super::{UnitGroup, WeatherProvider};

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

/// Visual Crossing timeline API client.
///
/// One GET per lookup: no timeout, no retries. Anything but `200 OK` is
/// handed back to the caller with the upstream body and status.
#[derive(Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self::with_client(api_key, base_url, Client::new())
    }

    pub fn with_client(api_key: String, base_url: String, http: Client) -> Self {
        Self { api_key, base_url, http }
    }

    /// `{base}/{location}/{date}?unitGroup={unit}&key={api_key}`
    ///
    /// Location and date go in as given; the HTTP client's URL parser does
    /// whatever escaping it does natively.
    fn timeline_url(&self, location: &str, date: &str, unit: UnitGroup) -> String {
        format!(
            "{}/{location}/{date}?unitGroup={unit}&key={}",
            self.base_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

impl std::fmt::Debug for VisualCrossingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisualCrossingProvider")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    #[instrument(skip(self, unit), fields(unit = %unit))]
    async fn fetch(
        &self,
        location: &str,
        date: &str,
        unit: UnitGroup,
    ) -> Result<Value, WeatherError> {
        let url = self.timeline_url(location, date, unit);
        debug!(base_url = %self.base_url, "Requesting Visual Crossing timeline");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("Failed to send request to Visual Crossing")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Visual Crossing response body")?;

        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Visual Crossing request failed");
            return Err(InvalidUsage::new(body, status.as_u16()).into());
        }

        let parsed: Value =
            serde_json::from_str(&body).context("Failed to parse Visual Crossing JSON")?;

        Ok(parsed)
    }
}
