use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InvalidUsage;

pub const DEFAULT_REQUESTER_NAME: &str = "Unknown";

/// `YYYY-MM-DDTHH:MM:SSZ`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Inbound request body, kept loosely typed so that validation runs in a
/// fixed order regardless of which fields are malformed.
///
/// A missing key and an explicit `null` both deserialize to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeatherRequest {
    #[serde(default)]
    pub token: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub requester_name: Option<Value>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub location: String,
    pub date: String,
    pub requester_name: String,
}

impl WeatherRequest {
    /// Read a request from a decoded body. Only JSON objects are accepted.
    pub fn from_json(body: Value) -> Result<Self, InvalidUsage> {
        if !body.is_object() {
            return Err(InvalidUsage::bad_request("request body must be a JSON object"));
        }

        serde_json::from_value(body).map_err(|e| InvalidUsage::bad_request(e.to_string()))
    }

    /// Check the request against the configured token. The first failing
    /// check is returned.
    pub fn validate(&self, api_token: &str) -> Result<WeatherQuery, InvalidUsage> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| InvalidUsage::new("token is required", 400))?;

        if token.as_str() != Some(api_token) {
            return Err(InvalidUsage::new("wrong API token", 403));
        }

        let location = non_empty_str(self.location.as_ref())
            .ok_or_else(|| InvalidUsage::new("location is required", 400))?;

        let date = non_empty_str(self.date.as_ref())
            .ok_or_else(|| InvalidUsage::new("date is required", 400))?;

        let requester_name = self
            .requester_name
            .as_ref()
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_REQUESTER_NAME);

        Ok(WeatherQuery {
            location: location.to_string(),
            date: date.to_string(),
            requester_name: requester_name.to_string(),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// One day's forecast as returned to the caller. Fields are copied verbatim
/// from the upstream day and are `null` when the upstream omits them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub description: Option<Value>,
    pub cloudcover: Option<Value>,
    pub temp_c: Option<Value>,
    pub wind_kph: Option<Value>,
    pub pressure_mb: Option<Value>,
    pub humidity: Option<Value>,
    pub visibility: Option<Value>,
}

impl DailyWeather {
    /// Reshape the first entry of the upstream `days` array.
    ///
    /// Anything short of an object inside a non-empty `days` array yields an
    /// all-null day.
    pub fn from_forecast(forecast: &Value) -> Self {
        match forecast.get("days").and_then(|days| days.get(0)) {
            Some(day) => Self::from_day(day),
            None => Self::default(),
        }
    }

    fn from_day(day: &Value) -> Self {
        let field = |name: &str| day.get(name).filter(|v| !v.is_null()).cloned();

        Self {
            description: field("description"),
            cloudcover: field("cloudcover"),
            temp_c: field("temp"),
            wind_kph: field("windspeed"),
            pressure_mb: field("pressure"),
            humidity: field("humidity"),
            visibility: field("visibility"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub requester_name: String,
    pub timestamp: String,
    pub location: String,
    pub date: String,
    pub weather: DailyWeather,
}

impl WeatherResponse {
    pub fn new(query: WeatherQuery, requested_at: DateTime<Utc>, forecast: &Value) -> Self {
        Self {
            requester_name: query.requester_name,
            timestamp: format_timestamp(requested_at),
            location: query.location,
            date: query.date,
            weather: DailyWeather::from_forecast(forecast),
        }
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const TOKEN: &str = "secret";

    fn request(body: Value) -> WeatherRequest {
        serde_json::from_value(body).expect("request body should deserialize")
    }

    #[test]
    fn only_objects_are_accepted() {
        let err = WeatherRequest::from_json(json!(["secret", "Kyiv", "today"])).unwrap_err();
        assert_eq!(err, InvalidUsage::bad_request("request body must be a JSON object"));

        let req = WeatherRequest::from_json(json!({ "token": "secret", "extra": true }))
            .expect("objects are accepted");
        assert_eq!(req.token, Some(json!("secret")));
        assert!(req.location.is_none());
    }

    #[test]
    fn missing_token_is_rejected_before_anything_else() {
        let err = request(json!({})).validate(TOKEN).unwrap_err();
        assert_eq!(err, InvalidUsage::new("token is required", 400));

        let err = request(json!({ "token": null, "location": "Kyiv" })).validate(TOKEN).unwrap_err();
        assert_eq!(err.message, "token is required");
    }

    #[test]
    fn wrong_token_is_forbidden() {
        let err = request(json!({ "token": "nope" })).validate(TOKEN).unwrap_err();
        assert_eq!(err, InvalidUsage::new("wrong API token", 403));

        let err = request(json!({ "token": 42 })).validate(TOKEN).unwrap_err();
        assert_eq!(err.status_code, 403);
    }

    #[test]
    fn location_is_checked_before_date() {
        let err = request(json!({ "token": TOKEN })).validate(TOKEN).unwrap_err();
        assert_eq!(err, InvalidUsage::new("location is required", 400));

        let err =
            request(json!({ "token": TOKEN, "location": "" })).validate(TOKEN).unwrap_err();
        assert_eq!(err.message, "location is required");
    }

    #[test]
    fn empty_date_is_rejected() {
        let err = request(json!({ "token": TOKEN, "location": "Kyiv", "date": "" }))
            .validate(TOKEN)
            .unwrap_err();
        assert_eq!(err, InvalidUsage::new("date is required", 400));
    }

    #[test]
    fn requester_name_defaults_to_unknown() {
        let query = request(json!({ "token": TOKEN, "location": "Kyiv", "date": "2024-01-15" }))
            .validate(TOKEN)
            .expect("request should be valid");

        assert_eq!(query.requester_name, DEFAULT_REQUESTER_NAME);
        assert_eq!(query.location, "Kyiv");
        assert_eq!(query.date, "2024-01-15");
    }

    #[test]
    fn requester_name_is_kept_when_given() {
        let query = request(json!({
            "token": TOKEN,
            "location": "Kyiv",
            "date": "2024-01-15",
            "requester_name": "Olena",
        }))
        .validate(TOKEN)
        .expect("request should be valid");

        assert_eq!(query.requester_name, "Olena");
    }

    #[test]
    fn null_or_non_string_requester_name_falls_back_to_unknown() {
        for name in [Value::Null, json!(42), json!({ "first": "Olena" })] {
            let query = request(json!({
                "token": TOKEN,
                "location": "Kyiv",
                "date": "2024-01-15",
                "requester_name": name,
            }))
            .validate(TOKEN)
            .expect("request should be valid");

            assert_eq!(query.requester_name, DEFAULT_REQUESTER_NAME);
        }
    }

    #[test]
    fn first_day_fields_are_renamed() {
        let forecast = json!({
            "days": [
                {
                    "description": "Clear",
                    "cloudcover": 10.5,
                    "temp": 20,
                    "windspeed": 12.3,
                    "pressure": 1013,
                    "humidity": 50,
                    "visibility": 24.1,
                    "uvindex": 3,
                },
                { "temp": -5 }
            ]
        });

        let weather = DailyWeather::from_forecast(&forecast);

        assert_eq!(weather.description, Some(json!("Clear")));
        assert_eq!(weather.temp_c, Some(json!(20)));
        assert_eq!(weather.wind_kph, Some(json!(12.3)));
        assert_eq!(weather.pressure_mb, Some(json!(1013)));
        assert_eq!(weather.visibility, Some(json!(24.1)));
    }

    #[test]
    fn missing_or_odd_days_yield_all_null() {
        for forecast in [json!({}), json!({ "days": [] }), json!({ "days": null }), json!([1, 2])] {
            assert_eq!(DailyWeather::from_forecast(&forecast), DailyWeather::default());
        }
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let weather = DailyWeather::from_forecast(&json!({ "days": [{ "humidity": 50 }] }));
        let value = serde_json::to_value(&weather).expect("serializable");

        assert_eq!(
            value,
            json!({
                "description": null,
                "cloudcover": null,
                "temp_c": null,
                "wind_kph": null,
                "pressure_mb": null,
                "humidity": 50,
                "visibility": null,
            })
        );
    }

    #[test]
    fn timestamp_has_second_precision_and_z_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 8, 5, 9).unwrap();
        assert_eq!(format_timestamp(at), "2024-01-15T08:05:09Z");
    }
}
