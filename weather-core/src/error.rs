use serde_json::{Map, Value};
use thiserror::Error;

/// Caller-visible failure: carries the HTTP status to emit and an optional
/// payload merged into the error body.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (status {status_code})")]
pub struct InvalidUsage {
    pub message: String,
    pub status_code: u16,
    pub payload: Option<Map<String, Value>>,
}

impl InvalidUsage {
    pub const DEFAULT_STATUS: u16 = 400;

    pub fn new(message: impl Into<String>, status_code: u16) -> Self {
        Self { message: message.into(), status_code, payload: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, Self::DEFAULT_STATUS)
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// JSON body for the response: the payload with `message` set on top.
    pub fn to_body(&self) -> Value {
        let mut body = self.payload.clone().unwrap_or_default();
        body.insert("message".to_string(), Value::String(self.message.clone()));
        Value::Object(body)
    }
}

/// Everything a weather lookup can fail with.
///
/// `Usage` is reported to the caller as-is; `Internal` covers transport and
/// decoding faults that have no structured response.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Usage(#[from] InvalidUsage),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WeatherError {
    pub fn as_usage(&self) -> Option<&InvalidUsage> {
        match self {
            WeatherError::Usage(usage) => Some(usage),
            WeatherError::Internal(_) => None,
        }
    }
}
