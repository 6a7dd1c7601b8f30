use std::time::Duration;

use hyper::Uri;
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

use crate::error::ValidationError;

/// Longest accepted test, one day.
pub const MAX_DURATION_SECS: i64 = 86_400;

/// Inbound description of a test, as received over HTTP or WebSocket.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct StressTestRequest {
    /// Target API endpoint URL
    #[schema(example = "http://127.0.0.1:8000/ping")]
    pub url: String,
    /// Test duration in seconds
    #[schema(minimum = 1, maximum = 86400)]
    pub duration: i64,
    /// Number of concurrent request loops
    #[schema(minimum = 1)]
    pub concurrency: i64,
}

impl StressTestRequest {
    /// Checks the triple and turns it into a runnable config.
    pub fn validate(&self) -> Result<StressTestConfig, ValidationError> {
        let url = Url::parse(self.url.trim())
            .map_err(|e| ValidationError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingHost);
        }
        if self.duration <= 0 {
            return Err(ValidationError::NonPositiveDuration(self.duration));
        }
        if self.duration > MAX_DURATION_SECS {
            return Err(ValidationError::DurationTooLong {
                got: self.duration,
                max: MAX_DURATION_SECS,
            });
        }
        if self.concurrency <= 0 {
            return Err(ValidationError::NonPositiveConcurrency(self.concurrency));
        }

        let uri: Uri = url
            .as_str()
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| {
                ValidationError::InvalidUrl(format!("{}: {}", self.url, e))
            })?;

        Ok(StressTestConfig {
            target: self.url.trim().to_string(),
            url,
            uri,
            duration_secs: self.duration as u64,
            concurrency: self.concurrency as usize,
        })
    }
}

/// A validated test: one target, a positive duration and a positive pool size.
#[derive(Debug, Clone)]
pub struct StressTestConfig {
    target: String,
    url: Url,
    uri: Uri,
    duration_secs: u64,
    concurrency: usize,
}

impl StressTestConfig {
    /// The URL as submitted, used in log lines.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Parsed and normalized form of [`target`](Self::target).
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

/// Result of one completed request attempt.
///
/// `latency_ms` is present whenever a response head arrived, whatever its status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestOutcome {
    pub status: Option<u16>,
    pub latency_ms: Option<f64>,
}

impl RequestOutcome {
    pub fn response(status: u16, latency_ms: f64) -> Self {
        Self {
            status: Some(status),
            latency_ms: Some(latency_ms),
        }
    }

    pub fn transport_failure() -> Self {
        Self {
            status: None,
            latency_ms: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }
}
