// Process configuration
//
// Read once at startup from the environment (a `.env` file is honoured).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::executor::EngineSettings;
use crate::logging::{ConsoleSink, EventSink, FileSink, TracingSink};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_FILE: &str = "stress.log";

/// Where per-request events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSinkKind {
    #[default]
    Tracing,
    Console,
    File,
}

impl FromStr for LogSinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracing" => Ok(LogSinkKind::Tracing),
            "console" | "stdout" => Ok(LogSinkKind::Console),
            "file" => Ok(LogSinkKind::File),
            other => Err(format!("expected tracing, console or file, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub request_timeout: Option<Duration>,
    pub log_sink: LogSinkKind,
    pub log_file: PathBuf,
    pub log_filter: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// Environment variables:
    /// - `STRESS_BIND_ADDR`: listen address (default `127.0.0.1:8080`)
    /// - `STRESS_REQUEST_TIMEOUT_MS`: per-request limit, `0` disables (default `5000`)
    /// - `STRESS_LOG_SINK`: `tracing`, `console` or `file` (default `tracing`)
    /// - `STRESS_LOG_FILE`: target of the file sink (default `stress.log`)
    /// - `RUST_LOG` or `LOG_LEVEL`: tracing filter
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("STRESS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::invalid("STRESS_BIND_ADDR", bind_raw.clone(), e))?;

        let request_timeout = match lookup("STRESS_REQUEST_TIMEOUT_MS") {
            Some(raw) => {
                let ms = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::invalid("STRESS_REQUEST_TIMEOUT_MS", raw.clone(), e))?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None => Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
        };

        let log_sink = match lookup("STRESS_LOG_SINK") {
            Some(raw) => raw
                .parse::<LogSinkKind>()
                .map_err(|e| ConfigError::invalid("STRESS_LOG_SINK", raw.clone(), e))?,
            None => LogSinkKind::default(),
        };

        let log_file = lookup("STRESS_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        let log_filter = lookup("RUST_LOG").or_else(|| lookup("LOG_LEVEL"));

        Ok(Self {
            bind_addr,
            request_timeout,
            log_sink,
            log_file,
            log_filter,
        })
    }

    pub fn engine(&self) -> EngineSettings {
        EngineSettings {
            request_timeout: self.request_timeout,
        }
    }

    /// Builds the configured event sink.
    pub fn event_sink(&self) -> std::io::Result<Arc<dyn EventSink>> {
        let sink: Arc<dyn EventSink> = match self.log_sink {
            LogSinkKind::Tracing => Arc::new(TracingSink),
            LogSinkKind::Console => Arc::new(ConsoleSink),
            LogSinkKind::File => Arc::new(FileSink::open(&self.log_file)?),
        };
        Ok(sink)
    }
}
