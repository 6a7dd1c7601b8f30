// Per-run event log
//
// Every request outcome and the closing summary are handed to an EventSink.
// The engine never depends on where the lines end up.

mod sinks;

pub use sinks::{ConsoleSink, FileSink, MemorySink, TracingSink};

use std::fmt;

use tracing_subscriber::EnvFilter;

/// One line-oriented event of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Response {
        status: u16,
        url: String,
        latency_ms: f64,
    },
    Failure {
        url: String,
        error: String,
    },
    Summary {
        url: String,
        total: u64,
        success: u64,
        failed: u64,
        avg_latency_ms: f64,
        throughput_rps: f64,
    },
}

impl LogEvent {
    pub fn level(&self) -> &'static str {
        match self {
            LogEvent::Response { .. } => "INFO",
            LogEvent::Failure { .. } => "ERROR",
            LogEvent::Summary { .. } => "SUMMARY",
        }
    }

    /// Text after the `[LEVEL] ` tag.
    pub fn message(&self) -> String {
        match self {
            LogEvent::Response {
                status,
                url,
                latency_ms,
            } => format!("{} - {} - {:.2} ms", status, url, latency_ms),
            LogEvent::Failure { url, error } => format!("Request failed to {}: {}", url, error),
            LogEvent::Summary {
                url,
                total,
                success,
                failed,
                avg_latency_ms,
                throughput_rps,
            } => format!(
                "Stress test finished for {}\n  \
                 Total requests : {}\n  \
                 Successful     : {}\n  \
                 Failed         : {}\n  \
                 Avg latency    : {:.2} ms\n  \
                 Throughput     : {:.2} req/s",
                url, total, success, failed, avg_latency_ms, throughput_rps
            ),
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level(), self.message())
    }
}

/// Identifies one run within the process. Sinks shared by overlapping runs
/// use it to keep each run's stream separable.
pub type RunId = u64;

/// Destination for run events. Called concurrently from every request loop
/// of every run.
pub trait EventSink: Send + Sync {
    fn append(&self, run_id: RunId, event: LogEvent);
}

/// Installs the global fmt subscriber.
///
/// `filter` is an `EnvFilter` directive string; falls back to `info`.
pub fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
