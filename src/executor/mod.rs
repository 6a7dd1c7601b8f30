mod recorder;
mod worker;

pub use recorder::OutcomeRecorder;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, info_span, Instrument};

use crate::client::build_client;
use crate::error::{EngineError, Result};
use crate::logging::{EventSink, LogEvent, RunId};
use crate::models::{StressResult, StressTestConfig};
use worker::{run_worker, WorkerContext};

static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Knobs that apply to every run of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound for one request; `None` waits as long as the transport does.
    pub request_timeout: Option<Duration>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_millis(5000)),
        }
    }
}

/// A finished run with per-loop diagnostics.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub result: StressResult,
    /// Outcomes recorded by each loop, indexed by loop.
    pub loop_counts: Vec<usize>,
    /// Measured wall-clock time of the run. Not used for throughput.
    pub elapsed: Duration,
}

/// Runs fixed-size pools of request loops against a single target.
#[derive(Clone)]
pub struct LoadGenerator {
    settings: EngineSettings,
    sink: Arc<dyn EventSink>,
}

impl LoadGenerator {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Self {
        Self { settings, sink }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Runs one test and returns its summary.
    pub async fn run(&self, config: &StressTestConfig) -> Result<StressResult> {
        Ok(self.run_detailed(config).await?.result)
    }

    /// Like [`run`](Self::run), also reporting how much each loop did.
    ///
    /// Dropping the returned future aborts every request loop of the run.
    pub async fn run_detailed(&self, config: &StressTestConfig) -> Result<RunReport> {
        let client = build_client()?;
        let config = Arc::new(config.clone());
        let recorder = Arc::new(OutcomeRecorder::new());
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let deadline = started
            .checked_add(config.duration())
            .ok_or(EngineError::DurationOutOfRange(config.duration_secs()))?;
        let span = info_span!(
            "stress_test",
            run_id,
            url = %config.target(),
            duration_secs = config.duration_secs(),
            concurrency = config.concurrency()
        );
        info!(parent: &span, "starting request loops");

        let ctx = WorkerContext {
            run_id,
            client,
            config: Arc::clone(&config),
            deadline,
            request_timeout: self.settings.request_timeout,
            recorder: Arc::clone(&recorder),
            sink: Arc::clone(&self.sink),
        };

        // The set aborts its loops when dropped, so a cancelled run stops issuing requests.
        let mut loops = JoinSet::new();
        for index in 0..config.concurrency() {
            let worker = run_worker(ctx.clone());
            loops.spawn(async move { (index, worker.await) }.instrument(span.clone()));
        }
        drop(ctx);

        let mut loop_counts = vec![0; config.concurrency()];
        while let Some(joined) = loops.join_next().await {
            let (index, count) = joined.map_err(EngineError::WorkerJoin)?;
            loop_counts[index] = count;
        }
        let elapsed = started.elapsed();

        let outcomes = recorder.take();
        let result = StressResult::aggregate(&outcomes, config.duration_secs());

        self.sink.append(
            run_id,
            LogEvent::Summary {
                url: config.target().to_string(),
                total: result.total,
                success: result.success,
                failed: result.failed,
                avg_latency_ms: result.avg_latency_ms,
                throughput_rps: result.throughput_rps,
            },
        );
        info!(
            parent: &span,
            total = result.total,
            success = result.success,
            failed = result.failed,
            avg_latency_ms = result.avg_latency_ms,
            throughput_rps = result.throughput_rps,
            elapsed_ms = elapsed.as_millis() as u64,
            "stress test finished"
        );

        Ok(RunReport {
            run_id,
            result,
            loop_counts,
            elapsed,
        })
    }
}
