use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::recorder::OutcomeRecorder;
use crate::client::{self, HttpsClient};
use crate::logging::{EventSink, LogEvent, RunId};
use crate::models::{RequestOutcome, StressTestConfig};

/// Everything one request loop needs, cloned per loop.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    pub run_id: RunId,
    pub client: HttpsClient,
    pub config: Arc<StressTestConfig>,
    pub deadline: Instant,
    pub request_timeout: Option<Duration>,
    pub recorder: Arc<OutcomeRecorder>,
    pub sink: Arc<dyn EventSink>,
}

/// Issues GETs back to back until the deadline. Returns how many outcomes
/// this loop recorded.
///
/// The deadline is only checked between requests, so the last one may finish
/// after it.
pub(crate) async fn run_worker(ctx: WorkerContext) -> usize {
    let url = ctx.config.target().to_string();
    let mut recorded = 0;

    while Instant::now() < ctx.deadline {
        let request_start = Instant::now();
        let result = client::fetch(&ctx.client, ctx.config.uri(), ctx.request_timeout).await;
        let elapsed = request_start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                let status = response.status().as_u16();
                ctx.recorder.record(RequestOutcome::response(status, elapsed));
                ctx.sink.append(
                    ctx.run_id,
                    LogEvent::Response {
                        status,
                        url: url.clone(),
                        latency_ms: elapsed,
                    },
                );
                client::discard_body(response, ctx.request_timeout).await;
            }
            Err(e) => {
                ctx.recorder.record(RequestOutcome::transport_failure());
                ctx.sink.append(
                    ctx.run_id,
                    LogEvent::Failure {
                        url: url.clone(),
                        error: e.to_string(),
                    },
                );
            }
        }
        recorded += 1;
    }

    recorded
}
