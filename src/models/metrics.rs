use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::stress_model::RequestOutcome;

/// Key used in `status_counts` for attempts that never got a response.
pub const TRANSPORT_ERROR_KEY: &str = "TRANSPORT_ERROR";

/// Summary of one finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StressResult {
    pub total: u64,
    pub success: u64,
    pub failed: u64,
    pub avg_latency_ms: f64,
    pub throughput_rps: f64,

    pub status_counts: BTreeMap<String, u64>,
}

impl StressResult {
    /// Folds the outcomes of a run into its summary.
    ///
    /// Order of `outcomes` does not matter. `duration_secs` is the configured
    /// duration, not the measured one.
    pub fn aggregate(outcomes: &[RequestOutcome], duration_secs: u64) -> Self {
        let total = outcomes.len() as u64;
        let success = outcomes.iter().filter(|o| o.is_success()).count() as u64;

        let (latency_sum, latency_samples) = outcomes
            .iter()
            .filter_map(|o| o.latency_ms)
            .fold((0.0_f64, 0_u64), |(sum, n), l| (sum + l, n + 1));
        let avg_latency_ms = if latency_samples == 0 {
            0.0
        } else {
            latency_sum / latency_samples as f64
        };

        let throughput_rps = if duration_secs == 0 {
            0.0
        } else {
            total as f64 / duration_secs as f64
        };

        let mut status_counts = BTreeMap::new();
        for outcome in outcomes {
            let key = match outcome.status {
                Some(code) => code.to_string(),
                None => TRANSPORT_ERROR_KEY.to_string(),
            };
            *status_counts.entry(key).or_insert(0) += 1;
        }

        Self {
            total,
            success,
            failed: total - success,
            avg_latency_ms,
            throughput_rps,
            status_counts,
        }
    }
}

/// Response body of `POST /stress-test`.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StressTestResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub average_latency_ms: f64,
    pub throughput_rps: f64,
}

impl From<&StressResult> for StressTestResponse {
    fn from(result: &StressResult) -> Self {
        Self {
            total_requests: result.total,
            successful_requests: result.success,
            failed_requests: result.failed,
            average_latency_ms: result.avg_latency_ms,
            throughput_rps: result.throughput_rps,
        }
    }
}
