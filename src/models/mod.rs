pub mod metrics;
pub mod stress_model;

pub use metrics::{StressResult, StressTestResponse, TRANSPORT_ERROR_KEY};
pub use stress_model::{RequestOutcome, StressTestConfig, StressTestRequest};
