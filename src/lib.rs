//! Time-boxed HTTP GET load generator.
//!
//! A [`LoadGenerator`](executor::LoadGenerator) runs a fixed pool of request
//! loops against one URL until a deadline, records every outcome, and folds
//! them into a [`StressResult`](models::StressResult). The `api` and `ws`
//! modules expose it over actix-web.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod openapi;
pub mod ws;

pub use error::{EngineError, Result};
pub use executor::{EngineSettings, LoadGenerator, RunReport};
pub use models::{RequestOutcome, StressResult, StressTestConfig, StressTestRequest};
