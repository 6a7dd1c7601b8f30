use std::time::Duration;

use hyper::client::HttpConnector;
use hyper::{Body, Client, Response, Uri};
use hyper_tls::HttpsConnector;
use thiserror::Error;
use tokio::time::timeout;

use crate::error::EngineError;

pub type HttpsClient = Client<HttpsConnector<HttpConnector>>;

/// Why a single request produced no response.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("connection refused or host unreachable: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection closed unexpectedly: {0}")]
    Closed(String),

    #[error("network error: {0}")]
    Other(String),
}

impl From<hyper::Error> for RequestError {
    fn from(e: hyper::Error) -> Self {
        if e.is_connect() {
            RequestError::Connect(e.to_string())
        } else if e.is_timeout() {
            RequestError::Timeout(e.to_string())
        } else if e.is_closed() || e.is_incomplete_message() {
            RequestError::Closed(e.to_string())
        } else {
            RequestError::Other(e.to_string())
        }
    }
}

/// Builds the pooled client shared by every loop of a run.
pub fn build_client() -> Result<HttpsClient, EngineError> {
    let tls = native_tls::TlsConnector::new()?;
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    let https = HttpsConnector::from((http, tokio_native_tls::TlsConnector::from(tls)));
    Ok(Client::builder().build::<_, Body>(https))
}

/// Issues one GET and resolves once the response head has arrived.
pub async fn fetch(
    client: &HttpsClient,
    uri: &Uri,
    request_timeout: Option<Duration>,
) -> Result<Response<Body>, RequestError> {
    let request = client.get(uri.clone());
    match request_timeout {
        Some(limit) => match timeout(limit, request).await {
            Ok(result) => result.map_err(RequestError::from),
            Err(_) => Err(RequestError::Timeout(format!(
                "no response within {} ms",
                limit.as_millis()
            ))),
        },
        None => request.await.map_err(RequestError::from),
    }
}

/// Reads the body to the end so the connection goes back to the pool.
///
/// Body errors are not request failures; the response head already counted.
pub async fn discard_body(response: Response<Body>, request_timeout: Option<Duration>) {
    let drain = hyper::body::to_bytes(response.into_body());
    let result = match request_timeout {
        Some(limit) => match timeout(limit, drain).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("response body not drained before timeout");
                return;
            }
        },
        None => drain.await,
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "response body could not be read");
    }
}
