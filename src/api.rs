// JSON front end: validates the inbound triple, runs the test, relays the summary.

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::error::{EngineError, ValidationError};
use crate::executor::LoadGenerator;
use crate::models::{StressTestRequest, StressTestResponse};
use crate::openapi::ApiDoc;
use crate::ws;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The run finished without a single completed request
    #[error("No requests were executed.")]
    NoRequests,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Error body shared by every failing route.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NoRequests => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail {
            detail: self.to_string(),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Launch a stress test against the requested URL.
#[utoipa::path(
    post,
    path = "/stress-test",
    request_body = StressTestRequest,
    responses(
        (status = 200, description = "Test finished", body = StressTestResponse),
        (status = 400, description = "No requests were executed", body = ErrorDetail),
        (status = 422, description = "Invalid url, duration or concurrency", body = ErrorDetail),
        (status = 500, description = "HTTP transport could not be initialized", body = ErrorDetail)
    ),
    tag = "stress"
)]
pub async fn stress_test(
    generator: web::Data<LoadGenerator>,
    body: web::Json<StressTestRequest>,
) -> Result<HttpResponse, ApiError> {
    let config = body.validate()?;
    let result = generator.run(&config).await?;
    if result.total == 0 {
        return Err(ApiError::NoRequests);
    }
    Ok(HttpResponse::Ok().json(StressTestResponse::from(&result)))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::UnprocessableEntity().json(ErrorDetail { detail }),
        )
        .into()
    })
}

/// Registers every route. The caller provides `web::Data<LoadGenerator>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/stress-test", web::post().to(stress_test))
        .route("/ws", web::get().to(ws::ws_handler))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/openapi.json", ApiDoc::openapi()));
}
