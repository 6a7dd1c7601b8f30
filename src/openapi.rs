// OpenAPI document for the HTTP surface, served with Swagger UI at /docs.

use utoipa::OpenApi;

use crate::api;
use crate::models::{StressTestRequest, StressTestResponse};

/// OpenAPI documentation for the stress tester
#[derive(OpenApi)]
#[openapi(
    info(
        title = "API Stress Tester",
        description = "Time-boxed HTTP GET load generation with aggregate metrics."
    ),
    paths(api::stress_test, api::health),
    components(schemas(
        StressTestRequest,
        StressTestResponse,
        api::ErrorDetail,
        api::HealthResponse
    )),
    tags(
        (name = "stress", description = "Load generation"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(doc["info"]["title"], "API Stress Tester");
        assert!(doc["paths"]["/stress-test"]["post"].is_object());
        assert!(doc["paths"]["/health"]["get"].is_object());
        let schemas = &doc["components"]["schemas"];
        assert!(schemas["StressTestRequest"]["properties"]["concurrency"].is_object());
        assert!(schemas["StressTestResponse"]["properties"]["throughput_rps"].is_object());
    }
}
