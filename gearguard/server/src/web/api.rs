use std::sync::Arc;

use crate::{
    equipment::api::v1::EquipmentState, report::api::v1::ReportState,
    request::api::v1::RequestState,
};

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

pub mod v1 {
    use serde::{Deserialize, Serialize};
    use utoipa::ToSchema;

    /// JSON response for API errors.
    #[derive(Debug, Serialize, Deserialize, ToSchema)]
    pub struct ServerErrorResponse {
        /// Machine readable error code
        pub error: String,
        /// Human readable description
        pub message: String,
    }

    impl ServerErrorResponse {
        pub fn new(error: &str, message: String) -> Self {
            Self {
                error: error.to_string(),
                message,
            }
        }

        /// Generic body for store failures. Details only go to the log.
        pub fn storage_failure() -> Self {
            Self::new(
                "STORAGE_ERROR",
                "An unexpected error occurred while processing your request. Please try again later."
                    .to_string(),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::request::api::v1::create_request_handler,
        crate::request::api::v1::list_requests_handler,
        crate::request::api::v1::board_handler,
        crate::request::api::v1::get_request_handler,
        crate::request::api::v1::update_status_handler,
        crate::request::api::v1::record_duration_handler,
        crate::report::api::v1::report_summary_handler,
        crate::equipment::api::v1::list_equipment_handler,
        crate::equipment::api::v1::get_equipment_handler,
        crate::equipment::api::v1::list_teams_handler,
    ),
    components(schemas(v1::ServerErrorResponse)),
    tags(
        (name = "Requests", description = "Maintenance request lifecycle"),
        (name = "Reports", description = "Maintenance KPIs"),
        (name = "Equipment", description = "Equipment and team lookups")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api-docs/openapi.json.
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(
    request_state: Arc<RequestState>,
    report_state: Arc<ReportState>,
    equipment_state: Arc<EquipmentState>,
) -> axum::Router {
    let api_routes = crate::request::api::v1::create_api_router(request_state)
        .merge(crate::report::api::v1::create_api_router(report_state))
        .merge(crate::equipment::api::v1::create_api_router(equipment_state));
    Router::new()
        .nest("/api/v1", api_routes)
        .route("/api-docs/openapi.json", get(openapi_handler))
}
