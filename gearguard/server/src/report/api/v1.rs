use crate::report::{EquipmentRequestCount, ReportService, ReportServiceError, ReportSummary};
use crate::web::api::v1::ServerErrorResponse;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct ReportState {
    pub db: Arc<sea_orm::DatabaseConnection>,
    pub top_equipment_limit: u64,
}

/// JSON representation of one entry of the top equipment list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentCountJson {
    pub equipment_id: i32,
    /// Equipment name
    pub name: String,
    /// Number of requests raised for the equipment
    pub request_count: i64,
}

impl From<EquipmentRequestCount> for EquipmentCountJson {
    fn from(entry: EquipmentRequestCount) -> Self {
        Self {
            equipment_id: entry.equipment_id,
            name: entry.name,
            request_count: entry.request_count,
        }
    }
}

/// API response for the reporting page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    /// Total number of requests
    pub total: u64,
    /// Requests that have been repaired
    pub completed: u64,
    /// Mean repair time in hours over repaired requests
    pub avg_duration: f64,
    /// Requests still new or in progress
    pub critical: u64,
    /// Equipment with the most requests
    pub top_equipment: Vec<EquipmentCountJson>,
}

impl From<ReportSummary> for ReportResponse {
    fn from(summary: ReportSummary) -> Self {
        Self {
            total: summary.total,
            completed: summary.completed,
            avg_duration: summary.avg_duration,
            critical: summary.critical,
            top_equipment: summary
                .top_equipment
                .into_iter()
                .map(EquipmentCountJson::from)
                .collect(),
        }
    }
}

impl IntoResponse for ReportServiceError {
    fn into_response(self) -> Response {
        tracing::error!("Failed to compute report: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ServerErrorResponse::storage_failure()),
        )
            .into_response()
    }
}

/// Handler for GET /api/v1/reports/summary - Returns the maintenance KPIs.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    responses(
        (status = 200, description = "Report computed", body = ReportResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Reports"
)]
pub async fn report_summary_handler(
    State(state): State<Arc<ReportState>>,
) -> Result<Json<ReportResponse>, ReportServiceError> {
    let summary = ReportService::new(&state.db)
        .with_top_equipment_limit(state.top_equipment_limit)
        .summary()
        .await?;
    Ok(Json(ReportResponse::from(summary)))
}

/// Creates and returns the reports API router.
pub fn create_api_router(state: Arc<ReportState>) -> Router {
    Router::new()
        .route("/reports/summary", get(report_summary_handler))
        .with_state(state)
}
