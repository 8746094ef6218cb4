use crate::equipment::{Equipment, EquipmentDetail, EquipmentService, EquipmentServiceError, Team};
use crate::web::api::v1::ServerErrorResponse;
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct EquipmentState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a piece of equipment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentJson {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub location: Option<String>,
    /// Team that receives requests raised for this equipment
    pub team_id: Option<i32>,
}

impl From<Equipment> for EquipmentJson {
    fn from(equipment: Equipment) -> Self {
        Self {
            id: equipment.id,
            name: equipment.name,
            serial_number: equipment.serial_number,
            location: equipment.location,
            team_id: equipment.team_id,
        }
    }
}

/// JSON representation of the equipment detail view.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EquipmentDetailJson {
    pub equipment: EquipmentJson,
    /// Requests for this equipment currently in progress
    pub active_maintenance: u64,
}

impl From<EquipmentDetail> for EquipmentDetailJson {
    fn from(detail: EquipmentDetail) -> Self {
        Self {
            equipment: EquipmentJson::from(detail.equipment),
            active_maintenance: detail.active_maintenance,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TeamJson {
    pub id: i32,
    pub name: String,
}

impl From<Team> for TeamJson {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
        }
    }
}

impl IntoResponse for EquipmentServiceError {
    fn into_response(self) -> Response {
        match self {
            EquipmentServiceError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ServerErrorResponse::new("NOT_FOUND", self.to_string())),
            )
                .into_response(),
            err => {
                tracing::error!("Equipment lookup failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServerErrorResponse::storage_failure()),
                )
                    .into_response()
            }
        }
    }
}

/// Handler for GET /api/v1/equipment - Lists equipment for selection lists.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    responses(
        (status = 200, description = "All equipment ordered by name", body = Vec<EquipmentJson>),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Equipment"
)]
pub async fn list_equipment_handler(
    State(state): State<Arc<EquipmentState>>,
) -> Result<Json<Vec<EquipmentJson>>, EquipmentServiceError> {
    let service = EquipmentService::new(&state.db);
    let equipment = service
        .list_equipment()
        .await?
        .into_iter()
        .map(EquipmentJson::from)
        .collect();
    Ok(Json(equipment))
}

/// Handler for GET /api/v1/equipment/{id} - Returns the equipment detail view.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}",
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "The equipment", body = EquipmentDetailJson),
        (status = 404, description = "Equipment not found", body = ServerErrorResponse)
    ),
    tag = "Equipment"
)]
pub async fn get_equipment_handler(
    State(state): State<Arc<EquipmentState>>,
    Path(id): Path<i32>,
) -> Result<Json<EquipmentDetailJson>, EquipmentServiceError> {
    let service = EquipmentService::new(&state.db);
    let detail = service.get_equipment(id).await?;
    Ok(Json(EquipmentDetailJson::from(detail)))
}

/// Handler for GET /api/v1/teams - Lists maintenance teams.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    responses(
        (status = 200, description = "All teams ordered by name", body = Vec<TeamJson>),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Equipment"
)]
pub async fn list_teams_handler(
    State(state): State<Arc<EquipmentState>>,
) -> Result<Json<Vec<TeamJson>>, EquipmentServiceError> {
    let service = EquipmentService::new(&state.db);
    let teams = service
        .list_teams()
        .await?
        .into_iter()
        .map(TeamJson::from)
        .collect();
    Ok(Json(teams))
}

/// Creates and returns the equipment API router.
pub fn create_api_router(state: Arc<EquipmentState>) -> Router {
    Router::new()
        .route("/equipment", get(list_equipment_handler))
        .route("/equipment/{id}", get(get_equipment_handler))
        .route("/teams", get(list_teams_handler))
        .with_state(state)
}
