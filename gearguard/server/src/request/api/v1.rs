use crate::request::{
    Actor, KanbanBoard, MaintenanceRequest, RequestService, RequestServiceError, RequestStatus,
};
use crate::web::api::v1::ServerErrorResponse;
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct RequestState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a maintenance request for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequestJson {
    /// Unique identifier for the request
    pub id: i32,
    /// What is wrong with the equipment
    pub description: String,
    /// Current status code
    pub status: RequestStatus,
    /// Board label of the current status
    pub status_label: String,
    /// Equipment the request is about
    pub equipment_id: i32,
    /// Team assigned from the equipment at creation time
    pub team_id: Option<i32>,
    /// Technician working on the request
    pub technician_id: Option<i32>,
    /// User who reported the problem
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    /// Hours spent on the repair
    pub duration_hours: f64,
}

impl From<MaintenanceRequest> for RequestJson {
    fn from(request: MaintenanceRequest) -> Self {
        Self {
            id: request.id(),
            description: request.description().to_string(),
            status: request.status(),
            status_label: request.status().label().to_string(),
            equipment_id: request.equipment_id(),
            team_id: request.team_id(),
            technician_id: request.technician_id(),
            created_by: request.created_by(),
            created_at: request.created_at(),
            duration_hours: request.duration_hours(),
        }
    }
}

fn to_json(requests: Vec<MaintenanceRequest>) -> Vec<RequestJson> {
    requests.into_iter().map(RequestJson::from).collect()
}

/// API response for listing requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RequestsResponse {
    /// Requests, newest first
    pub requests: Vec<RequestJson>,
    /// Total number of requests returned
    pub count: usize,
}

/// API response for the dashboard board.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BoardResponse {
    pub new: Vec<RequestJson>,
    pub in_progress: Vec<RequestJson>,
    pub repaired: Vec<RequestJson>,
    pub scrap: Vec<RequestJson>,
}

impl From<KanbanBoard> for BoardResponse {
    fn from(board: KanbanBoard) -> Self {
        Self {
            new: to_json(board.new),
            in_progress: to_json(board.in_progress),
            repaired: to_json(board.repaired),
            scrap: to_json(board.scrap),
        }
    }
}

/// Query parameters for filtering requests by equipment.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RequestsQuery {
    /// Optional equipment ID to filter requests by
    #[serde(default)]
    pub equipment_id: Option<i32>,
}

/// Payload for reporting a new equipment problem.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestPayload {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment_id: Option<i32>,
    pub creator_id: i32,
}

/// Payload for moving a request to another board column.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    /// Board label, one of "New Request", "In Progress", "Repaired" or "Scrap"
    pub label: String,
    pub actor: Actor,
}

/// Payload for recording the repair duration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordDurationPayload {
    pub duration_hours: f64,
}

/// JSON body whose rejections are answered as validation errors.
type JsonBody<T> = WithRejection<Json<T>, RequestServiceError>;
type QueryParams<T> = WithRejection<Query<T>, RequestServiceError>;

impl From<JsonRejection> for RequestServiceError {
    fn from(rejection: JsonRejection) -> Self {
        RequestServiceError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for RequestServiceError {
    fn from(rejection: QueryRejection) -> Self {
        RequestServiceError::Validation(rejection.body_text())
    }
}

impl IntoResponse for RequestServiceError {
    fn into_response(self) -> Response {
        let (status_code, error) = match &self {
            RequestServiceError::Validation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            RequestServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            RequestServiceError::InvalidLabel(_) => (StatusCode::BAD_REQUEST, "INVALID_LABEL"),
            RequestServiceError::Storage(err) => {
                tracing::error!("Maintenance request storage failure: {}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ServerErrorResponse::storage_failure()),
                )
                    .into_response();
            }
        };
        (
            status_code,
            Json(ServerErrorResponse::new(error, self.to_string())),
        )
            .into_response()
    }
}

/// Handler for POST /api/v1/requests - Reports a new equipment problem.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = CreateRequestPayload,
    responses(
        (status = 201, description = "Request created", body = RequestJson),
        (status = 422, description = "Missing or invalid input", body = ServerErrorResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn create_request_handler(
    State(state): State<Arc<RequestState>>,
    WithRejection(Json(payload), _): JsonBody<CreateRequestPayload>,
) -> Result<(StatusCode, Json<RequestJson>), RequestServiceError> {
    let service = RequestService::new(&state.db);
    let created = service
        .create_request(
            &payload.description,
            payload.equipment_id,
            payload.creator_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(RequestJson::from(created))))
}

/// Handler for GET /api/v1/requests - Lists requests, newest first.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(
        ("equipment_id" = Option<i32>, Query, description = "Only requests for this equipment")
    ),
    responses(
        (status = 200, description = "Successfully retrieved requests", body = RequestsResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn list_requests_handler(
    State(state): State<Arc<RequestState>>,
    WithRejection(Query(query), _): QueryParams<RequestsQuery>,
) -> Result<Json<RequestsResponse>, RequestServiceError> {
    let service = RequestService::new(&state.db);
    let requests = to_json(service.list_requests(query.equipment_id).await?);
    let count = requests.len();
    Ok(Json(RequestsResponse { requests, count }))
}

/// Handler for GET /api/v1/requests/board - Returns requests grouped by status.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/requests/board",
    responses(
        (status = 200, description = "Requests grouped into board columns", body = BoardResponse),
        (status = 500, description = "Internal server error", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn board_handler(
    State(state): State<Arc<RequestState>>,
) -> Result<Json<BoardResponse>, RequestServiceError> {
    let service = RequestService::new(&state.db);
    let board = service.board().await?;
    Ok(Json(BoardResponse::from(board)))
}

/// Handler for GET /api/v1/requests/{id}.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    params(("id" = i32, Path, description = "Maintenance request ID")),
    responses(
        (status = 200, description = "The request", body = RequestJson),
        (status = 404, description = "Request not found", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn get_request_handler(
    State(state): State<Arc<RequestState>>,
    Path(id): Path<i32>,
) -> Result<Json<RequestJson>, RequestServiceError> {
    let service = RequestService::new(&state.db);
    let request = service.get_request_by_id(id).await?;
    Ok(Json(RequestJson::from(request)))
}

/// Handler for PUT /api/v1/requests/{id}/status - Moves a request on the board.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/requests/{id}/status",
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = RequestJson),
        (status = 400, description = "Unknown status label", body = ServerErrorResponse),
        (status = 404, description = "Request not found", body = ServerErrorResponse),
        (status = 422, description = "Invalid body or technician", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn update_status_handler(
    State(state): State<Arc<RequestState>>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): JsonBody<UpdateStatusPayload>,
) -> Result<Json<RequestJson>, RequestServiceError> {
    let service = RequestService::new(&state.db);
    let updated = service
        .update_status(id, &payload.label, payload.actor)
        .await?;
    Ok(Json(RequestJson::from(updated)))
}

/// Handler for PUT /api/v1/requests/{id}/duration - Records the repair duration.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    put,
    path = "/api/v1/requests/{id}/duration",
    params(("id" = i32, Path, description = "Maintenance request ID")),
    request_body = RecordDurationPayload,
    responses(
        (status = 200, description = "Duration recorded", body = RequestJson),
        (status = 404, description = "Request not found", body = ServerErrorResponse),
        (status = 422, description = "Invalid duration or not repaired", body = ServerErrorResponse)
    ),
    tag = "Requests"
)]
pub async fn record_duration_handler(
    State(state): State<Arc<RequestState>>,
    Path(id): Path<i32>,
    WithRejection(Json(payload), _): JsonBody<RecordDurationPayload>,
) -> Result<Json<RequestJson>, RequestServiceError> {
    let service = RequestService::new(&state.db);
    let updated = service.record_duration(id, payload.duration_hours).await?;
    Ok(Json(RequestJson::from(updated)))
}

/// Creates and returns the maintenance requests API router.
pub fn create_api_router(state: Arc<RequestState>) -> Router {
    Router::new()
        .route(
            "/requests",
            get(list_requests_handler).post(create_request_handler),
        )
        .route("/requests/board", get(board_handler))
        .route("/requests/{id}", get(get_request_handler))
        .route("/requests/{id}/status", put(update_status_handler))
        .route("/requests/{id}/duration", put(record_duration_handler))
        .with_state(state)
}
