use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod api;
pub mod status;

pub use status::{Actor, RequestStatus};

/// A maintenance request as seen by the rest of the application.
#[derive(Debug, PartialEq, Clone)]
pub struct MaintenanceRequest {
    id: i32,
    description: String,
    status: RequestStatus,
    equipment_id: i32,
    team_id: Option<i32>,
    technician_id: Option<i32>,
    created_by: i32,
    created_at: DateTime<Utc>,
    duration_hours: f64,
}

impl MaintenanceRequest {
    /// Returns the ID of the request.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Returns the problem description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status.
    pub fn status(&self) -> RequestStatus {
        self.status
    }

    /// Returns the ID of the equipment the request is about.
    pub fn equipment_id(&self) -> i32 {
        self.equipment_id
    }

    /// Returns the team assigned when the request was created, if the equipment had one.
    pub fn team_id(&self) -> Option<i32> {
        self.team_id
    }

    /// Returns the technician working on the request, if any.
    pub fn technician_id(&self) -> Option<i32> {
        self.technician_id
    }

    /// Returns the ID of the user who reported the problem.
    pub fn created_by(&self) -> i32 {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_hours
    }
}

impl From<maintenance_request::Model> for MaintenanceRequest {
    fn from(model: maintenance_request::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            status: model.status,
            equipment_id: model.equipment_id,
            team_id: model.team_id,
            technician_id: model.technician_id,
            created_by: model.created_by,
            created_at: model.created_at,
            duration_hours: model.duration_hours,
        }
    }
}

/// Requests split into the four board columns.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct KanbanBoard {
    pub new: Vec<MaintenanceRequest>,
    pub in_progress: Vec<MaintenanceRequest>,
    pub repaired: Vec<MaintenanceRequest>,
    pub scrap: Vec<MaintenanceRequest>,
}

impl KanbanBoard {
    /// Returns the column holding requests with the given status.
    pub fn column(&self, status: RequestStatus) -> &[MaintenanceRequest] {
        match status {
            RequestStatus::New => &self.new,
            RequestStatus::InProgress => &self.in_progress,
            RequestStatus::Repaired => &self.repaired,
            RequestStatus::Scrap => &self.scrap,
        }
    }

    fn column_mut(&mut self, status: RequestStatus) -> &mut Vec<MaintenanceRequest> {
        match status {
            RequestStatus::New => &mut self.new,
            RequestStatus::InProgress => &mut self.in_progress,
            RequestStatus::Repaired => &mut self.repaired,
            RequestStatus::Scrap => &mut self.scrap,
        }
    }
}

/// Error type for RequestService operations.
#[derive(Debug, thiserror::Error)]
pub enum RequestServiceError {
    /// Required input is missing or does not point at an existing record.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// The maintenance request does not exist.
    #[error("Maintenance request with ID {0} not found")]
    NotFound(i32),
    /// The status label is not one of the board columns.
    #[error("Unknown status label '{0}'")]
    InvalidLabel(String),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

pub struct RequestService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl RequestService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> RequestService<'_> {
        RequestService { db }
    }

    /// Creates a new maintenance request with status `new`.
    ///
    /// The team is copied from the equipment at this point and never follows later
    /// changes to the equipment.
    ///
    /// # Arguments
    ///
    /// * `description` - What is wrong with the equipment.
    /// * `equipment_id` - The broken equipment.
    /// * `creator_id` - The user reporting the problem.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `MaintenanceRequest`, or a `Validation` error when
    /// the description is blank or a referenced record does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn create_request(
        &self,
        description: &str,
        equipment_id: Option<i32>,
        creator_id: i32,
    ) -> Result<MaintenanceRequest, RequestServiceError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(RequestServiceError::Validation(
                "description is required".to_string(),
            ));
        }
        let equipment_id = equipment_id.ok_or_else(|| {
            RequestServiceError::Validation("equipment_id is required".to_string())
        })?;

        let equipment = equipment::Entity::find_by_id(equipment_id)
            .one(self.db)
            .await?
            .ok_or_else(|| {
                RequestServiceError::Validation(format!(
                    "equipment {} does not exist",
                    equipment_id
                ))
            })?;

        let creator = user::Entity::find_by_id(creator_id).one(self.db).await?;
        if creator.is_none() {
            return Err(RequestServiceError::Validation(format!(
                "user {} does not exist",
                creator_id
            )));
        }

        let active_model = maintenance_request::ActiveModel {
            description: ActiveValue::Set(description.to_string()),
            status: ActiveValue::Set(RequestStatus::New),
            equipment_id: ActiveValue::Set(equipment.id),
            team_id: ActiveValue::Set(equipment.team_id),
            technician_id: ActiveValue::Set(None),
            created_by: ActiveValue::Set(creator_id),
            created_at: ActiveValue::Set(Utc::now()),
            duration_hours: ActiveValue::Set(0.0),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::info!(
            "Created maintenance request {} for equipment {}",
            created_model.id,
            created_model.equipment_id
        );
        Ok(MaintenanceRequest::from(created_model))
    }

    /// Moves a request to the column named by `label`.
    ///
    /// Any status can follow any other. When a technician moves a request to
    /// in-progress, the request is assigned to that technician.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the request to move.
    /// * `label` - A board label such as `"In Progress"`.
    /// * `actor` - Who is moving the request.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `MaintenanceRequest`, `InvalidLabel` for an unknown
    /// label, `NotFound` for an unknown ID, or `Validation` when the acting technician does
    /// not exist.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        label: &str,
        actor: Actor,
    ) -> Result<MaintenanceRequest, RequestServiceError> {
        let new_status = RequestStatus::from_label(label)
            .ok_or_else(|| RequestServiceError::InvalidLabel(label.to_string()))?;

        let request_to_update = maintenance_request::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RequestServiceError::NotFound(id))?;
        let previous_status = request_to_update.status;

        let mut active_model: maintenance_request::ActiveModel = request_to_update.into();
        active_model.status = ActiveValue::Set(new_status);
        if new_status == RequestStatus::InProgress {
            if let Some(technician_id) = actor.technician_id() {
                let technician = technician::Entity::find_by_id(technician_id)
                    .one(self.db)
                    .await?;
                if technician.is_none() {
                    return Err(RequestServiceError::Validation(format!(
                        "technician {} does not exist",
                        technician_id
                    )));
                }
                active_model.technician_id = ActiveValue::Set(Some(technician_id));
            }
        }
        let updated_model = active_model.update(self.db).await?;

        tracing::info!(
            "Moved maintenance request {} from {} to {}",
            id,
            previous_status.code(),
            new_status.code()
        );
        Ok(MaintenanceRequest::from(updated_model))
    }

    /// Records how long the repair took.
    ///
    /// Only repaired requests accept a duration and the value must be a finite,
    /// non-negative number of hours.
    #[tracing::instrument(skip(self))]
    pub async fn record_duration(
        &self,
        id: i32,
        hours: f64,
    ) -> Result<MaintenanceRequest, RequestServiceError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(RequestServiceError::Validation(format!(
                "duration must be a non-negative number of hours, got {}",
                hours
            )));
        }

        let request_to_update = maintenance_request::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RequestServiceError::NotFound(id))?;
        if request_to_update.status != RequestStatus::Repaired {
            return Err(RequestServiceError::Validation(format!(
                "duration can only be recorded on repaired requests, request {} is {}",
                id,
                request_to_update.status.code()
            )));
        }

        let mut active_model: maintenance_request::ActiveModel = request_to_update.into();
        active_model.duration_hours = ActiveValue::Set(hours);
        let updated_model = active_model.update(self.db).await?;
        Ok(MaintenanceRequest::from(updated_model))
    }

    /// Retrieves a maintenance request by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_request_by_id(
        &self,
        id: i32,
    ) -> Result<MaintenanceRequest, RequestServiceError> {
        let model = maintenance_request::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RequestServiceError::NotFound(id))?;
        Ok(MaintenanceRequest::from(model))
    }

    /// Lists requests, newest first, optionally only those for one piece of equipment.
    ///
    /// # Arguments
    ///
    /// * `equipment_id` - When set, only requests for this equipment are returned.
    ///
    /// # Returns
    ///
    /// A `Result` containing the requests ordered by creation time, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_requests(
        &self,
        equipment_id: Option<i32>,
    ) -> Result<Vec<MaintenanceRequest>, RequestServiceError> {
        let mut query = maintenance_request::Entity::find();
        if let Some(equipment_id) = equipment_id {
            query = query.filter(maintenance_request::Column::EquipmentId.eq(equipment_id));
        }
        let requests = query
            .order_by_desc(maintenance_request::Column::CreatedAt)
            .order_by_desc(maintenance_request::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(MaintenanceRequest::from)
            .collect();
        Ok(requests)
    }

    /// Lists requests with the given status, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_requests_by_status(
        &self,
        status: RequestStatus,
    ) -> Result<Vec<MaintenanceRequest>, RequestServiceError> {
        let requests = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::Status.eq(status))
            .order_by_desc(maintenance_request::Column::CreatedAt)
            .order_by_desc(maintenance_request::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(MaintenanceRequest::from)
            .collect();
        Ok(requests)
    }

    /// Builds the dashboard board with every request in its status column.
    #[tracing::instrument(skip(self))]
    pub async fn board(&self) -> Result<KanbanBoard, RequestServiceError> {
        let mut board = KanbanBoard::default();
        for status in RequestStatus::iter() {
            *board.column_mut(status) = self.list_requests_by_status(status).await?;
        }
        Ok(board)
    }

    /// Counts in-progress requests for one piece of equipment.
    #[tracing::instrument(skip(self))]
    pub async fn count_active_for_equipment(
        &self,
        equipment_id: i32,
    ) -> Result<u64, RequestServiceError> {
        let count = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::EquipmentId.eq(equipment_id))
            .filter(maintenance_request::Column::Status.eq(RequestStatus::InProgress))
            .count(self.db)
            .await?;
        Ok(count)
    }
}
