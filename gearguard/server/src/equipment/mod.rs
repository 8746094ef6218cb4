use crate::entities::*;
use crate::request::{RequestService, RequestServiceError};
use sea_orm::*;

pub mod api;

/// A piece of equipment that maintenance requests can be raised against.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub location: Option<String>,
    pub team_id: Option<i32>,
}

impl From<equipment::Model> for Equipment {
    fn from(model: equipment::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            serial_number: model.serial_number,
            location: model.location,
            team_id: model.team_id,
        }
    }
}

/// Equipment together with the number of repairs currently under way.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct EquipmentDetail {
    pub equipment: Equipment,
    pub active_maintenance: u64,
}

/// A maintenance team.
#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Team {
    pub id: i32,
    pub name: String,
}

impl From<maintenance_team::Model> for Team {
    fn from(model: maintenance_team::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Error type for EquipmentService operations.
#[derive(Debug, thiserror::Error)]
pub enum EquipmentServiceError {
    #[error("Equipment with ID {0} not found")]
    NotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Storage(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Request(#[from] RequestServiceError),
}

/// Read-only access to equipment and teams.
pub struct EquipmentService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl EquipmentService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> EquipmentService<'_> {
        EquipmentService { db }
    }

    /// Retrieves all equipment ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, EquipmentServiceError> {
        let equipment = equipment::Entity::find()
            .order_by_asc(equipment::Column::Name)
            .order_by_asc(equipment::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Equipment::from)
            .collect();
        Ok(equipment)
    }

    /// Retrieves one piece of equipment with its count of in-progress requests.
    #[tracing::instrument(skip(self))]
    pub async fn get_equipment(&self, id: i32) -> Result<EquipmentDetail, EquipmentServiceError> {
        let model = equipment::Entity::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(EquipmentServiceError::NotFound(id))?;
        let active_maintenance = RequestService::new(self.db)
            .count_active_for_equipment(id)
            .await?;
        Ok(EquipmentDetail {
            equipment: Equipment::from(model),
            active_maintenance,
        })
    }

    /// Retrieves all maintenance teams ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<Team>, EquipmentServiceError> {
        let teams = maintenance_team::Entity::find()
            .order_by_asc(maintenance_team::Column::Name)
            .all(self.db)
            .await?
            .into_iter()
            .map(Team::from)
            .collect();
        Ok(teams)
    }
}
