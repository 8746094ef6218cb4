use crate::entities::*;
use crate::request::RequestStatus;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::*;

pub mod api;

/// Number of equipment entries shown in the top list unless configured otherwise.
pub const DEFAULT_TOP_EQUIPMENT_LIMIT: u64 = 3;

/// Request count for one piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct EquipmentRequestCount {
    pub equipment_id: i32,
    pub name: String,
    pub request_count: i64,
}

/// Aggregate figures for the reporting page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    /// All requests ever created.
    pub total: u64,
    /// Requests in status `repaired`.
    pub completed: u64,
    /// Mean repair duration in hours over repaired requests, one decimal.
    pub avg_duration: f64,
    /// Requests still `new` or `in_progress`.
    pub critical: u64,
    /// Equipment with the most requests, busiest first.
    pub top_equipment: Vec<EquipmentRequestCount>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

/// Rounds an average to one decimal with ties to even, mapping a missing average to zero.
fn round_average(average: Option<f64>) -> f64 {
    match average {
        Some(value) if value.is_finite() => (value * 10.0).round_ties_even() / 10.0,
        _ => 0.0,
    }
}

pub struct ReportService<'a> {
    db: &'a sea_orm::DatabaseConnection,
    top_equipment_limit: u64,
}

impl ReportService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> ReportService<'_> {
        ReportService {
            db,
            top_equipment_limit: DEFAULT_TOP_EQUIPMENT_LIMIT,
        }
    }

    /// Sets how many entries the top equipment list holds.
    pub fn with_top_equipment_limit(mut self, limit: u64) -> Self {
        self.top_equipment_limit = limit;
        self
    }

    /// Computes the report from scratch. Nothing is cached between calls.
    #[tracing::instrument(skip(self))]
    pub async fn summary(&self) -> Result<ReportSummary, ReportServiceError> {
        let total = maintenance_request::Entity::find().count(self.db).await?;
        let completed = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::Status.eq(RequestStatus::Repaired))
            .count(self.db)
            .await?;
        let critical = maintenance_request::Entity::find()
            .filter(
                maintenance_request::Column::Status
                    .is_in([RequestStatus::New, RequestStatus::InProgress]),
            )
            .count(self.db)
            .await?;
        let avg_duration = self.average_repair_duration().await?;
        let top_equipment = self.top_equipment().await?;

        Ok(ReportSummary {
            total,
            completed,
            avg_duration,
            critical,
            top_equipment,
        })
    }

    /// Mean `duration_hours` over repaired requests, zero when none are repaired.
    #[tracing::instrument(skip(self))]
    pub async fn average_repair_duration(&self) -> Result<f64, ReportServiceError> {
        let average: Option<Option<f64>> = maintenance_request::Entity::find()
            .select_only()
            .column_as(
                SimpleExpr::from(Func::avg(Expr::col(
                    maintenance_request::Column::DurationHours,
                ))),
                "avg_duration",
            )
            .filter(maintenance_request::Column::Status.eq(RequestStatus::Repaired))
            .into_tuple()
            .one(self.db)
            .await?;
        Ok(round_average(average.flatten()))
    }

    /// Equipment ranked by number of requests. Ties are ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn top_equipment(&self) -> Result<Vec<EquipmentRequestCount>, ReportServiceError> {
        let top = maintenance_request::Entity::find()
            .select_only()
            .column(maintenance_request::Column::EquipmentId)
            .column_as(equipment::Column::Name, "name")
            .column_as(maintenance_request::Column::Id.count(), "request_count")
            .join(
                JoinType::InnerJoin,
                maintenance_request::Relation::Equipment.def(),
            )
            .group_by(maintenance_request::Column::EquipmentId)
            .group_by(equipment::Column::Name)
            .order_by_desc(maintenance_request::Column::Id.count())
            .order_by_asc(equipment::Column::Name)
            .limit(self.top_equipment_limit)
            .into_model::<EquipmentRequestCount>()
            .all(self.db)
            .await?;
        Ok(top)
    }
}
