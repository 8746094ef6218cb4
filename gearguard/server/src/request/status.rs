use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use crate::entities::sea_orm_active_enums::RequestStatus;

/// Board column labels paired with the status each one stands for.
const STATUS_LABELS: [(&str, RequestStatus); 4] = [
    ("New Request", RequestStatus::New),
    ("In Progress", RequestStatus::InProgress),
    ("Repaired", RequestStatus::Repaired),
    ("Scrap", RequestStatus::Scrap),
];

impl RequestStatus {
    /// Looks up the status for a board label such as `"In Progress"`.
    ///
    /// Matching is exact. Returns `None` for anything outside the four known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        STATUS_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, status)| *status)
    }

    /// Returns the board label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::New => "New Request",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Repaired => "Repaired",
            RequestStatus::Scrap => "Scrap",
        }
    }

    /// Returns the code stored in the `status` column.
    pub fn code(&self) -> &'static str {
        match self {
            RequestStatus::New => "new",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Repaired => "repaired",
            RequestStatus::Scrap => "scrap",
        }
    }

    /// Whether the request still counts towards the critical backlog.
    pub fn is_open(&self) -> bool {
        matches!(self, RequestStatus::New | RequestStatus::InProgress)
    }
}

/// Who is performing a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Actor {
    /// An employee reporting or following up on equipment problems.
    User { id: i32 },
    /// A maintenance technician. Picks up requests it moves to in-progress.
    Technician { id: i32 },
}

impl Actor {
    /// Returns the technician ID if this actor is a technician.
    pub fn technician_id(&self) -> Option<i32> {
        match self {
            Actor::Technician { id } => Some(*id),
            Actor::User { .. } => None,
        }
    }
}
