use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum MaintenanceRequest {
    Table,
    Id,
    Description,
    Status,
    EquipmentId,
    TeamId,
    TechnicianId,
    CreatedBy,
    CreatedAt,
    DurationHours,
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum MaintenanceTeam {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Technician {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

const DEFAULT_STATUS: &str = "new";
const FK_REQUEST_TO_EQUIPMENT: &str = "fk-maintenance_request-equipment_id";
const FK_REQUEST_TO_TEAM: &str = "fk-maintenance_request-team_id";
const FK_REQUEST_TO_TECHNICIAN: &str = "fk-maintenance_request-technician_id";
const FK_REQUEST_TO_CREATOR: &str = "fk-maintenance_request-created_by";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceRequest::Id))
                    .col(string_len(MaintenanceRequest::Description, 500))
                    .col(string_len(MaintenanceRequest::Status, 20).default(DEFAULT_STATUS))
                    .col(integer(MaintenanceRequest::EquipmentId))
                    .col(integer_null(MaintenanceRequest::TeamId))
                    .col(integer_null(MaintenanceRequest::TechnicianId))
                    .col(integer(MaintenanceRequest::CreatedBy))
                    .col(
                        timestamp_with_time_zone(MaintenanceRequest::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(double(MaintenanceRequest::DurationHours).default(0.0))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REQUEST_TO_EQUIPMENT)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REQUEST_TO_TEAM)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::TeamId)
                            .to(MaintenanceTeam::Table, MaintenanceTeam::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REQUEST_TO_TECHNICIAN)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::TechnicianId)
                            .to(Technician::Table, Technician::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_REQUEST_TO_CREATOR)
                            .from(MaintenanceRequest::Table, MaintenanceRequest::CreatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MaintenanceRequest::Table).to_owned())
            .await
    }
}
