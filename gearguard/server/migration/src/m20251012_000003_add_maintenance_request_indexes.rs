use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_EQUIPMENT_ID: &str = "idx_maintenance_request_equipment_id";
const IDX_STATUS: &str = "idx_maintenance_request_status";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name(IDX_EQUIPMENT_ID)
                    .table(MaintenanceRequest::Table)
                    .col(MaintenanceRequest::EquipmentId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(IDX_STATUS)
                    .table(MaintenanceRequest::Table)
                    .col(MaintenanceRequest::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_STATUS)
                    .table(MaintenanceRequest::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EQUIPMENT_ID)
                    .table(MaintenanceRequest::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum MaintenanceRequest {
    Table,
    EquipmentId,
    Status,
}
