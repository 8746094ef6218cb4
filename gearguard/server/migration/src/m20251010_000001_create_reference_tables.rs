use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum MaintenanceTeam {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Email,
    Name,
}

#[derive(DeriveIden)]
enum Technician {
    Table,
    Id,
    Email,
    Name,
    TeamId,
}

#[derive(DeriveIden)]
enum Equipment {
    Table,
    Id,
    Name,
    SerialNumber,
    Location,
    TeamId,
}

const FK_TECHNICIAN_TO_TEAM: &str = "fk-technician-team_id";
const FK_EQUIPMENT_TO_TEAM: &str = "fk-equipment-team_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MaintenanceTeam::Table)
                    .if_not_exists()
                    .col(pk_auto(MaintenanceTeam::Id))
                    .col(string_len_uniq(MaintenanceTeam::Name, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len_uniq(User::Email, 150))
                    .col(string_len(User::Name, 150))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Technician::Table)
                    .if_not_exists()
                    .col(pk_auto(Technician::Id))
                    .col(string_len_uniq(Technician::Email, 150))
                    .col(string_len(Technician::Name, 150))
                    .col(integer(Technician::TeamId))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TECHNICIAN_TO_TEAM)
                            .from(Technician::Table, Technician::TeamId)
                            .to(MaintenanceTeam::Table, MaintenanceTeam::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(pk_auto(Equipment::Id))
                    .col(string_len(Equipment::Name, 100))
                    .col(string_len_uniq(Equipment::SerialNumber, 100))
                    .col(string_len_null(Equipment::Location, 100))
                    .col(integer_null(Equipment::TeamId))
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_EQUIPMENT_TO_TEAM)
                            .from(Equipment::Table, Equipment::TeamId)
                            .to(MaintenanceTeam::Table, MaintenanceTeam::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Equipment::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Technician::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MaintenanceTeam::Table).to_owned())
            .await
    }
}
