#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use gearguard_server::entities::sea_orm_active_enums::RequestStatus;
use gearguard_server::entities::{
    equipment, maintenance_request, maintenance_team, technician, user,
};
use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::{postgres, testcontainers};

/// Test context holding a freshly migrated in-memory database.
pub struct TestContext {
    pub db: DatabaseConnection,
}

/// Test context backed by a throwaway Postgres container.
pub struct PostgresContext {
    #[allow(dead_code)] // container is kept to ensure it's not dropped
    pub container: testcontainers::ContainerAsync<postgres::Postgres>,
    pub db: DatabaseConnection,
}

pub async fn setup_container() -> anyhow::Result<testcontainers::ContainerAsync<postgres::Postgres>>
{
    let container = postgres::Postgres::default().start().await?;
    Ok(container)
}

/// Connects to the Postgres container and applies all migrations.
pub async fn setup_db(
    container: &testcontainers::ContainerAsync<postgres::Postgres>,
) -> anyhow::Result<DatabaseConnection> {
    let host = container.get_host().await?;
    let port = container.get_host_port_ipv4(5432).await?;
    let db_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);
    let db = Database::connect(&db_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Opens a private in-memory SQLite database and applies all migrations.
pub async fn setup_sqlite_db() -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A single long-lived connection keeps the in-memory database alive.
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn setup() -> anyhow::Result<TestContext> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = setup_sqlite_db().await?;
    Ok(TestContext { db })
}

/// Same as `setup`, but against the production database driver.
pub async fn setup_postgres() -> anyhow::Result<PostgresContext> {
    let _ = tracing_subscriber::fmt().try_init();
    let container = setup_container().await?;
    let db = setup_db(&container).await?;
    Ok(PostgresContext { container, db })
}

/// Returns a fixed instant `minutes` after a reference time.
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

pub async fn create_team(db: &DatabaseConnection, name: &str) -> maintenance_team::Model {
    maintenance_team::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_user(db: &DatabaseConnection, name: &str) -> user::Model {
    user::ActiveModel {
        email: Set(format!("{}@gearguard.test", name.to_lowercase())),
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_technician(
    db: &DatabaseConnection,
    name: &str,
    team_id: i32,
) -> technician::Model {
    technician::ActiveModel {
        email: Set(format!("{}@gearguard.test", name.to_lowercase())),
        name: Set(name.to_string()),
        team_id: Set(team_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn create_equipment(
    db: &DatabaseConnection,
    name: &str,
    serial_number: &str,
    team_id: Option<i32>,
) -> equipment::Model {
    equipment::ActiveModel {
        name: Set(name.to_string()),
        serial_number: Set(serial_number.to_string()),
        location: Set(Some("Workshop".to_string())),
        team_id: Set(team_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// Inserts a request directly, bypassing the service, with full control over its fields.
pub async fn insert_request(
    db: &DatabaseConnection,
    equipment: &equipment::Model,
    creator: &user::Model,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    duration_hours: f64,
) -> maintenance_request::Model {
    maintenance_request::ActiveModel {
        description: Set(format!("Problem with {}", equipment.name)),
        status: Set(status),
        equipment_id: Set(equipment.id),
        team_id: Set(equipment.team_id),
        technician_id: Set(None),
        created_by: Set(creator.id),
        created_at: Set(created_at),
        duration_hours: Set(duration_hours),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}
