use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{self, Config};
use crate::equipment::api::v1::EquipmentState;
use crate::report::api::v1::ReportState;
use crate::request::api::v1::RequestState;

pub mod api;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Assembles the full application router from shared state.
pub fn create_app_router(state: AppState) -> axum::Router {
    let request_state = Arc::new(RequestState {
        db: state.db.clone(),
    });
    let report_state = Arc::new(ReportState {
        db: state.db.clone(),
        top_equipment_limit: state.config.top_equipment_limit,
    });
    let equipment_state = Arc::new(EquipmentState {
        db: state.db.clone(),
    });

    axum::Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(api::create_api_router(
            request_state,
            report_state,
            equipment_state,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    };
    let app = create_app_router(state);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
