use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use gearguard_server::config::Config;
use gearguard_server::web::{AppState, create_app_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

mod common;

use common::{
    create_equipment, create_team, create_technician, create_user, setup, setup_postgres,
};

/// Builds the full application router on top of the test database.
fn create_test_app(db: sea_orm::DatabaseConnection) -> axum::Router {
    let config = Config {
        db_url: "sqlite::memory:".to_string(),
        port: 8080,
        log_level: "info".to_string(),
        top_equipment_limit: 3,
    };
    create_app_router(AppState {
        config: Arc::new(config),
        db: Arc::new(db),
    })
}

/// Sends a request and returns the status with the decoded JSON body.
async fn send(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(body) => send_raw(app, method, uri, &body.to_string()).await,
        None => {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            read_response(app, request).await
        }
    }
}

/// Sends `body` verbatim as a JSON request body.
async fn send_raw(
    app: &axum::Router,
    method: Method,
    uri: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    read_response(app, request).await
}

async fn read_response(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn can_create_and_list_requests() {
    let state = setup().await.expect("Failed to setup test context");
    let team = create_team(&state.db, "Mechanics").await;
    let creator = create_user(&state.db, "Alice").await;
    let cnc = create_equipment(&state.db, "CNC Machine", "E42", Some(team.id)).await;
    let printer = create_equipment(&state.db, "Printer 01", "P-01", None).await;
    let app = create_test_app(state.db);

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({
            "description": "Leaking oil",
            "equipment_id": cnc.id,
            "creator_id": creator.id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "new");
    assert_eq!(created["status_label"], "New Request");
    assert_eq!(created["team_id"], team.id);
    assert_eq!(created["technician_id"], Value::Null);
    assert_eq!(created["duration_hours"], 0.0);

    send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({
            "description": "Paper jam",
            "equipment_id": printer.id,
            "creator_id": creator.id
        })),
    )
    .await;

    let (status, all) = send(&app, Method::GET, "/api/v1/requests", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["count"], 2);

    let uri = format!("/api/v1/requests?equipment_id={}", cnc.id);
    let (status, filtered) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["count"], 1);
    assert_eq!(filtered["requests"][0]["id"], created["id"]);
}

#[tokio::test]
async fn create_returns_unprocessable_entity_for_invalid_input() {
    let state = setup().await.expect("Failed to setup test context");
    let creator = create_user(&state.db, "Alice").await;
    let app = create_test_app(state.db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({ "description": "Broken", "creator_id": creator.id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({ "description": "Broken", "equipment_id": 99, "creator_id": creator.id })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["message"],
        "Validation failed: equipment 99 does not exist"
    );
}

async fn check_request_moves_through_the_board(db: sea_orm::DatabaseConnection) {
    let team = create_team(&db, "Mechanics").await;
    let creator = create_user(&db, "Alice").await;
    let technician = create_technician(&db, "Bob", team.id).await;
    let cnc = create_equipment(&db, "CNC Machine", "E42", Some(team.id)).await;
    let app = create_test_app(db);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({
            "description": "Leaking oil",
            "equipment_id": cnc.id,
            "creator_id": creator.id
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, moved) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/status", id),
        Some(json!({
            "label": "In Progress",
            "actor": { "role": "technician", "id": technician.id }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "in_progress");
    assert_eq!(moved["technician_id"], technician.id);

    let (status, board) = send(&app, Method::GET, "/api/v1/requests/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board["new"].as_array().unwrap().len(), 0);
    assert_eq!(board["in_progress"][0]["id"], id);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/status", id),
        Some(json!({ "label": "Repaired", "actor": { "role": "user", "id": creator.id } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, recorded) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/duration", id),
        Some(json!({ "duration_hours": 1.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recorded["duration_hours"], 1.5);

    let (status, report) = send(&app, Method::GET, "/api/v1/reports/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        json!({
            "total": 1,
            "completed": 1,
            "avg_duration": 1.5,
            "critical": 0,
            "top_equipment": [
                { "equipment_id": cnc.id, "name": "CNC Machine", "request_count": 1 }
            ]
        })
    );
}

#[tokio::test]
async fn can_move_request_through_the_board() {
    let state = setup().await.expect("Failed to setup test context");
    check_request_moves_through_the_board(state.db).await;
}

#[tokio::test]
async fn can_move_request_through_the_board_on_postgres() {
    let state = setup_postgres()
        .await
        .expect("Failed to setup test context");
    check_request_moves_through_the_board(state.db).await;
}

#[tokio::test]
async fn update_status_maps_errors_to_status_codes() {
    let state = setup().await.expect("Failed to setup test context");
    let creator = create_user(&state.db, "Alice").await;
    let printer = create_equipment(&state.db, "Printer 01", "P-01", None).await;
    let app = create_test_app(state.db);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({
            "description": "Paper jam",
            "equipment_id": printer.id,
            "creator_id": creator.id
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/status", id),
        Some(json!({ "label": "Finished", "actor": { "role": "user", "id": creator.id } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_LABEL");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/9999/status",
        Some(json!({ "label": "Scrap", "actor": { "role": "user", "id": creator.id } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/duration", id),
        Some(json!({ "duration_hours": 2.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let uri = format!("/api/v1/requests/{}", id);
    let (status, unchanged) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unchanged["status"], "new");
}

#[tokio::test]
async fn update_status_rejects_unknown_technician() {
    let state = setup().await.expect("Failed to setup test context");
    let creator = create_user(&state.db, "Alice").await;
    let printer = create_equipment(&state.db, "Printer 01", "P-01", None).await;
    let app = create_test_app(state.db);

    let (_, created) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({
            "description": "Paper jam",
            "equipment_id": printer.id,
            "creator_id": creator.id
        })),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/requests/{}/status", id),
        Some(json!({
            "label": "In Progress",
            "actor": { "role": "technician", "id": 999 }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert_eq!(
        body["message"],
        "Validation failed: technician 999 does not exist"
    );
}

#[tokio::test]
async fn malformed_input_is_answered_with_json_validation_errors() {
    let state = setup().await.expect("Failed to setup test context");
    let app = create_test_app(state.db);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/requests",
        Some(json!({ "description": "Broken", "equipment_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Validation failed: "));
    assert!(message.contains("creator_id"));

    let (status, body) = send_raw(&app, Method::POST, "/api/v1/requests", "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/1/status",
        Some(json!({ "label": "Scrap" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v1/requests/1/duration",
        Some(json!({ "duration_hours": "long" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = send(&app, Method::GET, "/api/v1/requests?equipment_id=abc", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn can_report_on_empty_store_over_http() {
    let state = setup().await.expect("Failed to setup test context");
    let app = create_test_app(state.db);

    let (status, report) = send(&app, Method::GET, "/api/v1/reports/summary", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        json!({
            "total": 0,
            "completed": 0,
            "avg_duration": 0.0,
            "critical": 0,
            "top_equipment": []
        })
    );
}

#[tokio::test]
async fn can_look_up_equipment_and_teams() {
    let state = setup().await.expect("Failed to setup test context");
    let team = create_team(&state.db, "Mechanics").await;
    let cnc = create_equipment(&state.db, "CNC Machine", "E42", Some(team.id)).await;
    let app = create_test_app(state.db);

    let (status, equipment) = send(&app, Method::GET, "/api/v1/equipment", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(equipment[0]["serial_number"], "E42");

    let uri = format!("/api/v1/equipment/{}", cnc.id);
    let (status, detail) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["equipment"]["team_id"], team.id);
    assert_eq!(detail["active_maintenance"], 0);

    let (status, body) = send(&app, Method::GET, "/api/v1/equipment/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, teams) = send(&app, Method::GET, "/api/v1/teams", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(teams, json!([{ "id": team.id, "name": "Mechanics" }]));
}

#[tokio::test]
async fn can_serve_health_and_openapi_document() {
    let state = setup().await.expect("Failed to setup test context");
    let app = create_test_app(state.db);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, doc) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/requests/{id}/status"].is_object());
}
