//! Router tests without a database
//!
//! The pool connects lazily, so only requests rejected before any query runs
//! are exercised here.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use tickmypax_server::{
    create_router,
    models::user::{Role, User, UserClaims},
    repository::Repository,
    services::Services,
    AppConfig, AppState,
};

fn app() -> (Router, AppConfig) {
    let config = AppConfig::default();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("lazy pool");
    let services = Services::new(Repository::new(pool), config.auth.clone());

    let state = AppState {
        config: Arc::new(config.clone()),
        services: Arc::new(services),
    };
    (create_router(state), config)
}

fn token(config: &AppConfig, role: Role) -> String {
    let user = User {
        id: 42,
        email: "sean@example.com".into(),
        user_name: Some("Sean".into()),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
    };
    UserClaims::for_user(&user, 1)
        .create_token(&config.auth.jwt_secret)
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_records_need_a_principal() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::get("/api/records").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"], "NotAuthorized");
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_forged_token_rejected() {
    let (app, _) = app();

    let response = app
        .oneshot(
            Request::get("/api/tours/allTours")
                .header(header::AUTHORIZATION, "Bearer not.a.jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guide_management_is_admin_only() {
    let (app, config) = app();
    let cookie = format!("access_token={}", token(&config, Role::Guide));

    let response = app
        .oneshot(
            Request::get("/api/guides")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blank_reference_is_a_validation_error() {
    let (app, config) = app();

    let response = app
        .oneshot(
            Request::post("/api/records/checkin-unique")
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&config, Role::Guide)))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "uniqueRef": "  " }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_negative_pax_rejected() {
    let (app, config) = app();

    let response = app
        .oneshot(
            Request::put("/api/records/7/pax")
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&config, Role::Admin)))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "pax": -1 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_guide_assignment_requires_tour_type() {
    let (app, config) = app();

    let response = app
        .oneshot(
            Request::put("/api/tours/guide")
                .header(header::AUTHORIZATION, format!("Bearer {}", token(&config, Role::Guide)))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "guideName": "Sean" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/records/import-excel"].is_object());
}
