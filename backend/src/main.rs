//! Main entry point for the property dashboard backend.
//!
//! This file initializes the Axum web server, sets up database connections,
//! and registers all API routes and middleware.
//! It orchestrates the application's startup and defines its overall structure.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod services;
mod utils;

use crate::api::common::ApiResponse;
use crate::services::picture_service::UploadLimit;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use axum::{Extension, Router, extract::DefaultBodyLimit, response::Json, routing::get};
use config::Config;
use database::Database;
use sqlx::SqlitePool;
use tracing::info;
use tracing_subscriber::fmt::init;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;

    let jwt_utils = JwtUtils::from_config(&config);
    let hasher = PasswordHasher::new(config.bcrypt_cost)?;
    info!(
        "Session tokens expire after {} seconds",
        jwt_utils.expires_in()
    );

    let app = build_app(
        db.pool().clone(),
        jwt_utils,
        hasher,
        UploadLimit(config.max_upload_bytes),
    );

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;

    info!("Starting PropDash server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

/// Assembles the router with every service dependency attached as an extension.
fn build_app(
    pool: SqlitePool,
    jwt_utils: JwtUtils,
    hasher: PasswordHasher,
    upload_limit: UploadLimit,
) -> Router {
    let pictures = api::picture::routes::picture_router()
        .layer(DefaultBodyLimit::max(upload_limit.0 + MULTIPART_OVERHEAD_BYTES));

    Router::new()
        .route("/", get(root_handler))
        .nest("/auth", auth::routes::auth_router())
        .nest("/api/property", api::property::routes::property_router())
        .nest("/api/room", api::room::routes::room_router())
        .nest("/api/pictures", pictures)
        .nest("/api/dashboard", api::dashboard::routes::dashboard_router())
        .nest("/api", api::catalog::routes::catalog_router())
        .layer(Extension(pool))
        .layer(Extension(jwt_utils))
        .layer(Extension(hasher))
        .layer(Extension(upload_limit))
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "PropDash Backend",
            "version": env!("CARGO_PKG_VERSION")
        }),
        "Welcome to PropDash API",
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::{Duration, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "integration-secret";
    const SEVEN_DAYS: u64 = 7 * 24 * 60 * 60;
    const UPLOAD_LIMIT: usize = 2048;

    async fn app() -> Router {
        build_app(
            test_pool().await,
            JwtUtils::new(SECRET, SEVEN_DAYS),
            PasswordHasher::new(4).unwrap(),
            UploadLimit(UPLOAD_LIMIT),
        )
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn register(app: &Router, email: &str) -> (String, Value) {
        let (status, body) = send(
            app,
            json_request(
                "POST",
                "/auth/register",
                None,
                json!({"email": email, "password": "secret1", "firstName": "Ana"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        (body["token"].as_str().unwrap().to_string(), body["user"].clone())
    }

    fn property_body(name: &str) -> Value {
        json!({
            "name": name,
            "propertyTypeId": 1,
            "address": "3 Freedom Sq",
            "cityId": 2,
            "price": 120
        })
    }

    fn multipart_request(uri: &str, token: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
        let boundary = "propdash-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"pic\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_login_me_round_trip() {
        let app = app().await;
        let (register_token, user) = register(&app, "ana@example.com").await;
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("password_hash").is_none());
        assert_eq!(user["userType"], "Host");

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "ana@example.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap();

        for token in [token, register_token.as_str()] {
            let (status, body) = send(&app, get_request("/auth/me", Some(token))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["user"]["id"], user["id"]);
            assert_eq!(body["user"]["email"], "ana@example.com");
        }
    }

    #[tokio::test]
    async fn test_register_conflict_and_validation() {
        let app = app().await;
        register(&app, "dup@example.com").await;

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/register",
                None,
                json!({"email": "dup@example.com", "password": "another1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            json_request("POST", "/auth/register", None, json!({"email": "x@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["error_type"], "validation_error");

        // The original credentials still work.
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "dup@example.com", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_share_status_and_message() {
        let app = app().await;
        register(&app, "ana@example.com").await;

        let (wrong_status, wrong_body) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "ana@example.com", "password": "nope123"}),
            ),
        )
        .await;
        let (unknown_status, unknown_body) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "nobody@example.com", "password": "secret1"}),
            ),
        )
        .await;

        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_body["message"], unknown_body["message"]);

        let (status, _) = send(
            &app,
            json_request("POST", "/auth/login", None, json!({"email": "ana@example.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_me_distinguishes_missing_and_invalid_tokens() {
        let app = app().await;
        let (_, user) = register(&app, "ana@example.com").await;

        let (status, _) = send(&app, get_request("/auth/me", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_request("/auth/me", Some("garbage"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let expired = JwtUtils::new(SECRET, SEVEN_DAYS)
            .generate_token_at(
                user["id"].as_str().unwrap(),
                "ana@example.com",
                Utc::now() - Duration::days(8),
            )
            .unwrap();
        let (status, _) = send(&app, get_request("/auth/me", Some(&expired))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let ghost = JwtUtils::new(SECRET, SEVEN_DAYS)
            .generate_token("missing-user", "ghost@example.com")
            .unwrap();
        let (status, _) = send(&app, get_request("/auth/me", Some(&ghost))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logout_needs_no_token() {
        let app = app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/auth/logout")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_catalogue_requires_token() {
        let app = app().await;

        let (status, _) = send(&app, get_request("/api/propertytype", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, get_request("/api/property", Some("bad.token.here"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_property_crud_and_cascade() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;
        let (other_token, _) = register(&app, "other@example.com").await;

        let (status, body) = send(
            &app,
            json_request("POST", "/api/property", Some(&token), property_body("Old Town")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let property_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(&app, get_request("/api/property", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["total_items"], 1);

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/room",
                Some(&token),
                json!({"propertyId": property_id, "roomTypeId": 1, "capacity": 2}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let room_id = body["data"]["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            multipart_request(
                &format!("/api/pictures/regular?entityId={room_id}&entityType=Room"),
                &token,
                "image/png",
                b"png-bytes",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            json_request(
                "PUT",
                &format!("/api/property/{property_id}"),
                Some(&other_token),
                property_body("Hijacked"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/property/{property_id}"))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            get_request(&format!("/api/room/{room_id}"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &app,
            get_request(&format!("/api/pictures/Room/{room_id}"), Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_property_validation_errors_are_bad_requests() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/property",
                Some(&token),
                json!({"name": "", "propertyTypeId": 1, "address": "x", "cityId": 1, "price": 10}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("name"));

        let (status, body) = send(
            &app,
            json_request(
                "POST",
                "/api/property",
                Some(&token),
                json!({"name": "   ", "propertyTypeId": 1, "address": "  \t ", "cityId": 1, "price": 10}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("name"), "{message}");
        assert!(message.contains("address"), "{message}");

        let (_, body) = send(&app, get_request("/api/property", Some(&token))).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_far_page_returns_empty_list() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;
        send(
            &app,
            json_request("POST", "/api/property", Some(&token), property_body("Loft")),
        )
        .await;

        let (status, body) = send(
            &app,
            get_request("/api/property?page=50000000&per_page=100", Some(&token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["total_items"], 1);
    }

    #[tokio::test]
    async fn test_blank_credentials_are_bad_requests() {
        let app = app().await;
        register(&app, "ana@example.com").await;

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/register",
                None,
                json!({"email": "blank@example.com", "password": "      "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "   ", "password": "secret1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/auth/login",
                None,
                json!({"email": "ana@example.com", "password": "   "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_pictures_of_another_host_are_forbidden() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;
        let (other_token, _) = register(&app, "other@example.com").await;
        let (_, body) = send(
            &app,
            json_request("POST", "/api/property", Some(&token), property_body("Loft")),
        )
        .await;
        let property_id = body["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/pictures/regular?entityId={property_id}&entityType=Property");

        let (status, _) =
            send(&app, multipart_request(&uri, &other_token, "image/png", b"png")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, multipart_request(&uri, &token, "image/png", b"png")).await;
        assert_eq!(status, StatusCode::CREATED);
        let picture_id = body["data"]["id"].as_i64().unwrap();

        let delete = |token: &str| {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/pictures/{picture_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap()
        };
        let (status, _) = send(&app, delete(&other_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(&app, delete(&token)).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, delete(&token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_picture_upload_rejects_disallowed_files() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;
        let (_, body) = send(
            &app,
            json_request("POST", "/api/property", Some(&token), property_body("Loft")),
        )
        .await;
        let property_id = body["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/pictures/icon?entityId={property_id}&entityType=Property");

        let (status, _) = send(&app, multipart_request(&uri, &token, "image/gif", b"GIF89a")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let too_big = vec![0u8; UPLOAD_LIMIT + 1];
        let (status, _) = send(&app, multipart_request(&uri, &token, "image/png", &too_big)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, multipart_request(&uri, &token, "image/webp", b"RIFF")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["pictureType"], "Icon");
        assert!(
            body["data"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/webp;base64,")
        );
    }

    #[tokio::test]
    async fn test_reference_lists_and_dashboard() {
        let app = app().await;
        let (token, _) = register(&app, "host@example.com").await;

        for uri in [
            "/api/propertytype",
            "/api/city",
            "/api/amenity",
            "/api/amenity-category",
            "/api/roomtype",
            "/api/availability",
        ] {
            let (status, body) = send(&app, get_request(uri, Some(&token))).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(!body["data"].as_array().unwrap().is_empty(), "{uri}");
        }

        send(
            &app,
            json_request("POST", "/api/property", Some(&token), property_body("Loft")),
        )
        .await;
        let (status, body) = send(&app, get_request("/api/dashboard/summary", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["totalProperties"], 1);
        assert_eq!(body["data"]["averageNightlyPrice"], 120.0);
    }
}
