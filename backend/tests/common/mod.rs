#![allow(dead_code)]
//! Shared harness for the portal server integration tests.
//!
//! `TestServer::new()` bootstraps the full component graph on the in-memory
//! backend with upload directories under a temp dir. `init_app` wraps the
//! resulting state in an actix test service.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::http::StatusCode;
use actix_web::{test, App};
use portal_configs::ServerConfig;
use portal_server::lifecycle::{bootstrap, ApplicationComponents};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const ACCESS_SECRET: &str = "integration-access-secret";
pub const REFRESH_SECRET: &str = "integration-refresh-secret";
pub const PASSWORD: &str = "hunter22";

pub const MULTIPART_BOUNDARY: &str = "portal-it-boundary";
pub const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data; boundary=portal-it-boundary";

pub struct TestServer {
    pub components: ApplicationComponents,
    pub config: ServerConfig,
    _temp_dir: TempDir,
}

impl TestServer {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = test_config(&temp_dir);
        let components = bootstrap(&config).await.expect("bootstrap");
        Self {
            components,
            config,
            _temp_dir: temp_dir,
        }
    }
}

pub fn test_config(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.storage.backend = "memory".to_string();
    config.storage.data_path = dir.path().join("data").display().to_string();
    config.auth.access_token_secret = ACCESS_SECRET.to_string();
    config.auth.refresh_token_secret = REFRESH_SECRET.to_string();
    config.auth.cookie_secure = false;
    config.auth.bcrypt_cost = 4;
    config.uploads.temp_dir = dir.path().join("temp").display().to_string();
    config.uploads.media_dir = dir.path().join("media").display().to_string();
    config.uploads.public_base_url = "http://localhost:8080/media".to_string();
    config
}

pub async fn init_app(
    server: &TestServer,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = server.components.state.clone();
    test::init_service(App::new().configure(move |cfg| state.configure(cfg))).await
}

/// Sends `req` and decodes the envelope. Non-JSON bodies decode to `Null`.
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

pub fn registration(username: &str, email: &str) -> Value {
    json!({
        "fullname": format!("{} Example", username),
        "email": email,
        "username": username,
        "password": PASSWORD,
        "mobileNumber": "5550100",
        "birthDate": "1999-04-12"
    })
}

pub async fn register(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    email: &str,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/v1/users/register")
        .set_json(registration(username, email))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["data"].clone()
}

/// Logs in by username and returns `(access_token, refresh_token)`.
pub async fn login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    password: &str,
) -> (String, String) {
    let req = test::TestRequest::post()
        .uri("/api/v1/users/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    (
        body["data"]["accessToken"].as_str().unwrap().to_string(),
        body["data"]["refreshToken"].as_str().unwrap().to_string(),
    )
}

pub async fn renew(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    refresh_token: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/api/v1/users/refresh-token")
        .set_json(json!({ "refreshToken": refresh_token }))
        .to_request();
    send(app, req).await
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", token))
}

pub fn multipart_file(field: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());
    body
}

pub fn multipart_header() -> (actix_web::http::header::HeaderName, &'static str) {
    (CONTENT_TYPE, MULTIPART_CONTENT_TYPE)
}
