//! HTTP handlers
//!
//! Handlers stay thin: extract, call a service or the session manager, wrap
//! the result in the response envelope.

pub mod account;
pub mod auth;
pub mod health;
pub mod jobs;
pub mod media;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::models::ApiResponse;

pub(crate) fn respond<T: Serialize>(status: StatusCode, data: T, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::new(status, data, message))
}

pub(crate) fn ok<T: Serialize>(data: T, message: &str) -> HttpResponse {
    respond(StatusCode::OK, data, message)
}
