// Portal API Library
//
// REST layer of the portal backend: HTTP handlers, routes, request/response
// models, the account and job services and the image host.

pub mod error;
pub mod handlers;
pub mod image_host;
pub mod models;
pub mod multipart;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{ApiError, ApiResult};
pub use image_host::{ImageHost, ImageHostError, LocalImageHost, UploadedImage};
pub use repositories::StoreUserRepo;
pub use routes::{configure_routes, json_config};
pub use services::{AccountService, ImageSlot, JobService};
pub use state::AppState;
