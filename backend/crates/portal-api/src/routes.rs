//! API routes configuration
//!
//! All endpoints live under the /api/v1 prefix:
//! - /api/v1/users/... - Session and account endpoints
//! - /api/v1/jobs/... - Job catalog
//! - GET /api/v1/healthcheck - Health check endpoint
//! - GET /media/{file_name} - Images published by the local image host

use actix_web::web;

use crate::error::ApiError;
use crate::handlers::{account, auth, health, jobs, media};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/healthcheck", web::get().to(health::healthcheck_handler))
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(auth::register_handler))
                    .route("/login", web::post().to(auth::login_handler))
                    .route("/refresh-token", web::post().to(auth::refresh_handler))
                    .route("/logout", web::post().to(auth::logout_handler))
                    .route("/change-password", web::post().to(auth::change_password_handler))
                    .route("/current-user", web::get().to(account::current_user_handler))
                    .route("/update-account", web::patch().to(account::update_account_handler))
                    .route("/profile-image", web::patch().to(account::update_profile_image_handler))
                    .route("/cover-image", web::patch().to(account::update_cover_image_handler))
                    .route("/qualifications", web::post().to(account::add_qualification_handler))
                    .route("/applied-jobs", web::get().to(account::applied_jobs_handler))
                    .route("/applied-jobs", web::post().to(account::apply_job_handler)),
            )
            .service(
                web::scope("/jobs")
                    .route("", web::post().to(jobs::create_job_handler))
                    .route("", web::get().to(jobs::list_jobs_handler))
                    .route("/{job_id}", web::get().to(jobs::get_job_handler)),
            ),
    )
    .route("/media/{file_name}", web::get().to(media::media_handler));
}

/// JSON extractor config; malformed bodies become 400 envelopes.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, _req| {
        ApiError::BadRequest(format!("Invalid JSON payload: {}", err)).into()
    })
}
