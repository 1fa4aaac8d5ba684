//! Shared application data registered on every actix worker.

use actix_web::web;
use portal_auth::{CookieConfig, SessionManager};
use portal_configs::UploadSettings;

use crate::routes::{configure_routes, json_config};
use crate::services::{AccountService, JobService};

/// Everything the handlers pull out of app data.
///
/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub session: web::Data<SessionManager>,
    pub accounts: web::Data<AccountService>,
    pub jobs: web::Data<JobService>,
    pub cookies: web::Data<CookieConfig>,
    pub uploads: web::Data<UploadSettings>,
    pub max_json_payload: usize,
}

impl AppState {
    /// Register the app data, the JSON extractor config and all routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.session.clone())
            .app_data(self.accounts.clone())
            .app_data(self.jobs.clone())
            .app_data(self.cookies.clone())
            .app_data(self.uploads.clone())
            .app_data(json_config(self.max_json_payload));
        configure_routes(cfg);
    }
}
