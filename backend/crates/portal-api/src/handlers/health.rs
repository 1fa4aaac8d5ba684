use actix_web::HttpResponse;
use serde_json::json;

use super::ok;

/// GET /api/v1/healthcheck
pub async fn healthcheck_handler() -> HttpResponse {
    ok(
        json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "api_version": "v1",
        }),
        "OK",
    )
}
