//! GET /media/{file_name} - Serve an image published by the local image host

use actix_web::{web, HttpResponse};
use portal_configs::UploadSettings;
use std::path::Path;

use crate::error::{ApiError, ApiResult};

pub async fn media_handler(
    path: web::Path<String>,
    uploads: web::Data<UploadSettings>,
) -> ApiResult<HttpResponse> {
    let file_name = path.into_inner();
    if file_name.is_empty()
        || file_name.contains("..")
        || file_name.contains('/')
        || file_name.contains('\\')
    {
        return Err(ApiError::bad_request("Invalid file path"));
    }

    let full_path = Path::new(&uploads.media_dir).join(&file_name);
    match tokio::fs::read(&full_path).await {
        Ok(data) => Ok(HttpResponse::Ok()
            .content_type(guess_content_type(&file_name))
            .append_header(("Content-Disposition", format!("inline; filename=\"{}\"", file_name)))
            .body(data)),
        Err(e) => {
            log::debug!("Media file {} not served: {}", full_path.display(), e);
            Err(ApiError::not_found("File not found"))
        },
    }
}

fn guess_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name).first_or_octet_stream().to_string()
}
