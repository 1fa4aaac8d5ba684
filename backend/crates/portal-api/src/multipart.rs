//! multipart/form-data spooling
//!
//! Text parts are collected into a map; file parts are written to the upload
//! temp directory so they can be handed to the image host by path. Spooled
//! files that no handler consumes must be released with
//! [`MultipartForm::discard`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use actix_multipart::{Field, Multipart};
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use futures_util::TryStreamExt;
use portal_configs::UploadSettings;

use crate::error::{ApiError, ApiResult};

/// An uploaded file part written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpooledFile {
    pub path: PathBuf,
    pub original_name: String,
}

#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, SpooledFile>,
}

/// True when the request declares a multipart/form-data body.
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl MultipartForm {
    /// Reads every part of `multipart`.
    ///
    /// A part larger than `settings.max_file_size`, a body larger than
    /// `settings.max_form_size` or more than `settings.max_form_parts` parts
    /// fail the whole form with `BadRequest`; anything already spooled is
    /// removed in that case.
    pub async fn read(mut multipart: Multipart, settings: &UploadSettings) -> ApiResult<Self> {
        let mut form = MultipartForm::default();
        match form.read_parts(&mut multipart, settings).await {
            Ok(()) => Ok(form),
            Err(e) => {
                form.discard().await;
                Err(e)
            },
        }
    }

    async fn read_parts(
        &mut self,
        multipart: &mut Multipart,
        settings: &UploadSettings,
    ) -> ApiResult<()> {
        let mut parts = 0usize;
        let mut total_bytes = 0usize;

        while let Some(mut field) = multipart.try_next().await.map_err(invalid_payload)? {
            parts += 1;
            if parts > settings.max_form_parts {
                return Err(ApiError::bad_request(format!(
                    "Form has more than {} parts",
                    settings.max_form_parts
                )));
            }

            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(str::to_string);

            let limits = FieldLimits {
                part: settings.max_file_size,
                form_remaining: settings.max_form_size.saturating_sub(total_bytes),
                form: settings.max_form_size,
            };
            let data = read_field(&mut field, &name, &limits).await?;
            total_bytes += data.len();

            match file_name {
                Some(original_name) => {
                    if data.is_empty() {
                        log::debug!("Ignoring empty file part '{}'", name);
                        continue;
                    }
                    let path = spool(&settings.temp_dir, &original_name, &data).await?;
                    if let Some(previous) = self.files.insert(
                        name,
                        SpooledFile {
                            path,
                            original_name,
                        },
                    ) {
                        remove_quietly(&previous.path).await;
                    }
                },
                None => {
                    let value = String::from_utf8(data).map_err(|_| {
                        ApiError::bad_request(format!("Field '{}' is not valid UTF-8", name))
                    })?;
                    self.fields.insert(name, value);
                },
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Removes the spooled file `name` from the form; the caller now owns it.
    pub fn take_file(&mut self, name: &str) -> Option<SpooledFile> {
        self.files.remove(name)
    }

    /// Deletes every spooled file still owned by the form.
    pub async fn discard(self) {
        for file in self.files.into_values() {
            remove_quietly(&file.path).await;
        }
    }
}

fn invalid_payload(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::bad_request(format!("Invalid multipart payload: {}", err))
}

struct FieldLimits {
    part: usize,
    form_remaining: usize,
    form: usize,
}

async fn read_field(field: &mut Field, name: &str, limits: &FieldLimits) -> ApiResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(invalid_payload)? {
        let size = data.len() + chunk.len();
        if size > limits.part {
            return Err(ApiError::bad_request(format!(
                "Field '{}' exceeds the maximum upload size of {} bytes",
                name, limits.part
            )));
        }
        if size > limits.form_remaining {
            return Err(ApiError::bad_request(format!(
                "Form exceeds the maximum size of {} bytes",
                limits.form
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn spool(temp_dir: &str, original_name: &str, data: &[u8]) -> ApiResult<PathBuf> {
    tokio::fs::create_dir_all(temp_dir)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot create upload dir {}: {}", temp_dir, e)))?;

    // Only the extension of the client-supplied name is kept
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()));
    let file_name = match extension {
        Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let path = Path::new(temp_dir).join(file_name);
    tokio::fs::write(&path, data)
        .await
        .map_err(|e| ApiError::internal(format!("Cannot spool upload {}: {}", path.display(), e)))?;
    Ok(path)
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::debug!("Could not remove spooled file {}: {}", path.display(), e);
    }
}
