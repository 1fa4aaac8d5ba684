//! Image hosting
//!
//! Uploaded files are spooled to a temporary path first and then handed to an
//! [`ImageHost`], which publishes them and returns a public URL. The host
//! always removes the temporary file, whether or not the upload succeeded.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Local file not found: {0}")]
    MissingFile(String),

    #[error("Image host I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A published image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
}

#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    /// Publish the file at `local_path` and delete the local copy.
    async fn upload(&self, local_path: &Path) -> Result<UploadedImage, ImageHostError>;

    /// Take down a previously published image.
    async fn remove(&self, image: &UploadedImage) -> Result<(), ImageHostError>;
}

/// Publishes images into a directory that is served statically under
/// `public_base_url`.
pub struct LocalImageHost {
    media_dir: PathBuf,
    public_base_url: String,
}

impl LocalImageHost {
    pub fn new(media_dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            media_dir: media_dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    async fn publish(&self, local_path: &Path) -> Result<UploadedImage, ImageHostError> {
        if !tokio::fs::try_exists(local_path).await.unwrap_or(false) {
            return Err(ImageHostError::MissingFile(local_path.display().to_string()));
        }

        tokio::fs::create_dir_all(&self.media_dir).await?;

        let file_name = match local_path.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext.to_ascii_lowercase()),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let target = self.media_dir.join(&file_name);

        // rename fails across filesystems; copy then
        if tokio::fs::rename(local_path, &target).await.is_err() {
            tokio::fs::copy(local_path, &target).await?;
        }

        Ok(UploadedImage {
            url: format!("{}/{}", self.public_base_url, file_name),
        })
    }
}

#[async_trait::async_trait]
impl ImageHost for LocalImageHost {
    async fn upload(&self, local_path: &Path) -> Result<UploadedImage, ImageHostError> {
        let result = self.publish(local_path).await;

        if tokio::fs::try_exists(local_path).await.unwrap_or(false) {
            if let Err(e) = tokio::fs::remove_file(local_path).await {
                log::warn!("Failed to remove temporary upload {}: {}", local_path.display(), e);
            }
        }

        match &result {
            Ok(image) => log::debug!("Published image {}", image.url),
            Err(e) => log::warn!("Image upload failed: {}", e),
        }
        result
    }

    async fn remove(&self, image: &UploadedImage) -> Result<(), ImageHostError> {
        let file_name = image
            .url
            .strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
            .ok_or_else(|| ImageHostError::MissingFile(image.url.clone()))?;

        tokio::fs::remove_file(self.media_dir.join(file_name)).await?;
        log::debug!("Removed image {}", image.url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_upload_moves_file_and_returns_url() {
        let dir = TempDir::new().unwrap();
        let temp = dir.path().join("upload.PNG");
        tokio::fs::write(&temp, b"png-bytes").await.unwrap();

        let host = LocalImageHost::new(dir.path().join("media"), "http://localhost/media/");
        let image = host.upload(&temp).await.unwrap();

        assert!(image.url.starts_with("http://localhost/media/"));
        assert!(image.url.ends_with(".png"));
        assert!(!temp.exists());

        let name = image.url.rsplit('/').next().unwrap();
        let published = host.media_dir().join(name);
        assert_eq!(std::fs::read(published).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_remove_deletes_published_file() {
        let dir = TempDir::new().unwrap();
        let temp = dir.path().join("upload.jpg");
        tokio::fs::write(&temp, b"jpg").await.unwrap();

        let host = LocalImageHost::new(dir.path().join("media"), "http://localhost/media");
        let image = host.upload(&temp).await.unwrap();
        host.remove(&image).await.unwrap();

        assert_eq!(std::fs::read_dir(host.media_dir()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_rejects_foreign_urls() {
        let dir = TempDir::new().unwrap();
        let host = LocalImageHost::new(dir.path().join("media"), "http://localhost/media");
        for url in ["http://elsewhere/a.png", "http://localhost/media/../secret", "http://localhost/media/"] {
            let image = UploadedImage {
                url: url.to_string(),
            };
            assert!(matches!(host.remove(&image).await, Err(ImageHostError::MissingFile(_))));
        }
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let dir = TempDir::new().unwrap();
        let host = LocalImageHost::new(dir.path().join("media"), "http://localhost/media");
        let err = host.upload(&dir.path().join("nope.jpg")).await.unwrap_err();
        assert!(matches!(err, ImageHostError::MissingFile(_)));
    }
}
