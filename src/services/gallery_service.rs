use crate::config::AppConfig;
use crate::models::UploadedImage;
use crate::services::storage::StorageService;
use crate::utils::validation::{is_directory_placeholder, object_key, staging_file_name};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::info;

/// An upload written to local disk and not yet pushed to the bucket.
///
/// The staging directory is removed when this value is dropped, so a failed
/// upload never leaves its file behind.
pub struct StagedUpload {
    dir: TempDir,
    path: PathBuf,
    key: String,
    content_type: Option<String>,
    size: u64,
}

pub struct GalleryService {
    storage: Arc<dyn StorageService>,
    config: AppConfig,
}

impl GalleryService {
    pub fn new(storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        Self { storage, config }
    }

    /// Lists uploaded images, skipping folder placeholders.
    pub async fn list_images(&self) -> Result<Vec<UploadedImage>> {
        let objects = self
            .storage
            .list_objects(&self.config.image_prefix)
            .await?;

        Ok(objects
            .into_iter()
            .filter(|object| !is_directory_placeholder(&object.key))
            .map(|object| UploadedImage {
                filename: object.key,
                url: object.public_url,
            })
            .collect())
    }

    /// Streams an uploaded file into a fresh staging directory.
    pub async fn stage_upload(
        &self,
        filename: &str,
        content_type: Option<String>,
        mut reader: impl AsyncRead + Unpin + Send,
    ) -> Result<StagedUpload> {
        let key = object_key(&self.config.image_prefix, filename);
        // Such a key would be hidden from the listing as a folder placeholder
        if is_directory_placeholder(&key) {
            bail!("'{}' names a folder, not a file", filename);
        }

        tokio::fs::create_dir_all(&self.config.upload_folder)
            .await
            .with_context(|| {
                format!(
                    "failed to create upload folder {}",
                    self.config.upload_folder.display()
                )
            })?;

        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(&self.config.upload_folder)
            .context("failed to create staging directory")?;
        let path = dir.path().join(staging_file_name(filename));

        info!("Saving file locally to: {}", path.display());
        let mut file = tokio::fs::File::create(&path)
            .await
            .with_context(|| format!("failed to create {}", path.display()))?;
        let size = tokio::io::copy(&mut reader, &mut file)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        file.flush().await?;

        Ok(StagedUpload {
            dir,
            path,
            key,
            content_type,
            size,
        })
    }

    /// Pushes a staged file to the bucket, makes it public and removes the
    /// local copy.
    pub async fn publish(&self, staged: StagedUpload) -> Result<UploadedImage> {
        info!(
            "Uploading {} ({} bytes) to bucket '{}'",
            staged.key,
            staged.size,
            self.storage.bucket()
        );
        self.storage
            .upload_from_path(&staged.key, &staged.path, staged.content_type.as_deref())
            .await?;

        info!("Making {} public...", staged.key);
        self.storage.make_public(&staged.key).await?;
        let url = self.storage.public_url(&staged.key);
        info!("File is now public at: {}", url);

        tokio::fs::remove_file(&staged.path)
            .await
            .with_context(|| format!("failed to remove {}", staged.path.display()))?;
        staged
            .dir
            .close()
            .context("failed to remove staging directory")?;
        info!("Removed local file: {}", staged.path.display());

        Ok(UploadedImage {
            filename: staged.key,
            url,
        })
    }
}
