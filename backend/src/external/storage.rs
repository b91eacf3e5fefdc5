//! Bill image file storage
//!
//! Stores uploaded bill images on local disk under a configured directory and
//! returns the public URL recorded on the purchase order.

use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};

/// Client for the bill-image file storage
#[derive(Clone)]
pub struct StorageClient {
    upload_dir: String,
    public_base_url: String,
}

impl StorageClient {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    /// Store an uploaded bill image and return its public URL.
    ///
    /// The original filename is only used for its extension; the stored name
    /// is a fresh UUID so uploads cannot collide or traverse paths.
    pub async fn store_bill_image(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::ValidationError(
                "Bill image is empty".to_string(),
            ));
        }

        let extension = original_name
            .rsplit('.')
            .next()
            .filter(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png" | "webp"))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "jpg".to_string());

        let file_name = format!("bill-{}.{}", Uuid::new_v4(), extension);
        let path = std::path::Path::new(&self.upload_dir).join(&file_name);

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            file_name
        ))
    }
}
