//! Storage service implementation using Apache OpenDAL.

use opendal::{Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::media::extension_for;

/// Storage service for proof image blobs.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                region,
            } => {
                let mut builder = services::S3::default().bucket(bucket).region(region);
                if !endpoint.is_empty() {
                    builder = builder.endpoint(endpoint);
                }

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::Configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::Configuration("invalid path".to_string()))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::Configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Generate the storage key for a proof image.
    ///
    /// Format: `transactions/{image_id}.{ext}`
    #[must_use]
    pub fn proof_image_key(image_id: Uuid, content_type: &str) -> String {
        format!("transactions/{image_id}.{}", extension_for(content_type))
    }

    /// Stores a proof image blob and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Operation` if the write fails.
    pub async fn store_proof_image(
        &self,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = Self::proof_image_key(Uuid::new_v4(), content_type);
        self.operator.write(&key, bytes).await?;
        Ok(self.config.public_url(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_image_key_format() {
        let id = Uuid::new_v4();
        let key = StorageService::proof_image_key(id, "image/png");
        assert_eq!(key, format!("transactions/{id}.png"));
    }

    #[tokio::test]
    async fn test_fs_round_trip() {
        let dir = std::env::temp_dir().join(format!("caisse-storage-{}", Uuid::new_v4()));
        let service = StorageService::from_config(StorageConfig {
            provider: StorageProvider::local_fs(&dir),
            public_base_url: "/storage".to_string(),
        })
        .unwrap();

        let url = service
            .store_proof_image("image/jpeg", vec![0xFF, 0xD8, 0xFF])
            .await
            .unwrap();

        assert!(url.starts_with("/storage/transactions/"));
        assert!(url.ends_with(".jpg"));
    }
}
