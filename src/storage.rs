// src/storage.rs
//
// Armazenamento de objetos das imagens de design.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{config::Credentials, Client as S3Client};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::aari::{DesignUpload, DESIGN_KEY_PREFIX},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Grava `body` em `key` e devolve a URL pública.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, AppError>;
}

/// `Aari/<uuid>.<ext>`, nova a cada chamada.
pub fn design_object_key(upload: &DesignUpload) -> String {
    format!("{DESIGN_KEY_PREFIX}/{}.{}", Uuid::new_v4(), upload.extension())
}

pub fn public_object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/{key}")
}

#[derive(Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    region: String,
}

impl S3Storage {
    pub async fn new(region: &str, key_id: &str, secret: &str, bucket: &str) -> Self {
        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(key_id, secret, None, None, "env"))
            .load()
            .await;

        Self {
            client: S3Client::new(&aws_config),
            bucket: bucket.to_string(),
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Falha no upload para o S3");
                AppError::StorageError(e.to_string())
            })?;

        Ok(public_object_url(&self.bucket, &self.region, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_keys_are_unique_and_prefixed() {
        let upload = DesignUpload {
            file_name: "blouse.png".into(),
            content_type: "image/png".into(),
            bytes: vec![],
        };
        let a = design_object_key(&upload);
        let b = design_object_key(&upload);
        assert!(a.starts_with("Aari/"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn public_url_layout() {
        assert_eq!(
            public_object_url("shop-bucket", "ap-south-1", "Aari/x.png"),
            "https://shop-bucket.s3.ap-south-1.amazonaws.com/Aari/x.png"
        );
    }
}
