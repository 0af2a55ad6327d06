//! S3-compatible object store client.
//!
//! Configured for Cloudflare R2 style deployments: custom endpoint,
//! path-style addressing, static credentials. Works unchanged against
//! MinIO or AWS S3 proper.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use bytes::Bytes;

use crate::store::{ObjectStore, StorageError};

/// Object-store connection settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Custom endpoint URL (e.g. `https://<account>.r2.cloudflarestorage.com`).
    /// `None` targets AWS S3 directly.
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// R2 requires path-style addressing.
    pub force_path_style: bool,
}

impl S3Config {
    /// Load object-store configuration from environment variables.
    ///
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `STORAGE_ENDPOINT`        | no       | --      |
    /// | `STORAGE_REGION`          | no       | `auto`  |
    /// | `STORAGE_BUCKET`          | **yes**  | --      |
    /// | `STORAGE_ACCESS_KEY_ID`   | **yes**  | --      |
    /// | `STORAGE_SECRET_ACCESS_KEY` | **yes** | --     |
    /// | `STORAGE_FORCE_PATH_STYLE`| no       | `true`  |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing; storage misconfiguration
    /// should fail at startup, not on the first upload.
    pub fn from_env() -> Self {
        let endpoint = std::env::var("STORAGE_ENDPOINT").ok();
        let region = std::env::var("STORAGE_REGION").unwrap_or_else(|_| "auto".into());
        let bucket = std::env::var("STORAGE_BUCKET").expect("STORAGE_BUCKET must be set");
        let access_key_id =
            std::env::var("STORAGE_ACCESS_KEY_ID").expect("STORAGE_ACCESS_KEY_ID must be set");
        let secret_access_key = std::env::var("STORAGE_SECRET_ACCESS_KEY")
            .expect("STORAGE_SECRET_ACCESS_KEY must be set");
        let force_path_style = std::env::var("STORAGE_FORCE_PATH_STYLE")
            .map(|v| v != "false")
            .unwrap_or(true);

        Self {
            endpoint,
            region,
            bucket,
            access_key_id,
            secret_access_key,
            force_path_style,
        }
    }
}

/// [`ObjectStore`] backed by the AWS S3 SDK.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from the given configuration.
    pub async fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "talentdeck-static",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::NotFound {
                        key: key.to_string(),
                    }
                } else {
                    StorageError::Backend(e.to_string())
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(data.into_bytes())
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(data.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(key, "Stored object");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        // DeleteObject is idempotent on S3; a missing key is a no-op there too.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(key, "Deleted object");
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires: Duration) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}
