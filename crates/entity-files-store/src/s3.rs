//! MinIO / S3-compatible object storage backend.
//!
//! Wraps `aws-sdk-s3`. Objects are addressed as
//! `<key_prefix><entity_id>/<file_name>` inside a single bucket.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{Builder as S3Builder, Credentials, Region},
};
use entity_files_common::config::StorageConfig;
use entity_files_common::models::FileRecord;

use crate::{FileLookup, guess_mime, is_acceptable_identifier};

/// S3/MinIO file store — wraps the AWS SDK.
#[derive(Clone)]
pub struct S3FileStore {
    inner: Client,
    bucket: String,
    key_prefix: String,
}

impl S3FileStore {
    /// Initialise client from config.
    pub fn new(cfg: &StorageConfig) -> Result<Self> {
        if cfg.endpoint.is_empty() {
            anyhow::bail!("storage.endpoint must be set for the s3 backend");
        }

        let creds = Credentials::new(
            &cfg.access_key,
            &cfg.secret_key,
            None, // session token
            None, // expiry
            "entity-files-storage",
        );

        let s3_cfg = S3Builder::new()
            .endpoint_url(&cfg.endpoint)
            .credentials_provider(creds)
            .region(Region::new(cfg.region.clone()))
            // Force path-style URLs (required for MinIO)
            .force_path_style(true)
            .build();

        Ok(Self {
            inner: Client::from_conf(s3_cfg),
            bucket: cfg.bucket.clone(),
            key_prefix: cfg.key_prefix.clone(),
        })
    }

    fn object_key(&self, entity_id: &str, file_name: &str) -> String {
        format!("{}{entity_id}/{file_name}", self.key_prefix)
    }
}

#[async_trait]
impl FileLookup for S3FileStore {
    async fn get_file(&self, entity_id: &str, file_name: &str) -> Result<Option<FileRecord>> {
        // A `/` inside either id would address a different entity's object.
        if !is_acceptable_identifier(entity_id) || !is_acceptable_identifier(file_name) {
            tracing::debug!(entity_id, file_name, "Rejected file identifiers");
            return Ok(None);
        }

        let key = self.object_key(entity_id, file_name);
        let output = match self
            .inner
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to fetch {key} from object storage"));
            }
        };

        let mime_type = output
            .content_type()
            .filter(|ct| !ct.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| guess_mime(file_name));

        let content = output
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of {key}"))?
            .into_bytes()
            .to_vec();

        Ok(Some(FileRecord {
            content,
            name: file_name.to_string(),
            mime_type,
        }))
    }
}
