//! AWS S3 snapshot store.
//!
//! The snapshot lives at `{bucket}/{prefix}/snapshot.json`. A missing key
//! means no prior state.

use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::storage::{Snapshot, SnapshotStore};

/// S3-based snapshot storage.
#[derive(Clone)]
pub struct S3SnapshotStore {
    client: Client,
    bucket: String,
    key: String,
}

impl S3SnapshotStore {
    /// Create a new S3 store for `{prefix}/{file_name}` in `bucket`.
    pub fn new(
        client: Client,
        bucket: impl Into<String>,
        prefix: &str,
        file_name: &str,
    ) -> Self {
        let prefix = prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", prefix, file_name)
        };

        Self {
            client,
            bucket: bucket.into(),
            key,
        }
    }

    /// Create S3 storage from environment configuration.
    ///
    /// - `S3_BUCKET` (default: `bounty-watch`)
    /// - `S3_PREFIX` (default: `bounty-watch`)
    pub async fn from_env(file_name: &str) -> Result<Self> {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);

        let bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "bounty-watch".to_string());
        let prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "bounty-watch".to_string());

        Ok(Self::new(client, bucket, &prefix, file_name))
    }
}

#[async_trait]
impl SnapshotStore for S3SnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .send()
            .await;

        match result {
            Ok(output) => {
                let bytes = output.body.collect().await.map_err(AppError::s3)?;
                Ok(Some(serde_json::from_slice(&bytes.into_bytes())?))
            }
            Err(err) => {
                // Check if it's a "not found" error
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(AppError::s3(service_err))
                }
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        let bytes = ByteStream::from(json.into_bytes());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .body(bytes)
            .content_type("application/json")
            .send()
            .await
            .map_err(AppError::s3)?;
        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
