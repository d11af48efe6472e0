use crate::errors::{EtlError, Result};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use log::info;

/// S3 bucket sink using the default AWS credential chain
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Client from the default AWS config. Fails before touching AWS when no
    /// bucket is configured.
    pub async fn from_env(bucket: &str) -> Result<Self> {
        if bucket.is_empty() {
            return Err(EtlError::ConfigError("bucket_name is not set".to_string()));
        }
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Ok(Self::new(Client::new(&sdk_config), bucket))
    }

    /// Wrap an existing client, e.g. one pointed at a custom endpoint.
    pub fn new(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("text/csv")
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                EtlError::StorageError(format!(
                    "upload of s3://{}/{} failed: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        info!("Uploaded {} bytes to s3://{}/{}", size, self.bucket, key);
        Ok(())
    }
}
