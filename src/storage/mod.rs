pub mod local;
pub mod s3;

use crate::errors::Result;
use async_trait::async_trait;

/// Destination for the weekly report artifact
#[async_trait]
pub trait ObjectStore {
    /// Human-readable location, e.g. `s3://bucket` or a directory path
    fn location(&self) -> String;

    /// Write `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

pub use local::LocalStore;
pub use s3::S3Store;
