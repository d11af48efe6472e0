use crate::errors::{EtlError, Result};
use crate::storage::ObjectStore;
use async_trait::async_trait;
use log::info;
use std::path::{Component, Path, PathBuf};

/// Writes objects as files under a root directory, `<root>/<key>`.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a `/`-separated key to a path under the root. Absolute keys and
    /// `..` or `.` segments are rejected.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(EtlError::StorageError(format!("invalid object key: {}", key)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    fn location(&self) -> String {
        self.root.display().to_string()
    }

    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &body).await?;
        info!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}
