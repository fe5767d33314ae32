//! Storage of preserved link artifacts.
//!
//! Artifacts live under `archives/{collection_id}/` with the link id as file
//! stem, plus a preview thumbnail under `archives/preview/{collection_id}/`.
//! Backends only need to know how to delete a relative path.

mod filesystem;
mod spaces;

pub use filesystem::FilesystemStore;
pub use spaces::S3Store;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{Config, StorageBackend};

/// Relative paths of every artifact that may exist for a link.
#[must_use]
pub fn artifact_paths(link_id: i64, collection_id: i64) -> [String; 6] {
    [
        format!("archives/{collection_id}/{link_id}.pdf"),
        format!("archives/{collection_id}/{link_id}.png"),
        format!("archives/{collection_id}/{link_id}_readability.json"),
        format!("archives/{collection_id}/{link_id}.html"),
        format!("archives/preview/{collection_id}/{link_id}.jpeg"),
        format!("archives/{collection_id}/{link_id}.jpeg"),
    ]
}

/// Removes stored artifacts when a link is reset or deleted.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Delete every artifact of a link. Artifacts that do not exist are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to delete an existing artifact.
    async fn remove_files(&self, link_id: i64, collection_id: i64) -> Result<()>;
}

/// Build the artifact store selected by configuration.
///
/// # Errors
///
/// Returns an error if the S3 client cannot be constructed.
pub fn from_config(config: &Config) -> Result<Arc<dyn ArtifactStore>> {
    Ok(match &config.storage {
        StorageBackend::Filesystem { root } => Arc::new(FilesystemStore::new(root.clone())),
        StorageBackend::S3 {
            endpoint,
            region,
            bucket,
        } => Arc::new(S3Store::new(endpoint, region, bucket)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths() {
        let paths = artifact_paths(42, 7);
        assert!(paths.contains(&"archives/7/42.pdf".to_string()));
        assert!(paths.contains(&"archives/7/42.png".to_string()));
        assert!(paths.contains(&"archives/7/42.jpeg".to_string()));
        assert!(paths.contains(&"archives/7/42.html".to_string()));
        assert!(paths.contains(&"archives/7/42_readability.json".to_string()));
        assert!(paths.contains(&"archives/preview/7/42.jpeg".to_string()));
    }
}
