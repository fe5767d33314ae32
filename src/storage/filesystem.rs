use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{artifact_paths, ArtifactStore};

/// Artifacts stored on local disk under a root directory.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ArtifactStore for FilesystemStore {
    fn name(&self) -> &'static str {
        "filesystem"
    }

    async fn remove_files(&self, link_id: i64, collection_id: i64) -> Result<()> {
        for relative in artifact_paths(link_id, collection_id) {
            let path = self.root.join(&relative);
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!(path = %path.display(), "Removed artifact"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(anyhow::Error::new(e))
                        .with_context(|| format!("Failed to remove artifact: {}", path.display()));
                }
            }
        }
        Ok(())
    }
}
