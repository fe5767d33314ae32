use anyhow::{Context, Result};
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;
use tracing::debug;

use super::{artifact_paths, ArtifactStore};

/// Artifacts stored in an S3-compatible bucket (Spaces, MinIO, R2, AWS).
#[derive(Clone)]
pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Create a store for `bucket` at `endpoint`.
    ///
    /// Credentials come from `SPACES_KEY` and `SPACES_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing or the bucket handle cannot be built.
    pub fn new(endpoint: &str, region: &str, bucket: &str) -> Result<Self> {
        let access_key = std::env::var("SPACES_KEY").context("SPACES_KEY not set")?;
        let secret_key = std::env::var("SPACES_SECRET").context("SPACES_SECRET not set")?;

        let credentials = Credentials::new(Some(&access_key), Some(&secret_key), None, None, None)
            .context("Failed to create S3 credentials")?;

        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        };

        // Custom endpoints generally need path-style addressing.
        let bucket = Bucket::new(bucket, region, credentials)
            .context("Failed to create S3 bucket")?
            .with_path_style();

        Ok(Self { bucket })
    }
}

#[async_trait]
impl ArtifactStore for S3Store {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn remove_files(&self, link_id: i64, collection_id: i64) -> Result<()> {
        for key in artifact_paths(link_id, collection_id) {
            match self.bucket.delete_object(&key).await {
                Ok(_) => debug!(key = %key, "Deleted artifact from S3"),
                Err(s3::error::S3Error::HttpFailWithBody(404, _)) => {}
                Err(e) => {
                    return Err(anyhow::anyhow!("S3 delete of {key} failed: {e}"));
                }
            }
        }
        Ok(())
    }
}
