// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: List images by repository and remove them.

use crate::types::ImageId;
use async_trait::async_trait;

/// Image store operations used by the cleanup stage.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// List local images whose repository name matches exactly.
    async fn list_images(&self, repository: &str) -> Result<Vec<ImageSummary>, ImageError>;

    /// Remove an image. Fails with `InUse` if a container still references it.
    async fn remove_image(&self, id: &ImageId, force: bool) -> Result<(), ImageError>;
}

/// Summary information about a local image.
#[derive(Debug, Clone)]
pub struct ImageSummary {
    /// Image ID.
    pub id: ImageId,
    /// Repository tags (`repo:tag`).
    pub tags: Vec<String>,
    /// Creation time as a unix timestamp.
    pub created: i64,
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
