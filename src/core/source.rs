//! Document retrieval abstraction

use super::quote::FailureReason;
use async_trait::async_trait;

/// Retrieves raw documents by URL.
///
/// Implementations never panic or raise past this boundary: every failure
/// comes back as a [`FailureReason`].
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FailureReason>;
}
