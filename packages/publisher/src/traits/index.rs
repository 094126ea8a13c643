//! Search-indexing notification.

use async_trait::async_trait;

use crate::error::IndexError;

/// Notifies a search index about freshly published URLs.
///
/// Only attempted once a publish link exists; failure is reported but
/// never fails the row, which has already succeeded.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Submit one or more published URLs.
    async fn submit(&self, urls: &[String]) -> Result<(), IndexError>;
}
