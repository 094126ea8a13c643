//! AI trait for the generative collaborators.

use async_trait::async_trait;

use crate::error::AiError;
use crate::types::content::{Anchor, Article, TeamPair};

/// The generative collaborators used by a row: article writing, team
/// extraction, and caption paraphrasing.
///
/// Implementations wrap a specific provider and are injected as an
/// explicit client handle, never configured through a process-global.
#[async_trait]
pub trait AI: Send + Sync {
    /// Write a full article from the source URL.
    ///
    /// The body must carry the internal link for `anchor` exactly once,
    /// neither first nor last in the body. An empty title is treated by
    /// the caller as a generation failure, not an empty-but-valid title.
    async fn generate_article(&self, source_url: &str, anchor: &Anchor) -> Result<Article, AiError>;

    /// Extract the two team names from the source article.
    ///
    /// Both labels must be non-empty; the pipeline retries this call up
    /// to a fixed bound and treats anything less as a failed attempt.
    async fn extract_teams(&self, source_url: &str) -> Result<TeamPair, AiError>;

    /// Paraphrase a section heading into one short caption sentence.
    ///
    /// `teams` provides match context when available. Callers fall back
    /// to the heading text verbatim when this fails.
    async fn caption(&self, heading: &str, teams: Option<&TeamPair>) -> Result<String, AiError>;
}
