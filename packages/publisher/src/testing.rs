//! Testing utilities including mock collaborators.
//!
//! These are useful for testing code that drives the pipeline without
//! real AI, WordPress, or indexing traffic.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{AiError, IndexError, PublishError, SourceError};
use crate::traits::{ai::AI, index::Indexer, notify::Notifier, publish::Publisher, source::JobSource};
use crate::types::content::{
    Anchor, Article, ComposedImage, MediaFields, PostDraft, PublishedPost, TeamPair, UploadedMedia,
};
use crate::types::job::{Account, BatchJob};

/// A mock AI implementation for testing.
///
/// Returns deterministic, configurable responses for article writing,
/// team extraction, and captioning.
#[derive(Default)]
pub struct MockAI {
    /// Predefined articles by source URL
    articles: Arc<RwLock<HashMap<String, Article>>>,

    /// Predefined team pairs by source URL
    teams: Arc<RwLock<HashMap<String, TeamPair>>>,

    /// Predefined captions by heading
    captions: Arc<RwLock<HashMap<String, String>>>,

    /// Remaining extraction calls that should fail before succeeding
    extraction_failures: AtomicU32,

    /// Fail every article request
    fail_generation: bool,

    /// Fail every caption request
    fail_captions: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

/// Record of a call made to the mock AI.
#[derive(Debug, Clone)]
pub enum MockAICall {
    GenerateArticle { source_url: String },
    ExtractTeams { source_url: String },
    Caption { heading: String },
}

impl MockAI {
    /// Create a new mock AI with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined article for a source URL.
    pub fn with_article(self, source_url: impl Into<String>, article: Article) -> Self {
        self.articles
            .write()
            .unwrap()
            .insert(source_url.into(), article);
        self
    }

    /// Add a predefined team pair for a source URL.
    pub fn with_teams(self, source_url: impl Into<String>, teams: TeamPair) -> Self {
        self.teams.write().unwrap().insert(source_url.into(), teams);
        self
    }

    /// Add a predefined caption for a heading.
    pub fn with_caption(self, heading: impl Into<String>, caption: impl Into<String>) -> Self {
        self.captions
            .write()
            .unwrap()
            .insert(heading.into(), caption.into());
        self
    }

    /// Make the next `n` extraction calls fail before recovering.
    pub fn with_extraction_failures(self, n: u32) -> Self {
        self.extraction_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Fail every article request.
    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    /// Fail every caption request.
    pub fn failing_captions(mut self) -> Self {
        self.fail_captions = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    /// Count calls of one kind.
    pub fn extraction_calls(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockAICall::ExtractTeams { .. }))
            .count()
    }

    /// Generate a default article for unknown source URLs.
    ///
    /// The body carries `<h2>` markup matching the headings and the
    /// anchor link exactly once, mid-body.
    fn default_article(&self, source_url: &str, anchor: &Anchor) -> Article {
        let link = format!("<a href=\"{}\"><strong>{}</strong></a>", anchor.url, anchor.text);
        Article::new(
            format!("Match preview for {source_url}"),
            vec!["Team news".to_string(), "Prediction".to_string()],
            format!(
                "<p>Opening paragraph.</p>\n<h2>Team news</h2>\n<p>Middle with {link}.</p>\n<h2>Prediction</h2>\n<p>Closing paragraph.</p>"
            ),
        )
    }
}

#[async_trait]
impl AI for MockAI {
    async fn generate_article(&self, source_url: &str, anchor: &Anchor) -> Result<Article, AiError> {
        self.calls.write().unwrap().push(MockAICall::GenerateArticle {
            source_url: source_url.to_string(),
        });

        if self.fail_generation {
            return Err(AiError::Empty);
        }

        Ok(self
            .articles
            .read()
            .unwrap()
            .get(source_url)
            .cloned()
            .unwrap_or_else(|| self.default_article(source_url, anchor)))
    }

    async fn extract_teams(&self, source_url: &str) -> Result<TeamPair, AiError> {
        self.calls.write().unwrap().push(MockAICall::ExtractTeams {
            source_url: source_url.to_string(),
        });

        // Countdown of injected failures, then normal behavior
        let remaining = self.extraction_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.extraction_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(AiError::Api {
                status: 503,
                body: "mock overload".to_string(),
            });
        }

        Ok(self
            .teams
            .read()
            .unwrap()
            .get(source_url)
            .cloned()
            .unwrap_or_else(|| TeamPair::new("Home FC", "Away United")))
    }

    async fn caption(&self, heading: &str, _teams: Option<&TeamPair>) -> Result<String, AiError> {
        self.calls.write().unwrap().push(MockAICall::Caption {
            heading: heading.to_string(),
        });

        if self.fail_captions {
            return Err(AiError::Empty);
        }

        Ok(self
            .captions
            .read()
            .unwrap()
            .get(heading)
            .cloned()
            .unwrap_or_else(|| format!("A closer look at {heading}")))
    }
}

/// A mock publisher for testing.
///
/// Records every upload and post, returning incrementing remote ids
/// without touching the network.
#[derive(Default)]
pub struct MockPublisher {
    /// Fail every media upload
    fail_uploads: bool,

    /// Fail every post creation
    fail_posts: bool,

    /// Incrementing remote id
    next_id: AtomicU64,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockPublisherCall>>>,
}

/// Record of a call made to the mock publisher.
#[derive(Debug, Clone)]
pub enum MockPublisherCall {
    UploadMedia {
        site: String,
        image_text: String,
        fields: MediaFields,
    },
    CreatePost {
        site: String,
        draft: PostDraft,
    },
}

impl MockPublisher {
    /// Create a new mock publisher.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// Fail every media upload.
    pub fn failing_uploads(mut self) -> Self {
        self.fail_uploads = true;
        self
    }

    /// Fail every post creation.
    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockPublisherCall> {
        self.calls.read().unwrap().clone()
    }

    /// Count recorded media uploads.
    pub fn upload_count(&self) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockPublisherCall::UploadMedia { .. }))
            .count()
    }

    /// Drafts of every created post, in order.
    pub fn posts(&self) -> Vec<PostDraft> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MockPublisherCall::CreatePost { draft, .. } => Some(draft.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn upload_media(
        &self,
        account: &Account,
        image: &ComposedImage,
        fields: &MediaFields,
    ) -> Result<UploadedMedia, PublishError> {
        self.calls.write().unwrap().push(MockPublisherCall::UploadMedia {
            site: account.site.clone(),
            image_text: image.text.clone(),
            fields: fields.clone(),
        });

        if self.fail_uploads {
            return Err(PublishError::Api {
                status: 500,
                body: "mock upload rejected".to_string(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(UploadedMedia {
            id: Some(id),
            url: format!("{}/wp-content/uploads/{id}.jpg", account.base_url),
        })
    }

    async fn create_post(
        &self,
        account: &Account,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PublishError> {
        self.calls.write().unwrap().push(MockPublisherCall::CreatePost {
            site: account.site.clone(),
            draft: draft.clone(),
        });

        if self.fail_posts {
            return Err(PublishError::Api {
                status: 500,
                body: "mock publish rejected".to_string(),
            });
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(PublishedPost {
            id: Some(id),
            link: format!("{}/?p={id}", account.base_url),
        })
    }
}

/// Notifier that records every message for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Arc<RwLock<Vec<String>>>,
}

impl RecordingNotifier {
    /// Create a new recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.read().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, text: &str) {
        self.messages.write().unwrap().push(text.to_string());
    }
}

/// A mock indexer for testing.
#[derive(Default)]
pub struct MockIndexer {
    /// Fail every submission
    fail: bool,

    /// URLs submitted so far
    submitted: Arc<RwLock<Vec<String>>>,
}

impl MockIndexer {
    /// Create a new mock indexer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every submission.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// All submitted URLs, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.read().unwrap().clone()
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    async fn submit(&self, urls: &[String]) -> Result<(), IndexError> {
        if self.fail {
            return Err(IndexError::Rejected { status: 403 });
        }
        self.submitted.write().unwrap().extend_from_slice(urls);
        Ok(())
    }
}

/// A job source that serves a prebuilt batch without touching disk.
#[derive(Default)]
pub struct MockJobSource {
    job: BatchJob,

    /// Fail the load instead of serving the job
    fail: bool,
}

impl MockJobSource {
    /// Serve the given batch.
    pub fn new(job: BatchJob) -> Self {
        Self { job, fail: false }
    }

    /// Fail the load.
    pub fn failing() -> Self {
        Self {
            job: BatchJob::default(),
            fail: true,
        }
    }
}

impl JobSource for MockJobSource {
    fn load(&self, path: &Path) -> Result<BatchJob, SourceError> {
        if self.fail {
            return Err(SourceError::Open {
                path: path.to_path_buf(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "mock workbook missing",
                )),
            });
        }
        Ok(self.job.clone())
    }
}
