//! Content artifacts produced and consumed along a row's stages.

use std::path::PathBuf;

/// An internal link that the generated body must contain exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Visible link text
    pub text: String,

    /// Link target
    pub url: String,
}

impl Anchor {
    /// Create a new anchor.
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// Generated article content: title, section headings, and HTML body.
///
/// Produced once per row by the AI collaborator and consumed
/// immediately; never reused across rows.
#[derive(Debug, Clone, Default)]
pub struct Article {
    /// H1 title. Empty means the generation stage failed.
    pub title: String,

    /// H2 texts in document order
    pub headings: Vec<String>,

    /// Body markup containing the internal link
    pub body_html: String,
}

impl Article {
    /// Create an article.
    pub fn new(
        title: impl Into<String>,
        headings: Vec<String>,
        body_html: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            headings,
            body_html: body_html.into(),
        }
    }
}

/// The two team labels extracted from a source article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamPair {
    pub home: String,
    pub away: String,
}

impl TeamPair {
    /// Create a team pair.
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Extraction only counts as a success when both labels are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.home.trim().is_empty() && !self.away.trim().is_empty()
    }
}

/// A composed image file on the fixed 800x450 canvas.
///
/// Ephemeral: written to the scratch area, uploaded once, then abandoned.
#[derive(Debug, Clone)]
pub struct ComposedImage {
    /// Backing file in the scratch area
    pub path: PathBuf,

    /// The text that was rendered
    pub text: String,

    /// Font size the fit search settled on
    pub font_size: f32,
}

/// Title/alt/caption metadata attached to an uploaded media item.
#[derive(Debug, Clone)]
pub struct MediaFields {
    pub title: String,
    pub alt: String,
    pub caption: String,
}

impl MediaFields {
    /// Use the same text for title, alt, and caption.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            title: text.clone(),
            alt: text.clone(),
            caption: text,
        }
    }

    /// Set a distinct caption (alt follows the caption).
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        let caption = caption.into();
        self.alt = caption.clone();
        self.caption = caption;
        self
    }
}

/// A media item accepted by the remote site.
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Remote attachment id, when the site reports one
    pub id: Option<u64>,

    /// Public URL of the stored file
    pub url: String,
}

/// Everything needed to create the remote post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub body_html: String,
    pub category_id: u32,
    pub featured_media: Option<u64>,
}

/// Terminal artifact of a successful row.
#[derive(Debug, Clone)]
pub struct PublishedPost {
    /// Remote post id, when the site reports one
    pub id: Option<u64>,

    /// Published location
    pub link: String,
}
