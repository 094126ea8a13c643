//! Typed errors for the publishing pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so every stage
//! failure is a distinct, matchable variant. The orchestrator composes
//! these per-stage results instead of relying on catch-all boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::outcome::Stage;

/// Boxed error source for transport failures (reqwest, io, ...).
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal failure of a single row, scoped to the stage that produced it.
///
/// A `RowError` never aborts the batch. The pipeline records it,
/// notifies, and moves on to the next row.
#[derive(Debug, Error)]
pub enum RowError {
    /// Target site has no entry in the accounts table
    #[error("no account configured for site: {site}")]
    Lookup { site: String },

    /// Team extraction exhausted its bounded retries
    #[error("team extraction failed after {attempts} attempts: {source}")]
    Extraction { attempts: u32, source: AiError },

    /// Content generation collaborator failed
    #[error("content generation failed: {0}")]
    Generation(#[source] AiError),

    /// Content generation succeeded but produced no H1 title
    #[error("content generation returned an empty title")]
    EmptyTitle,

    /// Background fetch or rendering failure
    #[error("image composition failed: {0}")]
    Composition(#[from] ComposeError),

    /// Media upload to the remote site failed
    #[error("media upload failed: {0}")]
    Upload(#[source] PublishError),

    /// Post creation on the remote site failed
    #[error("publish failed: {0}")]
    Publish(#[source] PublishError),
}

impl RowError {
    /// The stage this error terminated the row at.
    pub fn stage(&self) -> Stage {
        match self {
            RowError::Lookup { .. } => Stage::AccountLookup,
            RowError::Extraction { .. } => Stage::TeamExtraction,
            RowError::Generation(_) | RowError::EmptyTitle => Stage::ContentGeneration,
            RowError::Composition(_) => Stage::ImageComposition,
            RowError::Upload(_) => Stage::MediaUpload,
            RowError::Publish(_) => Stage::Publish,
        }
    }
}

/// Job-level failure that halts the whole run before any row is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Job workbook could not be read or had the wrong shape
    #[error("job input unreadable: {0}")]
    Source(#[from] SourceError),
}

/// Errors from the AI collaborator (generation, extraction, captions).
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP transport failure
    #[error("AI transport error: {0}")]
    Http(#[source] BoxedError),

    /// Non-success status from the AI service
    #[error("AI service returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response arrived but did not have the expected shape
    #[error("malformed AI response: {reason}")]
    Malformed { reason: String },

    /// Model returned nothing usable
    #[error("model returned an empty result")]
    Empty,
}

/// Errors from the media/publish collaborator.
#[derive(Debug, Error)]
pub enum PublishError {
    /// HTTP transport failure
    #[error("publish transport error: {0}")]
    Http(#[source] BoxedError),

    /// Non-success status from the remote site
    #[error("remote site returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Response was missing a field the pipeline needs
    #[error("response missing field: {field}")]
    MissingField { field: &'static str },

    /// Local media file could not be read for upload
    #[error("could not read media file {path}: {source}")]
    MediaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from the text-fit image engine.
///
/// A missing or unparsable font asset fails loudly at engine
/// construction instead of silently degrading glyph coverage.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Background image could not be fetched or read
    #[error("background fetch failed for {reference}: {source}")]
    Fetch {
        reference: String,
        #[source]
        source: BoxedError,
    },

    /// Background decode, resize, or encode failure
    #[error("image processing failed: {0}")]
    Image(#[from] image::ImageError),

    /// Font asset missing or not a usable font
    #[error("font asset unusable: {reason}")]
    Font { reason: String },

    /// Composed image could not be written to the scratch area
    #[error("could not write image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural failure during figure insertion.
///
/// Non-terminal: the caller falls back to the unmodified body.
#[derive(Debug, Error)]
pub enum InsertError {
    /// Open/close heading tags do not pair up
    #[error("heading markup is malformed: {opens} <h2> tags but {closes} </h2> tags")]
    Malformed { opens: usize, closes: usize },
}

/// Errors from the indexing-notification collaborator. Never fatal.
#[derive(Debug, Error)]
pub enum IndexError {
    /// HTTP transport failure
    #[error("indexing transport error: {0}")]
    Http(#[source] BoxedError),

    /// Indexing endpoint rejected the submission
    #[error("indexing endpoint returned {status}")]
    Rejected { status: u16 },

    /// Submitted URL could not be parsed for its host
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Errors reading the job workbook.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Workbook file could not be opened
    #[error("could not open workbook {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: BoxedError,
    },

    /// A required sheet is absent
    #[error("workbook is missing sheet: {name}")]
    MissingSheet { name: String },

    /// A row is missing a required cell or has an unusable value
    #[error("sheet {sheet} row {row}: {reason}")]
    BadRow {
        sheet: String,
        row: usize,
        reason: String,
    },
}
