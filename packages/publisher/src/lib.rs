//! Batch Article Publishing Library
//!
//! Drives rows of a job workbook through a fixed pipeline: extract the
//! two team names from a source article, generate a full article with
//! an internal link, compose branded images by fitting text onto a
//! background, upload the media, weave figure markup into the body, and
//! publish the post to the row's target site.
//!
//! # Design
//!
//! - Rows are independent: one bad row never aborts the batch
//! - Every network collaborator sits behind a trait seam
//! - Clients are explicit handles, never process-global configuration
//! - Stage failures are typed per stage, not funneled into a catch-all
//!
//! # Usage
//!
//! ```rust,ignore
//! use publisher::clients::{GeminiClient, WordPressClient};
//! use publisher::compose::TextFitEngine;
//! use publisher::pipeline::load_and_run;
//! use publisher::source::XlsxJobSource;
//! use publisher::traits::LogNotifier;
//!
//! let ai = GeminiClient::new(api_key);
//! let wp = WordPressClient::new();
//! let engine = TextFitEngine::from_font_path("fonts/heading.ttf", "scratch")?;
//!
//! let summary = load_and_run(
//!     &XlsxJobSource,
//!     Path::new("jobs.xlsx"),
//!     &engine,
//!     &ai,
//!     &wp,
//!     &LogNotifier,
//!     None,
//! )
//! .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (AI, Publisher, Notifier, Indexer, JobSource)
//! - [`types`] - Job, content, and outcome types
//! - [`pipeline`] - Batch orchestration with per-row isolation
//! - [`compose`] - Adaptive text-fit image composition
//! - [`clients`] - Real collaborator implementations
//! - [`source`] - Workbook job input
//! - [`testing`] - Mock collaborators for testing

pub mod clients;
pub mod compose;
pub mod content;
pub mod error;
pub mod html;
pub mod pipeline;
pub mod retry;
pub mod security;
pub mod slug;
pub mod source;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{
    AiError, BatchError, ComposeError, IndexError, InsertError, PublishError, RowError,
    SourceError,
};
pub use traits::{
    ai::AI,
    index::Indexer,
    notify::{LogNotifier, Notifier, NullNotifier},
    publish::Publisher,
    source::JobSource,
};
pub use types::{
    content::{
        Anchor, Article, ComposedImage, MediaFields, PostDraft, PublishedPost, TeamPair,
        UploadedMedia,
    },
    job::{Account, BatchJob, RowTask},
    outcome::{BatchSummary, RowResult, Stage},
};

// Re-export the pipeline entry points
pub use pipeline::{load_and_run, process_row, run_batch};

// Re-export the composition engine
pub use compose::{FitConfig, TextFitEngine, CANVAS_HEIGHT, CANVAS_WIDTH};

// Re-export real collaborators
pub use clients::{GeminiClient, IndexNowClient, TelegramNotifier, WordPressClient};
pub use source::XlsxJobSource;

// Re-export testing utilities
pub use testing::{MockAI, MockIndexer, MockJobSource, MockPublisher, RecordingNotifier};
