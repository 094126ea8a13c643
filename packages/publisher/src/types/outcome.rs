//! Per-row outcomes and the batch summary.

use std::fmt;

use crate::error::RowError;
use crate::types::content::PublishedPost;

/// The fixed, non-reorderable stages of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    TeamExtraction,
    AccountLookup,
    ContentGeneration,
    ImageComposition,
    MediaUpload,
    CaptionGeneration,
    FigureInsertion,
    Publish,
    Indexing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::TeamExtraction => "team extraction",
            Stage::AccountLookup => "account lookup",
            Stage::ContentGeneration => "content generation",
            Stage::ImageComposition => "image composition",
            Stage::MediaUpload => "media upload",
            Stage::CaptionGeneration => "caption generation",
            Stage::FigureInsertion => "figure insertion",
            Stage::Publish => "publish",
            Stage::Indexing => "indexing",
        };
        f.write_str(name)
    }
}

/// Outcome of one row: exactly one terminal state.
///
/// Partial artifacts of a failed row (scratch images, uploaded media)
/// are not surfaced here; they are only logged.
#[derive(Debug)]
pub struct RowResult {
    /// Workbook row number (header row is 1, first task row is 2)
    pub row: usize,

    /// Published post, or the stage-scoped failure
    pub outcome: Result<PublishedPost, RowError>,
}

impl RowResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Stage the row failed at, if it failed.
    pub fn failed_stage(&self) -> Option<Stage> {
        self.outcome.as_ref().err().map(|e| e.stage())
    }
}

/// Aggregate result of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<RowResult>,
}

impl BatchSummary {
    pub fn new(results: Vec<RowResult>) -> Self {
        Self { results }
    }

    pub fn published(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.published()
    }
}
