//! Job input: the two-table workbook read once at batch start.

use std::path::Path;

use crate::error::SourceError;
use crate::types::job::BatchJob;

/// Reads a job description (accounts table + keywords table) from disk.
///
/// Any failure here is a batch-level error: the run is reported once
/// and halted before the first row.
pub trait JobSource: Send + Sync {
    /// Load the full batch job.
    fn load(&self, path: &Path) -> Result<BatchJob, SourceError>;
}
