//! Workbook-backed job source.
//!
//! The job description is an xlsx file with two sheets: `accounts`
//! (site, base URL, username, password, background image) and
//! `keywords` (source URL, target site, category id, anchor text,
//! anchor URL). The first row of each sheet is a header and skipped.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use tracing::info;

use crate::error::SourceError;
use crate::traits::source::JobSource;
use crate::types::job::{Account, BatchJob, RowTask};

/// Sheet holding the accounts table.
pub const ACCOUNTS_SHEET: &str = "accounts";

/// Sheet holding the keyword rows.
pub const KEYWORDS_SHEET: &str = "keywords";

/// Reads batch jobs from xlsx workbooks.
#[derive(Debug, Default)]
pub struct XlsxJobSource;

impl XlsxJobSource {
    /// Create a new source.
    pub fn new() -> Self {
        Self
    }
}

impl JobSource for XlsxJobSource {
    fn load(&self, path: &Path) -> Result<BatchJob, SourceError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| SourceError::Open {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        let accounts_range =
            workbook
                .worksheet_range(ACCOUNTS_SHEET)
                .map_err(|_| SourceError::MissingSheet {
                    name: ACCOUNTS_SHEET.to_string(),
                })?;
        let keywords_range =
            workbook
                .worksheet_range(KEYWORDS_SHEET)
                .map_err(|_| SourceError::MissingSheet {
                    name: KEYWORDS_SHEET.to_string(),
                })?;

        let mut job = BatchJob::new();
        for (idx, row) in accounts_range.rows().enumerate().skip(1) {
            job.accounts.push(account_from_row(idx + 1, row)?);
        }
        for (idx, row) in keywords_range.rows().enumerate().skip(1) {
            job.rows.push(task_from_row(idx + 1, row)?);
        }

        info!(
            accounts = job.accounts.len(),
            rows = job.rows.len(),
            "job workbook loaded"
        );
        Ok(job)
    }
}

fn cell_str(sheet: &str, row_no: usize, row: &[Data], col: usize, name: &str) -> Result<String, SourceError> {
    row.get(col)
        .and_then(|cell| cell.as_string())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SourceError::BadRow {
            sheet: sheet.to_string(),
            row: row_no,
            reason: format!("missing {name}"),
        })
}

fn account_from_row(row_no: usize, row: &[Data]) -> Result<Account, SourceError> {
    Ok(Account::new(
        cell_str(ACCOUNTS_SHEET, row_no, row, 0, "site")?,
        cell_str(ACCOUNTS_SHEET, row_no, row, 1, "base URL")?,
        cell_str(ACCOUNTS_SHEET, row_no, row, 2, "username")?,
        cell_str(ACCOUNTS_SHEET, row_no, row, 3, "password")?,
        cell_str(ACCOUNTS_SHEET, row_no, row, 4, "background image")?,
    ))
}

fn task_from_row(row_no: usize, row: &[Data]) -> Result<RowTask, SourceError> {
    let category_raw = cell_str(KEYWORDS_SHEET, row_no, row, 2, "category id")?;
    let category_id = category_raw
        .parse::<f64>()
        .ok()
        .filter(|v| *v >= 0.0 && v.fract() == 0.0)
        .map(|v| v as u32)
        .ok_or_else(|| SourceError::BadRow {
            sheet: KEYWORDS_SHEET.to_string(),
            row: row_no,
            reason: format!("category id is not a whole number: {category_raw}"),
        })?;

    Ok(RowTask::new(
        cell_str(KEYWORDS_SHEET, row_no, row, 0, "source URL")?,
        cell_str(KEYWORDS_SHEET, row_no, row, 1, "target site")?,
        category_id,
        cell_str(KEYWORDS_SHEET, row_no, row, 3, "anchor text")?,
        cell_str(KEYWORDS_SHEET, row_no, row, 4, "anchor URL")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_account_from_row() {
        let row = vec![
            s("alpha.example"),
            s("https://alpha.example"),
            s("editor"),
            s("app-pass"),
            s("https://cdn.example/bg.jpg"),
        ];
        let account = account_from_row(2, &row).unwrap();
        assert_eq!(account.site, "alpha.example");
        assert_eq!(account.username, "editor");
    }

    #[test]
    fn test_account_row_missing_cell() {
        let row = vec![s("alpha.example"), s("https://alpha.example")];
        let err = account_from_row(2, &row).unwrap_err();
        assert!(matches!(err, SourceError::BadRow { row: 2, .. }));
    }

    #[test]
    fn test_task_from_row_numeric_category() {
        let row = vec![
            s("https://src.example/match"),
            s("alpha.example"),
            Data::Float(7.0),
            s("derby odds"),
            s("https://alpha.example/odds"),
        ];
        let task = task_from_row(3, &row).unwrap();
        assert_eq!(task.category_id, 7);
    }

    #[test]
    fn test_task_from_row_bad_category() {
        let row = vec![
            s("https://src.example/match"),
            s("alpha.example"),
            s("sports"),
            s("derby odds"),
            s("https://alpha.example/odds"),
        ];
        let err = task_from_row(3, &row).unwrap_err();
        assert!(matches!(err, SourceError::BadRow { .. }));
    }
}
