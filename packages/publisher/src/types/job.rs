//! Batch job description: the accounts table and the row tasks.

use crate::security::SecretString;
use crate::types::content::Anchor;

/// One input row: a single article to produce and publish.
///
/// Read-only once created; the pipeline never mutates a task.
#[derive(Debug, Clone)]
pub struct RowTask {
    /// Source article to base the generated content on
    pub source_url: String,

    /// Target site identifier, looked up in the accounts table
    pub site: String,

    /// Remote category id for the published post
    pub category_id: u32,

    /// Anchor text of the internal link the body must carry
    pub anchor_text: String,

    /// URL the internal link points at
    pub anchor_url: String,
}

impl RowTask {
    /// Create a new row task.
    pub fn new(
        source_url: impl Into<String>,
        site: impl Into<String>,
        category_id: u32,
        anchor_text: impl Into<String>,
        anchor_url: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            site: site.into(),
            category_id,
            anchor_text: anchor_text.into(),
            anchor_url: anchor_url.into(),
        }
    }

    /// The internal link this row's generated body must contain.
    pub fn anchor(&self) -> Anchor {
        Anchor {
            text: self.anchor_text.clone(),
            url: self.anchor_url.clone(),
        }
    }
}

/// Credentials and assets for one target site.
#[derive(Debug, Clone)]
pub struct Account {
    /// Site identifier matched against [`RowTask::site`]
    pub site: String,

    /// Base URL of the remote site (scheme + host, no trailing slash needed)
    pub base_url: String,

    /// Remote username
    pub username: String,

    /// Remote application password
    pub password: SecretString,

    /// Background image for composed thumbnails (URL or local path)
    pub background_ref: String,
}

impl Account {
    /// Create a new account entry.
    pub fn new(
        site: impl Into<String>,
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
        background_ref: impl Into<String>,
    ) -> Self {
        Self {
            site: site.into(),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            background_ref: background_ref.into(),
        }
    }
}

/// A full batch: the immutable accounts table plus row tasks in file order.
#[derive(Debug, Clone, Default)]
pub struct BatchJob {
    /// Accounts table, looked up by site and never mutated
    pub accounts: Vec<Account>,

    /// Row tasks, processed strictly in this order
    pub rows: Vec<RowTask>,
}

impl BatchJob {
    /// Create an empty job.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account.
    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }

    /// Add a row task.
    pub fn with_row(mut self, row: RowTask) -> Self {
        self.rows.push(row);
        self
    }

    /// Look up the account for a target site. Absence is terminal for
    /// the row that asked, not for the batch.
    pub fn account_for(&self, site: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.site == site)
    }
}
