//! IndexNow implementation of the [`Indexer`] trait.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::IndexError;
use crate::security::SecretString;
use crate::traits::index::Indexer;

const DEFAULT_ENDPOINT: &str = "https://api.indexnow.org/indexnow";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Submission<'a> {
    host: String,
    key: &'a str,
    url_list: &'a [String],
}

/// Submits published URLs to an IndexNow endpoint.
pub struct IndexNowClient {
    client: reqwest::Client,
    key: SecretString,
    endpoint: String,
}

impl IndexNowClient {
    /// Create a client for an API key.
    pub fn new(key: impl Into<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            key: key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Indexer for IndexNowClient {
    async fn submit(&self, urls: &[String]) -> Result<(), IndexError> {
        let Some(first) = urls.first() else {
            return Ok(());
        };

        let host = Url::parse(first)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| IndexError::InvalidUrl { url: first.clone() })?;

        let body = Submission {
            host,
            key: self.key.expose(),
            url_list: urls,
        };

        debug!(count = urls.len(), "submitting URLs for indexing");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| IndexError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
