//! WordPress REST v2 implementation of the [`Publisher`] trait.

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PublishError;
use crate::traits::publish::Publisher;
use crate::types::content::{ComposedImage, MediaFields, PostDraft, PublishedPost, UploadedMedia};
use crate::types::job::Account;

#[derive(Debug, Deserialize)]
struct MediaResponse {
    id: u64,
    source_url: String,
}

#[derive(Debug, Serialize)]
struct PostRequest<'a> {
    title: &'a str,
    content: &'a str,
    status: &'static str,
    categories: [u32; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    id: u64,
    link: String,
}

/// REST client for WordPress sites, authenticated per account with an
/// application password.
pub struct WordPressClient {
    client: reqwest::Client,
}

impl Default for WordPressClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WordPressClient {
    /// Create a client with default settings.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Use a custom HTTP client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(account: &Account, resource: &str) -> String {
        format!(
            "{}/wp-json/wp/v2/{resource}",
            account.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Publisher for WordPressClient {
    async fn upload_media(
        &self,
        account: &Account,
        image: &ComposedImage,
        fields: &MediaFields,
    ) -> Result<UploadedMedia, PublishError> {
        let bytes = tokio::fs::read(&image.path)
            .await
            .map_err(|e| PublishError::MediaRead {
                path: image.path.clone(),
                source: e,
            })?;

        let file_name = image
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or(PublishError::MissingField { field: "file_name" })?;

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("image/jpeg")
            .map_err(|e| PublishError::Http(Box::new(e)))?;

        let form = multipart::Form::new()
            .part("file", part)
            .text("title", fields.title.clone())
            .text("alt_text", fields.alt.clone())
            .text("caption", fields.caption.clone());

        debug!(site = %account.site, path = %image.path.display(), "uploading media");
        let response = self
            .client
            .post(Self::endpoint(account, "media"))
            .basic_auth(&account.username, Some(account.password.expose()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| PublishError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let media: MediaResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Http(Box::new(e)))?;

        Ok(UploadedMedia {
            id: Some(media.id),
            url: media.source_url,
        })
    }

    async fn create_post(
        &self,
        account: &Account,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PublishError> {
        let request = PostRequest {
            title: &draft.title,
            content: &draft.body_html,
            status: "publish",
            categories: [draft.category_id],
            featured_media: draft.featured_media,
        };

        debug!(site = %account.site, title = %draft.title, "creating post");
        let response = self
            .client
            .post(Self::endpoint(account, "posts"))
            .basic_auth(&account.username, Some(account.password.expose()))
            .json(&request)
            .send()
            .await
            .map_err(|e| PublishError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let post: PostResponse = response
            .json()
            .await
            .map_err(|e| PublishError::Http(Box::new(e)))?;

        Ok(PublishedPost {
            id: Some(post.id),
            link: post.link,
        })
    }
}
