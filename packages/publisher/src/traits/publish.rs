//! Publisher trait: media upload and post creation on a remote site.

use async_trait::async_trait;

use crate::error::PublishError;
use crate::types::content::{ComposedImage, MediaFields, PostDraft, PublishedPost, UploadedMedia};
use crate::types::job::Account;

/// The media/publish collaborator.
///
/// One client serves every account; credentials travel with each call
/// because each row may target a different site.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Upload a local image file, returning its stable id and public URL.
    async fn upload_media(
        &self,
        account: &Account,
        image: &ComposedImage,
        fields: &MediaFields,
    ) -> Result<UploadedMedia, PublishError>;

    /// Create a published post, returning its remote location.
    async fn create_post(
        &self,
        account: &Account,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PublishError>;
}
