//! Resource-specific endpoints that sit outside the generic list/mutate path.

use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use super::{HttpGateway, MutationOutcome, ResourceGateway};
use crate::error::{KeepsakeError, Result};
use crate::model::{
    AdminStats, GrowthEntry, Invitation, Kid, Record, ShareLink, ShareRequest, UserSummary,
    Video, VideoScope,
};
use crate::query::QuerySpec;
use crate::types::{ApiPath, RecordId, ResourceKind};
use crate::upload::mime_for;

impl HttpGateway {
    /// Look up accounts by name or email for the invitation dialog.
    pub async fn search_users(&self, text: &str) -> Result<Vec<UserSummary>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let builder = self.request(Method::GET, "users/search")?.query(&[("q", text)]);
        let (users, _) = self.send_list(builder).await?;
        Ok(users)
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        let builder = self.request(Method::GET, "admin/stats")?;
        self.send_item(builder).await
    }

    pub async fn invite_member(&self, family: &RecordId, invitation: &Invitation) -> Result<()> {
        let builder = self
            .request(Method::POST, ApiPath::new("families").id(family).then("members"))?
            .json(invitation);
        self.send_text(builder).await?;
        Ok(())
    }

    /// Append a growth measurement. Returns the updated kid when the backend
    /// echoes it.
    pub async fn append_growth(&self, kid: &RecordId, entry: &GrowthEntry) -> Result<Option<Kid>> {
        let path = ResourceKind::Kids.item_path(kid).then("growth");
        let builder = self.request(Method::POST, path)?.json(entry);
        match self.send_mutation::<Kid>(builder, Some(kid.clone())).await? {
            MutationOutcome::Saved(kid) => Ok(Some(kid)),
            _ => Ok(None),
        }
    }

    pub async fn upload_kid_avatar(&self, kid: &RecordId, file: &Path) -> Result<Option<Kid>> {
        let bytes = tokio::fs::read(file).await?;
        let part = file_part(file, bytes)?;
        let path = ResourceKind::Kids.item_path(kid).then("avatar");
        let builder = self
            .request(Method::POST, path)?
            .multipart(Form::new().part("file", part));
        match self.send_mutation::<Kid>(builder, Some(kid.clone())).await? {
            MutationOutcome::Saved(kid) => Ok(Some(kid)),
            _ => Ok(None),
        }
    }

    pub async fn share_album(&self, album: &RecordId, request: &ShareRequest) -> Result<ShareLink> {
        let path = ResourceKind::Albums.item_path(album).then("share");
        let builder = self.request(Method::POST, path)?.json(request);
        let mut link: ShareLink = self.send_item(builder).await?;
        self.media().resolve_opt(&mut link.url);
        Ok(link)
    }

    pub async fn unshare_album(&self, album: &RecordId) -> Result<()> {
        let path = ResourceKind::Albums.item_path(album).then("share");
        self.send_text(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Like or unlike a photo. Both calls are idempotent on the backend.
    pub async fn set_photo_like(&self, photo: &RecordId, liked: bool) -> Result<()> {
        let method = if liked { Method::POST } else { Method::DELETE };
        let path = ResourceKind::Photos.item_path(photo).then("like");
        self.send_text(self.request(method, path)?).await?;
        Ok(())
    }

    pub async fn record_photo_view(&self, photo: &RecordId) -> Result<()> {
        let path = ResourceKind::Photos.item_path(photo).then("view");
        self.send_text(self.request(Method::POST, path)?).await?;
        Ok(())
    }

    /// Every video of a kid or an album.
    pub async fn videos_for(&self, scope: &VideoScope) -> Result<Vec<Video>> {
        let (key, value) = scope.filter();
        let spec = QuerySpec::for_kind(Video::KIND).with_filter(key, value);
        self.fetch_all(&spec).await
    }
}

/// Multipart file part named after the file, with a content type guessed
/// from its extension.
pub(crate) fn file_part(path: &Path, bytes: Vec<u8>) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name(path))
        .mime_str(mime_for(path))
        .map_err(|e| KeepsakeError::Other(format!("invalid content type: {e}")))
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
