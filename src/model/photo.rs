use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Payload, Record, day_of, touched};
use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<RecordId>,
    #[serde(default, alias = "title", skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, alias = "original_filename", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(alias = "file_url", alias = "image_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, alias = "likes_count")]
    pub like_count: u32,
    #[serde(default, alias = "liked_by_me", alias = "is_liked")]
    pub liked: bool,
    #[serde(default, alias = "views_count", alias = "views")]
    pub view_count: u32,
}

impl Photo {
    /// Capture day, falling back to the upload day.
    pub fn taken_on(&self) -> Option<Date> {
        self.taken_at
            .as_deref()
            .and_then(day_of)
            .or_else(|| self.created_at.as_deref().and_then(day_of))
    }

    /// Flip the like state locally, mirroring a successful like/unlike call.
    pub fn apply_like(&mut self, liked: bool) {
        if self.liked == liked {
            return;
        }
        self.liked = liked;
        if liked {
            self.like_count += 1;
        } else {
            self.like_count = self.like_count.saturating_sub(1);
        }
    }
}

impl Record for Photo {
    const KIND: ResourceKind = ResourceKind::Photos;
    type Payload = PhotoMetadata;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [self.caption.as_deref(), self.filename.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn resolve_media(&mut self, media: &MediaResolver) {
        media.resolve_in_place(&mut self.url);
        media.resolve_opt(&mut self.thumbnail_url);
    }
}

/// Form fields sent alongside an uploaded photo file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhotoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<Date>,
}

impl PhotoMetadata {
    /// Multipart text fields, in a stable order.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(album_id) = &self.album_id {
            fields.push(("album_id", album_id.to_string()));
        }
        if let Some(caption) = &self.caption {
            fields.push(("caption", caption.clone()));
        }
        if let Some(kid_id) = &self.kid_id {
            fields.push(("kid_id", kid_id.to_string()));
        }
        if let Some(taken_at) = self.taken_at {
            fields.push(("taken_at", taken_at.to_string()));
        }
        fields
    }
}

impl Payload for PhotoMetadata {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!(
            "album_id" => self.album_id,
            "caption" => self.caption,
            "kid_id" => self.kid_id,
            "taken_at" => self.taken_at,
        )
    }
}
