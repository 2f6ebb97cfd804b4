use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Payload, Record, day_of, touched};
use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(alias = "file_url", alias = "video_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_id: Option<RecordId>,
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Video {
    pub fn recorded_on(&self) -> Option<Date> {
        self.created_at.as_deref().and_then(day_of)
    }
}

impl Record for Video {
    const KIND: ResourceKind = ResourceKind::Videos;
    type Payload = VideoMetadata;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        self.title.as_deref().into_iter().collect()
    }

    fn resolve_media(&mut self, media: &MediaResolver) {
        media.resolve_in_place(&mut self.url);
        media.resolve_opt(&mut self.thumbnail_url);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<RecordId>,
}

impl VideoMetadata {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(title) = &self.title {
            fields.push(("title", title.clone()));
        }
        if let Some(kid_id) = &self.kid_id {
            fields.push(("kid_id", kid_id.to_string()));
        }
        if let Some(album_id) = &self.album_id {
            fields.push(("album_id", album_id.to_string()));
        }
        fields
    }
}

impl Payload for VideoMetadata {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!(
            "title" => self.title,
            "kid_id" => self.kid_id,
            "album_id" => self.album_id,
        )
    }
}

/// Videos are always listed for one kid or one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoScope {
    Kid(RecordId),
    Album(RecordId),
}

impl VideoScope {
    pub fn filter(&self) -> (&'static str, String) {
        match self {
            VideoScope::Kid(id) => ("kid_id", id.to_string()),
            VideoScope::Album(id) => ("album_id", id.to_string()),
        }
    }
}
