use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Payload, Record, touched};
use crate::error::{KeepsakeError, Result};
use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

/// Who can see an album.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Private,
    Family,
    Public,
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privacy::Private => write!(f, "private"),
            Privacy::Family => write!(f, "family"),
            Privacy::Public => write!(f, "public"),
        }
    }
}

impl FromStr for Privacy {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "private" => Ok(Privacy::Private),
            "family" => Ok(Privacy::Family),
            "public" => Ok(Privacy::Public),
            _ => Err(KeepsakeError::Other(format!(
                "unknown privacy '{s}', expected private, family or public"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: RecordId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default, alias = "cover_image", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, alias = "photos_count", skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_token: Option<String>,
}

impl Album {
    pub fn is_shared(&self) -> bool {
        self.share_token.is_some()
    }
}

impl Record for Album {
    const KIND: ResourceKind = ResourceKind::Albums;
    type Payload = AlbumDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }

    fn resolve_media(&mut self, media: &MediaResolver) {
        media.resolve_opt(&mut self.cover_url);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlbumDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<Privacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
}

impl Payload for AlbumDraft {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!(
            "title" => self.title,
            "description" => self.description,
            "privacy" => self.privacy,
            "kid_id" => self.kid_id,
        )
    }
}

/// Parameters for publishing an album behind a share link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShareRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLink {
    #[serde(alias = "token")]
    pub share_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
