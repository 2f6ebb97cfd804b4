use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{KeepsakeError, Result};

/// Directory holding the client's local state (relative to the working directory).
pub const KEEPSAKE_DIR: &str = ".keepsake";

/// Page sizes offered by table-style views.
pub const TABLE_PAGE_SIZES: &[u32] = &[10, 20, 100];

/// Page sizes offered by grid/card views.
pub const GRID_PAGE_SIZES: &[u32] = &[12, 24, 48];

/// Stable identifier of a backend record.
///
/// The backend hands out numeric ids for some resources and string ids for
/// others; both are normalized to their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId(n.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecordId(s),
            Raw::Int(n) => RecordId(n.to_string()),
        })
    }
}

/// Endpoint path relative to the API base, held as separate segments.
///
/// Record ids are pushed as single segments and percent-encoded when the URL
/// is built, so an id can never reach a different endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath(Vec<String>);

impl ApiPath {
    pub fn new(path: &str) -> Self {
        ApiPath(
            path.split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn id(mut self, id: &RecordId) -> Self {
        self.0.push(id.as_str().to_string());
        self
    }

    pub fn then(mut self, segment: &str) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for ApiPath {
    fn from(path: &str) -> Self {
        ApiPath::new(path)
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// Backend-managed collections the client can list and mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Users,
    Families,
    Kids,
    Albums,
    Photos,
    Videos,
    Milestones,
}

/// How a resource's list endpoint is paginated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// `page` (1-based) and `limit` query parameters.
    Paged,
    /// `limit` and `offset` query parameters.
    Offset,
    /// The endpoint returns the whole collection.
    Full,
}

/// Operations a resource accepts through the generic mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub list: ListMode,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Users,
        ResourceKind::Families,
        ResourceKind::Kids,
        ResourceKind::Albums,
        ResourceKind::Photos,
        ResourceKind::Videos,
        ResourceKind::Milestones,
    ];

    /// Collection path relative to the API base.
    pub fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::Users => "admin/users",
            ResourceKind::Families => "admin/families",
            ResourceKind::Kids => "kids",
            ResourceKind::Albums => "albums",
            ResourceKind::Photos => "photos",
            ResourceKind::Videos => "videos",
            ResourceKind::Milestones => "milestones",
        }
    }

    /// Path for the create endpoint, which differs from the list path for
    /// families (admins list them, members create them).
    pub fn create_path(self) -> &'static str {
        match self {
            ResourceKind::Families => "families",
            other => other.collection_path(),
        }
    }

    /// Path for a single record's update endpoint.
    pub fn update_path(self, id: &RecordId) -> ApiPath {
        match self {
            ResourceKind::Users => self.item_path(id).then("role"),
            other => other.item_path(id),
        }
    }

    pub fn item_path(self, id: &RecordId) -> ApiPath {
        ApiPath::new(self.collection_path()).id(id)
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            ResourceKind::Users => Capabilities {
                list: ListMode::Paged,
                create: false,
                update: true,
                delete: true,
            },
            ResourceKind::Families => Capabilities {
                list: ListMode::Paged,
                create: true,
                update: false,
                delete: false,
            },
            ResourceKind::Kids | ResourceKind::Albums => Capabilities {
                list: ListMode::Full,
                create: true,
                update: true,
                delete: false,
            },
            // Photo and video creation goes through multipart upload.
            ResourceKind::Photos => Capabilities {
                list: ListMode::Offset,
                create: false,
                update: false,
                delete: false,
            },
            ResourceKind::Videos => Capabilities {
                list: ListMode::Full,
                create: false,
                update: false,
                delete: true,
            },
            ResourceKind::Milestones => Capabilities {
                list: ListMode::Full,
                create: true,
                update: true,
                delete: true,
            },
        }
    }

    pub fn allowed_page_sizes(self) -> &'static [u32] {
        match self {
            ResourceKind::Users | ResourceKind::Families | ResourceKind::Milestones => {
                TABLE_PAGE_SIZES
            }
            ResourceKind::Kids
            | ResourceKind::Albums
            | ResourceKind::Photos
            | ResourceKind::Videos => GRID_PAGE_SIZES,
        }
    }

    pub fn default_page_size(self) -> u32 {
        // Middle entry of each set.
        self.allowed_page_sizes()[1]
    }

    /// Singular noun for messages.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::Users => "user",
            ResourceKind::Families => "family",
            ResourceKind::Kids => "kid",
            ResourceKind::Albums => "album",
            ResourceKind::Photos => "photo",
            ResourceKind::Videos => "video",
            ResourceKind::Milestones => "milestone",
        }
    }

    pub fn validate_page_size(self, size: u32) -> Result<()> {
        let allowed = self.allowed_page_sizes();
        if allowed.contains(&size) {
            return Ok(());
        }
        Err(KeepsakeError::InvalidPageSize {
            kind: self,
            size,
            allowed: allowed
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Users => "users",
            ResourceKind::Families => "families",
            ResourceKind::Kids => "kids",
            ResourceKind::Albums => "albums",
            ResourceKind::Photos => "photos",
            ResourceKind::Videos => "videos",
            ResourceKind::Milestones => "milestones",
        };
        f.write_str(s)
    }
}

impl FromStr for ResourceKind {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.to_string() == lower || k.singular() == lower)
            .ok_or_else(|| KeepsakeError::Other(format!("unknown resource '{s}'")))
    }
}
