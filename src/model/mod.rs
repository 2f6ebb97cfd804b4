//! Domain records served by the backend.
//!
//! Every list-bearing resource implements [`Record`], which is all the list
//! and form controllers need to know about it: a stable id, the text fields a
//! search box narrows over, and the payload type its create/update calls send.

pub mod album;
pub mod family;
pub mod kid;
pub mod milestone;
pub mod photo;
pub mod stats;
pub mod user;
pub mod video;

use std::fmt::Debug;

use jiff::civil::Date;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

pub use album::{Album, AlbumDraft, Privacy, ShareLink, ShareRequest};
pub use family::{Family, FamilyDraft, FamilyRole, Invitation};
pub use kid::{Gender, GrowthEntry, Kid, KidDraft};
pub use milestone::{Milestone, MilestoneDraft};
pub use photo::{Photo, PhotoMetadata};
pub use stats::AdminStats;
pub use user::{Role, User, UserRoleUpdate, UserSummary};
pub use video::{Video, VideoMetadata, VideoScope};

/// A backend-owned record that can appear in a list view.
pub trait Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection this record belongs to.
    const KIND: ResourceKind;

    /// Body sent by create and update calls.
    type Payload: Payload;

    fn id(&self) -> &RecordId;

    /// Text fields matched by the client-side search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Rewrite relative media paths into absolute URLs.
    fn resolve_media(&mut self, _media: &MediaResolver) {}
}

/// Create/update body for a [`Record`].
///
/// Payloads are partial: fields left as `None` are not sent, which is how an
/// edit form submits only what the user actually changed.
pub trait Payload: Serialize + Clone + Debug + Send + Sync + 'static {
    /// Names of the fields this payload sets.
    fn touched_fields(&self) -> Vec<&'static str>;
}

/// Calendar day of an ISO 8601 date or timestamp (`2024-05-01T10:00:00Z`).
pub fn day_of(timestamp: &str) -> Option<Date> {
    timestamp.get(..10)?.parse().ok()
}

/// Collect the names of the `Some` fields of a payload.
macro_rules! touched {
    ($($field:literal => $value:expr),* $(,)?) => {{
        let mut fields = Vec::new();
        $(
            if $value.is_some() {
                fields.push($field);
            }
        )*
        fields
    }};
}
pub(crate) use touched;
