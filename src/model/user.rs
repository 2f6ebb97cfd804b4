use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Payload, Record};
use crate::error::{KeepsakeError, Result};
use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

/// Application-wide role of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    FamilyMember,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::FamilyMember => write!(f, "family_member"),
        }
    }
}

impl FromStr for Role {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "admin" => Ok(Role::Admin),
            "family_member" | "member" => Ok(Role::FamilyMember),
            _ => Err(KeepsakeError::Other(format!(
                "unknown role '{s}', expected 'admin' or 'family_member'"
            ))),
        }
    }
}

/// An account as seen by the admin back-office.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub email: String,
    #[serde(alias = "name", alias = "full_name", default)]
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for User {
    const KIND: ResourceKind = ResourceKind::Users;
    type Payload = UserRoleUpdate;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.display_name, &self.email]
    }

    fn resolve_media(&mut self, media: &MediaResolver) {
        media.resolve_opt(&mut self.avatar_url);
    }
}

/// The only user mutation the back-office performs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRoleUpdate {
    pub role: Role,
}

impl Payload for UserRoleUpdate {
    fn touched_fields(&self) -> Vec<&'static str> {
        vec!["role"]
    }
}

/// Lightweight account entry returned by the invitation lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: RecordId,
    pub email: String,
    #[serde(alias = "name", alias = "full_name", default)]
    pub display_name: String,
}
