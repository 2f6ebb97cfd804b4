use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Payload, Record, touched};
use crate::error::{KeepsakeError, Result};
use crate::types::{RecordId, ResourceKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "members_count", skip_serializing_if = "Option::is_none")]
    pub member_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Record for Family {
    const KIND: ResourceKind = ResourceKind::Families;
    type Payload = FamilyDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(description) = &self.description {
            fields.push(description);
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FamilyDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Payload for FamilyDraft {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!("name" => self.name, "description" => self.description)
    }
}

/// Role of a member inside one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyRole {
    Admin,
    #[default]
    Member,
    Viewer,
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyRole::Admin => write!(f, "admin"),
            FamilyRole::Member => write!(f, "member"),
            FamilyRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for FamilyRole {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(FamilyRole::Admin),
            "member" => Ok(FamilyRole::Member),
            "viewer" => Ok(FamilyRole::Viewer),
            _ => Err(KeepsakeError::Other(format!(
                "unknown family role '{s}', expected admin, member or viewer"
            ))),
        }
    }
}

/// Request to add an existing account to a family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invitation {
    pub user_id: RecordId,
    pub role: FamilyRole,
    /// How the invitee relates to the kids, e.g. "grandmother".
    pub relationship: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_draft_serializes_only_set_fields() {
        let draft = FamilyDraft {
            name: Some("The Parks".to_string()),
            description: None,
        };
        assert_eq!(
            serde_json::to_string(&draft).unwrap(),
            r#"{"name":"The Parks"}"#
        );
        assert_eq!(draft.touched_fields(), vec!["name"]);
    }

    #[test]
    fn test_family_role_default_is_member() {
        assert_eq!(FamilyRole::default(), FamilyRole::Member);
        assert_eq!("Viewer".parse::<FamilyRole>().unwrap(), FamilyRole::Viewer);
    }
}
