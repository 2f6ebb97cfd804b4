use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Payload, Record, touched};
use crate::types::{RecordId, ResourceKind};

/// A developmental milestone such as a first word or first steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: RecordId,
    pub kid_id: RecordId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(alias = "date", alias = "achieved_date")]
    pub achieved_on: Date,
}

impl Record for Milestone {
    const KIND: ResourceKind = ResourceKind::Milestones;
    type Payload = MilestoneDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        [
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MilestoneDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_on: Option<Date>,
}

impl Payload for MilestoneDraft {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!(
            "kid_id" => self.kid_id,
            "title" => self.title,
            "description" => self.description,
            "category" => self.category,
            "achieved_on" => self.achieved_on,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestone_date_alias() {
        let milestone: Milestone = serde_json::from_str(
            r#"{"id": 4, "kid_id": 2, "title": "First word", "category": "language", "date": "2025-03-09"}"#,
        )
        .unwrap();
        assert_eq!(milestone.achieved_on, jiff::civil::date(2025, 3, 9));
        assert_eq!(milestone.search_fields(), vec!["First word", "language"]);
    }
}
