use std::fmt;
use std::str::FromStr;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::{Payload, Record, touched};
use crate::error::{KeepsakeError, Result};
use crate::media::MediaResolver;
use crate::types::{RecordId, ResourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

impl FromStr for Gender {
    type Err = KeepsakeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "boy" => Ok(Gender::Male),
            "female" | "girl" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(KeepsakeError::Other(format!("unknown gender '{s}'"))),
        }
    }
}

/// One height/weight measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEntry {
    pub date: Date,
    #[serde(default, alias = "height", skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, alias = "weight", skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kid {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, alias = "growth_data", skip_serializing_if = "Vec::is_empty")]
    pub growth: Vec<GrowthEntry>,
}

impl Kid {
    /// Most recent measurement, by date.
    pub fn latest_growth(&self) -> Option<&GrowthEntry> {
        self.growth.iter().max_by_key(|entry| entry.date)
    }

    /// Age in whole months on `today`, if the birth date is known.
    pub fn age_in_months(&self, today: Date) -> Option<i32> {
        let birth = self.birth_date?;
        if birth > today {
            return None;
        }
        let mut months = (i32::from(today.year()) - i32::from(birth.year())) * 12
            + (i32::from(today.month()) - i32::from(birth.month()));
        if today.day() < birth.day() {
            months -= 1;
        }
        Some(months.max(0))
    }
}

impl Record for Kid {
    const KIND: ResourceKind = ResourceKind::Kids;
    type Payload = KidDraft;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn resolve_media(&mut self, media: &MediaResolver) {
        media.resolve_opt(&mut self.avatar_url);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KidDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

impl Payload for KidDraft {
    fn touched_fields(&self) -> Vec<&'static str> {
        touched!(
            "name" => self.name,
            "birth_date" => self.birth_date,
            "gender" => self.gender,
        )
    }
}
