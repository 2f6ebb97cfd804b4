//! Forms for calls outside the generic create/update path.

use jiff::civil::Date;

use super::validation::{
    in_range, in_range_u32, max_len, min_len, not_in_future, required, required_opt,
};
use crate::error::{FieldErrors, KeepsakeError, Result};
use crate::gateway::error::FORM_FIELD;
use crate::model::{FamilyRole, GrowthEntry, Invitation, ShareRequest, UserSummary};

/// New height/weight measurement for a kid.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthEntryForm {
    pub date: Option<Date>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

impl GrowthEntryForm {
    pub fn new(today: Date) -> Self {
        Self {
            date: Some(today),
            height_cm: None,
            weight_kg: None,
        }
    }

    pub fn validate(&self, today: Date) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required_opt(&mut errors, "date", self.date.as_ref());
        not_in_future(&mut errors, "date", self.date, today);
        if self.height_cm.is_none() && self.weight_kg.is_none() {
            errors.add(FORM_FIELD, "enter a height or a weight");
        }
        in_range(&mut errors, "height_cm", self.height_cm, 20.0, 250.0);
        in_range(&mut errors, "weight_kg", self.weight_kg, 0.5, 200.0);
        errors
    }

    pub fn build(&self, today: Date) -> Result<GrowthEntry> {
        self.validate(today).into_result()?;
        Ok(GrowthEntry {
            date: self.date.unwrap_or(today),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
        })
    }
}

/// Invitation of an existing account into a family.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InviteForm {
    /// Picked from the debounced user lookup.
    pub user: Option<UserSummary>,
    pub role: FamilyRole,
    pub relationship: String,
}

impl InviteForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required_opt(&mut errors, "user", self.user.as_ref());
        required(&mut errors, "relationship", &self.relationship);
        max_len(&mut errors, "relationship", &self.relationship, 50);
        errors
    }

    pub fn build(&self) -> Result<Invitation> {
        self.validate().into_result()?;
        let user = self
            .user
            .as_ref()
            .ok_or_else(|| KeepsakeError::Other("no user selected".to_string()))?;
        Ok(Invitation {
            user_id: user.id.clone(),
            role: self.role,
            relationship: self.relationship.trim().to_string(),
        })
    }
}

/// Publishing an album behind a share link.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShareForm {
    pub password: String,
    pub expires_in_days: Option<u32>,
}

impl ShareForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !self.password.is_empty() {
            min_len(&mut errors, "password", &self.password, 4);
        }
        in_range_u32(&mut errors, "expires_in_days", self.expires_in_days, 1, 365);
        errors
    }

    pub fn build(&self) -> Result<ShareRequest> {
        self.validate().into_result()?;
        Ok(ShareRequest {
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            expires_in_days: self.expires_in_days,
        })
    }
}
