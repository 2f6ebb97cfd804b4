//! Forms bound to list records.

use jiff::civil::Date;

use super::validation::{max_len, not_in_future, required, required_opt};
use super::{FormModel, changed, text_field};
use crate::error::FieldErrors;
use crate::model::{
    Album, AlbumDraft, Family, FamilyDraft, Gender, Kid, KidDraft, Milestone, MilestoneDraft,
    Privacy, Role, User, UserRoleUpdate,
};
use crate::types::RecordId;

const NAME_MAX: usize = 100;
const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 1000;
const CATEGORY_MAX: usize = 50;

/// Admin role assignment for an account.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRoleForm {
    pub role: Role,
}

impl FormModel for UserRoleForm {
    type Record = User;

    fn defaults(_today: Date) -> Self {
        Self {
            role: Role::default(),
        }
    }

    fn from_record(user: &User) -> Self {
        Self { role: user.role }
    }

    fn validate(&self, _today: Date) -> FieldErrors {
        FieldErrors::new()
    }

    fn payload(&self, _initial: Option<&Self>) -> UserRoleUpdate {
        UserRoleUpdate { role: self.role }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FamilyForm {
    pub name: String,
    pub description: String,
}

impl FormModel for FamilyForm {
    type Record = Family;

    fn defaults(_today: Date) -> Self {
        Self::default()
    }

    fn from_record(family: &Family) -> Self {
        Self {
            name: family.name.clone(),
            description: family.description.clone().unwrap_or_default(),
        }
    }

    fn validate(&self, _today: Date) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name);
        max_len(&mut errors, "name", &self.name, NAME_MAX);
        max_len(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        errors
    }

    fn payload(&self, initial: Option<&Self>) -> FamilyDraft {
        FamilyDraft {
            name: text_field(&self.name, initial.map(|i| i.name.as_str())),
            description: text_field(&self.description, initial.map(|i| i.description.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KidForm {
    pub name: String,
    pub birth_date: Option<Date>,
    pub gender: Option<Gender>,
}

impl FormModel for KidForm {
    type Record = Kid;

    fn defaults(_today: Date) -> Self {
        Self::default()
    }

    fn from_record(kid: &Kid) -> Self {
        Self {
            name: kid.name.clone(),
            birth_date: kid.birth_date,
            gender: kid.gender,
        }
    }

    fn validate(&self, today: Date) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "name", &self.name);
        max_len(&mut errors, "name", &self.name, NAME_MAX);
        required_opt(&mut errors, "birth_date", self.birth_date.as_ref());
        not_in_future(&mut errors, "birth_date", self.birth_date, today);
        errors
    }

    fn payload(&self, initial: Option<&Self>) -> KidDraft {
        KidDraft {
            name: text_field(&self.name, initial.map(|i| i.name.as_str())),
            birth_date: changed(&self.birth_date, initial.map(|i| &i.birth_date)).flatten(),
            gender: changed(&self.gender, initial.map(|i| &i.gender)).flatten(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlbumForm {
    pub title: String,
    pub description: String,
    pub privacy: Privacy,
    pub kid_id: Option<RecordId>,
}

impl FormModel for AlbumForm {
    type Record = Album;

    /// New albums start private.
    fn defaults(_today: Date) -> Self {
        Self {
            privacy: Privacy::Private,
            ..Self::default()
        }
    }

    fn from_record(album: &Album) -> Self {
        Self {
            title: album.title.clone(),
            description: album.description.clone().unwrap_or_default(),
            privacy: album.privacy,
            kid_id: album.kid_id.clone(),
        }
    }

    fn validate(&self, _today: Date) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required(&mut errors, "title", &self.title);
        max_len(&mut errors, "title", &self.title, TITLE_MAX);
        max_len(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        errors
    }

    fn payload(&self, initial: Option<&Self>) -> AlbumDraft {
        AlbumDraft {
            title: text_field(&self.title, initial.map(|i| i.title.as_str())),
            description: text_field(&self.description, initial.map(|i| i.description.as_str())),
            privacy: changed(&self.privacy, initial.map(|i| &i.privacy)),
            kid_id: changed(&self.kid_id, initial.map(|i| &i.kid_id)).flatten(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MilestoneForm {
    pub kid_id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub achieved_on: Option<Date>,
}

impl FormModel for MilestoneForm {
    type Record = Milestone;

    /// Milestones default to having happened today.
    fn defaults(today: Date) -> Self {
        Self {
            achieved_on: Some(today),
            ..Self::default()
        }
    }

    fn from_record(milestone: &Milestone) -> Self {
        Self {
            kid_id: Some(milestone.kid_id.clone()),
            title: milestone.title.clone(),
            description: milestone.description.clone().unwrap_or_default(),
            category: milestone.category.clone().unwrap_or_default(),
            achieved_on: Some(milestone.achieved_on),
        }
    }

    fn validate(&self, today: Date) -> FieldErrors {
        let mut errors = FieldErrors::new();
        required_opt(&mut errors, "kid_id", self.kid_id.as_ref());
        required(&mut errors, "title", &self.title);
        max_len(&mut errors, "title", &self.title, TITLE_MAX);
        max_len(&mut errors, "description", &self.description, DESCRIPTION_MAX);
        max_len(&mut errors, "category", &self.category, CATEGORY_MAX);
        required_opt(&mut errors, "achieved_on", self.achieved_on.as_ref());
        not_in_future(&mut errors, "achieved_on", self.achieved_on, today);
        errors
    }

    fn payload(&self, initial: Option<&Self>) -> MilestoneDraft {
        MilestoneDraft {
            kid_id: changed(&self.kid_id, initial.map(|i| &i.kid_id)).flatten(),
            title: text_field(&self.title, initial.map(|i| i.title.as_str())),
            description: text_field(&self.description, initial.map(|i| i.description.as_str())),
            category: text_field(&self.category, initial.map(|i| i.category.as_str())),
            achieved_on: changed(&self.achieved_on, initial.map(|i| &i.achieved_on)).flatten(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KeepsakeError;
    use crate::form::{FormController, FormMode};
    use crate::gateway::MutationIntent;
    use crate::model::Payload;
    use jiff::civil::date;

    fn today() -> Date {
        date(2026, 10, 16)
    }

    fn milestone() -> Milestone {
        Milestone {
            id: RecordId::from("m1"),
            kid_id: RecordId::from("k1"),
            title: "First steps".to_string(),
            description: None,
            category: Some("motor".to_string()),
            achieved_on: date(2026, 3, 2),
        }
    }

    #[test]
    fn test_create_defaults() {
        assert_eq!(AlbumForm::defaults(today()).privacy, Privacy::Private);
        assert_eq!(MilestoneForm::defaults(today()).achieved_on, Some(today()));
        assert_eq!(UserRoleForm::defaults(today()).role, Role::FamilyMember);
    }

    #[test]
    fn test_kid_validation() {
        let form = KidForm {
            name: " ".to_string(),
            birth_date: Some(date(2027, 1, 1)),
            gender: None,
        };
        let errors = form.validate(today());
        assert_eq!(errors.get("name"), Some("is required"));
        assert_eq!(errors.get("birth_date"), Some("cannot be in the future"));

        let form = KidForm {
            name: "x".repeat(101),
            ..KidForm::default()
        };
        let errors = form.validate(today());
        assert_eq!(errors.get("name"), Some("must be at most 100 characters"));
        assert_eq!(errors.get("birth_date"), Some("is required"));
    }

    #[test]
    fn test_milestone_edit_sends_only_changes() {
        let initial = MilestoneForm::from_record(&milestone());
        let mut edited = initial.clone();
        edited.title = "First run".to_string();

        let payload = edited.payload(Some(&initial));
        assert_eq!(payload.touched_fields(), vec!["title"]);
        assert_eq!(payload.title.as_deref(), Some("First run"));
    }

    #[test]
    fn test_form_controller_create_flow() {
        let mut form = FormController::<MilestoneForm>::new();
        form.open_create(today());
        assert_eq!(form.mode(), Some(&FormMode::Create));

        let err = form.prepare(today()).unwrap_err();
        assert!(matches!(err, KeepsakeError::Validation(_)));
        assert_eq!(form.errors().unwrap().get("title"), Some("is required"));
        assert!(form.is_open());

        form.edit(|v| {
            v.kid_id = Some(RecordId::from("k1"));
            v.title = "Said 'mama'".to_string();
        });
        let intent = form.prepare(today()).unwrap().unwrap();
        let MutationIntent::Create(draft) = intent else {
            panic!("expected a create intent");
        };
        assert_eq!(draft.achieved_on, Some(today()));
        assert!(form.errors().unwrap().is_empty());
    }

    #[test]
    fn test_unchanged_edit_has_no_intent() {
        let mut form = FormController::<MilestoneForm>::new();
        form.open_edit(&milestone());
        assert_eq!(form.mode(), Some(&FormMode::Edit(RecordId::from("m1"))));
        assert!(form.prepare(today()).unwrap().is_none());
    }

    #[test]
    fn test_backend_errors_keep_form_open() {
        let mut form = FormController::<FamilyForm>::new();
        form.open_create(today());
        form.edit(|v| v.name = "The Parks".to_string());

        let mut fields = FieldErrors::new();
        fields.add("name", "already taken");
        form.fail(KeepsakeError::Validation(fields));
        assert!(form.is_open());
        assert_eq!(form.errors().unwrap().get("name"), Some("already taken"));

        form.fail(KeepsakeError::Network("timed out".to_string()));
        assert_eq!(form.submit_error(), Some("network error: timed out"));
        assert_eq!(form.values().unwrap().name, "The Parks");

        form.cancel();
        assert!(!form.is_open());
    }
}
