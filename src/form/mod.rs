//! Modal create/edit forms.
//!
//! A [`FormController`] holds one form at a time. It opens in create mode
//! with documented defaults or in edit mode seeded from a record, validates
//! synchronously before any request, and on success hands the outcome to the
//! owning [`ListController`] and closes. On failure it stays open so the user
//! can fix the input and resubmit.

mod extras;
mod records;
pub mod validation;

use std::fmt::Debug;

use jiff::civil::Date;

use crate::controller::ListController;
use crate::error::{FieldErrors, KeepsakeError, Result};
use crate::gateway::{MutationIntent, MutationOutcome, ResourceGateway};
use crate::model::Record;
use crate::types::RecordId;

pub use extras::{GrowthEntryForm, InviteForm, ShareForm};
pub use records::{AlbumForm, FamilyForm, KidForm, MilestoneForm, UserRoleForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

/// Field values of a form bound to a record type.
pub trait FormModel: Clone + Debug + PartialEq {
    type Record: Record;

    /// Values of a fresh create form.
    fn defaults(today: Date) -> Self;

    /// Values of an edit form for `record`.
    fn from_record(record: &Self::Record) -> Self;

    fn validate(&self, today: Date) -> FieldErrors;

    /// Body to send. With `initial` set (edit mode) only fields that differ
    /// from it are included.
    fn payload(&self, initial: Option<&Self>) -> <Self::Record as Record>::Payload;
}

/// Mutation a form of type `F` sends.
pub type Intent<F> = MutationIntent<<<F as FormModel>::Record as Record>::Payload>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved and closed. `refetched` tells whether the list went back to the
    /// server to reconcile.
    Saved { refetched: bool },
    /// Edit form submitted without changes; closed without a request.
    Unchanged,
    /// Local or backend validation failed; see the field errors.
    Invalid,
    /// The request failed for another reason; see the submit error.
    Failed,
}

#[derive(Debug, Clone)]
struct OpenForm<F> {
    mode: FormMode,
    initial: F,
    values: F,
    errors: FieldErrors,
    submit_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FormController<F: FormModel> {
    open: Option<OpenForm<F>>,
}

impl<F: FormModel> Default for FormController<F> {
    fn default() -> Self {
        Self { open: None }
    }
}

impl<F: FormModel> FormController<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_create(&mut self, today: Date) {
        let values = F::defaults(today);
        self.open = Some(OpenForm {
            mode: FormMode::Create,
            initial: values.clone(),
            values,
            errors: FieldErrors::new(),
            submit_error: None,
        });
    }

    pub fn open_edit(&mut self, record: &F::Record) {
        let values = F::from_record(record);
        self.open = Some(OpenForm {
            mode: FormMode::Edit(record.id().clone()),
            initial: values.clone(),
            values,
            errors: FieldErrors::new(),
            submit_error: None,
        });
    }

    /// Close and discard edits.
    pub fn cancel(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn mode(&self) -> Option<&FormMode> {
        self.open.as_ref().map(|f| &f.mode)
    }

    pub fn values(&self) -> Option<&F> {
        self.open.as_ref().map(|f| &f.values)
    }

    /// Change field values. Returns `false` when no form is open.
    pub fn edit(&mut self, change: impl FnOnce(&mut F)) -> bool {
        match self.open.as_mut() {
            Some(form) => {
                change(&mut form.values);
                true
            }
            None => false,
        }
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.open.as_ref().map(|f| &f.errors)
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.open.as_ref().and_then(|f| f.submit_error.as_deref())
    }

    /// Validate and build the intent without sending anything.
    ///
    /// Returns `None` for an unchanged edit form.
    pub fn prepare(
        &mut self,
        today: Date,
    ) -> Result<Option<Intent<F>>> {
        let form = self
            .open
            .as_mut()
            .ok_or_else(|| KeepsakeError::Other("no form is open".to_string()))?;

        form.submit_error = None;
        form.errors = form.values.validate(today);
        if !form.errors.is_empty() {
            return Err(KeepsakeError::Validation(form.errors.clone()));
        }

        Ok(match &form.mode {
            FormMode::Create => Some(MutationIntent::Create(form.values.payload(None))),
            FormMode::Edit(_) if form.values == form.initial => None,
            FormMode::Edit(id) => Some(MutationIntent::Update(
                id.clone(),
                form.values.payload(Some(&form.initial)),
            )),
        })
    }

    /// Validate and send the form without touching any list.
    ///
    /// The form closes on success and on an unchanged edit, which comes back
    /// as `Ok(None)`. A failed request stays recorded on the open form and
    /// is returned as well, with backend field errors merged into the local
    /// ones.
    pub async fn send<G: ResourceGateway>(
        &mut self,
        gateway: &G,
        today: Date,
    ) -> Result<Option<(Intent<F>, MutationOutcome<F::Record>)>> {
        let Some(intent) = self.prepare(today)? else {
            self.open = None;
            return Ok(None);
        };
        match gateway.mutate::<F::Record>(intent.clone()).await {
            Ok(outcome) => {
                self.open = None;
                Ok(Some((intent, outcome)))
            }
            Err(e) => {
                self.fail(e);
                Err(self.failure())
            }
        }
    }

    /// Validate, send and reconcile `list` with the result.
    pub async fn submit<G: ResourceGateway>(
        &mut self,
        gateway: &G,
        list: &mut ListController<F::Record>,
        today: Date,
    ) -> SubmitOutcome {
        match self.send(gateway, today).await {
            Ok(Some((intent, outcome))) => {
                let refetched = match list.reconcile(&intent, outcome) {
                    Some(ticket) => {
                        list.run(gateway, ticket).await;
                        true
                    }
                    None => false,
                };
                SubmitOutcome::Saved { refetched }
            }
            Ok(None) => SubmitOutcome::Unchanged,
            Err(KeepsakeError::Validation(_)) => SubmitOutcome::Invalid,
            Err(e) => {
                if !self.is_open() {
                    tracing::warn!("Form submit without an open form: {e}");
                }
                SubmitOutcome::Failed
            }
        }
    }

    /// Error describing what is recorded on the open form.
    fn failure(&self) -> KeepsakeError {
        match (self.errors(), self.submit_error()) {
            (Some(errors), _) if !errors.is_empty() => KeepsakeError::Validation(errors.clone()),
            (_, Some(message)) => KeepsakeError::Other(message.to_string()),
            _ => KeepsakeError::Other("request failed".to_string()),
        }
    }

    /// Record a failed request on the open form.
    pub fn fail(&mut self, error: KeepsakeError) -> SubmitOutcome {
        let Some(form) = self.open.as_mut() else {
            return SubmitOutcome::Failed;
        };
        match error {
            KeepsakeError::Validation(fields) => {
                form.errors.merge(fields);
                SubmitOutcome::Invalid
            }
            other => {
                form.submit_error = Some(other.to_string());
                SubmitOutcome::Failed
            }
        }
    }
}

/// Text payload field: trimmed; in create mode empty text is omitted, in edit
/// mode only a changed value is sent (an emptied field is sent as `""`).
pub(crate) fn text_field(value: &str, initial: Option<&str>) -> Option<String> {
    let value = value.trim();
    match initial {
        None if value.is_empty() => None,
        None => Some(value.to_string()),
        Some(initial) if initial.trim() == value => None,
        Some(_) => Some(value.to_string()),
    }
}

/// Non-text payload field: always sent on create, only when changed on edit.
pub(crate) fn changed<T: PartialEq + Clone>(value: &T, initial: Option<&T>) -> Option<T> {
    match initial {
        Some(initial) if initial == value => None,
        _ => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field() {
        assert_eq!(text_field("  Beach  ", None), Some("Beach".to_string()));
        assert_eq!(text_field("   ", None), None);
        assert_eq!(text_field("Beach", Some("Beach ")), None);
        assert_eq!(text_field("", Some("old")), Some(String::new()));
    }

    #[test]
    fn test_changed() {
        assert_eq!(changed(&3, None), Some(3));
        assert_eq!(changed(&3, Some(&3)), None);
        assert_eq!(changed(&Some(4), Some(&None)), Some(Some(4)));
    }
}
