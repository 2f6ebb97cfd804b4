//! Local reconciliation of a loaded page after a successful mutation.
//!
//! When a write cannot change which records belong on the visible page, the
//! page is patched in place and no request is made. Otherwise the caller gets
//! told to refetch.

use crate::gateway::{MutationIntent, MutationOutcome};
use crate::model::{Payload, Record};
use crate::query::{QuerySpec, ResourcePage, SortSpec};
use crate::types::RecordId;

/// Whether `intent` can change which records belong on the visible page.
///
/// Creates do whenever a server-side sort decides where the new record lands.
/// Updates do when they touch the sort field. Deletes always do: removing a
/// record pulls the first record of the next page forward.
pub fn affects_page_membership<P: Payload>(
    intent: &MutationIntent<P>,
    sort: Option<&SortSpec>,
) -> bool {
    match intent {
        MutationIntent::Create(_) => sort.is_some(),
        MutationIntent::Update(_, payload) => {
            sort.is_some_and(|sort| payload.touched_fields().contains(&sort.field.as_str()))
        }
        MutationIntent::Delete(_) => true,
    }
}

/// What the controller has to do after patching the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Patch {
    /// The page is up to date.
    Done,
    /// The page was patched but needs an authoritative resync.
    Resync,
    /// The page could not be patched; refetch it.
    Refetch,
}

/// Apply `outcome` to `page` in place.
pub(crate) fn patch_page<R: Record>(
    page: &mut ResourcePage<R>,
    spec: &QuerySpec,
    intent: &MutationIntent<R::Payload>,
    outcome: MutationOutcome<R>,
) -> Patch {
    if touches_filters(intent, spec) || affects_page_membership(intent, spec.sort.as_ref()) {
        // Deletes are still removed right away so the row disappears before
        // the resync lands.
        if let MutationOutcome::Deleted(id) = &outcome {
            remove(page, id);
            return Patch::Resync;
        }
        return Patch::Refetch;
    }

    match (intent, outcome) {
        (MutationIntent::Create(_), MutationOutcome::Saved(record)) => {
            if page.is_last_page() && page.has_room() {
                page.items_mut().push(record);
            }
            page.adjust_total(1);
            Patch::Done
        }
        (MutationIntent::Update(..), MutationOutcome::Saved(record)) => {
            match page.items().iter().position(|r| r.id() == record.id()) {
                Some(index) => {
                    page.items_mut()[index] = record;
                    Patch::Done
                }
                None => Patch::Refetch,
            }
        }
        _ => Patch::Refetch,
    }
}

pub(crate) fn remove<R: Record>(page: &mut ResourcePage<R>, id: &RecordId) {
    page.items_mut().retain(|r| r.id() != id);
    page.adjust_total(-1);
}

/// Writes to an identifying filter field (e.g. moving a milestone to another
/// kid) can move the record out of the filtered list.
fn touches_filters<P: Payload>(intent: &MutationIntent<P>, spec: &QuerySpec) -> bool {
    intent.payload().is_some_and(|payload| {
        payload
            .touched_fields()
            .iter()
            .any(|field| spec.filters.contains_key(*field))
    })
}
