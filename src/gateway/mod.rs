//! Remote resource gateway.
//!
//! The gateway is the only place that talks to the backend. It turns a
//! [`QuerySpec`] into a list request and a [`MutationIntent`] into a write,
//! and parses the responses into typed records. It never touches local list
//! state; reconciling is the list controller's job.

pub mod error;
mod extras;
pub mod http;

use std::future::Future;

use crate::error::{KeepsakeError, Result};
use crate::model::Record;
use crate::query::{QuerySpec, ResourcePage};
use crate::types::{RecordId, ResourceKind};

pub(crate) use extras::file_name;
pub use http::HttpGateway;

/// A write requested by a form or a list action.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationIntent<P> {
    Create(P),
    Update(RecordId, P),
    Delete(RecordId),
}

impl<P> MutationIntent<P> {
    pub fn operation(&self) -> &'static str {
        match self {
            MutationIntent::Create(_) => "create",
            MutationIntent::Update(..) => "update",
            MutationIntent::Delete(_) => "delete",
        }
    }

    /// Id of the record the intent targets; `None` for creates.
    pub fn target(&self) -> Option<&RecordId> {
        match self {
            MutationIntent::Create(_) => None,
            MutationIntent::Update(id, _) | MutationIntent::Delete(id) => Some(id),
        }
    }

    pub fn payload(&self) -> Option<&P> {
        match self {
            MutationIntent::Create(p) | MutationIntent::Update(_, p) => Some(p),
            MutationIntent::Delete(_) => None,
        }
    }
}

/// Result of an accepted mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<R> {
    /// The backend echoed the created or updated record.
    Saved(R),
    Deleted(RecordId),
    /// The write succeeded but the response carried no record.
    Accepted(Option<RecordId>),
}

/// Reject intents the resource does not accept before doing any I/O.
pub fn ensure_supported<P>(kind: ResourceKind, intent: &MutationIntent<P>) -> Result<()> {
    let caps = kind.capabilities();
    let allowed = match intent {
        MutationIntent::Create(_) => caps.create,
        MutationIntent::Update(..) => caps.update,
        MutationIntent::Delete(_) => caps.delete,
    };
    if allowed {
        Ok(())
    } else {
        Err(KeepsakeError::Unsupported {
            kind,
            operation: intent.operation(),
        })
    }
}

/// Typed access to the backend's list and mutation endpoints.
pub trait ResourceGateway: Send + Sync {
    /// Fetch one page. On failure no partial page is returned.
    fn fetch_page<R: Record>(
        &self,
        spec: &QuerySpec,
    ) -> impl Future<Output = Result<ResourcePage<R>>> + Send;

    /// Fetch a single record by id.
    fn fetch_one<R: Record>(&self, id: &RecordId) -> impl Future<Output = Result<R>> + Send;

    /// Apply a create, update or delete.
    fn mutate<R: Record>(
        &self,
        intent: MutationIntent<R::Payload>,
    ) -> impl Future<Output = Result<MutationOutcome<R>>> + Send;

    /// Every record matching the filters and sort of `spec`, whatever its
    /// page. The page size of `spec` is the size of each request.
    fn fetch_all<R: Record>(&self, spec: &QuerySpec) -> impl Future<Output = Result<Vec<R>>> + Send {
        collect_pages(self, spec)
    }
}

/// Walk the pages of `spec` from the first one until the last.
///
/// Without a total from the backend the walk ends at the first page that is
/// not full.
pub(crate) async fn collect_pages<G, R>(gateway: &G, spec: &QuerySpec) -> Result<Vec<R>>
where
    G: ResourceGateway + ?Sized,
    R: Record,
{
    let mut spec = spec.clone().with_page(0);
    let mut all = Vec::new();
    loop {
        let page = gateway.fetch_page::<R>(&spec).await?;
        let done = page.is_last_page() || page.items().is_empty();
        all.extend(page.into_items());
        if done {
            return Ok(all);
        }
        spec.page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_supported() {
        let create: MutationIntent<()> = MutationIntent::Create(());
        let delete: MutationIntent<()> = MutationIntent::Delete(RecordId::from("1"));

        assert!(ensure_supported(ResourceKind::Milestones, &create).is_ok());
        assert!(ensure_supported(ResourceKind::Users, &delete).is_ok());

        let err = ensure_supported(ResourceKind::Users, &create).unwrap_err();
        assert_eq!(err.to_string(), "users does not support create");

        let err = ensure_supported(ResourceKind::Albums, &delete).unwrap_err();
        assert_eq!(err.to_string(), "albums does not support delete");
    }

    #[test]
    fn test_intent_accessors() {
        let update = MutationIntent::Update(RecordId::from("4"), "payload");
        assert_eq!(update.operation(), "update");
        assert_eq!(update.target().map(RecordId::as_str), Some("4"));
        assert_eq!(update.payload(), Some(&"payload"));

        let create = MutationIntent::Create("p");
        assert!(create.target().is_none());
    }
}
