//! List controller: the state behind one resource list view.
//!
//! The controller follows a reducer shape. Every user action is a synchronous
//! method that updates state and, when data is needed, hands back a
//! [`FetchTicket`]. The caller performs the request and feeds the result to
//! [`ListController::complete_fetch`]. Only the most recently issued ticket
//! can commit; results of older tickets are dropped, so a slow response for a
//! page the user already left never overwrites the page they are looking at.
//!
//! [`ListController::run`] and friends wrap that cycle for callers that simply
//! await the gateway.

mod reconcile;

use crate::error::{ErrorKind, KeepsakeError, Result};
use crate::filter::{ClientFilter, FilteredRecord};
use crate::gateway::{MutationIntent, MutationOutcome, ResourceGateway};
use crate::model::Record;
use crate::query::{QuerySpec, QueryState, ResourcePage, SortSpec};
use crate::types::RecordId;

pub use reconcile::affects_page_membership;
use reconcile::{Patch, patch_page, remove};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Dismissible error shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: ErrorKind,
    pub message: String,
}

impl Banner {
    pub fn from_error(error: &KeepsakeError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn requires_login(&self) -> bool {
        self.kind == ErrorKind::Auth
    }
}

/// Permission to perform one list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    spec: QuerySpec,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The query to send.
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }
}

/// What happened to a fetch result handed to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCommit {
    /// The page is now visible.
    Applied,
    /// The error is now shown; the previous page stays visible.
    Failed,
    /// A newer request was issued meanwhile; the result was dropped.
    Superseded,
    /// The result was applied but another request is needed.
    Refetch(FetchTicket),
}

#[derive(Debug, Clone)]
pub struct ListController<R: Record> {
    query: QueryState,
    page: ResourcePage<R>,
    status: ListStatus,
    banner: Option<Banner>,
    generation: u64,
    in_flight: bool,
}

impl<R: Record> Default for ListController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> ListController<R> {
    pub fn new() -> Self {
        Self::with_query(QueryState::new(R::KIND))
    }

    pub fn with_query(query: QueryState) -> Self {
        let page = ResourcePage::empty(query.page_size());
        Self {
            query,
            page,
            status: ListStatus::Idle,
            banner: None,
            generation: 0,
            in_flight: false,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn status(&self) -> ListStatus {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Last committed page.
    pub fn page(&self) -> &ResourcePage<R> {
        &self.page
    }

    /// Reported total, or a lower bound when the backend reports none.
    pub fn total_count(&self) -> u64 {
        self.page.total_count()
    }

    pub fn known_total(&self) -> Option<u64> {
        self.page.total()
    }

    /// Records of the loaded page that pass the search box.
    pub fn visible(&self) -> Vec<FilteredRecord<'_, R>> {
        ClientFilter::new(self.query.search_text()).apply(self.page.items())
    }

    pub fn visible_items(&self) -> Vec<&R> {
        self.visible().into_iter().map(|f| f.record).collect()
    }

    pub fn find(&self, id: &RecordId) -> Option<&R> {
        self.page.items().iter().find(|r| r.id() == id)
    }

    /// Initial load when the view opens.
    pub fn mount(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Issue a ticket for the current query, invalidating older ones.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.in_flight = true;
        self.status = ListStatus::Loading;
        FetchTicket {
            generation: self.generation,
            spec: self.query.spec().clone(),
        }
    }

    /// Retry after a failure. Clears the banner.
    pub fn retry(&mut self) -> FetchTicket {
        self.banner = None;
        self.begin_fetch()
    }

    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ResourcePage<R>>,
    ) -> FetchCommit {
        if ticket.generation != self.generation {
            tracing::debug!(
                "dropping {} page {} (generation {} superseded by {})",
                R::KIND,
                ticket.spec.page,
                ticket.generation,
                self.generation
            );
            return FetchCommit::Superseded;
        }
        self.in_flight = false;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to load {}: {e}", R::KIND);
                self.banner = Some(Banner::from_error(&e));
                self.status = ListStatus::Failed;
                return FetchCommit::Failed;
            }
        };

        self.query.record_total(page.total());

        // The collection shrank under us: step back to the last page that
        // still exists and ask again.
        if page.items().is_empty() && page.page() > 0 {
            let back = match page.total() {
                Some(0) => None,
                Some(_) => Some(page.page()),
                None => Some(page.page() - 1),
            };
            if back.is_some_and(|n| self.query.set_page(n)) {
                return FetchCommit::Refetch(self.begin_fetch());
            }
        }

        self.page = page;
        self.status = ListStatus::Ready;
        self.banner = None;
        FetchCommit::Applied
    }

    pub fn set_page(&mut self, n: u32) -> Option<FetchTicket> {
        self.query.set_page(n).then(|| self.begin_fetch())
    }

    /// Without a reported total the end is known only once a short page
    /// has been seen.
    pub fn next_page(&mut self) -> Option<FetchTicket> {
        let at_short_end = self.page.total().is_none()
            && self.page.page() == self.query.page()
            && self.page.is_last_page();
        if at_short_end {
            return None;
        }
        self.set_page(self.query.page().saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.set_page(self.query.page().saturating_sub(1))
    }

    pub fn set_page_size(&mut self, size: u32) -> Result<Option<FetchTicket>> {
        Ok(self.query.set_page_size(size)?.then(|| self.begin_fetch()))
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) -> Option<FetchTicket> {
        self.query.set_sort(sort).then(|| self.begin_fetch())
    }

    pub fn set_filter(&mut self, key: &str, value: Option<String>) -> Option<FetchTicket> {
        self.query.set_filter(key, value).then(|| self.begin_fetch())
    }

    /// Update the search box. Narrowing happens over the loaded page only, so
    /// this never fetches.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.set_search(text);
    }

    /// Bring the list in line with a successful mutation.
    ///
    /// Returns a ticket when the page has to be (re)fetched. A mutation that
    /// lands while a fetch is in flight always refetches, since the pending
    /// result may predate the write. A delete still drops its row from the
    /// visible page right away.
    pub fn reconcile(
        &mut self,
        intent: &MutationIntent<R::Payload>,
        outcome: MutationOutcome<R>,
    ) -> Option<FetchTicket> {
        if self.in_flight {
            if let MutationOutcome::Deleted(id) = &outcome {
                remove(&mut self.page, id);
                self.query.record_total(self.page.total());
            }
            return Some(self.begin_fetch());
        }

        match patch_page(&mut self.page, self.query.spec(), intent, outcome) {
            Patch::Done => {
                self.query.record_total(self.page.total());
                None
            }
            Patch::Resync => {
                self.query.record_total(self.page.total());
                Some(self.begin_fetch())
            }
            Patch::Refetch => Some(self.begin_fetch()),
        }
    }

    /// Perform `ticket` and any follow-up fetches it leads to.
    pub async fn run<G: ResourceGateway>(
        &mut self,
        gateway: &G,
        mut ticket: FetchTicket,
    ) -> FetchCommit {
        loop {
            let result = gateway.fetch_page::<R>(ticket.spec()).await;
            match self.complete_fetch(ticket, result) {
                FetchCommit::Refetch(next) => ticket = next,
                commit => return commit,
            }
        }
    }

    pub async fn load<G: ResourceGateway>(&mut self, gateway: &G) -> FetchCommit {
        let ticket = self.mount();
        self.run(gateway, ticket).await
    }

    pub async fn refresh<G: ResourceGateway>(&mut self, gateway: &G) -> FetchCommit {
        let ticket = self.begin_fetch();
        self.run(gateway, ticket).await
    }

    /// Send `intent` and reconcile the list with its outcome.
    ///
    /// On failure the list, its banner included, is left untouched and the
    /// error goes back to the caller. The banner belongs to list loading.
    pub async fn apply<G: ResourceGateway>(
        &mut self,
        gateway: &G,
        intent: MutationIntent<R::Payload>,
    ) -> Result<MutationOutcome<R>> {
        let outcome = gateway.mutate::<R>(intent.clone()).await?;
        if let Some(ticket) = self.reconcile(&intent, outcome.clone()) {
            self.run(gateway, ticket).await;
        }
        Ok(outcome)
    }

    pub async fn delete<G: ResourceGateway>(&mut self, gateway: &G, id: RecordId) -> Result<()> {
        self.apply(gateway, MutationIntent::Delete(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User, UserRoleUpdate};
    use crate::types::ResourceKind;

    fn user(id: u64, name: &str) -> User {
        User {
            id: RecordId::from(id),
            email: format!("{}@example.com", name.to_lowercase()),
            display_name: name.to_string(),
            role: Role::FamilyMember,
            avatar_url: None,
            created_at: None,
        }
    }

    fn users(range: std::ops::RangeInclusive<u64>) -> Vec<User> {
        range.map(|i| user(i, &format!("User{i}"))).collect()
    }

    fn page_of(items: Vec<User>, total: u64, page: u32) -> Result<ResourcePage<User>> {
        ResourcePage::new(items, total, page, 20)
    }

    #[test]
    fn test_mount_and_commit() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        assert_eq!(list.status(), ListStatus::Loading);
        assert_eq!(ticket.spec().page, 0);

        let commit = list.complete_fetch(ticket, page_of(users(1..=20), 45, 0));
        assert_eq!(commit, FetchCommit::Applied);
        assert_eq!(list.status(), ListStatus::Ready);
        assert_eq!(list.total_count(), 45);
        assert_eq!(list.query().page_count(), Some(3));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut list = ListController::<User>::new();
        let first = list.mount();
        list.complete_fetch(first, page_of(users(1..=20), 60, 0));

        let to_page_two = list.set_page(1).unwrap();
        let to_page_three = list.set_page(2).unwrap();

        let commit = list.complete_fetch(to_page_three, page_of(users(41..=60), 60, 2));
        assert_eq!(commit, FetchCommit::Applied);

        let commit = list.complete_fetch(to_page_two, page_of(users(21..=40), 60, 1));
        assert_eq!(commit, FetchCommit::Superseded);
        assert_eq!(list.page().page(), 2);
        assert_eq!(list.page().items()[0].display_name, "User41");
    }

    #[test]
    fn test_empty_page_steps_back() {
        let mut list = ListController::<User>::new();
        let first = list.mount();
        list.complete_fetch(first, page_of(users(1..=20), 60, 0));

        let ticket = list.set_page(2).unwrap();
        // Someone else deleted records; only 30 remain.
        let commit = list.complete_fetch(ticket, page_of(vec![], 30, 2));
        let FetchCommit::Refetch(retry) = commit else {
            panic!("expected a refetch, got {commit:?}");
        };
        assert_eq!(retry.spec().page, 1);
        assert_eq!(list.query().page(), 1);

        let commit = list.complete_fetch(retry, page_of(users(21..=30), 30, 1));
        assert_eq!(commit, FetchCommit::Applied);
        assert_eq!(list.page().items().len(), 10);
    }

    #[test]
    fn test_empty_first_page_is_applied() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        let commit = list.complete_fetch(ticket, page_of(vec![], 0, 0));
        assert_eq!(commit, FetchCommit::Applied);
        assert!(list.visible_items().is_empty());
    }

    #[test]
    fn test_failure_keeps_previous_page() {
        let mut list = ListController::<User>::new();
        let first = list.mount();
        list.complete_fetch(first, page_of(users(1..=20), 40, 0));

        let ticket = list.set_page(1).unwrap();
        let commit = list.complete_fetch(
            ticket,
            Err(KeepsakeError::Network("connection refused".to_string())),
        );
        assert_eq!(commit, FetchCommit::Failed);
        assert_eq!(list.status(), ListStatus::Failed);
        assert_eq!(list.page().items().len(), 20);
        let banner = list.banner().unwrap();
        assert_eq!(banner.kind, ErrorKind::Network);

        let retry = list.retry();
        assert!(list.banner().is_none());
        assert_eq!(retry.spec().page, 1);
    }

    #[test]
    fn test_search_never_fetches_and_filters_page() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(
            ticket,
            page_of(vec![user(1, "Anna"), user(2, "Bob"), user(3, "Anthony")], 3, 0),
        );
        list.set_search("an");
        assert!(!list.is_loading());
        assert_eq!(list.status(), ListStatus::Ready);

        let names: Vec<_> = list
            .visible_items()
            .iter()
            .map(|u| u.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Anna", "Anthony"]);
        assert_eq!(list.total_count(), 3);
        assert_eq!(list.query().page(), 0);

        let found = list.visible();
        assert_eq!(found[0].matched_field, Some(0));
    }

    #[test]
    fn test_same_page_is_noop() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, page_of(users(1..=20), 45, 0));
        assert!(list.set_page(0).is_none());
        assert!(list.prev_page().is_none());
        assert!(list.next_page().is_some());
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, page_of(users(1..=20), 45, 0));
        list.set_page(2);

        let ticket = list.set_page_size(100).unwrap().unwrap();
        assert_eq!(ticket.spec().page, 0);
        assert_eq!(ticket.spec().page_size, 100);

        let err = list.set_page_size(24).unwrap_err();
        assert!(matches!(err, KeepsakeError::InvalidPageSize { size: 24, .. }));
    }

    #[test]
    fn test_reconcile_role_update_in_place() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, page_of(vec![user(1, "Anna"), user(2, "Bob")], 2, 0));

        let intent = MutationIntent::Update(RecordId::from("2"), UserRoleUpdate { role: Role::Admin });
        let mut updated = user(2, "Bob");
        updated.role = Role::Admin;

        assert!(list.reconcile(&intent, MutationOutcome::Saved(updated)).is_none());
        assert_eq!(list.page().items()[1].role, Role::Admin);
        assert_eq!(list.status(), ListStatus::Ready);
    }

    #[test]
    fn test_reconcile_delete_resyncs() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, page_of(users(1..=20), 21, 0));

        let intent: MutationIntent<UserRoleUpdate> = MutationIntent::Delete(RecordId::from("5"));
        let resync = list.reconcile(&intent, MutationOutcome::Deleted(RecordId::from("5")));
        assert!(resync.is_some());
        assert_eq!(list.page().items().len(), 19);
        assert_eq!(list.total_count(), 20);
        assert_eq!(list.query().total_count(), Some(20));
        assert!(list.find(&RecordId::from("5")).is_none());
    }

    #[test]
    fn test_reconcile_during_fetch_refetches() {
        let mut list = ListController::<User>::new();
        let first = list.mount();
        list.complete_fetch(first, page_of(vec![user(1, "Anna")], 1, 0));

        let pending = list.set_page_size(10).unwrap().unwrap();
        let intent = MutationIntent::Update(RecordId::from("1"), UserRoleUpdate { role: Role::Admin });
        let refetch = list.reconcile(&intent, MutationOutcome::Saved(user(1, "Anna")));
        assert!(refetch.is_some());
        assert_eq!(
            list.complete_fetch(pending, page_of(vec![], 1, 0)),
            FetchCommit::Superseded
        );
    }

    #[test]
    fn test_delete_during_resync_still_drops_the_row() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, page_of(users(1..=20), 30, 0));

        let first: MutationIntent<UserRoleUpdate> = MutationIntent::Delete(RecordId::from("1"));
        let resync = list.reconcile(&first, MutationOutcome::Deleted(RecordId::from("1")));
        assert!(resync.is_some());
        assert!(list.is_loading());

        let second: MutationIntent<UserRoleUpdate> = MutationIntent::Delete(RecordId::from("2"));
        let refetch = list.reconcile(&second, MutationOutcome::Deleted(RecordId::from("2")));
        assert!(refetch.is_some());
        assert!(list.find(&RecordId::from("2")).is_none());
        assert_eq!(list.page().items().len(), 18);
        assert_eq!(list.total_count(), 28);
        assert_eq!(list.query().total_count(), Some(28));
    }

    #[test]
    fn test_pages_without_total_run_until_a_short_page() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, ResourcePage::without_total(users(1..=20), 0, 20));
        assert_eq!(list.known_total(), None);
        assert_eq!(list.query().page_count(), None);

        let ticket = list.next_page().expect("a full page may have a successor");
        assert_eq!(ticket.spec().page, 1);
        let commit = list.complete_fetch(ticket, ResourcePage::without_total(users(21..=25), 1, 20));
        assert_eq!(commit, FetchCommit::Applied);
        assert_eq!(list.total_count(), 25);
        assert!(list.next_page().is_none());
    }

    #[test]
    fn test_empty_page_without_total_steps_back_one() {
        let mut list = ListController::<User>::new();
        let ticket = list.mount();
        list.complete_fetch(ticket, ResourcePage::without_total(users(1..=20), 0, 20));

        let ticket = list.next_page().unwrap();
        let commit = list.complete_fetch(ticket, ResourcePage::without_total(vec![], 1, 20));
        let FetchCommit::Refetch(retry) = commit else {
            panic!("expected a refetch, got {commit:?}");
        };
        assert_eq!(retry.spec().page, 0);
    }

    #[test]
    fn test_with_query_uses_its_page_size() {
        let query = QueryState::with_spec(
            ResourceKind::Users,
            QuerySpec::for_kind(ResourceKind::Users).with_page_size(10),
        )
        .unwrap();
        let list = ListController::<User>::with_query(query);
        assert_eq!(list.page().page_size(), 10);
        assert_eq!(list.status(), ListStatus::Idle);
    }
}
