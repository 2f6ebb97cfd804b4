//! In-memory [`ResourceGateway`] backed by JSON rows.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use keepsake::{
    KeepsakeError, MutationIntent, MutationOutcome, QuerySpec, Record, RecordId, ResourceGateway,
    ResourcePage, ResourceKind, Result,
};
use serde_json::Value;

#[derive(Default)]
pub struct MemoryGateway {
    rows: Mutex<BTreeMap<&'static str, Vec<Value>>>,
    next_id: AtomicU64,
    fetches: AtomicUsize,
    fail_next: Mutex<Option<KeepsakeError>>,
}

fn id_of(row: &Value) -> Option<String> {
    match row.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_text(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1000),
            ..Self::default()
        }
    }

    pub fn with_rows(self, kind: ResourceKind, rows: Vec<Value>) -> Self {
        self.rows
            .lock()
            .unwrap()
            .insert(kind.collection_path(), rows);
        self
    }

    /// Drop the first `n` rows of a collection, as another client would.
    pub fn remove_first(&self, kind: ResourceKind, n: usize) {
        let mut rows = self.rows.lock().unwrap();
        let list = rows.entry(kind.collection_path()).or_default();
        list.drain(..n.min(list.len()));
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        self.rows
            .lock()
            .unwrap()
            .get(kind.collection_path())
            .map_or(0, Vec::len)
    }

    /// Number of `fetch_page` calls so far.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Make the next request fail with `error`.
    pub fn fail_next(&self, error: KeepsakeError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_next.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl ResourceGateway for MemoryGateway {
    async fn fetch_page<R: Record>(&self, spec: &QuerySpec) -> Result<ResourcePage<R>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.take_failure()?;
        let rows = self
            .rows
            .lock()
            .unwrap()
            .get(R::KIND.collection_path())
            .cloned()
            .unwrap_or_default();
        let matching = rows
            .into_iter()
            .filter(|row| {
                spec.filters
                    .iter()
                    .all(|(key, value)| field_text(row, key).as_deref() == Some(value.as_str()))
            })
            .map(serde_json::from_value::<R>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        ResourcePage::from_full(matching, spec.page, spec.page_size)
    }

    async fn fetch_one<R: Record>(&self, id: &RecordId) -> Result<R> {
        self.take_failure()?;
        let row = self
            .rows
            .lock()
            .unwrap()
            .get(R::KIND.collection_path())
            .and_then(|rows| {
                rows.iter()
                    .find(|row| id_of(row).as_deref() == Some(id.as_str()))
                    .cloned()
            })
            .ok_or_else(|| KeepsakeError::NotFound(format!("{} '{id}'", R::KIND.singular())))?;
        Ok(serde_json::from_value(row)?)
    }

    async fn mutate<R: Record>(
        &self,
        intent: MutationIntent<R::Payload>,
    ) -> Result<MutationOutcome<R>> {
        self.take_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let list = rows.entry(R::KIND.collection_path()).or_default();

        match intent {
            MutationIntent::Create(payload) => {
                let mut row = serde_json::to_value(&payload)?;
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                if let Value::Object(map) = &mut row {
                    map.insert("id".to_string(), Value::from(id));
                }
                list.push(row.clone());
                Ok(MutationOutcome::Saved(serde_json::from_value(row)?))
            }
            MutationIntent::Update(id, payload) => {
                let row = list
                    .iter_mut()
                    .find(|row| id_of(row).as_deref() == Some(id.as_str()))
                    .ok_or_else(|| KeepsakeError::NotFound(id.to_string()))?;
                if let (Value::Object(target), Value::Object(changes)) =
                    (row, serde_json::to_value(&payload)?)
                {
                    target.extend(changes);
                }
                let row = list
                    .iter()
                    .find(|row| id_of(row).as_deref() == Some(id.as_str()))
                    .cloned()
                    .ok_or_else(|| KeepsakeError::NotFound(id.to_string()))?;
                Ok(MutationOutcome::Saved(serde_json::from_value(row)?))
            }
            MutationIntent::Delete(id) => {
                let before = list.len();
                list.retain(|row| id_of(row).as_deref() != Some(id.as_str()));
                if list.len() == before {
                    return Err(KeepsakeError::NotFound(id.to_string()));
                }
                Ok(MutationOutcome::Deleted(id))
            }
        }
    }
}
