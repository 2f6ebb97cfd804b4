//! Debounced server-backed search.
//!
//! Only the account lookup of the invitation dialog searches on the server;
//! list search boxes narrow the loaded page locally. Each keystroke waits out
//! the debounce window and is dropped if a newer keystroke arrived meanwhile,
//! so only the last one in a burst reaches the backend.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::Result;
use crate::gateway::HttpGateway;
use crate::model::UserSummary;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Lookups shorter than this return nothing without a request.
pub const MIN_LOOKUP_CHARS: usize = 2;

/// A keystroke that survived its debounce window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keystroke {
    generation: u64,
    pub text: String,
}

/// Cheap to clone; clones share the same keystroke counter.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the window for `text`. `None` if a newer keystroke arrived.
    pub async fn settle(&self, text: impl Into<String>) -> Option<Keystroke> {
        let text = text.into();
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        let keystroke = Keystroke { generation, text };
        self.is_current(&keystroke).then_some(keystroke)
    }

    pub fn is_current(&self, keystroke: &Keystroke) -> bool {
        self.latest.load(Ordering::SeqCst) == keystroke.generation
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Source of account lookups.
pub trait UserDirectory: Send + Sync {
    fn lookup(&self, text: &str) -> impl Future<Output = Result<Vec<UserSummary>>> + Send;
}

impl UserDirectory for HttpGateway {
    fn lookup(&self, text: &str) -> impl Future<Output = Result<Vec<UserSummary>>> + Send {
        self.search_users(text)
    }
}

/// Debounced account lookup backing the invitation dialog.
#[derive(Debug)]
pub struct UserLookup<D> {
    directory: D,
    debouncer: Debouncer,
}

impl<D: UserDirectory> UserLookup<D> {
    pub fn new(directory: D, delay: Duration) -> Self {
        Self {
            directory,
            debouncer: Debouncer::new(delay),
        }
    }

    /// Handle one keystroke of the lookup box.
    ///
    /// Returns `None` when a later keystroke superseded this one, either
    /// before the request went out or while it was in flight.
    pub async fn keystroke(&self, text: &str) -> Option<Result<Vec<UserSummary>>> {
        let keystroke = self.debouncer.settle(text.trim()).await?;
        if keystroke.text.chars().count() < MIN_LOOKUP_CHARS {
            return Some(Ok(Vec::new()));
        }

        let result = self.directory.lookup(&keystroke.text).await;
        if !self.debouncer.is_current(&keystroke) {
            tracing::debug!("dropping lookup results for '{}'", keystroke.text);
            return None;
        }
        Some(result)
    }
}
