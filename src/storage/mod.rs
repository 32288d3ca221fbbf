//! Snippet storage - the engine's view of the external store
//!
//! The store owns the snippet set. The engine keeps a read-through
//! [`SnippetCache`] that is marked stale by change notifications and reloaded
//! lazily at the next activation or ranking pass, so nothing ever blocks on
//! a refresh.
//!
//! # Module Structure
//!
//! - `memory` - In-process store, used by tests and the CLI's dry runs
//! - `json_file` - JSON file store with atomic writes and a file watcher

mod json_file;
mod memory;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{ExpandError, Result};
use crate::snippet::Snippet;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Callback fired whenever the stored set changes. Carries no diff; the
/// receiver must reload the full set.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// The external snippet store
pub trait SnippetStore {
    fn load(&self) -> anyhow::Result<Vec<Snippet>>;
    fn save(&self, snippets: &[Snippet]) -> anyhow::Result<()>;
    fn on_change(&self, callback: ChangeCallback);
}

/// Last known snapshot of the snippet set
#[derive(Debug)]
pub struct SnippetCache {
    snippets: Vec<Snippet>,
    stale: Arc<AtomicBool>,
    /// Incremented on every successful reload
    revision: u64,
}

impl Default for SnippetCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetCache {
    /// An empty cache that will load on first use
    pub fn new() -> Self {
        Self {
            snippets: Vec::new(),
            stale: Arc::new(AtomicBool::new(true)),
            revision: 0,
        }
    }

    /// Register this cache for the store's change notifications
    pub fn subscribe<S: SnippetStore + ?Sized>(&self, store: &S) {
        let stale = Arc::clone(&self.stale);
        store.on_change(Box::new(move || {
            stale.store(true, Ordering::Release);
        }));
    }

    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Reload if a change notification arrived since the last load.
    ///
    /// A failed load keeps the previous snapshot and leaves the cache stale
    /// so the next pass retries.
    pub fn refresh_if_stale<S: SnippetStore + ?Sized>(&mut self, store: &S) -> bool {
        if !self.stale.swap(false, Ordering::AcqRel) {
            return false;
        }
        match store.load() {
            Ok(snippets) => {
                debug!(count = snippets.len(), "Snippet cache reloaded");
                self.snippets = snippets;
                self.revision = self.revision.wrapping_add(1);
                true
            }
            Err(e) => {
                warn!(error = %e, "Snippet reload failed, keeping last snapshot");
                self.stale.store(true, Ordering::Release);
                false
            }
        }
    }

    fn replace(&mut self, snippets: Vec<Snippet>) {
        self.snippets = snippets;
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Record a successful insertion by writing `lastUsed` on one snippet.
///
/// This is a plain read-modify-write of the cached snapshot; a concurrent
/// edit from the management UI may be overwritten (last write wins).
#[instrument(name = "mark_used", skip(store, cache))]
pub fn mark_used<S: SnippetStore + ?Sized>(
    store: &S,
    cache: &mut SnippetCache,
    id: &str,
    now: i64,
) -> Result<()> {
    let mut updated = cache.snippets().to_vec();
    let target = updated
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(|| ExpandError::SnippetNotFound(id.to_string()))?;
    target.last_used = Some(now);

    store.save(&updated)?;
    cache.replace(updated);
    info!(id = id, last_used = now, "Recorded snippet use");
    Ok(())
}
