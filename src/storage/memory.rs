use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::bail;
use parking_lot::Mutex;

use super::{ChangeCallback, SnippetStore};
use crate::snippet::Snippet;

/// In-process snippet store
///
/// Behaves like the extension's local storage area: every save replaces the
/// whole set and notifies all subscribers, including the writer.
#[derive(Default)]
pub struct MemoryStore {
    snippets: Mutex<Vec<Snippet>>,
    callbacks: Mutex<Vec<ChangeCallback>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snippets(snippets: Vec<Snippet>) -> Self {
        Self {
            snippets: Mutex::new(snippets),
            ..Self::default()
        }
    }

    /// Make every subsequent load and save fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Release);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }

    fn notify(&self) {
        for callback in self.callbacks.lock().iter() {
            callback();
        }
    }
}

impl SnippetStore for MemoryStore {
    fn load(&self) -> anyhow::Result<Vec<Snippet>> {
        if self.failing.load(Ordering::Acquire) {
            bail!("memory store is unavailable");
        }
        Ok(self.snippets.lock().clone())
    }

    fn save(&self, snippets: &[Snippet]) -> anyhow::Result<()> {
        if self.failing.load(Ordering::Acquire) {
            bail!("memory store is unavailable");
        }
        *self.snippets.lock() = snippets.to_vec();
        self.saves.fetch_add(1, Ordering::AcqRel);
        self.notify();
        Ok(())
    }

    fn on_change(&self, callback: ChangeCallback) {
        self.callbacks.lock().push(callback);
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("snippets", &self.snippets.lock().len())
            .field("subscribers", &self.callbacks.lock().len())
            .finish()
    }
}
