//! JSON file snippet store
//!
//! The file holds the same record shape the extension keeps in its local
//! storage area: `{"prompts": [ ...snippets ]}`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use notify::{recommended_watcher, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::{ChangeCallback, SnippetStore};
use crate::snippet::Snippet;

/// Raw data format for JSON deserialization
#[derive(Debug, Default, Deserialize)]
struct StoreData {
    #[serde(default)]
    prompts: Vec<Snippet>,
}

/// Borrowed data format so saving does not clone the set
#[derive(Serialize)]
struct StoreDataRef<'a> {
    prompts: &'a [Snippet],
}

type Callbacks = Arc<Mutex<Vec<ChangeCallback>>>;

pub struct JsonFileStore {
    path: PathBuf,
    callbacks: Callbacks,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            callbacks: Arc::new(Mutex::new(Vec::new())),
            watcher: Mutex::new(None),
        }
    }

    /// Store at a configured path, with `~` expanded
    pub fn from_config_path(path: &str) -> Self {
        Self::new(PathBuf::from(shellexpand::tilde(path).as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start watching the file for edits made by other writers.
    ///
    /// Any create/modify/remove event touching the file fires the change
    /// callbacks. Calling this twice is a no-op.
    #[instrument(name = "snippet_store_watch", skip(self), fields(path = %self.path.display()))]
    pub fn watch(&self) -> Result<()> {
        let mut slot = self.watcher.lock();
        if slot.is_some() {
            debug!("Snippet file watcher already running");
            return Ok(());
        }

        let watch_dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        std::fs::create_dir_all(&watch_dir)
            .with_context(|| format!("Failed to create directory: {}", watch_dir.display()))?;

        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let callbacks = Arc::clone(&self.callbacks);
        let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, watcher = "snippets", "Snippet watcher error");
                    return;
                }
            };
            if event.kind.is_access() {
                return;
            }
            let touches_store = event
                .paths
                .iter()
                .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
            if touches_store {
                debug!(kind = ?event.kind, "Snippet file changed");
                for callback in callbacks.lock().iter() {
                    callback();
                }
            }
        })
        .context("Failed to create snippet file watcher")?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", watch_dir.display()))?;

        info!(dir = %watch_dir.display(), "Snippet watcher started");
        *slot = Some(watcher);
        Ok(())
    }

    fn notify(&self) {
        for callback in self.callbacks.lock().iter() {
            callback();
        }
    }
}

impl SnippetStore for JsonFileStore {
    /// A missing file is an empty set.
    #[instrument(name = "snippet_store_load", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Snippet>> {
        if !self.path.exists() {
            debug!("Snippet file not found, starting empty");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snippet file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let data: StoreData =
            serde_json::from_str(&content).with_context(|| "Failed to parse snippet JSON")?;

        debug!(count = data.prompts.len(), "Loaded snippets");
        Ok(data.prompts)
    }

    /// Atomic write (write temp + rename), then notify subscribers.
    #[instrument(name = "snippet_store_save", skip(self, snippets), fields(path = %self.path.display()))]
    fn save(&self, snippets: &[Snippet]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&StoreDataRef { prompts: snippets })
            .context("Failed to serialize snippets")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &json).with_context(|| {
            format!("Failed to write temp snippet file: {}", temp_path.display())
        })?;
        std::fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp file to {}", self.path.display())
        })?;

        info!(count = snippets.len(), bytes = json.len(), "Saved snippets (atomic)");
        self.notify();
        Ok(())
    }

    fn on_change(&self, callback: ChangeCallback) {
        self.callbacks.lock().push(callback);
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .field("watching", &self.watcher.lock().is_some())
            .finish()
    }
}
