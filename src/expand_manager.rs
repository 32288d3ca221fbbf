//! Expand Engine - wires the expansion pipeline together
//!
//! Event flow:
//! 1. `focus` attaches a surface to the focused element and opens a session
//! 2. `handle_input` re-derives the trigger match from scratch, ranks the
//!    cached snippets and opens, updates or closes the menu
//! 3. `handle_keydown` / `handle_pointer_down` drive the menu and commit
//! 4. A commit either inserts at once (no placeholders) or deletes the
//!    trigger, captures the anchor and opens the fill form
//! 5. Submitting the form queues the insertion; `run_pending` performs it on
//!    the host's next event-loop turn
//!
//! Nothing here blocks. Every close path can be called at any time.

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::deferred::{DeferredQueue, PendingInsertion, SessionId};
use crate::error::{ExpandError, Result, ResultExt};
use crate::fill_form::{FormKeyOutcome, FormResult, PlaceholderForm};
use crate::insertion::{delete_range, insert_text};
use crate::keys::{KeyDisposition, KeyInput};
use crate::menu::{
    MenuController, MenuItemView, MenuKeyOutcome, MenuPlacement, PointerTarget, ScrollOffset,
};
use crate::placeholder::has_placeholders;
use crate::ranking::rank_candidates;
use crate::snippet::{now_millis, Snippet};
use crate::storage::{mark_used, SnippetCache, SnippetStore};
use crate::surface::{attach, HostElement, SelectionRange, Surface};
use crate::trigger::{InactiveReason, MatchState, TriggerDetector};

/// The focused element and its surface
struct SurfaceSession {
    id: SessionId,
    surface: Box<dyn Surface>,
}

/// An open fill form and where its result goes
struct FillSession {
    session: SessionId,
    form: PlaceholderForm,
    anchor: SelectionRange,
}

pub struct ExpandEngine<S: SnippetStore> {
    config: Config,
    store: S,
    cache: SnippetCache,
    detector: TriggerDetector,
    session: Option<SurfaceSession>,
    next_session: u64,
    menu: MenuController,
    fill: Option<FillSession>,
    queue: DeferredQueue,
    scroll: ScrollOffset,
}

impl<S: SnippetStore> ExpandEngine<S> {
    pub fn new(store: S, config: Config) -> Self {
        let cache = SnippetCache::new();
        cache.subscribe(&store);
        Self {
            detector: TriggerDetector::new(config.trigger),
            config,
            store,
            cache,
            session: None,
            next_session: 0,
            menu: MenuController::new(),
            fill: None,
            queue: DeferredQueue::new(),
            scroll: ScrollOffset::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    /// Menu rows for rendering
    pub fn menu_items(&self) -> Vec<MenuItemView> {
        self.menu.items(self.detector.trigger(), &self.config.menu)
    }

    pub fn form(&self) -> Option<&PlaceholderForm> {
        self.fill.as_ref().map(|f| &f.form)
    }

    pub fn active_surface(&self) -> Option<&dyn Surface> {
        self.session.as_ref().map(|s| s.surface.as_ref())
    }

    pub fn active_surface_mut(&mut self) -> Option<&mut dyn Surface> {
        let session = self.session.as_mut()?;
        let surface: &mut dyn Surface = session.surface.as_mut();
        Some(surface)
    }

    pub fn pending_insertions(&self) -> usize {
        self.queue.len()
    }

    /// Document scroll position, used the next time the menu opens
    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = scroll;
    }

    /// Start a session on a newly focused element.
    ///
    /// Focus returning to the element the session already owns keeps the
    /// session, its fill form and queued insertions. Elements that cannot
    /// hold editable text leave no session and return `UnsupportedSurface`,
    /// which is benign: the host just ignores it.
    #[instrument(skip(self, element), fields(id = %element.id, tag = %element.tag))]
    pub fn focus(&mut self, element: HostElement) -> Result<()> {
        if self.owns_element(&element.id) {
            debug!("Focus returned to the active element, session kept");
            return Ok(());
        }
        let id = element.id.clone();
        match attach(element) {
            Some(surface) => {
                self.focus_surface(surface);
                Ok(())
            }
            None => {
                self.end_session();
                Err(ExpandError::UnsupportedSurface(id))
            }
        }
    }

    /// Start a session on a surface the host built itself
    pub fn focus_surface(&mut self, surface: Box<dyn Surface>) {
        self.end_session();
        self.next_session += 1;
        debug!(
            session = self.next_session,
            id = surface.element_id(),
            "Session started"
        );
        self.session = Some(SurfaceSession {
            id: SessionId(self.next_session),
            surface,
        });
        self.cache.refresh_if_stale(&self.store);
    }

    fn owns_element(&self, element_id: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.surface.element_id() == element_id)
    }

    fn end_session(&mut self) {
        self.menu.close();
        if let Some(fill) = self.fill.take() {
            debug!(snippet_id = %fill.form.snippet().id, "Focus moved, fill form discarded");
        }
        self.session = None;
    }

    /// The focused element lost focus. An open fill form keeps its session
    /// since the form itself took focus.
    pub fn blur(&mut self) {
        self.menu.close();
        if self.fill.is_none() {
            self.session = None;
        }
    }

    /// Re-derive the match after a text change and update the menu.
    pub fn handle_input(&mut self) -> MatchState {
        if self.fill.is_some() {
            return MatchState::Inactive(InactiveReason::NoTrigger);
        }
        let Some(session) = self.session.as_ref() else {
            self.menu.close();
            return MatchState::Inactive(InactiveReason::EmptyText);
        };

        let text = session.surface.text();
        if text.is_empty() {
            self.menu.close();
            return MatchState::Inactive(InactiveReason::EmptyText);
        }

        let state = self.detector.detect(&text, session.surface.caret());
        let Some(matched) = state.active() else {
            self.menu.close();
            return state;
        };

        self.cache.refresh_if_stale(&self.store);
        let candidates: Vec<Snippet> = rank_candidates(self.cache.snippets(), &matched.query)
            .into_iter()
            .cloned()
            .collect();
        debug!(query = %matched.query, count = candidates.len(), "Ranked candidates");

        let placement = MenuPlacement::above(
            session.surface.bounds(),
            self.scroll,
            candidates.len(),
            &self.config.menu,
        );
        self.menu.show(candidates, placement);
        state
    }

    pub fn handle_keydown(&mut self, input: KeyInput) -> KeyDisposition {
        if let Some(fill) = self.fill.as_mut() {
            let (outcome, disposition) = fill.form.handle_key(&input);
            match outcome {
                FormKeyOutcome::Submitted => {
                    self.submit_form();
                }
                FormKeyOutcome::Cancelled => self.cancel_form(),
                FormKeyOutcome::Edited | FormKeyOutcome::Ignored => {}
            }
            return disposition;
        }

        match self.menu.handle_key(&input, &self.config.keys) {
            MenuKeyOutcome::Committed(snippet) => {
                if self.try_commit(snippet) {
                    KeyDisposition::CONSUME
                } else {
                    KeyDisposition::PASS
                }
            }
            outcome => outcome.disposition(),
        }
    }

    /// Pointer pressed somewhere on the page. Returns true when the host
    /// must prevent the default focus change.
    pub fn handle_pointer_down(&mut self, target: PointerTarget) -> bool {
        match target {
            PointerTarget::MenuItem(index) => self.commit(index),
            PointerTarget::ActiveElement => false,
            PointerTarget::Elsewhere => {
                self.menu.close();
                false
            }
        }
    }

    /// Commit the menu candidate at `index`. Returns false when there is no
    /// such candidate or its trigger is gone.
    pub fn commit(&mut self, index: usize) -> bool {
        match self.menu.take_at(index) {
            Some(snippet) => self.try_commit(snippet),
            None => false,
        }
    }

    fn try_commit(&mut self, snippet: Snippet) -> bool {
        self.commit_snippet(snippet).unwrap_or_else(|e| {
            debug!(error = %e, "Commit skipped");
            false
        })
    }

    /// Phase 1 of a commit. `Ok(false)` means the surface was left untouched.
    #[instrument(skip(self, snippet), fields(snippet_id = %snippet.id, title = %snippet.title))]
    fn commit_snippet(&mut self, snippet: Snippet) -> Result<bool> {
        let detector = self.detector;
        let session = self.session.as_mut().ok_or(ExpandError::NoActiveSurface)?;
        let surface = session.surface.as_mut();

        let state = detector.detect(&surface.text(), surface.caret());
        let Some(matched) = state.active() else {
            debug!("Trigger gone before commit, nothing to replace");
            return Ok(false);
        };
        let (start, end) = matched.span();
        let removed: String = surface.text().chars().skip(start).take(end - start).collect();

        if let Err(e) = delete_range(surface, start, end) {
            warn!(error = %e, "Could not remove trigger text");
            return Ok(false);
        }

        if has_placeholders(&snippet.content) {
            // The form may stay open indefinitely; the page must see the
            // deletion now
            surface.notify_changed();
            let anchor = surface.selection();
            info!(anchor = anchor.focus, "Trigger removed, opening fill form");
            self.fill = Some(FillSession {
                session: session.id,
                form: PlaceholderForm::new(snippet),
                anchor,
            });
            return Ok(true);
        }

        match insert_text(surface, &snippet.content) {
            Ok(_) => {
                mark_used(&self.store, &mut self.cache, &snippet.id, now_millis()).warn_on_err();
            }
            Err(e) => {
                warn!(error = %e, "Insertion failed, restoring trigger text");
                if surface.splice_insert(&removed).log_err().is_none() {
                    // Trigger stays deleted; keep the page's copy in step
                    surface.notify_changed();
                }
            }
        }
        Ok(true)
    }

    /// Replace the fill field's contents
    pub fn set_form_text(&mut self, text: &str) {
        if let Some(fill) = self.fill.as_mut() {
            fill.form.set_text(text);
        }
    }

    /// Close the form and queue its result. Returns true if an insertion was
    /// scheduled; a submit without tokens behaves like cancel.
    pub fn submit_form(&mut self) -> bool {
        let Some(fill) = self.fill.take() else {
            return false;
        };
        self.restore_anchor(fill.session, fill.anchor);
        match fill.form.submit() {
            FormResult::Insert(text) => {
                self.queue.schedule(PendingInsertion {
                    session: fill.session,
                    snippet_id: fill.form.snippet().id.clone(),
                    text,
                    anchor: fill.anchor,
                });
                true
            }
            FormResult::Empty => {
                debug!("No values typed, nothing to insert");
                false
            }
        }
    }

    /// Discard the form without inserting. Safe to call with no form open.
    pub fn cancel_form(&mut self) {
        if let Some(fill) = self.fill.take() {
            debug!(snippet_id = %fill.form.snippet().id, "Fill form cancelled");
            self.restore_anchor(fill.session, fill.anchor);
        }
    }

    fn restore_anchor(&mut self, session: SessionId, anchor: SelectionRange) {
        match self.session.as_mut() {
            Some(active) if active.id == session => active.surface.set_selection(anchor),
            _ => debug!(session = session.0, "Session gone, anchor not restored"),
        }
    }

    /// Run queued insertions. Returns how many were applied.
    pub fn run_pending(&mut self) -> usize {
        let mut applied = 0;
        for pending in self.queue.drain() {
            let Some(session) = self.session.as_mut().filter(|s| s.id == pending.session) else {
                warn!(
                    session = pending.session.0,
                    snippet_id = %pending.snippet_id,
                    "Session replaced before insertion, dropped"
                );
                continue;
            };
            let surface = session.surface.as_mut();
            surface.set_selection(pending.anchor);
            if insert_text(surface, &pending.text).log_err().is_some() {
                mark_used(&self.store, &mut self.cache, &pending.snippet_id, now_millis())
                    .warn_on_err();
                applied += 1;
            }
        }
        applied
    }

    /// Cached snippet set, reloaded first if a change arrived
    pub fn snippets(&mut self) -> &[Snippet] {
        self.cache.refresh_if_stale(&self.store);
        self.cache.snippets()
    }
}

#[cfg(test)]
#[path = "expand_manager_tests.rs"]
mod tests;
