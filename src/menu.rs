//! Candidate menu
//!
//! A small state machine: `Closed`, or `Open` with a ranked candidate list
//! and a selected index that wraps in both directions. Rendering is the
//! host's job; this module supplies the item view model and the placement
//! above the anchor element, computed once when the menu opens.

use tracing::debug;

use crate::config::MenuConfig;
use crate::keys::{KeyBindings, KeyDisposition, KeyInput, MenuCommand};
use crate::snippet::Snippet;
use crate::surface::Rect;

/// Document scroll position at the time the menu opens
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub left: f32,
    pub top: f32,
}

/// Absolute document position of the menu box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MenuPlacement {
    pub top: f32,
    pub left: f32,
    pub height: f32,
}

impl MenuPlacement {
    /// Place a menu of `count` rows directly above `anchor`.
    pub fn above(anchor: Rect, scroll: ScrollOffset, count: usize, config: &MenuConfig) -> Self {
        let rows = count.min(config.max_visible_items);
        let height = rows as f32 * config.item_height_px;
        Self {
            top: scroll.top + anchor.y - height - config.gap_px,
            left: scroll.left + anchor.x,
            height,
        }
    }
}

/// Render data for one menu row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemView {
    /// `/<title>`
    pub label: String,
    pub tags: Vec<String>,
    pub preview: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenMenu {
    candidates: Vec<Snippet>,
    selected: usize,
    placement: MenuPlacement,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open(OpenMenu),
}

/// Where a pointer-down landed, relative to the menu and the active element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    MenuItem(usize),
    ActiveElement,
    Elsewhere,
}

/// Result of routing a key press through the menu
#[derive(Debug, Clone, PartialEq)]
pub enum MenuKeyOutcome {
    /// Menu closed or key not bound; the host handles the key normally
    Ignored,
    Navigated,
    Committed(Snippet),
    Cancelled,
}

impl MenuKeyOutcome {
    /// Navigation and commit keys must not reach the surface. A cancelled
    /// menu lets the key keep its usual effect.
    pub fn disposition(&self) -> KeyDisposition {
        match self {
            Self::Ignored | Self::Cancelled => KeyDisposition::PASS,
            Self::Navigated => KeyDisposition::PREVENT,
            Self::Committed(_) => KeyDisposition::CONSUME,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MenuController {
    state: MenuState,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, MenuState::Open(_))
    }

    /// Open (or reopen) with a fresh candidate list, selecting the first.
    /// An empty list closes the menu instead.
    pub fn show(&mut self, candidates: Vec<Snippet>, placement: MenuPlacement) {
        if candidates.is_empty() {
            self.close();
            return;
        }
        debug!(count = candidates.len(), "Menu open");
        self.state = MenuState::Open(OpenMenu {
            candidates,
            selected: 0,
            placement,
        });
    }

    /// Close the menu. Safe to call when already closed; returns whether it
    /// was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        if was_open {
            debug!("Menu closed");
        }
        self.state = MenuState::Closed;
        was_open
    }

    pub fn candidates(&self) -> &[Snippet] {
        match &self.state {
            MenuState::Open(menu) => &menu.candidates,
            MenuState::Closed => &[],
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        match &self.state {
            MenuState::Open(menu) => Some(menu.selected),
            MenuState::Closed => None,
        }
    }

    pub fn selected(&self) -> Option<&Snippet> {
        match &self.state {
            MenuState::Open(menu) => menu.candidates.get(menu.selected),
            MenuState::Closed => None,
        }
    }

    pub fn placement(&self) -> Option<MenuPlacement> {
        match &self.state {
            MenuState::Open(menu) => Some(menu.placement),
            MenuState::Closed => None,
        }
    }

    pub fn select_next(&mut self) {
        if let MenuState::Open(menu) = &mut self.state {
            menu.selected = (menu.selected + 1) % menu.candidates.len();
        }
    }

    pub fn select_previous(&mut self) {
        if let MenuState::Open(menu) = &mut self.state {
            let count = menu.candidates.len();
            menu.selected = (menu.selected + count - 1) % count;
        }
    }

    /// Commit the selected candidate and close
    pub fn take_selected(&mut self) -> Option<Snippet> {
        let index = self.selected_index()?;
        self.take_at(index)
    }

    /// Commit the candidate at `index` and close. An out-of-range index
    /// leaves the menu as it was.
    pub fn take_at(&mut self, index: usize) -> Option<Snippet> {
        let MenuState::Open(menu) = &mut self.state else {
            return None;
        };
        if index >= menu.candidates.len() {
            return None;
        }
        let snippet = menu.candidates.swap_remove(index);
        self.state = MenuState::Closed;
        Some(snippet)
    }

    pub fn handle_key(&mut self, input: &KeyInput, bindings: &KeyBindings) -> MenuKeyOutcome {
        if !self.is_open() {
            return MenuKeyOutcome::Ignored;
        }
        match bindings.menu_command(input) {
            Some(MenuCommand::Next) => {
                self.select_next();
                MenuKeyOutcome::Navigated
            }
            Some(MenuCommand::Previous) => {
                self.select_previous();
                MenuKeyOutcome::Navigated
            }
            Some(MenuCommand::Commit) => match self.take_selected() {
                Some(snippet) => MenuKeyOutcome::Committed(snippet),
                None => MenuKeyOutcome::Ignored,
            },
            Some(MenuCommand::Cancel) => {
                self.close();
                MenuKeyOutcome::Cancelled
            }
            None => MenuKeyOutcome::Ignored,
        }
    }

    /// Item views for the host to render
    pub fn items(&self, trigger: char, config: &MenuConfig) -> Vec<MenuItemView> {
        let MenuState::Open(menu) = &self.state else {
            return Vec::new();
        };
        menu.candidates
            .iter()
            .enumerate()
            .map(|(i, snippet)| MenuItemView {
                label: format!("{trigger}{}", snippet.title),
                tags: snippet
                    .tags
                    .iter()
                    .take(config.max_tags_shown)
                    .cloned()
                    .collect(),
                preview: preview(&snippet.content, config.preview_chars),
                selected: i == menu.selected,
            })
            .collect()
    }
}

/// First `max_chars` characters of `content` on one line, with an ellipsis
/// when cut.
fn preview(content: &str, max_chars: usize) -> String {
    let flat: String = content
        .chars()
        .map(|c| if c == '\n' || c == '\t' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push('…');
    cut
}
