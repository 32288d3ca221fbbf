//! Key events as the engine sees them
//!
//! Hosts translate their native keyboard events into [`KeyInput`]. Named
//! keys use the same spelling as the DOM `KeyboardEvent.key` values so the
//! mapping is one-to-one.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_CANCEL_KEYS, DEFAULT_COMMIT_KEYS, DEFAULT_NEXT_KEYS, DEFAULT_PREVIOUS_KEYS,
};

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Non-printing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Enter,
    Tab,
    Escape,
    Backspace,
    Delete,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Named(NamedKey),
    Char(char),
}

/// A single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn named(key: NamedKey) -> Self {
        Self {
            key: Key::Named(key),
            modifiers: Modifiers::empty(),
        }
    }

    pub fn char(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn named_key(&self) -> Option<NamedKey> {
        match self.key {
            Key::Named(named) => Some(named),
            Key::Char(_) => None,
        }
    }

    /// Ctrl, Meta or Shift held. These turn a confirm key into a line break
    /// inside multi-line fields.
    pub fn has_line_break_modifier(&self) -> bool {
        self.modifiers
            .intersects(Modifiers::CONTROL | Modifiers::META | Modifiers::SHIFT)
    }
}

/// What the host must do with the native event after the engine saw it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyDisposition {
    /// Suppress the key's default effect (newline, focus move, caret move)
    pub prevent_default: bool,
    /// Keep the event away from the host page's own handlers
    pub stop_propagation: bool,
}

impl KeyDisposition {
    /// Let the event through untouched
    pub const PASS: Self = Self {
        prevent_default: false,
        stop_propagation: false,
    };

    pub const PREVENT: Self = Self {
        prevent_default: true,
        stop_propagation: false,
    };

    pub const STOP: Self = Self {
        prevent_default: false,
        stop_propagation: true,
    };

    pub const CONSUME: Self = Self {
        prevent_default: true,
        stop_propagation: true,
    };
}

/// Key assignments for the menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBindings {
    #[serde(default = "default_next")]
    pub next: Vec<NamedKey>,
    #[serde(default = "default_previous")]
    pub previous: Vec<NamedKey>,
    #[serde(default = "default_commit")]
    pub commit: Vec<NamedKey>,
    #[serde(default = "default_cancel")]
    pub cancel: Vec<NamedKey>,
}

fn default_next() -> Vec<NamedKey> {
    DEFAULT_NEXT_KEYS.to_vec()
}
fn default_previous() -> Vec<NamedKey> {
    DEFAULT_PREVIOUS_KEYS.to_vec()
}
fn default_commit() -> Vec<NamedKey> {
    DEFAULT_COMMIT_KEYS.to_vec()
}
fn default_cancel() -> Vec<NamedKey> {
    DEFAULT_CANCEL_KEYS.to_vec()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            next: default_next(),
            previous: default_previous(),
            commit: default_commit(),
            cancel: default_cancel(),
        }
    }
}

/// Menu command a key press maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    Next,
    Previous,
    Commit,
    Cancel,
}

impl KeyBindings {
    pub fn menu_command(&self, input: &KeyInput) -> Option<MenuCommand> {
        let named = input.named_key()?;
        if self.next.contains(&named) {
            Some(MenuCommand::Next)
        } else if self.previous.contains(&named) {
            Some(MenuCommand::Previous)
        } else if self.commit.contains(&named) {
            Some(MenuCommand::Commit)
        } else if self.cancel.contains(&named) {
            Some(MenuCommand::Cancel)
        } else {
            None
        }
    }
}
