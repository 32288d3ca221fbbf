//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

use crate::keys::NamedKey;

/// Character that starts a snippet lookup
pub const DEFAULT_TRIGGER: char = '/';

/// Snippet file, `~` is expanded at load time
pub const DEFAULT_STORAGE_PATH: &str = "~/.flash-expand/snippets.json";

/// User config file
pub const DEFAULT_CONFIG_PATH: &str = "~/.flash-expand/config.json";

/// Watch the snippet file for external edits
pub const DEFAULT_WATCH_STORAGE: bool = true;

/// Default menu key assignments
pub const DEFAULT_NEXT_KEYS: &[NamedKey] = &[NamedKey::ArrowDown];
pub const DEFAULT_PREVIOUS_KEYS: &[NamedKey] = &[NamedKey::ArrowUp];
pub const DEFAULT_COMMIT_KEYS: &[NamedKey] = &[NamedKey::Enter, NamedKey::Tab];
pub const DEFAULT_CANCEL_KEYS: &[NamedKey] = &[NamedKey::Escape];

/// Default menu geometry and content
pub const DEFAULT_MENU_GAP_PX: f32 = 5.0;
pub const DEFAULT_MENU_ITEM_HEIGHT_PX: f32 = 44.0;
pub const DEFAULT_MENU_MAX_VISIBLE_ITEMS: usize = 8;
pub const DEFAULT_MENU_MAX_TAGS_SHOWN: usize = 2;
pub const DEFAULT_MENU_PREVIEW_CHARS: usize = 80;
