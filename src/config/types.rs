//! Configuration type definitions

use serde::{Deserialize, Serialize};

use super::defaults::*;
use crate::error::{ExpandError, Result};
use crate::keys::KeyBindings;

// ============================================
// MENU CONFIG
// ============================================

/// Candidate menu geometry and content limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuConfig {
    /// Vertical gap between the menu and the top of the anchor element
    #[serde(default = "default_menu_gap_px")]
    pub gap_px: f32,
    /// Height of one menu row
    #[serde(default = "default_menu_item_height_px")]
    pub item_height_px: f32,
    /// Rows shown before the menu scrolls
    #[serde(default = "default_menu_max_visible_items")]
    pub max_visible_items: usize,
    /// Tags rendered next to each title
    #[serde(default = "default_menu_max_tags_shown")]
    pub max_tags_shown: usize,
    /// Characters of content shown as the item preview
    #[serde(default = "default_menu_preview_chars")]
    pub preview_chars: usize,
}

fn default_menu_gap_px() -> f32 {
    DEFAULT_MENU_GAP_PX
}
fn default_menu_item_height_px() -> f32 {
    DEFAULT_MENU_ITEM_HEIGHT_PX
}
fn default_menu_max_visible_items() -> usize {
    DEFAULT_MENU_MAX_VISIBLE_ITEMS
}
fn default_menu_max_tags_shown() -> usize {
    DEFAULT_MENU_MAX_TAGS_SHOWN
}
fn default_menu_preview_chars() -> usize {
    DEFAULT_MENU_PREVIEW_CHARS
}

impl Default for MenuConfig {
    fn default() -> Self {
        MenuConfig {
            gap_px: DEFAULT_MENU_GAP_PX,
            item_height_px: DEFAULT_MENU_ITEM_HEIGHT_PX,
            max_visible_items: DEFAULT_MENU_MAX_VISIBLE_ITEMS,
            max_tags_shown: DEFAULT_MENU_MAX_TAGS_SHOWN,
            preview_chars: DEFAULT_MENU_PREVIEW_CHARS,
        }
    }
}

// ============================================
// MAIN CONFIG
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Character that starts a lookup (default: '/')
    #[serde(default = "default_trigger")]
    pub trigger: char,
    /// Snippet file location (default: ~/.flash-expand/snippets.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    /// Watch the snippet file for edits made elsewhere (default: true)
    #[serde(default = "default_watch_storage")]
    pub watch_storage: bool,
    #[serde(default)]
    pub keys: KeyBindings,
    #[serde(default)]
    pub menu: MenuConfig,
}

fn default_trigger() -> char {
    DEFAULT_TRIGGER
}
fn default_watch_storage() -> bool {
    DEFAULT_WATCH_STORAGE
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trigger: DEFAULT_TRIGGER,
            storage_path: None,
            watch_storage: DEFAULT_WATCH_STORAGE,
            keys: KeyBindings::default(),
            menu: MenuConfig::default(),
        }
    }
}

impl Config {
    /// Snippet file path with the default applied
    pub fn get_storage_path(&self) -> &str {
        self.storage_path.as_deref().unwrap_or(DEFAULT_STORAGE_PATH)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.trigger.is_whitespace() {
            return Err(ExpandError::Config(format!(
                "trigger must not be whitespace (got {:?})",
                self.trigger
            )));
        }
        if self.trigger == '{' || self.trigger == '}' {
            return Err(ExpandError::Config(
                "trigger must not be a placeholder brace".to_string(),
            ));
        }
        if self.keys.commit.is_empty() {
            return Err(ExpandError::Config(
                "at least one commit key is required".to_string(),
            ));
        }
        if self.menu.max_visible_items == 0 {
            return Err(ExpandError::Config(
                "menu.maxVisibleItems must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
