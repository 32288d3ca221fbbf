//! Flash Expand - trigger-driven snippet expansion for editable text surfaces
//!
//! Type a trigger character (`/` by default) in a text field, pick a snippet
//! from the ranked menu, optionally fill its `{{placeholders}}`, and the
//! final text replaces what was typed.

pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod snippet;
pub mod storage;

// Editable surfaces and text mutation
pub mod insertion;
pub mod surface;

// Lookup pipeline
pub mod menu;
pub mod ranking;
pub mod trigger;

// Placeholder fill
pub mod fill_form;
pub mod fill_input;
pub mod placeholder;

pub mod deferred;
pub mod expand_manager;

pub use expand_manager::ExpandEngine;
