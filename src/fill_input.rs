//! FillInput - multi-line text buffer behind the placeholder form
//!
//! Supports:
//! - Text selection (shift+arrows, select all)
//! - Word navigation (alt+arrows) and word deletion (alt+backspace/delete)
//! - Line breaks, inserted by the form for modified confirm keys
//!
//! Positions are char indices.

use crate::keys::{Key, KeyInput, Modifiers, NamedKey};
use crate::surface::SelectionRange;

#[derive(Debug, Clone, Default)]
pub struct FillInput {
    text: String,
    selection: SelectionRange,
}

impl FillInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            selection: SelectionRange::caret(len),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.selection.focus
    }

    pub fn selection(&self) -> SelectionRange {
        self.selection
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_collapsed()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection.range();
        &self.text[self.char_to_byte(start)..self.char_to_byte(end)]
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    // === Editing ===

    /// Insert a character at the cursor, replacing any selection
    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let byte_pos = self.char_to_byte(self.selection.focus);
        self.text.insert(byte_pos, ch);
        self.selection = SelectionRange::caret(self.selection.focus + 1);
    }

    /// Insert a string at the cursor, replacing any selection (paste)
    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let byte_pos = self.char_to_byte(self.selection.focus);
        self.text.insert_str(byte_pos, s);
        self.selection = SelectionRange::caret(self.selection.focus + s.chars().count());
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection, or the character before the cursor
    pub fn backspace(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else if self.selection.focus > 0 {
            let cursor = self.selection.focus;
            self.remove(cursor - 1, cursor);
        }
    }

    /// Delete the selection, or the character after the cursor
    pub fn delete(&mut self) {
        if self.has_selection() {
            self.delete_selection();
        } else if self.selection.focus < self.len() {
            let cursor = self.selection.focus;
            self.remove(cursor, cursor + 1);
        }
    }

    fn delete_selection(&mut self) {
        if self.has_selection() {
            let (start, end) = self.selection.range();
            self.remove(start, end);
        }
    }

    fn remove(&mut self, start: usize, end: usize) {
        let byte_start = self.char_to_byte(start);
        let byte_end = self.char_to_byte(end);
        self.text.replace_range(byte_start..byte_end, "");
        self.selection = SelectionRange::caret(start);
    }

    // === Cursor movement ===

    fn move_to(&mut self, pos: usize, extend: bool) {
        if extend {
            self.selection.focus = pos;
        } else {
            self.selection = SelectionRange::caret(pos);
        }
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (start, _) = self.selection.range();
            self.selection = SelectionRange::caret(start);
        } else if self.selection.focus > 0 {
            self.move_to(self.selection.focus - 1, extend);
        }
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && self.has_selection() {
            let (_, end) = self.selection.range();
            self.selection = SelectionRange::caret(end);
        } else if self.selection.focus < self.len() {
            self.move_to(self.selection.focus + 1, extend);
        }
    }

    pub fn move_to_start(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn move_to_end(&mut self, extend: bool) {
        self.move_to(self.len(), extend);
    }

    pub fn move_word_left(&mut self, extend: bool) {
        self.move_to(self.word_boundary_left(), extend);
    }

    pub fn move_word_right(&mut self, extend: bool) {
        self.move_to(self.word_boundary_right(), extend);
    }

    pub fn select_all(&mut self) {
        self.selection = SelectionRange::new(0, self.len());
    }

    // === Key handling ===

    /// Apply an editing key. Returns true if the buffer handled it.
    ///
    /// Enter is not handled here; the form decides between submit and a
    /// line break.
    pub fn handle_key(&mut self, input: &KeyInput) -> bool {
        let shift = input.modifiers.contains(Modifiers::SHIFT);
        let alt = input.modifiers.contains(Modifiers::ALT);
        let cmd = input
            .modifiers
            .intersects(Modifiers::META | Modifiers::CONTROL);

        match input.key {
            Key::Char('a') if cmd => {
                self.select_all();
                true
            }
            Key::Named(NamedKey::ArrowLeft) => {
                if cmd {
                    self.move_to_start(shift);
                } else if alt {
                    self.move_word_left(shift);
                } else {
                    self.move_left(shift);
                }
                true
            }
            Key::Named(NamedKey::ArrowRight) => {
                if cmd {
                    self.move_to_end(shift);
                } else if alt {
                    self.move_word_right(shift);
                } else {
                    self.move_right(shift);
                }
                true
            }
            Key::Named(NamedKey::Home) => {
                self.move_to_start(shift);
                true
            }
            Key::Named(NamedKey::End) => {
                self.move_to_end(shift);
                true
            }
            Key::Named(NamedKey::Backspace) => {
                if alt && !self.has_selection() {
                    let start = self.word_boundary_left();
                    let end = self.selection.focus;
                    if start < end {
                        self.remove(start, end);
                    }
                } else {
                    self.backspace();
                }
                true
            }
            Key::Named(NamedKey::Delete) => {
                if alt && !self.has_selection() {
                    let start = self.selection.focus;
                    let end = self.word_boundary_right();
                    if start < end {
                        self.remove(start, end);
                    }
                } else {
                    self.delete();
                }
                true
            }
            Key::Char(ch) if !cmd && !ch.is_control() => {
                self.insert_char(ch);
                true
            }
            _ => false,
        }
    }

    // === Helpers ===

    fn char_to_byte(&self, char_idx: usize) -> usize {
        crate::surface::char_to_byte(&self.text, char_idx)
    }

    fn word_boundary_left(&self) -> usize {
        if self.selection.focus == 0 {
            return 0;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.selection.focus - 1;
        while pos > 0 && chars[pos].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        pos
    }

    fn word_boundary_right(&self) -> usize {
        let chars: Vec<char> = self.text.chars().collect();
        let len = chars.len();
        let mut pos = self.selection.focus;
        while pos < len && !chars[pos].is_whitespace() {
            pos += 1;
        }
        while pos < len && chars[pos].is_whitespace() {
            pos += 1;
        }
        pos
    }
}
