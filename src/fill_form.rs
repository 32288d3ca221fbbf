//! Placeholder fill form
//!
//! Shown after a snippet with placeholders is committed. The user types one
//! `{{value}}` token per placeholder into a single multi-line field; a live
//! counter compares typed tokens with the placeholder count. The counter is
//! advisory and never blocks submission.

use tracing::debug;

use crate::fill_input::FillInput;
use crate::keys::{KeyDisposition, KeyInput, NamedKey};
use crate::placeholder::{
    extract_fill_values, extract_placeholders, preview_segments, substitute_positional,
    PreviewSegment,
};
use crate::snippet::Snippet;

/// Typed tokens versus placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillProgress {
    pub filled: usize,
    pub total: usize,
}

impl FillProgress {
    pub fn is_complete(&self) -> bool {
        self.filled >= self.total
    }

    /// Counter text, e.g. `1/2`
    pub fn label(&self) -> String {
        format!("{}/{}", self.filled, self.total)
    }
}

/// What submitting the form produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormResult {
    /// Final text to insert
    Insert(String),
    /// No well-formed token was typed; treated like a cancel
    Empty,
}

/// What a key press did to the form. On `Submitted` the caller reads the
/// result with [`PlaceholderForm::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKeyOutcome {
    Edited,
    Submitted,
    Cancelled,
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PlaceholderForm {
    snippet: Snippet,
    placeholder_count: usize,
    input: FillInput,
}

impl PlaceholderForm {
    pub fn new(snippet: Snippet) -> Self {
        let placeholder_count = extract_placeholders(&snippet.content).len();
        debug!(snippet_id = %snippet.id, placeholder_count, "Fill form opened");
        Self {
            snippet,
            placeholder_count,
            input: FillInput::new(),
        }
    }

    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    pub fn input(&self) -> &FillInput {
        &self.input
    }

    /// Replace the field contents, as a paste over everything would
    pub fn set_text(&mut self, text: &str) {
        self.input = FillInput::with_text(text);
    }

    /// Snippet content split for highlighted display
    pub fn preview(&self) -> Vec<PreviewSegment> {
        preview_segments(&self.snippet.content)
    }

    /// Recomputed from the field on every call
    pub fn progress(&self) -> FillProgress {
        FillProgress {
            filled: extract_fill_values(self.input.text()).len(),
            total: self.placeholder_count,
        }
    }

    pub fn submit(&self) -> FormResult {
        let values = extract_fill_values(self.input.text());
        if values.is_empty() {
            return FormResult::Empty;
        }
        FormResult::Insert(substitute_positional(&self.snippet.content, &values))
    }

    /// Route a key press. Every key is kept from the host page while the
    /// form is open.
    pub fn handle_key(&mut self, input: &KeyInput) -> (FormKeyOutcome, KeyDisposition) {
        match input.named_key() {
            Some(NamedKey::Escape) => (FormKeyOutcome::Cancelled, KeyDisposition::CONSUME),
            Some(NamedKey::Enter) if input.has_line_break_modifier() => {
                self.input.insert_newline();
                (FormKeyOutcome::Edited, KeyDisposition::CONSUME)
            }
            Some(NamedKey::Enter) => (FormKeyOutcome::Submitted, KeyDisposition::CONSUME),
            _ if self.input.handle_key(input) => {
                (FormKeyOutcome::Edited, KeyDisposition::CONSUME)
            }
            _ => (FormKeyOutcome::Ignored, KeyDisposition::STOP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Modifiers;

    fn form(content: &str) -> PlaceholderForm {
        PlaceholderForm::new(Snippet::new("t", content))
    }

    fn type_str(form: &mut PlaceholderForm, s: &str) {
        for ch in s.chars() {
            form.handle_key(&KeyInput::char(ch));
        }
    }

    #[test]
    fn test_counter_tracks_typing() {
        let mut f = form("{{a}} {{b}}");
        assert_eq!(f.progress().label(), "0/2");
        type_str(&mut f, "{{x}}");
        assert_eq!(f.progress().label(), "1/2");
        assert!(!f.progress().is_complete());
        type_str(&mut f, "{{y");
        assert_eq!(f.progress().filled, 1);
        type_str(&mut f, "}}");
        assert!(f.progress().is_complete());
    }

    #[test]
    fn test_overfilled_is_complete() {
        let mut f = form("{{a}}");
        f.set_text("{{1}}{{2}}");
        assert_eq!(f.progress(), FillProgress { filled: 2, total: 1 });
        assert!(f.progress().is_complete());
    }

    #[test]
    fn test_plain_enter_submits() {
        let mut f = form("Fix: {{bug}}");
        type_str(&mut f, "{{null pointer}}");
        let (outcome, disposition) = f.handle_key(&KeyInput::named(NamedKey::Enter));
        assert_eq!(outcome, FormKeyOutcome::Submitted);
        assert_eq!(disposition, KeyDisposition::CONSUME);
        assert_eq!(
            f.submit(),
            FormResult::Insert("Fix: null pointer".to_string())
        );
    }

    #[test]
    fn test_modified_enter_inserts_newline() {
        for modifier in [Modifiers::SHIFT, Modifiers::CONTROL, Modifiers::META] {
            let mut f = form("{{a}}");
            let (outcome, _) =
                f.handle_key(&KeyInput::named(NamedKey::Enter).with_modifiers(modifier));
            assert_eq!(outcome, FormKeyOutcome::Edited);
            assert_eq!(f.input().text(), "\n");
        }
    }

    #[test]
    fn test_submit_without_tokens_is_empty() {
        let mut f = form("{{a}}");
        type_str(&mut f, "just words");
        assert_eq!(f.submit(), FormResult::Empty);
    }

    #[test]
    fn test_partial_fill_leaves_rest() {
        let mut f = form("{{a}}, {{b}}");
        f.set_text("{{one}}");
        assert_eq!(f.submit(), FormResult::Insert("one, {{b}}".to_string()));
    }

    #[test]
    fn test_escape_cancels() {
        let mut f = form("{{a}}");
        type_str(&mut f, "{{x}}");
        let (outcome, disposition) = f.handle_key(&KeyInput::named(NamedKey::Escape));
        assert_eq!(outcome, FormKeyOutcome::Cancelled);
        assert!(disposition.stop_propagation);
    }

    #[test]
    fn test_every_key_stops_propagation() {
        let mut f = form("{{a}}");
        let (outcome, disposition) = f.handle_key(&KeyInput::named(NamedKey::Tab));
        assert_eq!(outcome, FormKeyOutcome::Ignored);
        assert!(disposition.stop_propagation);
        let (_, disposition) = f.handle_key(&KeyInput::char('q'));
        assert!(disposition.stop_propagation);
    }

    #[test]
    fn test_preview_marks_placeholders() {
        let f = form("Hi {{name}}");
        assert_eq!(
            f.preview(),
            vec![
                PreviewSegment::Text("Hi ".to_string()),
                PreviewSegment::Placeholder("{{name}}".to_string()),
            ]
        );
    }
}
