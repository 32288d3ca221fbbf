//! Value-bearing fields (`<input>`, `<textarea>`)
//!
//! Text is a single string and the selection is a pair of char indices into
//! it, so every edit is a string splice. Native edits additionally push an
//! undo snapshot, which is what distinguishes them from the fallback path.

use super::{
    char_to_byte, ChangeNotification, EditError, HostElement, Rect, SelectionRange, Surface,
    SurfaceKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    text: String,
    selection: SelectionRange,
}

#[derive(Debug, Clone)]
pub struct ValueField {
    id: String,
    text: String,
    selection: SelectionRange,
    native_editing: bool,
    undo_stack: Vec<Snapshot>,
    notifications: Vec<ChangeNotification>,
    bounds: Rect,
}

impl ValueField {
    /// A field holding `text` with the caret at the end
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            id: id.into(),
            text,
            selection: SelectionRange::caret(len),
            native_editing: true,
            undo_stack: Vec::new(),
            notifications: Vec::new(),
            bounds: Rect::default(),
        }
    }

    pub(crate) fn from_element(element: HostElement) -> Self {
        let mut field = Self::new(element.id, element.value.unwrap_or_default());
        if let Some(selection) = element.selection {
            field.selection = selection.clamped(field.len());
        }
        field.native_editing = element.native_editing;
        field.bounds = element.bounds;
        field
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            selection: self.selection,
        }
    }

    fn remove(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(len), end.min(len));
        let (start, end) = (start.min(end), start.max(end));
        let byte_start = char_to_byte(&self.text, start);
        let byte_end = char_to_byte(&self.text, end);
        self.text.replace_range(byte_start..byte_end, "");
        self.selection = SelectionRange::caret(start);
    }

    fn replace_selection(&mut self, insert: &str) {
        let (start, end) = self.selection.range();
        self.remove(start, end);
        let byte_pos = char_to_byte(&self.text, start);
        self.text.insert_str(byte_pos, insert);
        self.selection = SelectionRange::caret(start + insert.chars().count());
    }

    /// Overwrite the value the way a framework re-render does: no
    /// notification, caret clamped to the new length.
    pub(crate) fn overwrite(&mut self, text: &str) {
        self.text = text.to_string();
        self.selection = self.selection.clamped(self.len());
    }
}

impl Surface for ValueField {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::ValueField
    }

    fn element_id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> SelectionRange {
        self.selection
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        self.selection = selection.clamped(self.len());
    }

    fn native_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        if !self.native_editing {
            return Err(EditError::NativeUnavailable);
        }
        self.undo_stack.push(self.snapshot());
        self.remove(start, end);
        Ok(())
    }

    fn splice_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.remove(start, end);
        Ok(())
    }

    fn native_insert(&mut self, text: &str) -> Result<(), EditError> {
        if !self.native_editing {
            return Err(EditError::NativeUnavailable);
        }
        self.undo_stack.push(self.snapshot());
        self.replace_selection(text);
        Ok(())
    }

    fn splice_insert(&mut self, text: &str) -> Result<(), EditError> {
        self.replace_selection(text);
        Ok(())
    }

    fn notify_changed(&mut self) {
        self.notifications.push(ChangeNotification::Input);
        self.notifications.push(ChangeNotification::Change);
    }

    fn notifications(&self) -> &[ChangeNotification] {
        &self.notifications
    }

    fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.text = snapshot.text;
                self.selection = snapshot.selection;
                true
            }
            None => false,
        }
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// A value field whose page framework keeps a shadow copy of the value.
///
/// The framework copy only follows the field when an `input` notification
/// is dispatched. A re-render writes the framework copy back into the
/// field, so an edit that was never announced is lost.
#[derive(Debug, Clone)]
pub struct ShadowedField {
    field: ValueField,
    framework_value: String,
}

impl ShadowedField {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let field = ValueField::new(id, text);
        let framework_value = field.text.clone();
        Self {
            field,
            framework_value,
        }
    }

    pub(crate) fn from_element(element: HostElement) -> Self {
        let field = ValueField::from_element(element);
        let framework_value = field.text.clone();
        Self {
            field,
            framework_value,
        }
    }

    /// The framework's idea of the current value
    pub fn framework_value(&self) -> &str {
        &self.framework_value
    }
}

impl Surface for ShadowedField {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::ShadowedField
    }

    fn element_id(&self) -> &str {
        self.field.element_id()
    }

    fn text(&self) -> String {
        self.field.text()
    }

    fn selection(&self) -> SelectionRange {
        self.field.selection()
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        self.field.set_selection(selection);
    }

    fn native_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.field.native_delete(start, end)
    }

    fn splice_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.field.splice_delete(start, end)
    }

    fn native_insert(&mut self, text: &str) -> Result<(), EditError> {
        self.field.native_insert(text)
    }

    fn splice_insert(&mut self, text: &str) -> Result<(), EditError> {
        self.field.splice_insert(text)
    }

    fn notify_changed(&mut self) {
        self.field.notify_changed();
        self.framework_value = self.field.text.clone();
    }

    fn notifications(&self) -> &[ChangeNotification] {
        self.field.notifications()
    }

    fn undo(&mut self) -> bool {
        self.field.undo()
    }

    fn rerender(&mut self) {
        let value = self.framework_value.clone();
        self.field.overwrite(&value);
    }

    fn bounds(&self) -> Rect {
        self.field.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_caret_at_end() {
        let field = ValueField::new("f", "héllo");
        assert_eq!(field.caret(), 5);
        assert_eq!(field.text(), "héllo");
    }

    #[test]
    fn test_from_element_clamps_selection() {
        let field = ValueField::from_element(HostElement::input("f", "abc").with_caret(10));
        assert_eq!(field.caret(), 3);
    }

    #[test]
    fn test_splice_insert_replaces_selection() {
        let mut field = ValueField::new("f", "hello world");
        field.set_selection(SelectionRange::new(6, 11));
        field.splice_insert("there").unwrap();
        assert_eq!(field.text(), "hello there");
        assert_eq!(field.caret(), 11);
    }

    #[test]
    fn test_delete_moves_caret_to_start() {
        let mut field = ValueField::new("f", "hello /fi");
        field.splice_delete(6, 9).unwrap();
        assert_eq!(field.text(), "hello ");
        assert_eq!(field.caret(), 6);
    }

    #[test]
    fn test_native_edits_are_undoable() {
        let mut field = ValueField::new("f", "ab");
        field.native_insert("c").unwrap();
        assert_eq!(field.text(), "abc");
        assert!(field.undo());
        assert_eq!(field.text(), "ab");
        assert_eq!(field.caret(), 2);
        assert!(!field.undo());
    }

    #[test]
    fn test_splice_edits_skip_undo() {
        let mut field = ValueField::new("f", "ab");
        field.splice_insert("c").unwrap();
        assert!(!field.undo());
        assert_eq!(field.text(), "abc");
    }

    #[test]
    fn test_native_unavailable() {
        let mut field =
            ValueField::from_element(HostElement::input("f", "ab").without_native_editing());
        assert_eq!(field.native_insert("c"), Err(EditError::NativeUnavailable));
        assert_eq!(field.native_delete(0, 1), Err(EditError::NativeUnavailable));
        assert_eq!(field.text(), "ab");
    }

    #[test]
    fn test_notify_dispatches_input_then_change() {
        let mut field = ValueField::new("f", "");
        field.notify_changed();
        assert_eq!(
            field.notifications(),
            &[ChangeNotification::Input, ChangeNotification::Change]
        );
    }

    #[test]
    fn test_shadowed_field_syncs_only_on_notify() {
        let mut field = ShadowedField::new("f", "hi");
        field.splice_insert(" there").unwrap();
        assert_eq!(field.framework_value(), "hi");

        field.notify_changed();
        assert_eq!(field.framework_value(), "hi there");
        field.rerender();
        assert_eq!(field.text(), "hi there");
    }

    #[test]
    fn test_shadowed_field_rerender_drops_unannounced_edit() {
        let mut field = ShadowedField::new("f", "hi");
        field.splice_insert("!").unwrap();
        field.rerender();
        assert_eq!(field.text(), "hi");
        assert_eq!(field.caret(), 2);
    }
}
