//! Insertion & caret engine
//!
//! Every edit first tries the surface's native editing primitive, which
//! lands in the page's undo history. If the surface has none, the edit is
//! applied as a direct splice instead; that edit cannot be undone natively.

use tracing::{info, warn};

use crate::surface::{EditError, EditMethod, Surface};
use crate::trigger::TriggerDetector;

/// Delete `[start, end)` from the surface
pub fn delete_range(
    surface: &mut dyn Surface,
    start: usize,
    end: usize,
) -> Result<EditMethod, EditError> {
    match surface.native_delete(start, end) {
        Ok(()) => Ok(EditMethod::Native),
        Err(EditError::NativeUnavailable) => {
            warn!(
                kind = surface.kind().as_str(),
                "Native delete unavailable, splicing"
            );
            surface.splice_delete(start, end)?;
            Ok(EditMethod::Splice)
        }
        Err(e) => Err(e),
    }
}

/// Insert `text` at the surface's selection, replacing it, and leave the
/// caret after the inserted text. Fires the change notifications on success.
pub fn insert_text(surface: &mut dyn Surface, text: &str) -> Result<EditMethod, EditError> {
    let method = match surface.native_insert(text) {
        Ok(()) => EditMethod::Native,
        Err(EditError::NativeUnavailable) => {
            warn!(
                kind = surface.kind().as_str(),
                "Native insert unavailable, splicing (not undoable)"
            );
            surface.splice_insert(text)?;
            EditMethod::Splice
        }
        Err(e) => return Err(e),
    };
    surface.notify_changed();
    info!(
        element = surface.element_id(),
        chars = text.chars().count(),
        method = ?method,
        "Inserted text"
    );
    Ok(method)
}

/// Remove the trigger and query in front of the caret.
///
/// The span is derived again from the current text, so edits made while the
/// menu was open are honoured. Returns the deletion point, or None when no
/// trigger is active any more (nothing is changed then).
pub fn delete_trigger_span(
    surface: &mut dyn Surface,
    detector: &TriggerDetector,
) -> Result<Option<usize>, EditError> {
    let state = detector.detect(&surface.text(), surface.caret());
    let Some(matched) = state.active() else {
        return Ok(None);
    };
    let (start, end) = matched.span();
    delete_range(surface, start, end)?;
    Ok(Some(start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{attach, ChangeNotification, HostElement, RichRegion, SelectionRange};

    #[test]
    fn test_native_path_is_undoable() {
        let mut surface = attach(HostElement::input("f", "hello /fi")).unwrap();
        let detector = TriggerDetector::default();
        assert_eq!(delete_trigger_span(surface.as_mut(), &detector), Ok(Some(6)));
        assert_eq!(insert_text(surface.as_mut(), "Fix"), Ok(EditMethod::Native));
        assert_eq!(surface.text(), "hello Fix");
        assert_eq!(surface.caret(), 9);
        assert!(surface.undo());
        assert_eq!(surface.text(), "hello ");
    }

    #[test]
    fn test_fallback_splice_when_native_missing() {
        let mut surface =
            attach(HostElement::textarea("f", "a /x b").with_caret(4).without_native_editing())
                .unwrap();
        let detector = TriggerDetector::default();
        assert_eq!(delete_trigger_span(surface.as_mut(), &detector), Ok(Some(2)));
        assert_eq!(insert_text(surface.as_mut(), "XY"), Ok(EditMethod::Splice));
        assert_eq!(surface.text(), "a XY b");
        assert_eq!(surface.caret(), 4);
        assert!(!surface.undo());
    }

    #[test]
    fn test_insert_notifies_input_then_change() {
        let mut surface = attach(HostElement::input("f", "")).unwrap();
        insert_text(surface.as_mut(), "x").unwrap();
        assert_eq!(
            surface.notifications(),
            &[ChangeNotification::Input, ChangeNotification::Change]
        );
    }

    #[test]
    fn test_delete_trigger_span_without_trigger_is_noop() {
        let mut surface = attach(HostElement::input("f", "plain text")).unwrap();
        let detector = TriggerDetector::default();
        assert_eq!(delete_trigger_span(surface.as_mut(), &detector), Ok(None));
        assert_eq!(surface.text(), "plain text");
    }

    #[test]
    fn test_rich_region_without_selection_fails_cleanly() {
        let mut region = RichRegion::new("r", ["abc"]);
        assert_eq!(insert_text(&mut region, "x"), Err(EditError::NoSelection));
        assert_eq!(region.text(), "abc");
        assert!(region.notifications().is_empty());
    }

    #[test]
    fn test_rich_region_insert_replaces_selection() {
        let mut region = RichRegion::new("r", ["one ", "two"]);
        region.set_selection(SelectionRange::new(4, 7));
        insert_text(&mut region, "2").unwrap();
        assert_eq!(region.text(), "one 2");
        assert_eq!(region.caret(), 5);
    }
}
