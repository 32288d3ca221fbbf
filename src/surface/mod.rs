//! Editable surfaces - uniform text and caret access over host elements
//!
//! Three kinds of element can hold editable text:
//! - value-bearing fields (`<input>`, `<textarea>`): caret is an index into
//!   the value string
//! - shadowed fields: value fields whose page framework keeps its own copy
//!   of the value and only resynchronises on change notifications
//! - rich regions (`contenteditable`): text lives in child text nodes; the
//!   caret is measured as rendered text length up to the selection focus
//!
//! The kind is picked once, by [`attach`], from what the element can do.
//! All offsets are char indices into [`Surface::text`].

mod rich_region;
mod value_field;

use thiserror::Error;
use tracing::debug;

pub use rich_region::{DomPoint, RichRegion};
pub use value_field::{ShadowedField, ValueField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    ValueField,
    ShadowedField,
    RichRegion,
}

impl SurfaceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValueField => "value_field",
            Self::ShadowedField => "shadowed_field",
            Self::RichRegion => "rich_region",
        }
    }
}

/// Selection in a surface's text
/// anchor = where selection started, focus = where it ends (the live caret)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionRange {
    pub anchor: usize,
    pub focus: usize,
}

impl SelectionRange {
    pub fn caret(pos: usize) -> Self {
        Self {
            anchor: pos,
            focus: pos,
        }
    }

    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Get selection as ordered range (start, end)
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.focus {
            (self.anchor, self.focus)
        } else {
            (self.focus, self.anchor)
        }
    }

    pub(crate) fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            focus: self.focus.min(len),
        }
    }
}

/// Notifications dispatched to the host page after a programmatic edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeNotification {
    Input,
    Change,
}

/// How an edit was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMethod {
    /// Platform editing primitive, recorded in the native undo history
    Native,
    /// Manual splice, invisible to native undo
    Splice,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EditError {
    #[error("native editing is not available on this surface")]
    NativeUnavailable,
    #[error("surface has no selection to edit at")]
    NoSelection,
}

/// Element bounding box in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Uniform editing operations over one host element
pub trait Surface {
    fn kind(&self) -> SurfaceKind;

    /// Element identity, used to tell the active element from others
    fn element_id(&self) -> &str;

    /// Plain text as rendered
    fn text(&self) -> String;

    fn selection(&self) -> SelectionRange;

    /// Caret used for matching: the selection collapsed to its end
    fn caret(&self) -> usize {
        self.selection().range().1
    }

    fn set_selection(&mut self, selection: SelectionRange);

    /// Delete `[start, end)` with the platform primitive
    fn native_delete(&mut self, start: usize, end: usize) -> Result<(), EditError>;

    /// Delete `[start, end)` by direct manipulation
    fn splice_delete(&mut self, start: usize, end: usize) -> Result<(), EditError>;

    /// Insert at the selection, replacing it, with the platform primitive
    fn native_insert(&mut self, text: &str) -> Result<(), EditError>;

    /// Insert at the selection, replacing it, by direct manipulation
    fn splice_insert(&mut self, text: &str) -> Result<(), EditError>;

    /// Dispatch the page's standard change notifications
    fn notify_changed(&mut self);

    /// Notifications dispatched so far, oldest first
    fn notifications(&self) -> &[ChangeNotification];

    /// Revert the most recent native edit. Returns false if there is none.
    fn undo(&mut self) -> bool;

    /// The page re-renders the element from its own state. Only surfaces
    /// whose framework keeps a copy of the value are affected.
    fn rerender(&mut self) {}

    fn bounds(&self) -> Rect;
}

/// Capabilities of a host element, as observed by the host
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostElement {
    pub id: String,
    pub tag: String,
    /// `value` property, present on form fields
    pub value: Option<String>,
    /// Live selection, if the element has one
    pub selection: Option<SelectionRange>,
    pub content_editable: bool,
    /// Text of each child text node, for editable regions
    pub text_nodes: Vec<String>,
    /// The page framework mirrors this field's value in its own state
    pub framework_managed: bool,
    /// The document exposes native text editing commands
    pub native_editing: bool,
    pub bounds: Rect,
}

impl HostElement {
    pub fn input(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: "input".to_string(),
            value: Some(value.into()),
            native_editing: true,
            ..Self::default()
        }
    }

    pub fn textarea(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: "textarea".to_string(),
            ..Self::input(id, value)
        }
    }

    pub fn content_editable<I, S>(id: impl Into<String>, text_nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tag: "div".to_string(),
            content_editable: true,
            text_nodes: text_nodes.into_iter().map(Into::into).collect(),
            native_editing: true,
            ..Self::default()
        }
    }

    /// An element with no editing capability at all
    pub fn other(id: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_selection(mut self, selection: SelectionRange) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_caret(self, caret: usize) -> Self {
        self.with_selection(SelectionRange::caret(caret))
    }

    pub fn framework_managed(mut self) -> Self {
        self.framework_managed = true;
        self
    }

    pub fn without_native_editing(mut self) -> Self {
        self.native_editing = false;
        self
    }

    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Pick the surface implementation for an element by inspecting what it can
/// do. Returns None for elements that cannot hold editable text.
pub fn attach(element: HostElement) -> Option<Box<dyn Surface>> {
    let surface: Box<dyn Surface> = if element.value.is_some() {
        if element.framework_managed {
            Box::new(ShadowedField::from_element(element))
        } else {
            Box::new(ValueField::from_element(element))
        }
    } else if element.content_editable {
        Box::new(RichRegion::from_element(element))
    } else {
        debug!(id = %element.id, tag = %element.tag, "Element is not editable");
        return None;
    };
    debug!(
        id = surface.element_id(),
        kind = surface.kind().as_str(),
        "Attached surface"
    );
    Some(surface)
}

/// Convert a char index to a byte index, clamping to the end
pub(crate) fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
