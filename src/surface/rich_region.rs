//! Rich editable regions (`contenteditable`)
//!
//! The region's text is spread over child text nodes that are never
//! flattened into one string. Selections are (node, offset) points; the flat
//! caret is the rendered text length from the region start to the focus
//! point. Edits select a range and replace its contents.

use super::{
    char_to_byte, ChangeNotification, EditError, HostElement, Rect, SelectionRange, Surface,
    SurfaceKind,
};

/// A position inside one text node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomPoint {
    pub node: usize,
    /// Char offset within the node
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DomSelection {
    anchor: DomPoint,
    focus: DomPoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    nodes: Vec<String>,
    selection: Option<DomSelection>,
}

#[derive(Debug, Clone)]
pub struct RichRegion {
    id: String,
    nodes: Vec<String>,
    selection: Option<DomSelection>,
    native_editing: bool,
    undo_stack: Vec<Snapshot>,
    notifications: Vec<ChangeNotification>,
    bounds: Rect,
}

impl RichRegion {
    /// A region with the given text nodes and no selection
    pub fn new<I, S>(id: impl Into<String>, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            nodes: nodes.into_iter().map(Into::into).collect(),
            selection: None,
            native_editing: true,
            undo_stack: Vec::new(),
            notifications: Vec::new(),
            bounds: Rect::default(),
        }
    }

    pub(crate) fn from_element(element: HostElement) -> Self {
        let mut region = Self::new(element.id, element.text_nodes);
        region.native_editing = element.native_editing;
        region.bounds = element.bounds;
        if let Some(selection) = element.selection {
            region.set_selection(selection);
        }
        region
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Live selection focus as a node point
    pub fn focus_point(&self) -> Option<DomPoint> {
        self.selection.map(|s| s.focus)
    }

    fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.chars().count()).sum()
    }

    /// Rendered text length from the region start up to `point`
    fn measure_to(&self, point: DomPoint) -> usize {
        let before: usize = self
            .nodes
            .iter()
            .take(point.node)
            .map(|n| n.chars().count())
            .sum();
        let within = self
            .nodes
            .get(point.node)
            .map(|n| point.offset.min(n.chars().count()))
            .unwrap_or(0);
        before + within
    }

    /// Node point for a flat offset. Boundaries resolve to the end of the
    /// earlier node.
    fn point_at(&self, offset: usize) -> DomPoint {
        let mut acc = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let len = node.chars().count();
            if offset <= acc + len {
                return DomPoint {
                    node: i,
                    offset: offset - acc,
                };
            }
            acc += len;
        }
        match self.nodes.len() {
            0 => DomPoint::default(),
            n => DomPoint {
                node: n - 1,
                offset: self.nodes[n - 1].chars().count(),
            },
        }
    }

    fn collapse_to(&mut self, offset: usize) {
        let point = self.point_at(offset);
        self.selection = Some(DomSelection {
            anchor: point,
            focus: point,
        });
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            selection: self.selection,
        }
    }

    /// Remove `[start, end)` from every node it overlaps; nodes left empty
    /// are dropped.
    fn delete_contents(&mut self, start: usize, end: usize) {
        let len = self.len();
        let (start, end) = (start.min(end).min(len), start.max(end).min(len));
        let mut node_start = 0;
        for node in self.nodes.iter_mut() {
            let node_len = node.chars().count();
            let node_end = node_start + node_len;
            let cut_start = start.max(node_start);
            let cut_end = end.min(node_end);
            if cut_start < cut_end {
                let b0 = char_to_byte(node, cut_start - node_start);
                let b1 = char_to_byte(node, cut_end - node_start);
                node.replace_range(b0..b1, "");
            }
            node_start = node_end;
        }
        self.nodes.retain(|n| !n.is_empty());
        self.collapse_to(start);
    }

    /// Replace the selection's contents with `text`.
    ///
    /// `as_new_node` inserts a fresh text node at the split point instead of
    /// extending the node under the caret.
    fn replace_selection(&mut self, text: &str, as_new_node: bool) -> Result<(), EditError> {
        let (start, end) = self.selection().range();
        if self.selection.is_none() {
            return Err(EditError::NoSelection);
        }
        self.delete_contents(start, end);
        let inserted = text.chars().count();
        if text.is_empty() {
            return Ok(());
        }

        if self.nodes.is_empty() {
            self.nodes.push(text.to_string());
        } else {
            let point = self.point_at(start);
            let node = &mut self.nodes[point.node];
            let split = char_to_byte(node, point.offset);
            if as_new_node {
                let right = node.split_off(split);
                let mut at = point.node + 1;
                if node.is_empty() {
                    self.nodes.remove(point.node);
                    at -= 1;
                }
                self.nodes.insert(at, text.to_string());
                if !right.is_empty() {
                    self.nodes.insert(at + 1, right);
                }
            } else {
                node.insert_str(split, text);
            }
        }
        self.collapse_to(start + inserted);
        Ok(())
    }
}

impl Surface for RichRegion {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::RichRegion
    }

    fn element_id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> String {
        self.nodes.concat()
    }

    /// With no live selection the region reports a caret at 0.
    fn selection(&self) -> SelectionRange {
        match self.selection {
            Some(sel) => SelectionRange::new(self.measure_to(sel.anchor), self.measure_to(sel.focus)),
            None => SelectionRange::caret(0),
        }
    }

    fn set_selection(&mut self, selection: SelectionRange) {
        let selection = selection.clamped(self.len());
        self.selection = Some(DomSelection {
            anchor: self.point_at(selection.anchor),
            focus: self.point_at(selection.focus),
        });
    }

    fn native_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        if !self.native_editing {
            return Err(EditError::NativeUnavailable);
        }
        self.undo_stack.push(self.snapshot());
        self.delete_contents(start, end);
        Ok(())
    }

    fn splice_delete(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        self.delete_contents(start, end);
        Ok(())
    }

    fn native_insert(&mut self, text: &str) -> Result<(), EditError> {
        if !self.native_editing {
            return Err(EditError::NativeUnavailable);
        }
        if self.selection.is_none() {
            return Err(EditError::NoSelection);
        }
        self.undo_stack.push(self.snapshot());
        self.replace_selection(text, false)
    }

    fn splice_insert(&mut self, text: &str) -> Result<(), EditError> {
        self.replace_selection(text, true)
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
                self.nodes = snapshot.nodes;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn region(nodes: &[&str], caret: usize) -> RichRegion {
        let mut region = RichRegion::new("r", nodes.iter().copied());
        region.set_selection(SelectionRange::caret(caret));
        region
    }

    #[test]
    fn test_caret_measures_across_nodes() {
        let mut r = RichRegion::new("r", ["hello ", "wörld"]);
        r.selection = Some(DomSelection {
            anchor: DomPoint { node: 1, offset: 2 },
            focus: DomPoint { node: 1, offset: 2 },
        });
        assert_eq!(r.caret(), 8);
        assert_eq!(r.text(), "hello wörld");
    }

    #[test]
    fn test_no_selection_is_caret_zero() {
        let r = RichRegion::new("r", ["abc"]);
        assert_eq!(r.caret(), 0);
        assert_eq!(r.focus_point(), None);
    }

    #[test]
    fn test_delete_across_node_boundary() {
        let mut r = region(&["hello /", "fi"], 9);
        r.splice_delete(6, 9).unwrap();
        assert_eq!(r.text(), "hello ");
        assert_eq!(r.nodes(), &["hello ".to_string()]);
        assert_eq!(r.caret(), 6);
    }

    #[test]
    fn test_native_insert_extends_node() {
        let mut r = region(&["ab", "cd"], 1);
        r.native_insert("XY").unwrap();
        assert_eq!(r.nodes(), &["aXYb".to_string(), "cd".to_string()]);
        assert_eq!(r.caret(), 3);
    }

    #[test]
    fn test_splice_insert_adds_text_node() {
        let mut r = region(&["ab", "cd"], 1);
        r.splice_insert("XY").unwrap();
        assert_eq!(
            r.nodes(),
            &["a".to_string(), "XY".to_string(), "b".to_string(), "cd".to_string()]
        );
        assert_eq!(r.text(), "aXYbcd");
        assert_eq!(r.caret(), 3);
    }

    #[test]
    fn test_splice_insert_at_node_end() {
        let mut r = region(&["hello "], 6);
        r.splice_insert("Fix").unwrap();
        assert_eq!(r.nodes(), &["hello ".to_string(), "Fix".to_string()]);
        assert_eq!(r.caret(), 9);
    }

    #[test]
    fn test_insert_into_empty_region() {
        let mut r = region(&[], 0);
        r.splice_insert("x").unwrap();
        assert_eq!(r.text(), "x");
        assert_eq!(r.caret(), 1);
    }

    #[test]
    fn test_insert_without_selection_fails() {
        let mut r = RichRegion::new("r", ["abc"]);
        assert_eq!(r.splice_insert("x"), Err(EditError::NoSelection));
        assert_eq!(r.native_insert("x"), Err(EditError::NoSelection));
        assert_eq!(r.text(), "abc");
    }

    #[test]
    fn test_insert_replaces_selection() {
        let mut r = RichRegion::new("r", ["one ", "two"]);
        r.set_selection(SelectionRange::new(2, 6));
        r.native_insert("-").unwrap();
        assert_eq!(r.text(), "on-o");
        assert_eq!(r.caret(), 3);
    }

    #[test]
    fn test_undo_restores_nodes() {
        let mut r = region(&["ab", "cd"], 4);
        r.native_delete(1, 3).unwrap();
        assert_eq!(r.text(), "ad");
        assert!(r.undo());
        assert_eq!(r.nodes(), &["ab".to_string(), "cd".to_string()]);
        assert_eq!(r.caret(), 4);
    }
}
