//! Deferred insertions
//!
//! Commit runs in two phases. Phase 1 (trigger removal, anchor capture)
//! happens inside the event handler; phase 2 (the insertion) is queued here
//! and run on the next turn of the host's event loop, once focus has
//! settled back on the surface.

use std::collections::VecDeque;

use tracing::debug;

use crate::surface::SelectionRange;

/// Identifies one focus session on one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Text waiting to be inserted into a session's surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInsertion {
    pub session: SessionId,
    pub snippet_id: String,
    pub text: String,
    /// Selection to reapply right before inserting
    pub anchor: SelectionRange,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    pending: VecDeque<PendingInsertion>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, insertion: PendingInsertion) {
        debug!(
            session = insertion.session.0,
            snippet_id = %insertion.snippet_id,
            "Insertion scheduled"
        );
        self.pending.push_back(insertion);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn pop(&mut self) -> Option<PendingInsertion> {
        self.pending.pop_front()
    }

    /// Remove everything queued, oldest first
    pub fn drain(&mut self) -> Vec<PendingInsertion> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(n: u64) -> PendingInsertion {
        PendingInsertion {
            session: SessionId(n),
            snippet_id: format!("s{n}"),
            text: format!("t{n}"),
            anchor: SelectionRange::caret(n as usize),
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(pending(1));
        queue.schedule(pending(2));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().unwrap().session, SessionId(1));
        assert_eq!(queue.drain(), vec![pending(2)]);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }
}
