//! Trigger detection
//!
//! Derives the active lookup from the surface text and caret alone. It keeps
//! no state between calls, so running it on every text change corrects
//! itself after arbitrary edits, undo or paste.

/// Characters that end a lookup: once typed after the trigger the user has
/// moved on to prose.
const BREAK_CHARS: [char; 3] = [' ', '\n', '\t'];

/// A live lookup: a trigger character before the caret with no whitespace
/// between it and the caret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerMatch {
    /// Char offset of the trigger character
    pub trigger_offset: usize,
    /// Caret the match was derived at
    pub caret: usize,
    /// Text between the trigger and the caret
    pub query: String,
}

impl TriggerMatch {
    /// Char span `[start, end)` covering the trigger and the query
    pub fn span(&self) -> (usize, usize) {
        (self.trigger_offset, self.caret)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InactiveReason {
    EmptyText,
    NoTrigger,
    CrossedWhitespace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    Active(TriggerMatch),
    Inactive(InactiveReason),
}

impl MatchState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn active(&self) -> Option<&TriggerMatch> {
        match self {
            Self::Active(m) => Some(m),
            Self::Inactive(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerDetector {
    trigger: char,
}

impl Default for TriggerDetector {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_TRIGGER)
    }
}

impl TriggerDetector {
    pub fn new(trigger: char) -> Self {
        Self { trigger }
    }

    pub fn trigger(&self) -> char {
        self.trigger
    }

    /// Find the last trigger before `caret` (a char offset, clamped to the
    /// text) and return the query after it.
    pub fn detect(&self, text: &str, caret: usize) -> MatchState {
        if text.is_empty() {
            return MatchState::Inactive(InactiveReason::EmptyText);
        }

        let before: Vec<char> = text.chars().take(caret).collect();
        let caret = before.len();
        let Some(trigger_offset) = before.iter().rposition(|c| *c == self.trigger) else {
            return MatchState::Inactive(InactiveReason::NoTrigger);
        };

        let query: String = before[trigger_offset + 1..].iter().collect();
        if query.contains(BREAK_CHARS) {
            return MatchState::Inactive(InactiveReason::CrossedWhitespace);
        }

        MatchState::Active(TriggerMatch {
            trigger_offset,
            caret,
            query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str, caret: usize) -> MatchState {
        TriggerDetector::default().detect(text, caret)
    }

    #[test]
    fn test_match_at_end() {
        let state = detect("hello /fi", 9);
        let m = state.active().unwrap();
        assert_eq!(m.query, "fi");
        assert_eq!(m.trigger_offset, 6);
        assert_eq!(m.span(), (6, 9));
    }

    #[test]
    fn test_caret_mid_text() {
        // Text after the caret does not matter
        let state = detect("/hi there", 3);
        assert_eq!(state.active().unwrap().query, "hi");
    }

    #[test]
    fn test_bare_trigger_is_empty_query() {
        let state = detect("/", 1);
        assert_eq!(state.active().unwrap().query, "");
    }

    #[test]
    fn test_no_trigger_before_caret() {
        for (text, caret) in [("hello", 5), ("abc /x", 3), ("x/", 1), ("/", 0)] {
            assert_eq!(
                detect(text, caret),
                MatchState::Inactive(InactiveReason::NoTrigger),
                "{text:?} at {caret}"
            );
        }
    }

    #[test]
    fn test_whitespace_invalidates() {
        for text in ["/hi there", "/a\tb", "/line\nnext"] {
            let caret = text.chars().count();
            assert_eq!(
                detect(text, caret),
                MatchState::Inactive(InactiveReason::CrossedWhitespace),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_uses_last_trigger() {
        let state = detect("a/b /c d/ef", 11);
        let m = state.active().unwrap();
        assert_eq!(m.query, "ef");
        assert_eq!(m.trigger_offset, 8);
    }

    #[test]
    fn test_mid_word_trigger_still_matches() {
        let state = detect("and/or", 6);
        assert_eq!(state.active().unwrap().query, "or");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(detect("", 0), MatchState::Inactive(InactiveReason::EmptyText));
    }

    #[test]
    fn test_caret_past_end_is_clamped() {
        let state = detect("/ab", 50);
        let m = state.active().unwrap();
        assert_eq!(m.caret, 3);
        assert_eq!(m.query, "ab");
    }

    #[test]
    fn test_multibyte_offsets_are_chars() {
        let state = detect("héllo /fü", 9);
        let m = state.active().unwrap();
        assert_eq!(m.trigger_offset, 6);
        assert_eq!(m.query, "fü");
    }

    #[test]
    fn test_custom_trigger() {
        let state = TriggerDetector::new(';').detect("x ;sig", 6);
        assert_eq!(state.active().unwrap().query, "sig");
    }
}
