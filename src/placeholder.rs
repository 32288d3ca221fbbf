//! `{{placeholder}}` tokens
//!
//! Placeholders are positional: the i-th token the user types fills the i-th
//! placeholder occurrence in the content. Identical placeholder text appearing
//! twice is two independent slots, never one shared variable.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

fn token_regex() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    // Lazy: `}}` ends the token at the first closing pair
    TOKEN.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("Invalid regex"))
}

/// One `{{...}}` occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Full token including braces
    pub token: String,
    /// Byte range of the token in the source text
    pub range: Range<usize>,
}

impl Placeholder {
    /// Token text without the braces
    pub fn inner(&self) -> &str {
        &self.token[2..self.token.len() - 2]
    }
}

/// All tokens in `text`, left to right
pub fn extract_placeholders(text: &str) -> Vec<Placeholder> {
    token_regex()
        .find_iter(text)
        .map(|m| Placeholder {
            token: m.as_str().to_string(),
            range: m.range(),
        })
        .collect()
}

pub fn has_placeholders(text: &str) -> bool {
    token_regex().is_match(text)
}

/// Inner text of each `{{...}}` token the user typed, in order.
/// Anything between tokens is ignored.
pub fn extract_fill_values(input: &str) -> Vec<String> {
    extract_placeholders(input)
        .iter()
        .map(|p| p.inner().to_string())
        .collect()
}

/// Replace the i-th placeholder in `content` with `values[i]`, for as many
/// pairs as both sides have. Placeholders without a value stay as written.
pub fn substitute_positional(content: &str, values: &[String]) -> String {
    let mut result = String::with_capacity(content.len());
    let mut last = 0;
    for (placeholder, value) in extract_placeholders(content).iter().zip(values) {
        result.push_str(&content[last..placeholder.range.start]);
        result.push_str(value);
        last = placeholder.range.end;
    }
    result.push_str(&content[last..]);
    result
}

/// Piece of content for highlighted display
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewSegment {
    Text(String),
    Placeholder(String),
}

/// Split `content` into plain runs and placeholder tokens
pub fn preview_segments(content: &str) -> Vec<PreviewSegment> {
    let mut segments = Vec::new();
    let mut last = 0;
    for placeholder in extract_placeholders(content) {
        if placeholder.range.start > last {
            segments.push(PreviewSegment::Text(
                content[last..placeholder.range.start].to_string(),
            ));
        }
        last = placeholder.range.end;
        segments.push(PreviewSegment::Placeholder(placeholder.token));
    }
    if last < content.len() {
        segments.push(PreviewSegment::Text(content[last..].to_string()));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_in_order() {
        let found = extract_placeholders("Hi {{name}}, re: {{topic}}");
        let tokens: Vec<&str> = found.iter().map(|p| p.token.as_str()).collect();
        assert_eq!(tokens, vec!["{{name}}", "{{topic}}"]);
        assert_eq!(found[0].inner(), "name");
        assert_eq!(found[0].range, 3..11);
    }

    #[test]
    fn test_no_placeholders() {
        assert!(extract_placeholders("plain {text} here").is_empty());
        assert!(!has_placeholders("plain {text} here"));
        assert!(has_placeholders("a {{b}}"));
    }

    #[test]
    fn test_adjacent_and_empty_tokens() {
        let found = extract_placeholders("{{a}}{{}}{{b c}}");
        let inner: Vec<&str> = found.iter().map(|p| p.inner()).collect();
        assert_eq!(inner, vec!["a", "", "b c"]);
    }

    #[test]
    fn test_fill_values_ignore_text_between_tokens() {
        assert_eq!(
            extract_fill_values("junk {{one}} more {{two words}}"),
            values(&["one", "two words"])
        );
        assert!(extract_fill_values("no tokens, just { braces }").is_empty());
    }

    #[test]
    fn test_substitute_all() {
        let out = substitute_positional("Fix: {{bug}} in {{file}}", &values(&["leak", "main.rs"]));
        assert_eq!(out, "Fix: leak in main.rs");
    }

    #[test]
    fn test_substitute_fewer_values_leaves_rest() {
        let out = substitute_positional("{{a}}-{{b}}-{{c}}", &values(&["1"]));
        assert_eq!(out, "1-{{b}}-{{c}}");
    }

    #[test]
    fn test_substitute_extra_values_ignored() {
        let out = substitute_positional("x={{x}}", &values(&["1", "2", "3"]));
        assert_eq!(out, "x=1");
    }

    #[test]
    fn test_duplicate_placeholders_are_independent_slots() {
        // Same name twice is two positions, each filled separately
        let content = "{{name}} and {{name}}";
        assert_eq!(extract_placeholders(content).len(), 2);
        assert_eq!(
            substitute_positional(content, &values(&["Ann", "Bob"])),
            "Ann and Bob"
        );
        assert_eq!(
            substitute_positional(content, &values(&["Ann"])),
            "Ann and {{name}}"
        );
    }

    #[test]
    fn test_substitute_multibyte() {
        let out = substitute_positional("héllo {{wörld}}!", &values(&["ü"]));
        assert_eq!(out, "héllo ü!");
    }

    #[test]
    fn test_preview_segments() {
        assert_eq!(
            preview_segments("Fix: {{bug}} now"),
            vec![
                PreviewSegment::Text("Fix: ".to_string()),
                PreviewSegment::Placeholder("{{bug}}".to_string()),
                PreviewSegment::Text(" now".to_string()),
            ]
        );
        assert_eq!(
            preview_segments("{{a}}"),
            vec![PreviewSegment::Placeholder("{{a}}".to_string())]
        );
        assert!(preview_segments("").is_empty());
    }
}
