//! Candidate filtering and ranking
//!
//! Order, highest first:
//! 1. the single most recently used match (largest `lastUsed`), whatever its
//!    favorite status
//! 2. remaining favorites, most recently edited first
//! 3. everything else, most recently edited first
//!
//! Ties keep storage order, so identical inputs always rank identically.

use std::cmp::Reverse;

use crate::snippet::Snippet;

/// Filter `snippets` by `query` (case-insensitive substring of the title or
/// any tag) and rank the matches.
pub fn rank_candidates<'a>(snippets: &'a [Snippet], query: &str) -> Vec<&'a Snippet> {
    let query_lower = query.to_lowercase();
    let matched: Vec<&Snippet> = snippets.iter().filter(|s| s.matches(&query_lower)).collect();

    let recent = most_recently_used(&matched);

    let (mut favorites, mut others): (Vec<&Snippet>, Vec<&Snippet>) = matched
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != recent)
        .map(|(_, s)| *s)
        .partition(|s| s.is_favorite);

    // Stable: equal edit times keep storage order
    favorites.sort_by_key(|s| Reverse(s.edit_recency()));
    others.sort_by_key(|s| Reverse(s.edit_recency()));

    let mut ranked = Vec::with_capacity(matched.len());
    if let Some(i) = recent {
        ranked.push(matched[i]);
    }
    ranked.extend(favorites);
    ranked.extend(others);
    ranked
}

/// Index of the match with the largest usage time; the earliest one wins a tie.
fn most_recently_used(matched: &[&Snippet]) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;
    for (i, snippet) in matched.iter().enumerate() {
        if let Some(used) = snippet.usage_time() {
            if best.map_or(true, |(_, t)| used > t) {
                best = Some((i, used));
            }
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(ranked: &[&Snippet]) -> Vec<String> {
        ranked.iter().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_filters_by_title_and_tag_case_insensitive() {
        let snippets = vec![
            Snippet::new("Fix bug", "a"),
            Snippet::new("greeting", "b").with_tags(["FIXtures"]),
            Snippet::new("other", "c"),
        ];
        let ranked = rank_candidates(&snippets, "fix");
        assert_eq!(ranked.len(), 2);
        assert!(!titles(&ranked).contains(&"other".to_string()));
    }

    #[test]
    fn test_content_is_not_searched() {
        let snippets = vec![Snippet::new("t", "fix inside body")];
        assert!(rank_candidates(&snippets, "fix").is_empty());
    }

    #[test]
    fn test_empty_query_matches_all() {
        let snippets = vec![Snippet::new("a", "1"), Snippet::new("b", "2")];
        assert_eq!(rank_candidates(&snippets, "").len(), 2);
    }

    #[test]
    fn test_most_recently_used_first_even_if_not_favorite() {
        let snippets = vec![
            Snippet::new("fav", "").favorite(true).updated(50),
            Snippet::new("used", "").updated(10).used(500),
            Snippet::new("older-use", "").favorite(true).updated(40).used(100),
        ];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(titles(&ranked), vec!["used", "fav", "older-use"]);
    }

    #[test]
    fn test_only_one_recent_in_head() {
        let snippets = vec![
            Snippet::new("a", "").updated(1).used(10),
            Snippet::new("b", "").updated(3).used(20),
            Snippet::new("c", "").updated(2).used(30),
        ];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(ranked[0].title, "c");
        // The rest fall back to edit order, usage ignored
        assert_eq!(titles(&ranked[1..]), vec!["b", "a"]);
    }

    #[test]
    fn test_recent_is_chosen_among_matches_only() {
        let snippets = vec![
            Snippet::new("zzz", "").used(999),
            Snippet::new("fix one", "").updated(1).used(5),
            Snippet::new("fix two", "").updated(2),
        ];
        let ranked = rank_candidates(&snippets, "fix");
        assert_eq!(titles(&ranked), vec!["fix one", "fix two"]);
    }

    #[test]
    fn test_favorites_before_others_by_updated_desc() {
        let snippets = vec![
            Snippet::new("o1", "").updated(100),
            Snippet::new("f1", "").favorite(true).updated(10),
            Snippet::new("o2", "").updated(200),
            Snippet::new("f2", "").favorite(true).updated(20),
        ];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(titles(&ranked), vec!["f2", "f1", "o2", "o1"]);
    }

    #[test]
    fn test_favorite_wins_tie_on_updated_at() {
        let snippets = vec![
            Snippet::new("plain", "").updated(100),
            Snippet::new("starred", "").favorite(true).updated(100),
        ];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(titles(&ranked), vec!["starred", "plain"]);
    }

    #[test]
    fn test_missing_updated_at_sorts_last() {
        let mut legacy = Snippet::new("legacy", "");
        legacy.updated_at = None;
        let snippets = vec![legacy, Snippet::new("fresh", "").updated(1)];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(titles(&ranked), vec!["fresh", "legacy"]);
    }

    #[test]
    fn test_zero_last_used_never_heads() {
        let snippets = vec![
            Snippet::new("a", "").updated(2),
            Snippet::new("b", "").updated(1).used(0),
        ];
        let ranked = rank_candidates(&snippets, "");
        assert_eq!(titles(&ranked), vec!["a", "b"]);
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let snippets = vec![
            Snippet::new("a", "").updated(5),
            Snippet::new("b", "").updated(5),
            Snippet::new("c", "").favorite(true).updated(5),
            Snippet::new("d", "").updated(5).used(7),
            Snippet::new("e", "").updated(5).used(7),
        ];
        let first = titles(&rank_candidates(&snippets, ""));
        let second = titles(&rank_candidates(&snippets, ""));
        assert_eq!(first, second);
        assert_eq!(first, vec!["d", "c", "a", "b", "e"]);
    }

    #[test]
    fn test_no_matches() {
        let snippets = vec![Snippet::new("a", "")];
        assert!(rank_candidates(&snippets, "zz").is_empty());
    }
}
