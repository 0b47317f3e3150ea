//! # Pattern Matcher
//!
//! Stateless regex scans over an immutable document string. Every scan starts
//! from scratch, so results always reflect the text handed in.
//!
//! Offsets are byte offsets. An offset that falls inside a multi-byte character
//! is snapped to the boundary that keeps results on the requested side of it:
//! back for backward scans, forward for forward scans. Offsets past the end are
//! clamped to the text length.

use std::ops::Range;

use indexmap::IndexSet;
use regex::{Captures, Regex};

use crate::error::TraceError;

/// A single regex match borrowed from the scanned text.
///
/// `captures[0]` is the whole match, followed by each capture group in order
/// (`None` when a group did not participate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    pub matched: &'t str,
    pub captures: Vec<Option<&'t str>>,
    /// Byte offset of the match start in the scanned text.
    pub index: usize,
}

impl<'t> Match<'t> {
    fn from_captures(caps: &Captures<'t>) -> Self {
        let (matched, index) = caps
            .get(0)
            .map_or(("", 0), |whole| (whole.as_str(), whole.start()));
        Self {
            matched,
            captures: caps.iter().map(|g| g.map(|m| m.as_str())).collect(),
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn end(&self) -> usize {
        self.index + self.matched.len()
    }

    pub fn range(&self) -> Range<usize> {
        self.index..self.end()
    }

    /// Value of capture group `group`, if it participated in the match.
    pub fn group(&self, group: usize) -> Option<&'t str> {
        self.captures.get(group).copied().flatten()
    }
}

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, TraceError> {
        Regex::new(pattern)
            .map(|regex| Self { regex })
            .map_err(|source| TraceError::invalid_pattern(pattern, source))
    }

    /// Pattern matching `literal` verbatim.
    pub fn literal(literal: &str) -> Result<Self, TraceError> {
        Self::new(&regex::escape(literal))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily yields every match in document order.
    ///
    /// Calling it again restarts the scan from the beginning.
    pub fn find_all<'t>(&self, text: &'t str) -> impl Iterator<Item = Match<'t>> {
        self.regex
            .captures_iter(text)
            .map(|caps| Match::from_captures(&caps))
    }

    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    /// De-duplicated values of capture group `group`, in first-seen order.
    ///
    /// Matches where the group did not participate contribute nothing.
    pub fn unique_capture_values(&self, text: &str, group: usize) -> Vec<String> {
        let values: IndexSet<&str> = self
            .regex
            .captures_iter(text)
            .filter_map(|caps| caps.get(group).map(|m| m.as_str()))
            .collect();
        values.into_iter().map(str::to_string).collect()
    }

    pub fn first<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.regex
            .captures(text)
            .map(|caps| Match::from_captures(&caps))
    }

    pub fn last<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.find_all(text).last()
    }

    /// Last match lying entirely inside `text[0, before)`.
    ///
    /// Scans the whole prefix, so this is linear in `before`.
    pub fn previous<'t>(&self, text: &'t str, before: usize) -> Option<Match<'t>> {
        let before = floor_char_boundary(text, before);
        self.last(&text[..before])
    }

    /// First match starting at or after `from`.
    ///
    /// Text before `from` still counts as context for anchors and word
    /// boundaries.
    pub fn next<'t>(&self, text: &'t str, from: usize) -> Option<Match<'t>> {
        let from = ceil_char_boundary(text, from);
        self.regex
            .captures_at(text, from)
            .map(|caps| Match::from_captures(&caps))
    }
}

pub fn find_all<'t>(text: &'t str, pattern: &str) -> Result<Vec<Match<'t>>, TraceError> {
    Ok(Pattern::new(pattern)?.find_all(text).collect())
}

pub fn count(text: &str, pattern: &str) -> Result<usize, TraceError> {
    Ok(Pattern::new(pattern)?.count(text))
}

pub fn unique_capture_values(
    text: &str,
    pattern: &str,
    group: usize,
) -> Result<Vec<String>, TraceError> {
    Ok(Pattern::new(pattern)?.unique_capture_values(text, group))
}

pub fn first_occurrence<'t>(text: &'t str, pattern: &str) -> Result<Option<Match<'t>>, TraceError> {
    Ok(Pattern::new(pattern)?.first(text))
}

pub fn last_occurrence<'t>(text: &'t str, pattern: &str) -> Result<Option<Match<'t>>, TraceError> {
    Ok(Pattern::new(pattern)?.last(text))
}

pub fn previous_occurrence<'t>(
    text: &'t str,
    before: usize,
    pattern: &str,
) -> Result<Option<Match<'t>>, TraceError> {
    Ok(Pattern::new(pattern)?.previous(text, before))
}

pub fn next_occurrence<'t>(
    text: &'t str,
    from: usize,
    pattern: &str,
) -> Result<Option<Match<'t>>, TraceError> {
    Ok(Pattern::new(pattern)?.next(text, from))
}

/// Largest character boundary that is `<= index`, clamped to the text length.
pub(crate) fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    (0..=index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}

/// Smallest character boundary that is `>= index`, clamped to the text length.
pub(crate) fn ceil_char_boundary(text: &str, index: usize) -> usize {
    (index..text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len())
}

/// Offset of the character following the one starting at `index`.
pub(crate) fn next_char_boundary(text: &str, index: usize) -> usize {
    let index = floor_char_boundary(text, index);
    text[index..]
        .chars()
        .next()
        .map_or(text.len(), |c| index + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn find_all_reports_index_and_groups() {
        let matches = find_all("A:1 B:2", r"(\w):(\d)").unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 0);
        assert_eq!(matches[0].matched, "A:1");
        assert_eq!(matches[0].captures, vec![Some("A:1"), Some("A"), Some("1")]);
        assert_eq!(matches[1].index, 4);
        assert_eq!(matches[1].group(2), Some("2"));
    }

    #[test]
    fn find_all_is_restartable() {
        let pattern = Pattern::new("a").unwrap();
        assert_eq!(pattern.find_all("banana").count(), 3);
        assert_eq!(pattern.find_all("banana").count(), 3);
    }

    #[test]
    fn count_matches_find_all_len() {
        assert_eq!(count("error, error, warning", "error").unwrap(), 2);
        assert_eq!(count("nothing here", "error").unwrap(), 0);
    }

    #[test]
    fn unique_capture_values_keep_first_seen_order() {
        let values = unique_capture_values("A:1 A:2 A:1", r"A:(\d)", 1).unwrap();
        assert_eq!(values, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn unique_capture_values_skip_non_participating_groups() {
        let values = unique_capture_values("x1 y x2", r"x(\d)|y", 1).unwrap();
        assert_eq!(values, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn first_and_last_occurrence() {
        let text = "one two one two";
        assert_eq!(first_occurrence(text, "two").unwrap().unwrap().index, 4);
        assert_eq!(last_occurrence(text, "two").unwrap().unwrap().index, 12);
        assert!(first_occurrence(text, "three").unwrap().is_none());
        assert!(last_occurrence(text, "three").unwrap().is_none());
    }

    #[rstest]
    #[case::before_second(8, Some(0))]
    #[case::after_second(15, Some(8))]
    #[case::partial_match_excluded(10, Some(0))]
    #[case::at_start(0, None)]
    #[case::past_end(100, Some(8))]
    fn previous_occurrence_scans_prefix(#[case] before: usize, #[case] expected: Option<usize>) {
        let text = "abc --- abc ---";
        let found = previous_occurrence(text, before, "abc").unwrap();
        assert_eq!(found.map(|m| m.index), expected);
    }

    #[rstest]
    #[case::from_start(0, Some(0))]
    #[case::inside_first(1, Some(8))]
    #[case::exactly_second(8, Some(8))]
    #[case::after_last(9, None)]
    #[case::past_end(100, None)]
    fn next_occurrence_resumes_at_index(#[case] from: usize, #[case] expected: Option<usize>) {
        let text = "abc --- abc ---";
        let found = next_occurrence(text, from, "abc").unwrap();
        assert_eq!(found.map(|m| m.index), expected);
    }

    #[test]
    fn match_at_offset_zero_is_a_match() {
        let found = next_occurrence("Start transaction", 0, "Start").unwrap();
        let found = found.expect("match at offset 0 must be reported");
        assert_eq!(found.index, 0);
        assert_eq!(found.range(), 0..5);
    }

    #[test]
    fn offsets_inside_multibyte_characters_are_snapped() {
        let text = "é abc é";
        // 1 is inside the leading two-byte 'é'
        assert_eq!(next_occurrence(text, 1, "é").unwrap().unwrap().index, 7);
        assert_eq!(next_occurrence(text, 1, "a").unwrap().unwrap().index, 3);
        assert!(previous_occurrence(text, 1, "é").unwrap().is_none());
        assert_eq!(previous_occurrence(text, 8, "é").unwrap().unwrap().index, 0);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = find_all("text", "(unclosed").unwrap_err();
        assert!(matches!(err, TraceError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn literal_pattern_escapes_metacharacters() {
        let pattern = Pattern::literal("a.b").unwrap();
        assert_eq!(pattern.count("a.b axb"), 1);
    }

    #[test]
    fn next_char_boundary_steps_over_multibyte() {
        assert_eq!(next_char_boundary("éa", 0), 2);
        assert_eq!(next_char_boundary("ab", 1), 2);
        assert_eq!(next_char_boundary("ab", 2), 2);
    }
}
