// Ingredient autocomplete over the live query text
//
// Cursor positions count characters, not bytes.

use crate::recipe::Vocabulary;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

const SEPARATOR: &str = ", ";

/// Query text after a suggestion was committed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// The in-progress token the suggestions were chosen for
    pub token: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Suggester {
    limit: usize,
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGESTION_LIMIT)
    }
}

impl Suggester {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Up to `limit` vocabulary entries starting with the in-progress token,
    /// in vocabulary order
    pub fn suggest(&self, text: &str, cursor: usize, vocabulary: &Vocabulary) -> Suggestions {
        let token = in_progress_token(text, cursor, vocabulary);
        if token.is_empty() {
            return Suggestions {
                token,
                suggestions: Vec::new(),
            };
        }

        let suggestions = vocabulary
            .with_prefix(&token)
            .take(self.limit)
            .map(String::from)
            .collect();

        Suggestions { token, suggestions }
    }
}

/// Text before the cursor; a cursor past the end means the whole text
pub fn text_before_cursor(text: &str, cursor: usize) -> &str {
    let end = text
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[..end]
}

/// The last comma-separated piece before the cursor, trimmed
pub fn last_segment(text: &str, cursor: usize) -> &str {
    text_before_cursor(text, cursor)
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .trim()
}

/// The lower-cased word(s) being typed.
///
/// This is the last comma-separated segment before the cursor. When the
/// segment is a phrase such as "i have te", the longest trailing run of words
/// that prefixes a vocabulary entry is used instead ("te"), so free-form
/// speech or sentences still get suggestions.
pub fn in_progress_token(text: &str, cursor: usize, vocabulary: &Vocabulary) -> String {
    let segment = last_segment(text, cursor).to_lowercase();
    if segment.is_empty() {
        return segment;
    }

    let token = trailing_phrases(&segment)
        .find(|phrase| vocabulary.with_prefix(phrase).next().is_some())
        .unwrap_or(segment.as_str())
        .to_string();
    token
}

/// The segment itself, then each shorter suffix starting at a word boundary
fn trailing_phrases(segment: &str) -> impl Iterator<Item = &str> {
    let suffixes = segment
        .char_indices()
        .filter(|(_, c)| c.is_whitespace())
        .map(move |(i, c)| segment[i + c.len_utf8()..].trim_start())
        .filter(|suffix| !suffix.is_empty());

    std::iter::once(segment).chain(suffixes)
}

/// Replace the in-progress `token` at the end of the last segment before the
/// cursor with `suggestion`. Words of that segment before the token stay.
///
/// Segments are re-joined with ", " and a trailing ", " is added unless the
/// text already ended with a comma. Text after the cursor is dropped; the new
/// cursor sits at the end.
pub fn commit(text: &str, cursor: usize, token: &str, suggestion: &str) -> Completion {
    let mut parts: Vec<String> = text_before_cursor(text, cursor)
        .split(',')
        .map(|part| part.trim().to_string())
        .collect();
    if let Some(last) = parts.last_mut() {
        *last = replace_trailing_words(last, token.split_whitespace().count(), suggestion);
    }

    let mut composed = parts.join(SEPARATOR);
    if !text.ends_with(',') {
        composed.push_str(SEPARATOR);
    }

    Completion {
        cursor: composed.chars().count(),
        text: composed,
    }
}

/// Drop the last `count` words of `segment` and append `replacement`
fn replace_trailing_words(segment: &str, count: usize, replacement: &str) -> String {
    let words: Vec<&str> = segment.split_whitespace().collect();
    let kept = &words[..words.len().saturating_sub(count.max(1))];

    if kept.is_empty() {
        replacement.to_string()
    } else {
        format!("{} {replacement}", kept.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary(entries: &[&str]) -> Vocabulary {
        let mut vocab = Vocabulary::new();
        vocab.extend(entries.iter().copied());
        vocab
    }

    #[test]
    fn test_text_before_cursor_counts_chars() {
        assert_eq!(text_before_cursor("jeera, ghee", 5), "jeera");
        assert_eq!(text_before_cursor("dahi, chaî", 9), "dahi, cha");
        assert_eq!(text_before_cursor("salt", 99), "salt");
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("salt,  Tom", 10), "Tom");
        assert_eq!(last_segment("salt, ", 6), "");
        assert_eq!(last_segment("salt, tomato", 7), "t");
    }

    #[test]
    fn test_phrase_falls_back_to_trailing_words() {
        let vocab = vocabulary(&["tea leaves", "tomato", "turmeric"]);

        assert_eq!(in_progress_token("I have te", 9, &vocab), "te");
        assert_eq!(in_progress_token("Tea le", 6, &vocab), "tea le");
        assert_eq!(in_progress_token("xyz", 3, &vocab), "xyz");
    }

    #[test]
    fn test_suggest_bounded_and_ordered() {
        let vocab = vocabulary(&["salt", "sugar", "saffron", "sago", "sesame", "semolina", "soy"]);
        let suggester = Suggester::default();

        let result = suggester.suggest("rice, s", 7, &vocab);
        assert_eq!(result.token, "s");
        assert_eq!(
            result.suggestions,
            vec!["salt", "sugar", "saffron", "sago", "sesame"]
        );

        let result = Suggester::new(2).suggest("rice, SA", 8, &vocab);
        assert_eq!(result.suggestions, vec!["salt", "saffron"]);
    }

    #[test]
    fn test_no_suggestions_for_empty_token() {
        let vocab = vocabulary(&["salt"]);
        let suggester = Suggester::default();

        assert!(suggester.suggest("", 0, &vocab).suggestions.is_empty());
        assert!(suggester.suggest("salt, ", 6, &vocab).suggestions.is_empty());
        // text after the cursor does not count
        assert!(suggester.suggest("rice, salt", 6, &vocab).suggestions.is_empty());
    }

    #[test]
    fn test_commit_replaces_last_segment() {
        let completion = commit("rice,dal ,  tom", 15, "tom", "tomato");
        assert_eq!(completion.text, "rice, dal, tomato, ");
        assert_eq!(completion.cursor, 19);
    }

    #[test]
    fn test_commit_drops_text_after_cursor() {
        let completion = commit("rice, to, ghee", 8, "to", "tomato");
        assert_eq!(completion.text, "rice, tomato, ");
        assert_eq!(completion.cursor, 14);
    }

    #[test]
    fn test_commit_keeps_words_before_token() {
        let vocab = vocabulary(&["rice", "tomato", "sauce"]);
        let text = "rice, tomato sau";

        let token = in_progress_token(text, 16, &vocab);
        assert_eq!(token, "sau");

        let completion = commit(text, 16, &token, "sauce");
        assert_eq!(completion.text, "rice, tomato sauce, ");
        assert_eq!(completion.cursor, 20);

        // whole-segment tokens replace the whole segment
        let completion = commit("Tea le", 6, "tea le", "tea leaves");
        assert_eq!(completion.text, "tea leaves, ");
    }

    #[test]
    fn test_cursor_counts_astral_chars_once() {
        let vocab = vocabulary(&["tomato"]);
        // "🍅" is one char but two UTF-16 units and four bytes
        let text = "🍅, to";

        let result = Suggester::default().suggest(text, 5, &vocab);
        assert_eq!(result.suggestions, vec!["tomato"]);

        let completion = commit(text, 5, "to", "tomato");
        assert_eq!(completion.text, "🍅, tomato, ");
        assert_eq!(completion.cursor, 11);
    }

    #[test]
    fn test_commit_skips_separator_when_text_ends_with_comma() {
        let completion = commit("rice, to,", 8, "to", "tomato");
        assert_eq!(completion.text, "rice, tomato");
        assert_eq!(completion.cursor, 12);
    }
}
