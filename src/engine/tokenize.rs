//! Word/punctuation tokenizer.

use regex::Regex;

use super::Tokenizer;

/// Splits text into runs of word characters and runs of punctuation.
///
/// Whitespace separates tokens and is never part of one, so `"can't stop."`
/// becomes `["can", "'", "t", "stop", "."]`. Word characters follow Unicode
/// rules, so accented and CJK letters stay inside words.
#[derive(Debug, Clone)]
pub struct WordPunctTokenizer {
    pattern: Regex,
}

impl WordPunctTokenizer {
    /// Create a tokenizer.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"\w+|[^\w\s]+").unwrap(),
        }
    }
}

impl Default for WordPunctTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for WordPunctTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
