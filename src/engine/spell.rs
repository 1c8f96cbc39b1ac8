//! Word-list backed spell checker.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};

use super::SpellChecker;

/// Spell checker backed by per-language word lists.
///
/// Lookups are case-insensitive and unknown words are reported lowercased.
/// Purely numeric tokens (`"42"`, `"1984"`) are never reported.
#[derive(Debug, Clone, Default)]
pub struct WordListSpellChecker {
    languages: HashMap<String, HashSet<String>>,
}

impl WordListSpellChecker {
    /// Create a spell checker with no languages loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add words for a language, extending any words already loaded.
    pub fn add_words<I, S>(&mut self, language: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.languages.entry(language.to_string()).or_default();
        entry.extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
    }

    /// Builder form of [`add_words`](Self::add_words).
    pub fn with_words<I, S>(mut self, language: &str, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_words(language, words);
        self
    }

    /// Load a word list (one word per line, `#` starts a comment line).
    pub fn load_language<R: BufRead>(&mut self, language: &str, reader: R) -> Result<usize> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            words.push(word.to_string());
        }

        if words.is_empty() {
            return Err(Error::Dictionary(format!(
                "word list for '{}' contains no words",
                language
            )));
        }

        let count = words.len();
        self.add_words(language, words);
        log::debug!("Loaded {} words for language '{}'", count, language);
        Ok(count)
    }

    /// Load a word list from a file.
    pub fn load_language_file<P: AsRef<Path>>(&mut self, language: &str, path: P) -> Result<usize> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::Dictionary(format!("{}: {}", path.as_ref().display(), e))
        })?;
        self.load_language(language, BufReader::new(file))
    }

    /// Check whether a language has been loaded.
    pub fn has_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }
}

fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_numeric)
}

impl SpellChecker for WordListSpellChecker {
    fn unknown_words(&self, language: &str, words: &BTreeSet<String>) -> BTreeSet<String> {
        let Some(known) = self.languages.get(language) else {
            log::warn!("No word list loaded for language '{}'", language);
            return BTreeSet::new();
        };

        words
            .iter()
            .filter(|w| !is_numeric(w))
            .map(|w| w.to_lowercase())
            .filter(|w| !known.contains(w))
            .collect()
    }
}
