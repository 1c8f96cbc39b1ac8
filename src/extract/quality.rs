//! Garbled-text detection.
//!
//! Decides whether a page's text is usable by combining three independent
//! signals: the share of unknown words and punctuation tokens, the share of
//! space characters, and the share of newline characters.

use std::collections::BTreeSet;
use std::fmt;

use super::options::QualityThresholds;
use crate::engine::{SpellChecker, Tokenizer};

/// Why a text was judged garbled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GarbleReason {
    /// Too many unknown words and punctuation tokens
    Misspellings {
        /// Unknown words plus non-alphanumeric tokens
        suspicious: usize,
        /// All non-whitespace tokens
        total: usize,
    },
    /// Too many space characters
    Spaces {
        /// Share of characters that are spaces
        ratio: f64,
    },
    /// Too many newline characters
    Newlines {
        /// Share of characters that are newlines
        ratio: f64,
    },
}

impl fmt::Display for GarbleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GarbleReason::Misspellings { suspicious, total } => {
                write!(f, "{} of {} tokens unknown or non-alphanumeric", suspicious, total)
            }
            GarbleReason::Spaces { ratio } => write!(f, "{:.0}% spaces", ratio * 100.0),
            GarbleReason::Newlines { ratio } => write!(f, "{:.0}% newlines", ratio * 100.0),
        }
    }
}

/// Judges whether page text is garbled.
pub struct QualityGate<'a> {
    tokenizer: &'a dyn Tokenizer,
    spell: Option<(&'a dyn SpellChecker, &'a str)>,
    thresholds: QualityThresholds,
}

impl<'a> QualityGate<'a> {
    /// Create a gate that only checks character ratios.
    pub fn new(tokenizer: &'a dyn Tokenizer, thresholds: QualityThresholds) -> Self {
        Self {
            tokenizer,
            spell: None,
            thresholds,
        }
    }

    /// Also check words against a dictionary for `language`.
    pub fn with_spell_checker(mut self, spell: &'a dyn SpellChecker, language: &'a str) -> Self {
        self.spell = Some((spell, language));
        self
    }

    /// Return the first signal that marks `text` as garbled, if any.
    pub fn assess(&self, text: &str) -> Option<GarbleReason> {
        if let Some((spell, language)) = self.spell {
            let tokens: Vec<String> = self
                .tokenizer
                .tokenize(text)
                .into_iter()
                .filter(|t| !t.trim().is_empty())
                .collect();
            let (alpha, nonalpha): (Vec<&String>, Vec<&String>) =
                tokens.iter().partition(|t| is_alphanumeric_word(t));

            let words: BTreeSet<String> = alpha.into_iter().cloned().collect();
            let unknown = spell.unknown_words(language, &words);

            let suspicious = unknown.len() + nonalpha.len();
            if suspicious as f64 > tokens.len() as f64 * self.thresholds.misspelling {
                return Some(GarbleReason::Misspellings {
                    suspicious,
                    total: tokens.len(),
                });
            }
        }

        let chars = text.chars().count();
        if chars == 0 {
            return None;
        }

        let spaces = text.chars().filter(|&c| c == ' ').count();
        let ratio = spaces as f64 / chars as f64;
        if ratio > self.thresholds.space {
            return Some(GarbleReason::Spaces { ratio });
        }

        let newlines = text.chars().filter(|&c| c == '\n').count();
        let ratio = newlines as f64 / chars as f64;
        if ratio > self.thresholds.newline {
            return Some(GarbleReason::Newlines { ratio });
        }

        None
    }

    /// Check whether `text` is garbled.
    pub fn is_garbled(&self, text: &str) -> bool {
        self.assess(text).is_some()
    }
}

/// A token made only of letters and digits.
fn is_alphanumeric_word(token: &str) -> bool {
    !token.is_empty() && token.chars().all(char::is_alphanumeric)
}

/// Check whether OCR output is too garbled to keep.
///
/// Dictionary checks run only when both `spell_language` and `spell` are
/// given.
pub fn detect_bad_ocr(
    text: &str,
    spell_language: Option<&str>,
    tokenizer: &dyn Tokenizer,
    spell: Option<&dyn SpellChecker>,
    thresholds: QualityThresholds,
) -> bool {
    let mut gate = QualityGate::new(tokenizer, thresholds);
    if let (Some(language), Some(spell)) = (spell_language, spell) {
        gate = gate.with_spell_checker(spell, language);
    }
    gate.is_garbled(text)
}

/// Share of characters that are letters or digits.
///
/// Exactly empty text scores 1 so that blank pages are not mistaken for
/// garbage; whitespace-only text scores 0.
pub fn alphanumeric_ratio(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }
    let alphanumeric = text.chars().filter(|c| c.is_alphanumeric()).count();
    alphanumeric as f64 / total as f64
}
