//! Normalized utterances

use std::fmt;

/// A normalized utterance
///
/// Lowercased, trimmed, with runs of inner whitespace collapsed to a single
/// space. Punctuation is kept; [`Utterance::words`] strips it from the edges
/// of each word for whole-word tests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Utterance {
    text: String,
}

impl Utterance {
    /// Normalize a raw transcript
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let text = raw
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Self { text }
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether nothing was said
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Words with surrounding punctuation removed
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text
            .split(' ')
            .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
            .filter(|w| !w.is_empty())
    }

    /// Number of words
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.words().count()
    }

    /// Whole-word containment
    #[must_use]
    pub fn has_word(&self, word: &str) -> bool {
        self.words().any(|w| w == word)
    }

    /// Substring containment
    #[must_use]
    pub fn contains(&self, phrase: &str) -> bool {
        self.text.contains(phrase)
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl From<&str> for Utterance {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
