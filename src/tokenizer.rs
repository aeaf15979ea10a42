use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    // Letters, numbers and underscore; combining marks are separators
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("valid regex");
}

/// Splits text into lower-cased word terms.
///
/// A word is a maximal run of letters, numbers or underscores. Every other
/// character, including combining marks, is a separator. Index-time and
/// query-time text go through the same tokenizer so lookups stay consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer;

impl Tokenizer {
    pub fn new() -> Self {
        Self
    }

    /// Tokenize text into terms, preserving left-to-right order
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        WORD.find_iter(&text.to_lowercase())
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Tokenize and count raw term frequencies
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, usize> {
        count_terms(&self.tokenize(text))
    }
}

/// Shorthand for `Tokenizer::new().tokenize(text)`.
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer.tokenize(text)
}

/// Count occurrences of each distinct term in an already tokenized sequence.
pub fn count_terms(tokens: &[String]) -> HashMap<String, usize> {
    let mut frequencies = HashMap::new();
    for token in tokens {
        *frequencies.entry(token.clone()).or_insert(0) += 1;
    }
    frequencies
}
