use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sequential document identifier, assigned from 0 in ingestion order
pub type DocId = usize;

/// Document represents one ingested text source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub filename: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub content: String,
    pub total_words: usize,
}

impl Document {
    pub fn new(id: DocId, filename: String, content: String, total_words: usize) -> Self {
        Self {
            id,
            filename,
            path: None,
            content,
            total_words,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// One (term, document) occurrence record in the inverted index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub document_id: DocId,
    pub term_frequency: usize,
}

impl Posting {
    pub fn new(document_id: DocId, term_frequency: usize) -> Self {
        Self {
            document_id,
            term_frequency,
        }
    }
}

/// A ranked hit: a copy of the matched document's fields plus its score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: DocId,
    pub filename: String,
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub content: String,
    pub total_words: usize,
    pub score: f64,
}

impl SearchResult {
    pub fn from_document(doc: &Document, score: f64) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            path: doc.path.clone(),
            content: doc.content.clone(),
            total_words: doc.total_words,
            score,
        }
    }

    /// Leading excerpt of the content, at most `max_chars` characters
    pub fn snippet(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head.trim_end())
        } else {
            head
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(content: &str) -> SearchResult {
        let doc = Document::new(0, "a.txt".to_string(), content.to_string(), 1);
        SearchResult::from_document(&doc, 0.5)
    }

    #[test]
    fn test_result_copies_document_fields() {
        let doc = Document::new(3, "notes.txt".to_string(), "some notes".to_string(), 2)
            .with_path(PathBuf::from("docs/notes.txt"));
        let result = SearchResult::from_document(&doc, -0.25);

        assert_eq!(result.id, 3);
        assert_eq!(result.filename, "notes.txt");
        assert_eq!(result.path, Some(PathBuf::from("docs/notes.txt")));
        assert_eq!(result.content, "some notes");
        assert_eq!(result.total_words, 2);
        assert_eq!(result.score, -0.25);
    }

    #[test]
    fn test_snippet_short_content_untouched() {
        assert_eq!(result_with("short text").snippet(50), "short text");
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let snippet = result_with("héllo wörld and more").snippet(11);
        assert_eq!(snippet, "héllo wörld...");
    }
}
