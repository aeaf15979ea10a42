use crate::document::{DocId, Posting};
use crate::tokenizer::count_terms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inverted index: term -> postings in document ingestion order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InvertedIndex {
    index: HashMap<String, Vec<Posting>>,
    doc_count: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            doc_count: 0,
        }
    }

    /// Add a document's tokens to the index.
    ///
    /// Counts are aggregated per distinct term, so each term gets exactly one
    /// posting for this document. Callers must add documents in increasing id
    /// order to keep postings lists ordered.
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[String]) {
        for (term, count) in count_terms(tokens) {
            let postings = self.index.entry(term).or_insert_with(Vec::new);

            match postings.last_mut() {
                Some(last) if last.document_id == doc_id => last.term_frequency += count,
                _ => postings.push(Posting::new(doc_id, count)),
            }
        }

        self.doc_count += 1;
    }

    /// Get the postings list for a term
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.index.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Get number of documents containing a term (for IDF calculation)
    pub fn doc_frequency(&self, term: &str) -> usize {
        self.index.get(term).map(|postings| postings.len()).unwrap_or(0)
    }

    /// Get total number of indexed documents
    pub fn total_documents(&self) -> usize {
        self.doc_count
    }

    /// Get all terms in the index
    pub fn all_terms(&self) -> Vec<&String> {
        self.index.keys().collect()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        let total_postings = self.index.values().map(|v| v.len()).sum::<usize>();

        IndexStats {
            total_documents: self.doc_count,
            total_terms: self.index.len(),
            total_postings,
            avg_docs_per_term: if self.index.is_empty() {
                0.0
            } else {
                total_postings as f64 / self.index.len() as f64
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_terms: usize,
    pub total_postings: usize,
    pub avg_docs_per_term: f64,
}
