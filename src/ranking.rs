use crate::document::{DocId, Document};
use crate::index::InvertedIndex;
use std::collections::{BTreeMap, HashSet};

/// Smoothed inverse document frequency: `ln(N / (df + 1))`.
///
/// Not floored at zero. A term present in nearly every document gets a
/// negative weight.
pub fn idf(document_count: usize, document_frequency: usize) -> f64 {
    (document_count as f64 / (document_frequency as f64 + 1.0)).ln()
}

/// Raw in-document count normalized by document length
pub fn term_frequency(raw_count: usize, total_words: usize) -> f64 {
    raw_count as f64 / total_words as f64
}

/// Ranked search hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub doc_id: DocId,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(doc_id: DocId, score: f64) -> Self {
        Self { doc_id, score }
    }
}

/// Rank documents against query terms using TF-IDF.
///
/// Each distinct query term present in the index adds `tf * idf` to every
/// document in its postings. Documents never touched by a query term are left
/// out, even though touched ones may end at a score of zero or below. Ties
/// keep ascending id order.
pub fn rank_documents(
    query_terms: &[String],
    index: &InvertedIndex,
    documents: &[Document],
) -> Vec<ScoredDocument> {
    let document_count = index.total_documents();
    if document_count == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut scores: BTreeMap<DocId, f64> = BTreeMap::new();

    for term in query_terms {
        if !seen.insert(term.as_str()) {
            continue;
        }
        let Some(postings) = index.postings(term) else {
            continue;
        };

        let weight = idf(document_count, postings.len());

        for posting in postings {
            let Some(doc) = documents.get(posting.document_id) else {
                continue;
            };
            let tf = term_frequency(posting.term_frequency, doc.total_words);
            *scores.entry(posting.document_id).or_insert(0.0) += tf * weight;
        }
    }

    let mut scored_docs: Vec<ScoredDocument> = scores
        .into_iter()
        .map(|(doc_id, score)| ScoredDocument::new(doc_id, score))
        .collect();

    // Sort by score descending; sort_by is stable so ties stay in id order
    scored_docs.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored_docs
}
