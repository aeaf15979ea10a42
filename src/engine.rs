use crate::document::{DocId, Document, SearchResult};
use crate::error::IngestError;
use crate::index::{IndexStats, InvertedIndex};
use crate::ranking::rank_documents;
use crate::tokenizer::Tokenizer;
use std::path::Path;

/// In-memory TF-IDF search engine.
///
/// Built once by feeding it documents, then only read. `search` takes `&self`
/// and touches no shared mutable state, so a built engine can be queried from
/// many threads at once (wrap it in an `Arc`). To pick up a changed document
/// set, build a new engine and swap it in; see [`crate::EngineHandle`].
#[derive(Debug, Default)]
pub struct SearchEngine {
    documents: Vec<Document>,
    index: InvertedIndex,
    tokenizer: Tokenizer,
}

impl SearchEngine {
    /// Create an empty search engine
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            index: InvertedIndex::new(),
            tokenizer: Tokenizer::new(),
        }
    }

    /// Build an engine from `(source name, text)` pairs
    pub fn from_sources<I, N, C>(sources: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: AsRef<str>,
    {
        let mut engine = Self::new();
        for (name, content) in sources {
            engine.add_document(name.as_ref(), content.as_ref());
        }
        engine
    }

    /// Register one document.
    ///
    /// `source` may be a path; only its base name is kept as the filename.
    /// Content that yields no terms is skipped and `None` is returned.
    pub fn add_document(&mut self, source: &str, content: &str) -> Option<DocId> {
        match self.ingest(source, content, None) {
            Ok(doc_id) => Some(doc_id),
            Err(err) => {
                tracing::debug!("Skipping document: {}", err);
                None
            }
        }
    }

    /// Read a file as UTF-8 and register it, skipping it if that fails
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Option<DocId> {
        match self.try_add_file(path) {
            Ok(doc_id) => Some(doc_id),
            Err(err @ IngestError::Empty { .. }) => {
                tracing::debug!("Skipping document: {}", err);
                None
            }
            Err(err) => {
                tracing::warn!("Skipping document: {:#}", anyhow::Error::from(err));
                None
            }
        }
    }

    /// Read a file as UTF-8 and register it, reporting why it was skipped
    pub fn try_add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<DocId, IngestError> {
        let path = path.as_ref();

        let bytes = std::fs::read(path).map_err(|source| IngestError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8(bytes).map_err(|_| IngestError::Undecodable {
            path: path.to_path_buf(),
        })?;

        self.ingest(&path.to_string_lossy(), &content, Some(path))
    }

    fn ingest(
        &mut self,
        source: &str,
        content: &str,
        path: Option<&Path>,
    ) -> Result<DocId, IngestError> {
        let tokens = self.tokenizer.tokenize(content);
        if tokens.is_empty() {
            return Err(IngestError::Empty {
                source_name: source.to_string(),
            });
        }

        let doc_id = self.documents.len();
        let mut doc = Document::new(
            doc_id,
            base_name(source),
            content.to_string(),
            tokens.len(),
        );
        if let Some(path) = path {
            doc = doc.with_path(path.to_path_buf());
        }

        self.index.add_document(doc_id, &tokens);
        self.documents.push(doc);

        tracing::debug!(
            doc_id,
            source,
            total_words = tokens.len(),
            "Indexed document"
        );

        Ok(doc_id)
    }

    /// Rank all documents against a free-text query, most relevant first.
    ///
    /// Never fails: empty queries, unknown terms and an empty engine all
    /// produce an empty list.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let query_terms = self.tokenizer.tokenize(query);
        if query_terms.is_empty() {
            return Vec::new();
        }

        rank_documents(&query_terms, &self.index, &self.documents)
            .into_iter()
            .filter_map(|scored| {
                self.documents
                    .get(scored.doc_id)
                    .map(|doc| SearchResult::from_document(doc, scored.score))
            })
            .collect()
    }

    /// Get a document by ID
    pub fn get_document(&self, doc_id: DocId) -> Option<&Document> {
        self.documents.get(doc_id)
    }

    /// All stored documents in id order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    /// Get total document count
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// Last path component of a source name, or the name itself
fn base_name(source: &str) -> String {
    Path::new(source)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::sync::Arc;

    fn scenario_a() -> SearchEngine {
        SearchEngine::from_sources([("doc0.txt", "cat dog cat"), ("doc1.txt", "dog bird")])
    }

    #[test]
    fn test_engine_insert_and_search() {
        let mut engine = SearchEngine::new();

        assert_eq!(
            engine.add_document("rust.txt", "Rust is a systems programming language"),
            Some(0)
        );
        assert_eq!(
            engine.add_document("go.txt", "Go is a simple programming language"),
            Some(1)
        );
        assert_eq!(engine.add_document("c.txt", "C is old"), Some(2));

        let results = engine.search("systems");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].filename, "rust.txt");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_scenario_a_zero_score_match_is_kept() {
        let engine = scenario_a();
        let results = engine.search("cat");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 0);
        assert_eq!(results[0].total_words, 3);
        assert_eq!(results[0].score, 0.0);
    }

    #[test]
    fn test_scenario_a_negative_scores_ranked() {
        let engine = scenario_a();
        let results = engine.search("dog");

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].filename, "doc0.txt");
        assert_eq!(results[1].filename, "doc1.txt");
        assert!((results[0].score - (-0.135155)).abs() < 1e-5);
        assert!((results[1].score - (-0.202733)).abs() < 1e-5);
    }

    #[test]
    fn test_scenario_b_token_counts() {
        let mut engine = SearchEngine::new();
        let doc_id = engine.add_document("greeting.txt", "Hello, World! Hello...");

        let doc = engine.get_document(doc_id.unwrap()).unwrap();
        assert_eq!(doc.total_words, 3);
        assert_eq!(doc.content, "Hello, World! Hello...");
        assert_eq!(engine.index().postings("hello").unwrap()[0].term_frequency, 2);
        assert_eq!(engine.index().postings("world").unwrap()[0].term_frequency, 1);
    }

    #[test]
    fn test_scenario_c_punctuation_only_skipped() {
        let mut engine = SearchEngine::new();
        assert_eq!(engine.add_document("noise.txt", "!!! ??? ..."), None);
        assert_eq!(engine.add_document("blank.txt", "   "), None);
        assert_eq!(engine.document_count(), 0);
        assert_eq!(engine.index().total_documents(), 0);

        assert_eq!(engine.add_document("real.txt", "words here"), Some(0));
        assert_eq!(engine.document_count(), 1);
    }

    #[test]
    fn test_empty_queries_return_nothing() {
        let engine = scenario_a();
        assert!(engine.search("").is_empty());
        assert!(engine.search("   !!!").is_empty());
        assert!(engine.search("unicorn").is_empty());
    }

    #[test]
    fn test_zero_document_engine() {
        let engine = SearchEngine::new();
        assert!(engine.is_empty());
        assert!(engine.search("anything at all").is_empty());
    }

    #[test]
    fn test_results_sorted_descending() {
        let engine = SearchEngine::from_sources([
            ("a", "rust rust rust tokio"),
            ("b", "rust axum serde"),
            ("c", "python django"),
            ("d", "serde json"),
            ("e", "tokio runtime rust"),
            ("f", "go"),
        ]);
        let results = engine.search("rust serde tokio json");

        assert!(!results.is_empty());
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_source_paths_reduced_to_base_name() {
        let mut engine = SearchEngine::new();
        engine.add_document("docs/nested/report.txt", "quarterly report");
        assert_eq!(engine.documents()[0].filename, "report.txt");
        assert_eq!(engine.documents()[0].path, None);
    }

    #[test]
    fn test_add_file_and_skips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let good = dir.path().join("good.txt");
        let binary = dir.path().join("binary.txt");
        std::fs::write(&good, "plain text file")?;
        std::fs::write(&binary, [0xffu8, 0xfe, 0x00, 0x41])?;

        let mut engine = SearchEngine::new();
        assert_eq!(engine.add_file(&good), Some(0));
        assert_eq!(engine.add_file(&binary), None);
        assert_eq!(engine.add_file(dir.path().join("missing.txt")), None);

        assert!(matches!(
            engine.try_add_file(&binary),
            Err(IngestError::Undecodable { .. })
        ));
        assert!(matches!(
            engine.try_add_file(dir.path().join("missing.txt")),
            Err(IngestError::Unreadable { .. })
        ));

        assert_eq!(engine.document_count(), 1);
        let doc = engine.get_document(0).unwrap();
        assert_eq!(doc.filename, "good.txt");
        assert_eq!(doc.path.as_deref(), Some(good.as_path()));

        Ok(())
    }

    #[test]
    fn test_concurrent_searches() {
        let engine = Arc::new(scenario_a());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.search("dog bird"))
            })
            .collect();

        let expected = engine.search("dog bird");
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
