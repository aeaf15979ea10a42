// Re-export main components
pub mod api;
pub mod document;
pub mod engine;
pub mod error;
pub mod handle;
pub mod index;
pub mod loader;
pub mod ranking;
pub mod tokenizer;

// Re-export commonly used types
pub use document::{DocId, Document, Posting, SearchResult};
pub use engine::SearchEngine;
pub use error::{IngestError, LoaderError};
pub use handle::EngineHandle;
pub use index::{IndexStats, InvertedIndex};
pub use loader::{DocumentLoader, LoaderConfig};
pub use tokenizer::{tokenize, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
