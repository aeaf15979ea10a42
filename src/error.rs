use std::path::PathBuf;
use thiserror::Error;

/// Why a document source was not ingested.
///
/// None of these abort a build. `SearchEngine::add_file` logs and drops them;
/// `SearchEngine::try_add_file` hands them back to callers that care.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 text", path.display())]
    Undecodable { path: PathBuf },

    #[error("{source_name} contains no searchable terms")]
    Empty { source_name: String },
}

/// Failures while discovering document sources on disk
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("document directory {} does not exist", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("failed to list document directory {}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write seed document {}", path.display())]
    Seed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
