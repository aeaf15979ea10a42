use crate::engine::SearchEngine;
use crate::error::LoaderError;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_DOCS_DIR: &str = "docs";
pub const DEFAULT_EXTENSION: &str = "txt";
pub const WELCOME_STEM: &str = "welcome";
pub const WELCOME_TEXT: &str = "Welcome to your new search engine! Add files in the Admin panel.";

/// Where and how to discover document files
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub docs_dir: PathBuf,
    /// File extension to index, without the leading dot
    pub extension: String,
    /// Write a welcome document when the directory holds no matching files
    pub seed_welcome: bool,
    /// Create `docs_dir` if it does not exist yet
    pub create_missing: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            seed_welcome: true,
            create_missing: true,
        }
    }
}

impl LoaderConfig {
    pub fn new<P: Into<PathBuf>>(docs_dir: P) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn with_seed_welcome(mut self, seed_welcome: bool) -> Self {
        self.seed_welcome = seed_welcome;
        self
    }

    pub fn with_create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

/// Finds document files on disk and builds engines from them
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    config: LoaderConfig,
}

impl DocumentLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// List matching files directly inside the document directory.
    ///
    /// Paths come back sorted by file name so ids are stable across builds.
    pub fn discover(&self) -> Result<Vec<PathBuf>, LoaderError> {
        let dir = &self.config.docs_dir;

        if !dir.is_dir() {
            if !self.config.create_missing {
                return Err(LoaderError::MissingDirectory { path: dir.clone() });
            }
            std::fs::create_dir_all(dir).map_err(|source| LoaderError::ReadDir {
                path: dir.clone(),
                source,
            })?;
        }

        let mut files = self.matching_files(dir)?;

        if files.is_empty() && self.config.seed_welcome {
            files.extend(self.seed_welcome(dir)?);
        }

        Ok(files)
    }

    fn matching_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoaderError> {
        let read_dir_err = |source| LoaderError::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(read_dir_err)? {
            let path = entry.map_err(read_dir_err)?.path();
            let matches = path.is_file()
                && path
                    .extension()
                    .map_or(false, |ext| ext == self.config.extension.as_str());
            if matches {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Name of the seed document, e.g. `welcome.txt`
    pub fn welcome_filename(&self) -> String {
        format!("{}.{}", WELCOME_STEM, self.config.extension)
    }

    /// Write the welcome document unless something already sits at its path
    fn seed_welcome(&self, dir: &Path) -> Result<Option<PathBuf>, LoaderError> {
        let path = dir.join(self.welcome_filename());

        let created = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(WELCOME_TEXT.as_bytes()));

        match created {
            Ok(()) => {
                tracing::info!("Seeded empty document directory with {}", path.display());
                Ok(Some(path))
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                tracing::debug!("Not seeding, {} already exists", path.display());
                Ok(None)
            }
            Err(source) => Err(LoaderError::Seed { path, source }),
        }
    }

    /// Build a fresh engine from every discovered file.
    ///
    /// Files that cannot be read or decoded are skipped, never fatal.
    pub fn build(&self) -> Result<SearchEngine, LoaderError> {
        let files = self.discover()?;
        let mut engine = SearchEngine::new();

        for path in &files {
            engine.add_file(path);
        }

        tracing::info!(
            "Indexed {} of {} files from {}",
            engine.document_count(),
            files.len(),
            self.config.docs_dir.display()
        );

        Ok(engine)
    }
}
