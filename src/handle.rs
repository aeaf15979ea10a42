use crate::engine::SearchEngine;
use crate::error::LoaderError;
use crate::loader::DocumentLoader;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Owned cache for a built engine.
///
/// Builds lazily on first `get`. A rebuild constructs a whole new engine
/// before swapping it in, so readers holding the previous `Arc` finish their
/// queries against a consistent snapshot.
#[derive(Debug)]
pub struct EngineHandle {
    loader: DocumentLoader,
    current: RwLock<Option<Arc<SearchEngine>>>,
    generation: AtomicU64,
    /// Bumped on every swap and invalidation, only while holding `current`
    epoch: AtomicU64,
}

impl EngineHandle {
    pub fn new(loader: DocumentLoader) -> Self {
        Self {
            loader,
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn loader(&self) -> &DocumentLoader {
        &self.loader
    }

    /// Return the cached engine, building it if the cache is empty
    pub fn get(&self) -> Result<Arc<SearchEngine>, LoaderError> {
        if let Some(engine) = self.current.read().unwrap().as_ref() {
            return Ok(Arc::clone(engine));
        }

        let mut slot = self.current.write().unwrap();
        // Another caller may have filled the slot while we waited
        if let Some(engine) = slot.as_ref() {
            return Ok(Arc::clone(engine));
        }

        let engine = Arc::new(self.loader.build()?);
        *slot = Some(Arc::clone(&engine));
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(engine)
    }

    /// Drop the cached engine; the next `get` rebuilds from disk
    pub fn invalidate(&self) {
        let mut slot = self.current.write().unwrap();
        slot.take();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        drop(slot);
        tracing::info!("Search engine cache invalidated");
    }

    /// Build a fresh engine and swap it in.
    ///
    /// If the cache is invalidated or replaced while the build runs, the
    /// result may reflect an outdated document set and the build is retried.
    /// On failure the previous engine stays in place.
    pub fn rebuild(&self) -> Result<Arc<SearchEngine>, LoaderError> {
        self.rebuild_with(|| self.loader.build())
    }

    fn rebuild_with<F>(&self, mut build: F) -> Result<Arc<SearchEngine>, LoaderError>
    where
        F: FnMut() -> Result<SearchEngine, LoaderError>,
    {
        loop {
            let started = self.epoch.load(Ordering::SeqCst);
            let engine = Arc::new(build()?);

            let mut slot = self.current.write().unwrap();
            if self.epoch.load(Ordering::SeqCst) != started {
                tracing::debug!("Cache changed during rebuild, building again");
                continue;
            }

            *slot = Some(Arc::clone(&engine));
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.generation.fetch_add(1, Ordering::SeqCst);
            return Ok(engine);
        }
    }

    pub fn is_cached(&self) -> bool {
        self.current.read().unwrap().is_some()
    }

    /// Number of engines built so far
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoaderConfig;
    use anyhow::Result;
    use std::fs;

    fn handle_for(dir: &std::path::Path) -> EngineHandle {
        EngineHandle::new(DocumentLoader::new(LoaderConfig::new(dir)))
    }

    #[test]
    fn test_get_builds_once() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.txt"), "cached engine")?;
        let handle = handle_for(dir.path());

        assert!(!handle.is_cached());
        let first = handle.get()?;
        let second = handle.get()?;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(handle.generation(), 1);
        Ok(())
    }

    #[test]
    fn test_invalidate_picks_up_new_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.txt"), "first file")?;
        let handle = handle_for(dir.path());

        let before = handle.get()?;
        assert_eq!(before.document_count(), 1);

        fs::write(dir.path().join("b.txt"), "second file")?;
        assert_eq!(handle.get()?.document_count(), 1);

        handle.invalidate();
        assert!(!handle.is_cached());
        let after = handle.get()?;

        assert_eq!(after.document_count(), 2);
        assert_eq!(before.document_count(), 1);
        assert_eq!(handle.generation(), 2);
        Ok(())
    }

    #[test]
    fn test_rebuild_swaps_in_place() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.txt"), "alpha")?;
        fs::write(dir.path().join("b.txt"), "beta")?;
        let handle = handle_for(dir.path());

        let old = handle.get()?;
        fs::remove_file(dir.path().join("b.txt"))?;
        let new = handle.rebuild()?;

        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(old.search("beta").len(), 1);
        assert!(handle.get()?.search("beta").is_empty());
        Ok(())
    }

    #[test]
    fn test_rebuild_racing_invalidate_is_not_stale() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("a.txt"), "alpha")?;
        let handle = handle_for(dir.path());
        handle.get()?;

        let mut builds = 0;
        let engine = handle.rebuild_with(|| {
            builds += 1;
            let built = handle.loader().build();
            if builds == 1 {
                // The document set changes after this build read it
                fs::write(dir.path().join("b.txt"), "beta").unwrap();
                handle.invalidate();
            }
            built
        })?;

        assert_eq!(builds, 2);
        assert_eq!(engine.document_count(), 2);
        assert!(Arc::ptr_eq(&engine, &handle.get()?));
        assert_eq!(handle.get()?.search("beta").len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_rebuild_keeps_previous_engine() -> Result<()> {
        let root = tempfile::tempdir()?;
        let docs = root.path().join("docs");
        fs::create_dir(&docs)?;
        fs::write(docs.join("a.txt"), "survivor")?;

        let config = LoaderConfig::new(&docs).with_create_missing(false);
        let handle = EngineHandle::new(DocumentLoader::new(config));
        handle.get()?;

        fs::remove_dir_all(&docs)?;
        assert!(handle.rebuild().is_err());
        assert_eq!(handle.get()?.search("survivor").len(), 1);
        Ok(())
    }
}
