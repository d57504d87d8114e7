pub mod config;
pub mod library;
pub mod progress;
pub mod records;

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use game_library_config::{Config, PathManager};
use game_library_core::LibraryView;
use game_library_sources::{fetch_library, LibraryBackend, LibraryData, RestBackend, SnapshotBackend, SnapshotStore};

use progress::Spinner;

/// Everything a command needs: settings, on-disk layout, and where to read from.
pub struct Session {
    pub config: Config,
    pub paths: PathManager,
    pub offline: bool,
}

impl Session {
    pub fn new(config: Config, paths: PathManager, offline: bool) -> Self {
        Self { config, paths, offline }
    }

    pub fn snapshot_store(&self) -> SnapshotStore {
        SnapshotStore::from_paths(&self.paths)
    }

    fn source_label(&self) -> String {
        if self.offline {
            let store = self.snapshot_store();
            match store.saved_at() {
                Some(saved) => format!(
                    "snapshot in {} (saved {})",
                    store.dir().display(),
                    saved.format("%Y-%m-%d %H:%M")
                ),
                None => format!("snapshot in {}", store.dir().display()),
            }
        } else {
            self.config.api.base_url.clone()
        }
    }

    /// Backend for reads: the REST API, or the saved snapshot when offline.
    pub fn backend(&self) -> Result<Box<dyn LibraryBackend>> {
        if self.offline {
            return Ok(Box::new(SnapshotBackend::new(self.snapshot_store())));
        }
        let backend = RestBackend::new(&self.config.api).wrap_err("Failed to create HTTP client")?;
        Ok(Box::new(backend))
    }

    /// Backend for writes. Fails when the selected backend is read-only.
    pub fn writable_backend(&self) -> Result<Box<dyn LibraryBackend>> {
        let backend = self.backend()?;
        if backend.is_read_only() {
            return Err(eyre!("Changes cannot be made with --offline; the snapshot is read-only"));
        }
        Ok(backend)
    }

    pub async fn fetch(&self) -> Result<LibraryData> {
        let backend = self.backend()?;
        self.fetch_from(backend.as_ref()).await
    }

    pub async fn fetch_from(&self, backend: &dyn LibraryBackend) -> Result<LibraryData> {
        let label = self.source_label();
        let spinner = Spinner::start(format!("Fetching library from {}...", label));
        let result = fetch_library(backend).await;
        spinner.finish();
        result.wrap_err_with(|| format!("Failed to fetch library from {}", label))
    }

    pub async fn library(&self) -> Result<LibraryView> {
        let data = self.fetch().await?;
        Ok(LibraryView::build(data.games, &data.reviews))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_offline_session_refuses_writes() {
        let temp = TempDir::new().unwrap();
        let paths = PathManager::with_base(temp.path());
        let session = Session::new(Config::default(), paths, true);

        assert!(session.backend().unwrap().is_read_only());
        assert!(session.writable_backend().is_err());
        assert!(session.source_label().starts_with("snapshot in "));
    }

    #[test]
    fn test_online_session_is_writable() {
        let temp = TempDir::new().unwrap();
        let paths = PathManager::with_base(temp.path());
        let session = Session::new(Config::default(), paths, false);

        assert!(session.writable_backend().is_ok());
        assert_eq!(session.source_label(), session.config.api.base_url);
    }
}
