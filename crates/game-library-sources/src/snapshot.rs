use async_trait::async_trait;
use chrono::{DateTime, Utc};
use game_library_config::PathManager;
use game_library_models::{games_from_values, reviews_from_values, Game, RecordId, Review};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{BackendError, Result};
use crate::fetch::LibraryData;
use crate::traits::LibraryBackend;

const GAMES_FILE: &str = "games";
const REVIEWS_FILE: &str = "reviews";

/// On-disk copy of the last fetched library, used for offline runs.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_paths(path_manager: &PathManager) -> Self {
        Self::new(path_manager.snapshot_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn exists(&self) -> bool {
        self.file_path(GAMES_FILE).exists() && self.file_path(REVIEWS_FILE).exists()
    }

    /// Modification time of the games file, if a snapshot exists.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        let modified = std::fs::metadata(self.file_path(GAMES_FILE))
            .and_then(|meta| meta.modified())
            .ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    pub fn save(&self, library: &LibraryData) -> Result<()> {
        self.save_records(GAMES_FILE, &library.games)?;
        self.save_records(REVIEWS_FILE, &library.reviews)?;
        info!(
            "Snapshot saved to {} ({} games, {} reviews)",
            self.dir.display(),
            library.games.len(),
            library.reviews.len()
        );
        Ok(())
    }

    /// Load both collections. `None` when either file is missing or was corrupt.
    pub fn load(&self) -> Result<Option<LibraryData>> {
        let games = match self.load_values(GAMES_FILE)? {
            Some(values) => games_from_values(values),
            None => return Ok(None),
        };
        let reviews = match self.load_values(REVIEWS_FILE)? {
            Some(values) => reviews_from_values(values),
            None => return Ok(None),
        };
        Ok(Some(LibraryData { games, reviews }))
    }

    /// Load, treating a missing snapshot as an error.
    pub fn load_required(&self) -> Result<LibraryData> {
        self.load()?
            .ok_or_else(|| BackendError::MissingSnapshot(self.dir.clone()))
    }

    pub fn clear(&self) -> Result<()> {
        for name in [GAMES_FILE, REVIEWS_FILE] {
            let path = self.file_path(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn load_values(&self, name: &str) -> Result<Option<Vec<Value>>> {
        let path = self.file_path(name);

        if !path.exists() {
            debug!("Snapshot miss: {} (file does not exist)", name);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Array(values)) => {
                debug!("Snapshot hit: {} (loaded {} entries)", name, values.len());
                Ok(Some(values))
            }
            Ok(_) | Err(_) => {
                warn!(
                    "Snapshot corruption detected for {}. Deleting corrupted file {}.",
                    name,
                    path.display()
                );
                if let Err(rm_err) = std::fs::remove_file(&path) {
                    warn!("Failed to delete corrupted snapshot file: {}", rm_err);
                }
                Ok(None)
            }
        }
    }

    fn save_records<T: Serialize>(&self, name: &str, records: &[T]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(records)?;
        std::fs::write(self.file_path(name), json)?;
        debug!("Snapshot saved: {} ({} entries)", name, records.len());
        Ok(())
    }
}

/// Read-only backend serving the last saved snapshot.
pub struct SnapshotBackend {
    store: SnapshotStore,
}

impl SnapshotBackend {
    pub fn new(store: SnapshotStore) -> Self {
        Self { store }
    }

    fn read_only<T>(&self) -> Result<T> {
        Err(BackendError::ReadOnly("offline snapshot"))
    }
}

#[async_trait]
impl LibraryBackend for SnapshotBackend {
    fn backend_name(&self) -> &str {
        "snapshot"
    }

    fn is_read_only(&self) -> bool {
        true
    }

    async fn get_all_games(&self) -> Result<Vec<Game>> {
        Ok(self.store.load_required()?.games)
    }

    async fn get_game(&self, id: &RecordId) -> Result<Game> {
        self.store
            .load_required()?
            .games
            .into_iter()
            .find(|game| game.id.as_ref() == Some(id))
            .ok_or_else(|| BackendError::NotFound(format!("game {}", id)))
    }

    async fn get_all_reviews(&self) -> Result<Vec<Review>> {
        Ok(self.store.load_required()?.reviews)
    }

    async fn get_reviews_for_game(&self, game_id: &RecordId) -> Result<Vec<Review>> {
        Ok(self
            .store
            .load_required()?
            .reviews
            .into_iter()
            .filter(|review| review.game.candidate_id().as_ref() == Some(game_id))
            .collect())
    }

    async fn create_review(&self, _review: &Review) -> Result<Review> {
        self.read_only()
    }

    async fn update_review(&self, _id: &RecordId, _review: &Review) -> Result<Review> {
        self.read_only()
    }

    async fn delete_review(&self, _id: &RecordId) -> Result<()> {
        self.read_only()
    }

    async fn create_game(&self, _game: &Game) -> Result<Game> {
        self.read_only()
    }

    async fn update_game(&self, _id: &RecordId, _game: &Game) -> Result<Game> {
        self.read_only()
    }

    async fn delete_game(&self, _id: &RecordId) -> Result<()> {
        self.read_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> LibraryData {
        LibraryData {
            games: games_from_values(vec![
                json!({ "_id": "g1", "titulo": "Game A", "plataforma": "PC, PS5", "horasJugadas": 20 }),
                json!({ "_id": "g2", "titulo": "Game B" }),
            ]),
            reviews: reviews_from_values(vec![
                json!({ "_id": "r1", "juegoId": "g1", "titulo": "Great", "puntuacion": 4 }),
                json!({ "_id": "r2", "juego": { "_id": "g2" }, "titulo": "Okay", "puntuacion": 6 }),
            ]),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snapshots"));
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());

        let library = sample();
        store.save(&library).unwrap();
        assert!(store.exists());
        assert!(store.saved_at().is_some());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.games, library.games);
        assert_eq!(loaded.reviews, library.reviews);
    }

    #[test]
    fn test_corrupted_file_is_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save(&sample()).unwrap();

        let games_path = dir.path().join("games.json");
        std::fs::write(&games_path, "{ not json").unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!games_path.exists());
    }

    #[test]
    fn test_non_array_snapshot_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save(&sample()).unwrap();
        std::fs::write(dir.path().join("reviews.json"), r#"{"reviews": []}"#).unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!dir.path().join("reviews.json").exists());
    }

    #[test]
    fn test_missing_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let err = store.load_required().unwrap_err();
        assert!(matches!(err, BackendError::MissingSnapshot(_)));
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save(&sample()).unwrap();
        store.clear().unwrap();
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn test_snapshot_backend_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save(&sample()).unwrap();
        let backend = SnapshotBackend::new(store);

        assert_eq!(backend.get_all_games().await.unwrap().len(), 2);
        assert_eq!(backend.get_all_reviews().await.unwrap().len(), 2);

        let g2 = RecordId::new("g2").unwrap();
        assert_eq!(backend.get_game(&g2).await.unwrap().title, "Game B");

        let for_g2 = backend.get_reviews_for_game(&g2).await.unwrap();
        assert_eq!(for_g2.len(), 1);
        assert_eq!(for_g2[0].title, "Okay");

        let missing = RecordId::new("nope").unwrap();
        assert!(backend.get_game(&missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_snapshot_backend_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SnapshotBackend::new(SnapshotStore::new(dir.path()));
        let id = RecordId::new("r1").unwrap();

        assert!(backend.is_read_only());
        assert!(matches!(
            backend.delete_review(&id).await,
            Err(BackendError::ReadOnly(_))
        ));
        assert!(matches!(
            backend.create_review(&Review::default()).await,
            Err(BackendError::ReadOnly(_))
        ));
        assert!(matches!(
            backend.get_all_games().await,
            Err(BackendError::MissingSnapshot(_))
        ));
    }
}
