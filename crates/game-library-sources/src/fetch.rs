use game_library_models::{Game, Review};
use tracing::info;

use crate::error::Result;
use crate::traits::LibraryBackend;

/// Both collections as returned by a backend, before reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryData {
    pub games: Vec<Game>,
    pub reviews: Vec<Review>,
}

/// Fetch games and reviews concurrently. Either failure fails the whole fetch.
pub async fn fetch_library(backend: &dyn LibraryBackend) -> Result<LibraryData> {
    let (games, reviews) = tokio::try_join!(backend.get_all_games(), backend.get_all_reviews())?;
    info!(
        "Fetched library from {}: {} games, {} reviews",
        backend.backend_name(),
        games.len(),
        reviews.len()
    );
    Ok(LibraryData { games, reviews })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackendError;
    use crate::snapshot::{SnapshotBackend, SnapshotStore};
    use game_library_models::{games_from_values, reviews_from_values};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_from_snapshot_backend() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .save(&LibraryData {
                games: games_from_values(vec![json!({ "_id": "g1", "titulo": "Game A" })]),
                reviews: reviews_from_values(vec![json!({ "juegoId": "g1", "puntuacion": 4 })]),
            })
            .unwrap();

        let backend = SnapshotBackend::new(store);
        let library = fetch_library(&backend).await.unwrap();
        assert_eq!(library.games.len(), 1);
        assert_eq!(library.reviews.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_fails_without_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let backend = SnapshotBackend::new(SnapshotStore::new(dir.path()));
        let err = fetch_library(&backend).await.unwrap_err();
        assert!(matches!(err, BackendError::MissingSnapshot(_)));
    }
}
