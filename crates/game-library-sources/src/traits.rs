use async_trait::async_trait;
use game_library_models::{Game, RecordId, Review};

use crate::error::Result;

#[async_trait]
pub trait LibraryBackend: Send + Sync {
    // Backend metadata
    fn backend_name(&self) -> &str;

    fn is_read_only(&self) -> bool {
        false
    }

    // Data retrieval
    async fn get_all_games(&self) -> Result<Vec<Game>>;
    async fn get_game(&self, id: &RecordId) -> Result<Game>;
    async fn get_all_reviews(&self) -> Result<Vec<Review>>;
    async fn get_reviews_for_game(&self, game_id: &RecordId) -> Result<Vec<Review>>;

    // Data modification; each returns the record as stored by the backend
    async fn create_review(&self, review: &Review) -> Result<Review>;
    async fn update_review(&self, id: &RecordId, review: &Review) -> Result<Review>;
    async fn delete_review(&self, id: &RecordId) -> Result<()>;
    async fn create_game(&self, game: &Game) -> Result<Game>;
    async fn update_game(&self, id: &RecordId, game: &Game) -> Result<Game>;
    async fn delete_game(&self, id: &RecordId) -> Result<()>;
}
