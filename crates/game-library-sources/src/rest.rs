use async_trait::async_trait;
use game_library_config::ApiConfig;
use game_library_models::{games_from_values, reviews_from_values, Game, RecordId, Review};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{BackendError, Result};
use crate::traits::LibraryBackend;

const GAMES_PATH: &str = "/api/juegos";
const REVIEWS_PATH: &str = "/api/resenas";

/// Client for the library's REST API.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record_path(collection: &str, id: &RecordId) -> String {
        format!("{}/{}", collection, urlencoding::encode(id.as_str()))
    }

    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn get_collection(&self, path: &str) -> Result<Vec<Value>> {
        match self.request(Method::GET, path, None).await? {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => {
                warn!(
                    "Expected a JSON array from {}, got {}; treating as empty",
                    path,
                    json_kind(&other)
                );
                Ok(Vec::new())
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn log_dropped(kind: &str, received: usize, kept: usize) {
    if kept < received {
        debug!("Dropped {} of {} {} entries that were not objects", received - kept, received, kind);
    }
}

#[async_trait]
impl LibraryBackend for RestBackend {
    fn backend_name(&self) -> &str {
        "rest"
    }

    async fn get_all_games(&self) -> Result<Vec<Game>> {
        let values = self.get_collection(GAMES_PATH).await?;
        let received = values.len();
        let games = games_from_values(values);
        log_dropped("game", received, games.len());
        info!("Fetched {} games", games.len());
        Ok(games)
    }

    async fn get_game(&self, id: &RecordId) -> Result<Game> {
        let value = self
            .request(Method::GET, &Self::record_path(GAMES_PATH, id), None)
            .await?;
        Game::from_value(&value).ok_or_else(|| BackendError::NotFound(format!("game {}", id)))
    }

    async fn get_all_reviews(&self) -> Result<Vec<Review>> {
        let values = self.get_collection(REVIEWS_PATH).await?;
        let received = values.len();
        let reviews = reviews_from_values(values);
        log_dropped("review", received, reviews.len());
        info!("Fetched {} reviews", reviews.len());
        Ok(reviews)
    }

    async fn get_reviews_for_game(&self, game_id: &RecordId) -> Result<Vec<Review>> {
        let path = format!("{}/juego/{}", REVIEWS_PATH, urlencoding::encode(game_id.as_str()));
        let values = self.get_collection(&path).await?;
        Ok(reviews_from_values(values))
    }

    async fn create_review(&self, review: &Review) -> Result<Review> {
        let created = self
            .request(Method::POST, REVIEWS_PATH, Some(&review.to_request_body()))
            .await?;
        info!("Created review {:?}", review.title);
        Ok(Review::from_value(&created).unwrap_or_else(|| review.clone()))
    }

    async fn update_review(&self, id: &RecordId, review: &Review) -> Result<Review> {
        let updated = self
            .request(Method::PUT, &Self::record_path(REVIEWS_PATH, id), Some(&review.to_request_body()))
            .await?;
        info!("Updated review {}", id);
        Ok(Review::from_value(&updated).unwrap_or_else(|| review.clone()))
    }

    async fn delete_review(&self, id: &RecordId) -> Result<()> {
        self.request(Method::DELETE, &Self::record_path(REVIEWS_PATH, id), None)
            .await?;
        info!("Deleted review {}", id);
        Ok(())
    }

    async fn create_game(&self, game: &Game) -> Result<Game> {
        let body = serde_json::to_value(game)?;
        let created = self.request(Method::POST, GAMES_PATH, Some(&body)).await?;
        info!("Created game {:?}", game.title);
        Ok(Game::from_value(&created).unwrap_or_else(|| game.clone()))
    }

    async fn update_game(&self, id: &RecordId, game: &Game) -> Result<Game> {
        let body = serde_json::to_value(game)?;
        let updated = self
            .request(Method::PUT, &Self::record_path(GAMES_PATH, id), Some(&body))
            .await?;
        info!("Updated game {}", id);
        Ok(Game::from_value(&updated).unwrap_or_else(|| game.clone()))
    }

    async fn delete_game(&self, id: &RecordId) -> Result<()> {
        self.request(Method::DELETE, &Self::record_path(GAMES_PATH, id), None)
            .await?;
        info!("Deleted game {}", id);
        Ok(())
    }
}
