use chrono::Utc;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use game_library_core::{find_by_title, to_storage_scale, to_ten_scale};
use game_library_models::{Game, GameRef, RecordId, Review, TagList};

use super::Session;
use crate::output::{format_score, Output};

/// Parse a score on the 0-10 scale.
pub fn parse_score(raw: &str) -> std::result::Result<f64, String> {
    let score: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if !score.is_finite() || !(0.0..=10.0).contains(&score) {
        return Err(format!("score must be between 0 and 10, got {}", raw));
    }
    Ok(score)
}

pub fn parse_id(raw: &str) -> Result<RecordId> {
    RecordId::new(raw).ok_or_else(|| eyre!("Identifier must not be empty"))
}

pub struct NewReview {
    pub game: String,
    pub title: String,
    pub content: String,
    pub score: f64,
}

/// Build the review to store for a game picked by title.
///
/// `score` is on the 0-10 scale and is converted to the storage scale.
pub fn build_review(games: &[Game], new: &NewReview) -> Result<Review> {
    let game = find_by_title(games, &new.game)
        .ok_or_else(|| eyre!("No game titled '{}' in the library", new.game))?;
    let game_id = game
        .id
        .clone()
        .ok_or_else(|| eyre!("Game '{}' has no identifier and cannot be reviewed", game.title))?;

    Ok(Review {
        game: GameRef::Id(game_id),
        title: new.title.trim().to_string(),
        content: new.content.trim().to_string(),
        score: Some(to_storage_scale(new.score)),
        ..Review::default()
    })
}

pub async fn run_review_add(new: NewReview, session: &Session, output: &Output) -> Result<()> {
    let backend = session.writable_backend()?;
    let games = backend
        .get_all_games()
        .await
        .wrap_err("Failed to load games")?;

    let review = build_review(&games, &new)?;
    let created = backend
        .create_review(&review)
        .await
        .wrap_err("Failed to create review")?;

    output.success(format!(
        "Review '{}' saved for {} ({}/10)",
        created.title,
        new.game,
        format_score(to_ten_scale(created.raw_score()))
    ));
    output.data(&created);
    Ok(())
}

pub struct ReviewChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub score: Option<f64>,
}

impl ReviewChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.score.is_none()
    }

    pub fn apply(&self, review: &mut Review) {
        if let Some(title) = &self.title {
            review.title = title.trim().to_string();
        }
        if let Some(content) = &self.content {
            review.content = content.trim().to_string();
        }
        if let Some(score) = self.score {
            review.score = Some(to_storage_scale(score));
        }
    }
}

pub async fn run_review_edit(id: String, changes: ReviewChanges, session: &Session, output: &Output) -> Result<()> {
    if changes.is_empty() {
        output.warn("Nothing to change. Use --title, --content or --score");
        return Ok(());
    }

    let id = parse_id(&id)?;
    let backend = session.writable_backend()?;
    let mut review = backend
        .get_all_reviews()
        .await
        .wrap_err("Failed to load reviews")?
        .into_iter()
        .find(|review| review.id.as_ref() == Some(&id))
        .ok_or_else(|| eyre!("No review with id {}", id))?;

    changes.apply(&mut review);
    let updated = backend
        .update_review(&id, &review)
        .await
        .wrap_err_with(|| format!("Failed to update review {}", id))?;

    output.success(format!("Review {} updated", id));
    output.data(&updated);
    Ok(())
}

pub async fn run_review_rm(id: String, session: &Session, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;
    session
        .writable_backend()?
        .delete_review(&id)
        .await
        .wrap_err_with(|| format!("Failed to delete review {}", id))?;
    output.success(format!("Review {} deleted", id));
    Ok(())
}

pub struct NewGame {
    pub title: String,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub developer: Option<String>,
    pub hours: Option<f64>,
    pub score: Option<f64>,
    pub completed: bool,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

pub fn build_game(new: NewGame) -> Result<Game> {
    let title = new.title.trim().to_string();
    if title.is_empty() {
        return Err(eyre!("Game title must not be empty"));
    }
    if let Some(hours) = new.hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(eyre!("Hours played must be zero or more, got {}", hours));
        }
    }

    Ok(Game {
        title,
        platforms: new.platform.as_deref().map(TagList::parse).unwrap_or_default(),
        genres: new.genre.as_deref().map(TagList::parse).unwrap_or_default(),
        year: new.year,
        developer: new.developer,
        completed: new.completed,
        score: new.score,
        hours_played: new.hours,
        cover_url: new.cover_url,
        description: new.description,
        date_added: Some(Utc::now()),
        ..Game::default()
    })
}

pub async fn run_game_add(new: NewGame, session: &Session, output: &Output) -> Result<()> {
    let game = build_game(new)?;
    let created = session
        .writable_backend()?
        .create_game(&game)
        .await
        .wrap_err_with(|| format!("Failed to create game '{}'", game.title))?;

    output.success(format!("Game '{}' added", created.title));
    output.data(&created);
    Ok(())
}

/// Fields to overwrite on an existing game; `None` leaves the field as is.
#[derive(Debug, Default)]
pub struct GameChanges {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub developer: Option<String>,
    pub hours: Option<f64>,
    pub score: Option<f64>,
    pub completed: Option<bool>,
    pub cover_url: Option<String>,
    pub description: Option<String>,
}

impl GameChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.platform.is_none()
            && self.genre.is_none()
            && self.year.is_none()
            && self.developer.is_none()
            && self.hours.is_none()
            && self.score.is_none()
            && self.completed.is_none()
            && self.cover_url.is_none()
            && self.description.is_none()
    }

    pub fn apply(&self, game: &mut Game) -> Result<()> {
        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(eyre!("Game title must not be empty"));
            }
            game.title = title.to_string();
        }
        if let Some(hours) = self.hours {
            if !hours.is_finite() || hours < 0.0 {
                return Err(eyre!("Hours played must be zero or more, got {}", hours));
            }
            game.hours_played = Some(hours);
        }
        if let Some(platform) = &self.platform {
            game.platforms = TagList::parse(platform);
        }
        if let Some(genre) = &self.genre {
            game.genres = TagList::parse(genre);
        }
        if self.year.is_some() {
            game.year = self.year;
        }
        if self.developer.is_some() {
            game.developer = self.developer.clone();
        }
        if self.score.is_some() {
            game.score = self.score;
        }
        if let Some(completed) = self.completed {
            game.completed = completed;
        }
        if self.cover_url.is_some() {
            game.cover_url = self.cover_url.clone();
        }
        if self.description.is_some() {
            game.description = self.description.clone();
        }
        Ok(())
    }
}

pub async fn run_game_edit(id: String, changes: GameChanges, session: &Session, output: &Output) -> Result<()> {
    if changes.is_empty() {
        output.warn("Nothing to change. Pass at least one field to update");
        return Ok(());
    }

    let id = parse_id(&id)?;
    let backend = session.writable_backend()?;
    let mut game = backend
        .get_game(&id)
        .await
        .wrap_err_with(|| format!("Failed to load game {}", id))?;

    changes.apply(&mut game)?;
    let updated = backend
        .update_game(&id, &game)
        .await
        .wrap_err_with(|| format!("Failed to update game {}", id))?;

    output.success(format!("Game '{}' updated", updated.title));
    output.data(&updated);
    Ok(())
}

pub async fn run_game_rm(id: String, session: &Session, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;
    session
        .writable_backend()?
        .delete_game(&id)
        .await
        .wrap_err_with(|| format!("Failed to delete game {}", id))?;
    output.success(format!("Game {} deleted", id));
    Ok(())
}
