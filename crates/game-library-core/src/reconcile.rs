// Review/game reconciliation: resolve each review's game and flatten the
// display attributes onto it

use game_library_models::{Game, GameRef, Review, TagList};
use serde::Serialize;
use tracing::debug;

use crate::index::GameIndex;
use crate::rating::to_ten_scale;

/// Title shown for reviews whose game cannot be found.
pub const GAME_NOT_FOUND: &str = "Game not found";

/// Which rule located a review's game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Embedded,
    ById,
    ByTitle,
    NotFound,
}

/// Outcome of resolving a single review, borrowing the matched game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedGame<'a> {
    Embedded(&'a Game),
    ById(&'a Game),
    ByTitle(&'a Game),
    NotFound,
}

impl<'a> ResolvedGame<'a> {
    pub fn game(&self) -> Option<&'a Game> {
        match *self {
            ResolvedGame::Embedded(game) | ResolvedGame::ById(game) | ResolvedGame::ByTitle(game) => Some(game),
            ResolvedGame::NotFound => None,
        }
    }

    pub fn kind(&self) -> Resolution {
        match self {
            ResolvedGame::Embedded(_) => Resolution::Embedded,
            ResolvedGame::ById(_) => Resolution::ById,
            ResolvedGame::ByTitle(_) => Resolution::ByTitle,
            ResolvedGame::NotFound => Resolution::NotFound,
        }
    }
}

/// A review merged with the display attributes of its game.
///
/// Every field is populated: attributes come from the resolved game, else
/// from the legacy fields stored on the review, else a neutral default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedReview {
    #[serde(flatten)]
    pub review: Review,
    #[serde(skip)]
    pub game: Option<Game>,
    pub resolution: Resolution,
    /// Key identifying the referenced game, used to count distinct games.
    pub game_key: Option<String>,
    pub game_title: String,
    pub game_cover: String,
    #[serde(skip)]
    pub platforms: TagList,
    pub game_platform: String,
    #[serde(skip)]
    pub genres: TagList,
    pub game_genre: String,
    pub game_year: Option<i32>,
    pub game_developer: String,
    pub game_hours: f64,
    pub game_score: Option<f64>,
    pub score10: f64,
}

/// Locate the game a review refers to.
///
/// Rules are tried in order: a populated embedded game, then an identifier
/// lookup, then a case-insensitive exact title match over all games.
pub fn resolve_game<'a>(review: &'a Review, index: &GameIndex<'a>, games: &'a [Game]) -> ResolvedGame<'a> {
    if let GameRef::Embedded(game) = &review.game {
        return ResolvedGame::Embedded(game);
    }

    if let Some(id) = review.game.candidate_id() {
        if let Some(game) = index.get(id.as_str()) {
            return ResolvedGame::ById(game);
        }
    }

    let name = match &review.game {
        GameRef::Named(name) => Some(name.as_str()),
        _ => None,
    };

    for candidate in [name, review.legacy.display_title()].into_iter().flatten() {
        if let Some(game) = find_by_title(games, candidate) {
            return ResolvedGame::ByTitle(game);
        }
    }

    ResolvedGame::NotFound
}

/// First game whose title equals `title`, ignoring case and surrounding whitespace.
pub fn find_by_title<'a>(games: &'a [Game], title: &str) -> Option<&'a Game> {
    let wanted = title.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    games.iter().find(|game| game.title.trim().to_lowercase() == wanted)
}

pub fn enrich_review(review: &Review, index: &GameIndex<'_>, games: &[Game]) -> EnrichedReview {
    let resolved = resolve_game(review, index, games);
    let game = resolved.game();
    let legacy = &review.legacy;

    if game.is_none() {
        debug!(
            "enrich_review: no game found for review {:?} (reference {:?})",
            review.id.as_ref().map(|id| id.as_str()),
            review.game
        );
    }

    let game_title = game
        .map(|g| g.title.clone())
        .filter(|title| !title.is_empty())
        .or_else(|| legacy.display_title().map(str::to_string))
        .unwrap_or_else(|| GAME_NOT_FOUND.to_string());

    let platforms = pick_tags(game.map(|g| &g.platforms), &legacy.platforms);
    let genres = pick_tags(game.map(|g| &g.genres), &legacy.genres);

    EnrichedReview {
        resolution: resolved.kind(),
        game_key: reference_key(review, game),
        game_title,
        game_cover: game
            .and_then(|g| g.cover_url.clone())
            .or_else(|| legacy.cover_url.clone())
            .unwrap_or_default(),
        game_platform: platforms.joined(),
        platforms,
        game_genre: genres.joined(),
        genres,
        game_year: game.and_then(|g| g.year).or(legacy.year),
        game_developer: game
            .and_then(|g| g.developer.clone())
            .or_else(|| legacy.developer.clone())
            .unwrap_or_default(),
        game_hours: game
            .and_then(|g| g.hours_played)
            .or(legacy.hours_played)
            .unwrap_or(0.0)
            .max(0.0),
        game_score: game.and_then(|g| g.score),
        score10: to_ten_scale(review.raw_score()),
        game: game.cloned(),
        review: review.clone(),
    }
}

/// Enrich every review against one index built over `games`. Output keeps input order.
pub fn enrich_reviews(reviews: &[Review], games: &[Game]) -> Vec<EnrichedReview> {
    let index = GameIndex::from_games(games);
    let enriched: Vec<EnrichedReview> = reviews
        .iter()
        .map(|review| enrich_review(review, &index, games))
        .collect();

    let unresolved = enriched
        .iter()
        .filter(|review| review.resolution == Resolution::NotFound)
        .count();
    debug!(
        "enrich_reviews: reviews={}, games={}, indexed={}, unresolved={}",
        reviews.len(),
        games.len(),
        index.len(),
        unresolved
    );

    enriched
}

fn pick_tags(primary: Option<&TagList>, fallback: &TagList) -> TagList {
    match primary {
        Some(tags) if !tags.is_empty() => tags.clone(),
        _ => fallback.clone(),
    }
}

fn reference_key(review: &Review, game: Option<&Game>) -> Option<String> {
    if let Some(id) = game.and_then(|g| g.id.as_ref()) {
        return Some(id.to_string());
    }
    if let Some(id) = review.game.candidate_id() {
        return Some(id.to_string());
    }
    game.map(|g| g.title.as_str())
        .or(review.legacy.display_title())
        .map(|title| title.trim().to_lowercase())
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_library_models::{games_from_values, reviews_from_values};
    use serde_json::json;

    fn library() -> Vec<Game> {
        games_from_values(vec![
            json!({
                "_id": "g1",
                "titulo": "Game A",
                "plataforma": "PC, PS5",
                "genero": ["RPG"],
                "anio": 2021,
                "desarrollador": "Studio A",
                "horasJugadas": 20,
                "puntuacion": 9
            }),
            json!({ "_id": { "$oid": "g2" }, "titulo": "Hollow Knight", "plataforma": ["Switch"] }),
        ])
    }

    fn enrich_one(review: serde_json::Value) -> EnrichedReview {
        let games = library();
        let reviews = reviews_from_values(vec![review]);
        enrich_reviews(&reviews, &games).remove(0)
    }

    #[test]
    fn test_resolve_by_id() {
        let enriched = enrich_one(json!({ "_id": "r1", "juegoId": "g1", "titulo": "Great", "puntuacion": 4 }));

        assert_eq!(enriched.resolution, Resolution::ById);
        assert_eq!(enriched.game_title, "Game A");
        assert_eq!(enriched.score10, 8.0);
        assert_eq!(enriched.game_platform, "PC, PS5");
        assert_eq!(enriched.platforms.as_slice(), &["PC", "PS5"]);
        assert_eq!(enriched.game_genre, "RPG");
        assert_eq!(enriched.game_year, Some(2021));
        assert_eq!(enriched.game_developer, "Studio A");
        assert_eq!(enriched.game_hours, 20.0);
        assert_eq!(enriched.game_score, Some(9.0));
        assert_eq!(enriched.game_key.as_deref(), Some("g1"));
    }

    #[test]
    fn test_resolve_by_oid_reference() {
        let enriched = enrich_one(json!({ "juegoId": { "$oid": "g2" }, "puntuacion": 7 }));
        assert_eq!(enriched.resolution, Resolution::ById);
        assert_eq!(enriched.game_title, "Hollow Knight");
        assert_eq!(enriched.score10, 7.0);
    }

    #[test]
    fn test_embedded_game_used_directly() {
        let enriched = enrich_one(json!({
            "juego": { "_id": "g9", "titulo": "Embedded Only", "plataforma": "GBA" }
        }));
        assert_eq!(enriched.resolution, Resolution::Embedded);
        assert_eq!(enriched.game_title, "Embedded Only");
        assert_eq!(enriched.game_platform, "GBA");
    }

    #[test]
    fn test_stub_reference_goes_through_index() {
        let enriched = enrich_one(json!({ "juego": { "_id": "g1" } }));
        assert_eq!(enriched.resolution, Resolution::ById);
        assert_eq!(enriched.game_title, "Game A");
    }

    #[test]
    fn test_resolve_by_title_case_insensitive() {
        let enriched = enrich_one(json!({ "juego": "  hollow KNIGHT " }));
        assert_eq!(enriched.resolution, Resolution::ByTitle);
        assert_eq!(enriched.game_title, "Hollow Knight");
        assert_eq!(enriched.game_key.as_deref(), Some("g2"));
    }

    #[test]
    fn test_legacy_title_used_for_title_match() {
        let enriched = enrich_one(json!({ "juegoId": "deleted", "juegoTitulo": "Game A" }));
        assert_eq!(enriched.resolution, Resolution::ByTitle);
        assert_eq!(enriched.game_developer, "Studio A");
    }

    #[test]
    fn test_unresolved_defaults() {
        let enriched = enrich_one(json!({ "_id": "r9", "juegoId": "nope", "puntuacion": "n/a" }));

        assert_eq!(enriched.resolution, Resolution::NotFound);
        assert_eq!(enriched.game_title, GAME_NOT_FOUND);
        assert_eq!(enriched.game_cover, "");
        assert_eq!(enriched.game_platform, "");
        assert_eq!(enriched.game_genre, "");
        assert_eq!(enriched.game_year, None);
        assert_eq!(enriched.game_developer, "");
        assert_eq!(enriched.game_hours, 0.0);
        assert_eq!(enriched.game_score, None);
        assert_eq!(enriched.score10, 0.0);
        assert!(enriched.game.is_none());
    }

    #[test]
    fn test_unresolved_falls_back_to_legacy_fields() {
        let enriched = enrich_one(json!({
            "juegoTitulo": "Forgotten Game",
            "plataforma": "PS2",
            "genero": "Platformer",
            "horasJugadas": 12,
            "anio": 2003
        }));

        assert_eq!(enriched.resolution, Resolution::NotFound);
        assert_eq!(enriched.game_title, "Forgotten Game");
        assert_eq!(enriched.game_platform, "PS2");
        assert_eq!(enriched.game_genre, "Platformer");
        assert_eq!(enriched.game_hours, 12.0);
        assert_eq!(enriched.game_year, Some(2003));
        assert_eq!(enriched.game_key.as_deref(), Some("forgotten game"));
    }

    #[test]
    fn test_resolved_game_missing_attribute_uses_legacy() {
        let enriched = enrich_one(json!({ "juegoId": "g2", "genero": "Metroidvania" }));
        assert_eq!(enriched.game_platform, "Switch");
        assert_eq!(enriched.game_genre, "Metroidvania");
    }

    #[test]
    fn test_enrich_keeps_order_and_owns_data() {
        let games = library();
        let reviews = reviews_from_values(vec![
            json!({ "juegoId": "g2" }),
            json!({ "juegoId": "g1" }),
            json!({ "juegoId": "zzz" }),
        ]);
        let enriched = enrich_reviews(&reviews, &games);

        let titles: Vec<&str> = enriched.iter().map(|r| r.game_title.as_str()).collect();
        assert_eq!(titles, vec!["Hollow Knight", "Game A", GAME_NOT_FOUND]);

        drop(games);
        assert_eq!(enriched[1].game.as_ref().unwrap().title, "Game A");
    }

    #[test]
    fn test_serialized_view_is_flat() {
        let enriched = enrich_one(json!({ "_id": "r1", "juegoId": "g1", "titulo": "Great", "puntuacion": 4 }));
        let value = serde_json::to_value(&enriched).unwrap();

        assert_eq!(value["titulo"], "Great");
        assert_eq!(value["gameTitle"], "Game A");
        assert_eq!(value["gamePlatform"], "PC, PS5");
        assert_eq!(value["score10"], 8.0);
        assert_eq!(value["resolution"], "by_id");
    }
}
