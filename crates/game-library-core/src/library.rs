// Entry point tying the core modules together for one fetched library

use game_library_config::StatsConfig;
use game_library_models::{Game, Review};
use tracing::debug;

use crate::filter::{filter_items, FilterCriteria, FilterFacets};
use crate::reconcile::{enrich_reviews, find_by_title, EnrichedReview};
use crate::stats::{GameStats, ReviewStats};

/// A fetched library with its reviews already reconciled.
///
/// Built from scratch for every fetch; nothing is updated in place.
#[derive(Debug, Clone, Default)]
pub struct LibraryView {
    games: Vec<Game>,
    reviews: Vec<EnrichedReview>,
}

impl LibraryView {
    pub fn build(games: Vec<Game>, reviews: &[Review]) -> Self {
        let reviews = enrich_reviews(reviews, &games);
        debug!(
            "LibraryView::build: games={}, reviews={}",
            games.len(),
            reviews.len()
        );
        Self { games, reviews }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn reviews(&self) -> &[EnrichedReview] {
        &self.reviews
    }

    pub fn find_game_by_title(&self, title: &str) -> Option<&Game> {
        find_by_title(&self.games, title)
    }

    pub fn filter_games(&self, criteria: &FilterCriteria) -> Vec<Game> {
        filter_items(&self.games, criteria)
    }

    pub fn filter_reviews(&self, criteria: &FilterCriteria) -> Vec<EnrichedReview> {
        filter_items(&self.reviews, criteria)
    }

    /// Statistics always cover the whole collection, never a filtered subset.
    pub fn game_stats(&self, config: &StatsConfig) -> GameStats {
        GameStats::compute(&self.games, config)
    }

    pub fn review_stats(&self, config: &StatsConfig) -> ReviewStats {
        ReviewStats::compute(&self.reviews, config)
    }

    pub fn facets(&self) -> FilterFacets {
        FilterFacets::from_games(&self.games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_library_models::{games_from_values, reviews_from_values};
    use serde_json::json;

    fn view() -> LibraryView {
        let games = games_from_values(vec![
            json!({ "_id": "g1", "titulo": "Game A", "plataforma": "PC, PS5", "horasJugadas": 20, "anio": 2021 }),
            json!(null),
            json!({ "_id": "g2", "titulo": "Game B", "plataforma": "Switch", "anio": 2019 }),
        ]);
        let reviews = reviews_from_values(vec![
            json!({ "_id": "r1", "juegoId": "g1", "titulo": "Great", "puntuacion": 4 }),
            json!({ "_id": "r2", "juego": "game b", "titulo": "Fine", "puntuacion": 6 }),
        ]);
        LibraryView::build(games, &reviews)
    }

    #[test]
    fn test_build_enriches_reviews() {
        let view = view();
        assert_eq!(view.games().len(), 2);

        let first = &view.reviews()[0];
        assert_eq!(first.game_title, "Game A");
        assert_eq!(first.score10, 8.0);
        assert_eq!(first.game_platform, "PC, PS5");

        assert_eq!(view.reviews()[1].game_title, "Game B");
    }

    #[test]
    fn test_filters_and_stats() {
        let view = view();
        let criteria = FilterCriteria::new().with_platform("switch");

        assert_eq!(view.filter_games(&criteria).len(), 1);
        assert_eq!(view.filter_reviews(&criteria)[0].review.title, "Fine");

        // Stats ignore whatever filter the caller applied elsewhere.
        let stats = view.game_stats(&StatsConfig::default());
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_hours, 20.0);

        let review_stats = view.review_stats(&StatsConfig::default());
        assert_eq!(review_stats.games_reviewed, 2);
    }

    #[test]
    fn test_facets_and_title_lookup() {
        let view = view();
        assert_eq!(view.facets().years, vec![2021, 2019]);
        assert_eq!(view.find_game_by_title("GAME a").unwrap().id.as_ref().unwrap().as_str(), "g1");
        assert!(view.find_game_by_title("Game C").is_none());
    }
}
