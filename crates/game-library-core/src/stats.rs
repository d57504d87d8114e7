// Aggregate statistics over the game collection and the enriched reviews

use chrono::{DateTime, Utc};
use game_library_config::StatsConfig;
use game_library_models::{Game, TagList};
use serde::Serialize;
use std::collections::HashMap;

use crate::reconcile::EnrichedReview;

/// Bucket name for games with no platform or genre.
pub const UNSPECIFIED: &str = "Unspecified";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformHours {
    pub platform: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// One histogram bucket of game scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBand {
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// Whether `max` itself falls in this band.
    pub max_inclusive: bool,
    pub count: usize,
}

impl ScoreBand {
    fn contains(&self, score: f64) -> bool {
        score >= self.min && (score < self.max || (self.max_inclusive && score == self.max))
    }
}

const SCORE_BANDS: [(&str, f64, f64, bool); 5] = [
    ("9.0 - 10.0", 9.0, 10.0, true),
    ("7.0 - 8.9", 7.0, 9.0, false),
    ("5.0 - 6.9", 5.0, 7.0, false),
    ("3.0 - 4.9", 3.0, 5.0, false),
    ("0 - 2.9", 0.0, 3.0, false),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub total_games: usize,
    pub completed: usize,
    pub backlog: usize,
    pub total_hours: f64,
    pub average_hours: f64,
    pub average_score: f64,
    pub hours_by_platform: Vec<PlatformHours>,
    pub games_by_genre: Vec<GenreCount>,
    pub score_distribution: Vec<ScoreBand>,
    pub recent_games: Vec<Game>,
}

impl GameStats {
    pub fn compute(games: &[Game], config: &StatsConfig) -> Self {
        let total_games = games.len();
        let completed = games.iter().filter(|g| g.completed).count();
        let total_hours: f64 = games.iter().map(Game::hours).sum();
        let score_sum: f64 = games.iter().map(Game::score_or_zero).sum();

        let hours_by_platform = group_by_tag(games, |g| &g.platforms, Game::hours)
            .into_iter()
            .map(|(platform, hours)| PlatformHours { platform, hours })
            .collect();

        let games_by_genre = group_by_tag(games, |g| &g.genres, |_| 1.0)
            .into_iter()
            .map(|(genre, count)| GenreCount {
                genre,
                count: count as usize,
            })
            .collect();

        Self {
            total_games,
            completed,
            backlog: total_games.saturating_sub(completed),
            total_hours,
            average_hours: mean(total_hours, total_games),
            average_score: mean(score_sum, total_games),
            hours_by_platform,
            games_by_genre,
            score_distribution: score_distribution(games),
            recent_games: recent_games(games, config.recent_limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_score: f64,
    pub high_scores: usize,
    pub low_scores: usize,
    pub games_reviewed: usize,
    pub latest_review: Option<DateTime<Utc>>,
    pub recent_reviews: Vec<EnrichedReview>,
}

impl ReviewStats {
    pub fn compute(reviews: &[EnrichedReview], config: &StatsConfig) -> Self {
        let total_reviews = reviews.len();
        let score_sum: f64 = reviews.iter().map(|r| r.score10).sum();

        let high_scores = reviews
            .iter()
            .filter(|r| r.score10 >= config.high_score_threshold)
            .count();
        let low_scores = reviews
            .iter()
            .filter(|r| r.score10 > 0.0 && r.score10 <= config.low_score_threshold)
            .count();

        let mut seen = std::collections::HashSet::new();
        let games_reviewed = reviews
            .iter()
            .filter_map(|r| r.game_key.as_deref())
            .filter(|key| seen.insert(*key))
            .count();

        let mut recent_reviews = reviews.to_vec();
        recent_reviews.sort_by(|a, b| b.review.created_at.cmp(&a.review.created_at));
        recent_reviews.truncate(config.recent_limit);

        Self {
            total_reviews,
            average_score: mean(score_sum, total_reviews),
            high_scores,
            low_scores,
            games_reviewed,
            latest_review: reviews.iter().filter_map(|r| r.review.created_at).max(),
            recent_reviews,
        }
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Sum `weight` per tag, highest first. Games without tags land in
/// [`UNSPECIFIED`]; ties keep the order in which tags were first seen.
fn group_by_tag<F, W>(games: &[Game], tags: F, weight: W) -> Vec<(String, f64)>
where
    F: Fn(&Game) -> &TagList,
    W: Fn(&Game) -> f64,
{
    let mut groups: Vec<(String, f64)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for game in games {
        let tag_list = tags(game);
        let names: Vec<&str> = if tag_list.is_empty() {
            vec![UNSPECIFIED]
        } else {
            tag_list.iter().collect()
        };

        let amount = weight(game);
        for name in names {
            match positions.get(name) {
                Some(&pos) => groups[pos].1 += amount,
                None => {
                    positions.insert(name.to_string(), groups.len());
                    groups.push((name.to_string(), amount));
                }
            }
        }
    }

    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
}

fn score_distribution(games: &[Game]) -> Vec<ScoreBand> {
    let mut bands: Vec<ScoreBand> = SCORE_BANDS
        .iter()
        .map(|&(label, min, max, max_inclusive)| ScoreBand {
            label: label.to_string(),
            min,
            max,
            max_inclusive,
            count: 0,
        })
        .collect();

    for game in games {
        let score = game.score_or_zero().clamp(0.0, 10.0);
        if let Some(band) = bands.iter_mut().find(|band| band.contains(score)) {
            band.count += 1;
        }
    }

    bands
}

fn recent_games(games: &[Game], limit: usize) -> Vec<Game> {
    let mut sorted = games.to_vec();
    sorted.sort_by(|a, b| b.recency_date().cmp(&a.recency_date()));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::enrich_reviews;
    use game_library_models::{games_from_values, reviews_from_values};
    use serde_json::json;

    fn games() -> Vec<Game> {
        games_from_values(vec![
            json!({ "_id": "g1", "titulo": "A", "plataforma": "PC, PS5", "genero": "RPG", "horasJugadas": 10, "puntuacion": 9.5, "completado": true, "fechaAgregado": "2024-03-01T00:00:00Z" }),
            json!({ "_id": "g2", "titulo": "B", "plataforma": "PC", "genero": "RPG, Action", "horasJugadas": 30, "puntuacion": 7, "fechaAgregado": "2024-01-01T00:00:00Z" }),
            json!({ "_id": "g3", "titulo": "C", "horasJugadas": 5, "puntuacion": 12, "createdAt": "2024-02-01T00:00:00Z" }),
            json!({ "_id": "g4", "titulo": "D", "plataforma": "Switch", "genero": "Puzzle" }),
        ])
    }

    #[test]
    fn test_game_totals_and_averages() {
        let stats = GameStats::compute(&games(), &StatsConfig::default());

        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.backlog, 3);
        assert_eq!(stats.total_hours, 45.0);
        assert_eq!(stats.average_hours, 11.25);
        // Missing score counts as 0: (9.5 + 7 + 12 + 0) / 4
        assert_eq!(stats.average_score, 7.125);
    }

    #[test]
    fn test_completed_and_backlog_counts() {
        let games = games_from_values(vec![
            json!({ "horasJugadas": 10, "completado": true }),
            json!({ "horasJugadas": 5, "completado": false }),
        ]);
        let stats = GameStats::compute(&games, &StatsConfig::default());

        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.backlog, 1);
        assert_eq!(stats.total_hours, 15.0);
        assert_eq!(stats.average_hours, 7.5);
    }

    #[test]
    fn test_empty_collection_has_zero_averages() {
        let stats = GameStats::compute(&[], &StatsConfig::default());
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.average_hours, 0.0);
        assert_eq!(stats.average_score, 0.0);
        assert!(stats.hours_by_platform.is_empty());
        assert!(stats.score_distribution.iter().all(|band| band.count == 0));

        let reviews = ReviewStats::compute(&[], &StatsConfig::default());
        assert_eq!(reviews.average_score, 0.0);
        assert_eq!(reviews.latest_review, None);
    }

    #[test]
    fn test_hours_by_platform() {
        let stats = GameStats::compute(&games(), &StatsConfig::default());
        let rows: Vec<(&str, f64)> = stats
            .hours_by_platform
            .iter()
            .map(|row| (row.platform.as_str(), row.hours))
            .collect();

        assert_eq!(
            rows,
            vec![("PC", 40.0), ("PS5", 10.0), (UNSPECIFIED, 5.0), ("Switch", 0.0)]
        );
    }

    #[test]
    fn test_games_by_genre_ties_keep_first_seen_order() {
        let stats = GameStats::compute(&games(), &StatsConfig::default());
        let rows: Vec<(&str, usize)> = stats
            .games_by_genre
            .iter()
            .map(|row| (row.genre.as_str(), row.count))
            .collect();

        assert_eq!(
            rows,
            vec![("RPG", 2), ("Action", 1), (UNSPECIFIED, 1), ("Puzzle", 1)]
        );
    }

    #[test]
    fn test_score_distribution_bands() {
        let stats = GameStats::compute(&games(), &StatsConfig::default());
        let counts: Vec<usize> = stats.score_distribution.iter().map(|b| b.count).collect();

        // 9.5 and the saturated 12 in the top band, 7 in [7,9), missing in [0,3)
        assert_eq!(counts, vec![2, 1, 0, 0, 1]);
        assert_eq!(counts.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_one_score_per_band() {
        let games = games_from_values(vec![
            json!({ "puntuacion": 9.5 }),
            json!({ "puntuacion": 7.2 }),
            json!({ "puntuacion": 5.0 }),
            json!({ "puntuacion": 2.0 }),
        ]);
        let counts: Vec<usize> = score_distribution(&games).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 1]);
    }

    #[test]
    fn test_score_band_edges() {
        let games = games_from_values(vec![
            json!({ "puntuacion": 10 }),
            json!({ "puntuacion": 9 }),
            json!({ "puntuacion": 8.99 }),
            json!({ "puntuacion": 3 }),
            json!({ "puntuacion": 2.95 }),
            json!({ "puntuacion": -1 }),
        ]);
        let counts: Vec<usize> = score_distribution(&games).iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_recent_games_fallback_and_limit() {
        let config = StatsConfig {
            recent_limit: 3,
            ..StatsConfig::default()
        };
        let stats = GameStats::compute(&games(), &config);
        let titles: Vec<&str> = stats.recent_games.iter().map(|g| g.title.as_str()).collect();

        assert_eq!(titles, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_review_stats() {
        let games = games();
        let reviews = reviews_from_values(vec![
            json!({ "juegoId": "g1", "puntuacion": 4.5, "fecha": "2024-04-01T00:00:00Z" }),
            json!({ "juegoId": "g1", "puntuacion": 8, "fecha": "2024-05-01T00:00:00Z" }),
            json!({ "juegoId": "g2", "puntuacion": 2 }),
            json!({ "juegoId": "gone", "puntuacion": 0 }),
            json!({ "juegoTitulo": "Old", "puntuacion": 2.5, "fecha": "2023-01-01T00:00:00Z" }),
        ]);
        let enriched = enrich_reviews(&reviews, &games);
        let stats = ReviewStats::compute(&enriched, &StatsConfig::default());

        // score10: 9, 8, 4, 0, 5
        assert_eq!(stats.total_reviews, 5);
        assert_eq!(stats.average_score, 5.2);
        assert_eq!(stats.high_scores, 2);
        assert_eq!(stats.low_scores, 2);
        assert_eq!(stats.games_reviewed, 4);
        assert_eq!(
            stats.latest_review.map(|d| d.to_rfc3339()),
            Some("2024-05-01T00:00:00+00:00".to_string())
        );
        assert_eq!(stats.recent_reviews.len(), 5);
        assert_eq!(stats.recent_reviews[0].score10, 8.0);
        assert_eq!(stats.recent_reviews[1].score10, 9.0);
    }

    #[test]
    fn test_review_thresholds_come_from_config() {
        let games = games();
        let reviews = reviews_from_values(vec![json!({ "juegoId": "g1", "puntuacion": 7 })]);
        let enriched = enrich_reviews(&reviews, &games);

        let config = StatsConfig {
            high_score_threshold: 7.0,
            low_score_threshold: 7.0,
            ..StatsConfig::default()
        };
        let stats = ReviewStats::compute(&enriched, &config);
        assert_eq!(stats.high_scores, 1);
        assert_eq!(stats.low_scores, 1);
    }
}
