// Filtering of games and enriched reviews by user-supplied criteria

use game_library_models::{Game, TagList};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::reconcile::EnrichedReview;

/// Attributes the filter engine reads from a record.
pub trait Filterable {
    fn title(&self) -> &str;

    /// Title of the related game, for records that point at one.
    fn related_title(&self) -> Option<&str> {
        None
    }

    fn content(&self) -> &str {
        ""
    }

    fn platforms(&self) -> &TagList;
    fn genres(&self) -> &TagList;
    fn year(&self) -> Option<i32>;

    /// Hours played, missing counted as 0.
    fn hours(&self) -> f64;

    /// Score on the 0-10 scale, missing counted as 0.
    fn score10(&self) -> f64;

    fn developer(&self) -> &str;

    /// Game score shown next to the secondary attributes.
    fn detail_score(&self) -> Option<f64>;

    /// Secondary attributes as one searchable string: developer, year,
    /// hours and score.
    fn details(&self) -> String {
        let mut parts = vec![self.developer().to_string()];
        if let Some(year) = self.year() {
            parts.push(year.to_string());
        }
        parts.push(self.hours().to_string());
        if let Some(score) = self.detail_score() {
            parts.push(score.to_string());
        }
        parts.join(" ")
    }
}

impl Filterable for Game {
    fn title(&self) -> &str {
        &self.title
    }

    fn content(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    fn platforms(&self) -> &TagList {
        &self.platforms
    }

    fn genres(&self) -> &TagList {
        &self.genres
    }

    fn year(&self) -> Option<i32> {
        self.year
    }

    fn hours(&self) -> f64 {
        Game::hours(self)
    }

    fn score10(&self) -> f64 {
        self.score_or_zero()
    }

    fn developer(&self) -> &str {
        self.developer.as_deref().unwrap_or("")
    }

    fn detail_score(&self) -> Option<f64> {
        self.score
    }
}

impl Filterable for EnrichedReview {
    fn title(&self) -> &str {
        &self.review.title
    }

    fn related_title(&self) -> Option<&str> {
        Some(&self.game_title)
    }

    fn content(&self) -> &str {
        &self.review.content
    }

    fn platforms(&self) -> &TagList {
        &self.platforms
    }

    fn genres(&self) -> &TagList {
        &self.genres
    }

    fn year(&self) -> Option<i32> {
        self.game_year
    }

    fn hours(&self) -> f64 {
        self.game_hours
    }

    fn score10(&self) -> f64 {
        self.score10
    }

    fn developer(&self) -> &str {
        &self.game_developer
    }

    fn detail_score(&self) -> Option<f64> {
        self.game_score
    }
}

/// Independent constraints; a record must satisfy all the active ones.
///
/// Blank strings, non-finite bounds and empty keyword lists are inactive, so
/// a default `FilterCriteria` keeps everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub min_hours: Option<f64>,
    #[serde(default)]
    pub max_hours: Option<f64>,
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_hours(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_hours = min;
        self.max_hours = max;
        self
    }

    pub fn with_score(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_score = min;
        self.max_score = max;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Split a keyword string on whitespace.
    pub fn with_keywords(mut self, keywords: &str) -> Self {
        self.keywords = keywords.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        ActiveFilters::from_criteria(self).is_empty()
    }

    pub fn matches<T: Filterable>(&self, item: &T) -> bool {
        ActiveFilters::from_criteria(self).matches(item)
    }
}

/// Criteria with inactive entries dropped and needles lowercased once.
#[derive(Debug, Default)]
struct ActiveFilters {
    platform: Option<String>,
    genre: Option<String>,
    year: Option<i32>,
    min_hours: Option<f64>,
    max_hours: Option<f64>,
    min_score: Option<f64>,
    max_score: Option<f64>,
    query: Option<String>,
    keywords: Vec<String>,
}

impl ActiveFilters {
    fn from_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            platform: needle(criteria.platform.as_deref()),
            genre: needle(criteria.genre.as_deref()),
            year: criteria.year,
            min_hours: criteria.min_hours.filter(|v| v.is_finite()),
            max_hours: criteria.max_hours.filter(|v| v.is_finite()),
            min_score: criteria.min_score.filter(|v| v.is_finite()),
            max_score: criteria.max_score.filter(|v| v.is_finite()),
            query: needle(criteria.query.as_deref()),
            keywords: criteria
                .keywords
                .iter()
                .flat_map(|k| k.split_whitespace())
                .map(str::to_lowercase)
                .collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.genre.is_none()
            && self.year.is_none()
            && self.min_hours.is_none()
            && self.max_hours.is_none()
            && self.min_score.is_none()
            && self.max_score.is_none()
            && self.query.is_none()
            && self.keywords.is_empty()
    }

    fn matches<T: Filterable>(&self, item: &T) -> bool {
        if let Some(platform) = &self.platform {
            if !contains_ci(&item.platforms().joined(), platform) {
                return false;
            }
        }

        if let Some(genre) = &self.genre {
            if !contains_ci(&item.genres().joined(), genre) {
                return false;
            }
        }

        if let Some(year) = self.year {
            if item.year() != Some(year) {
                return false;
            }
        }

        if !within(item.hours(), self.min_hours, self.max_hours) {
            return false;
        }

        if !within(item.score10(), self.min_score, self.max_score) {
            return false;
        }

        if self.query.is_none() && self.keywords.is_empty() {
            return true;
        }

        let details = item.details();
        let related = item.related_title().unwrap_or("");

        if let Some(query) = &self.query {
            let platforms = item.platforms().joined();
            let genres = item.genres().joined();
            let haystacks: [&str; 6] = [item.title(), related, item.content(), &platforms, &genres, &details];
            if !haystacks.iter().any(|h| contains_ci(h, query)) {
                return false;
            }
        }

        let haystacks: [&str; 4] = [item.title(), item.content(), related, &details];
        self.keywords
            .iter()
            .all(|keyword| haystacks.iter().any(|h| contains_ci(h, keyword)))
    }
}

fn needle(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// `needle` must already be lowercase.
fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn within(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    let value = if value.is_finite() { value } else { 0.0 };
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Keep the records matching every active criterion, in input order.
pub fn filter_items<T>(items: &[T], criteria: &FilterCriteria) -> Vec<T>
where
    T: Filterable + Clone,
{
    let active = ActiveFilters::from_criteria(criteria);
    if active.is_empty() {
        return items.to_vec();
    }

    let filtered: Vec<T> = items
        .iter()
        .filter(|item| active.matches(*item))
        .cloned()
        .collect();

    debug!(
        "filter_items: input_count={}, output_count={}, criteria={:?}",
        items.len(),
        filtered.len(),
        active
    );

    filtered
}

/// Options for the filter panel, derived from the game collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterFacets {
    /// Distinct platforms, sorted
    pub platforms: Vec<String>,
    /// Distinct genres, sorted
    pub genres: Vec<String>,
    /// Distinct years, newest first
    pub years: Vec<i32>,
}

impl FilterFacets {
    pub fn from_games(games: &[Game]) -> Self {
        let platforms: BTreeSet<&str> = games.iter().flat_map(|g| g.platforms.iter()).collect();
        let genres: BTreeSet<&str> = games.iter().flat_map(|g| g.genres.iter()).collect();
        let years: BTreeSet<i32> = games.iter().filter_map(|g| g.year).collect();

        Self {
            platforms: platforms.into_iter().map(str::to_string).collect(),
            genres: genres.into_iter().map(str::to_string).collect(),
            years: years.into_iter().rev().collect(),
        }
    }
}
