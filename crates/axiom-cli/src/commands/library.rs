use clap::Args;
use color_eyre::eyre::Context;
use color_eyre::Result;
use comfy_table::Cell;
use game_library_core::{enrich_reviews, EnrichedReview, FilterCriteria, GameStats, ReviewStats};
use game_library_models::Game;
use serde_json::json;

use super::records::parse_id;
use super::Session;
use crate::output::{format_hours, format_score, new_table, or_dash, score_cell, Output};

/// Filter flags shared by `games` and `reviews`.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Platform substring, case-insensitive (e.g. "ps5")
    #[arg(long)]
    pub platform: Option<String>,

    /// Genre substring, case-insensitive
    #[arg(long)]
    pub genre: Option<String>,

    /// Exact release year
    #[arg(long)]
    pub year: Option<i32>,

    /// Minimum hours played (inclusive)
    #[arg(long)]
    pub min_hours: Option<f64>,

    /// Maximum hours played (inclusive)
    #[arg(long)]
    pub max_hours: Option<f64>,

    /// Minimum score on the 0-10 scale (inclusive)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Maximum score on the 0-10 scale (inclusive)
    #[arg(long)]
    pub max_score: Option<f64>,

    /// Free-text search over titles, content, platforms, genres and details
    #[arg(short, long)]
    pub search: Option<String>,
}

impl From<FilterArgs> for FilterCriteria {
    fn from(args: FilterArgs) -> Self {
        FilterCriteria {
            platform: args.platform,
            genre: args.genre,
            year: args.year,
            min_hours: args.min_hours,
            max_hours: args.max_hours,
            min_score: args.min_score,
            max_score: args.max_score,
            query: args.search,
            keywords: Vec::new(),
        }
    }
}

pub async fn run_fetch(session: &Session, output: &Output) -> Result<()> {
    let data = session.fetch().await?;

    if session.offline {
        output.warn("Offline: the snapshot was read back, nothing was fetched");
    } else {
        let store = session.snapshot_store();
        store
            .save(&data)
            .wrap_err_with(|| format!("Failed to save snapshot to {}", store.dir().display()))?;
    }

    output.success(format!(
        "Fetched {} games and {} reviews",
        data.games.len(),
        data.reviews.len()
    ));
    output.data(&json!({
        "games": data.games.len(),
        "reviews": data.reviews.len(),
        "snapshot": session.snapshot_store().dir().display().to_string(),
    }));
    Ok(())
}

pub async fn run_games(filters: FilterArgs, session: &Session, output: &Output) -> Result<()> {
    let library = session.library().await?;
    let criteria = FilterCriteria::from(filters);
    let games = library.filter_games(&criteria);

    output.data(&games);
    if output.is_human() {
        print_games(&games, output);
        output.info(format!("{} of {} games", games.len(), library.games().len()));
    }
    Ok(())
}

pub async fn run_reviews(
    filters: FilterArgs,
    keywords: Option<String>,
    session: &Session,
    output: &Output,
) -> Result<()> {
    let library = session.library().await?;
    let mut criteria = FilterCriteria::from(filters);
    if let Some(keywords) = keywords {
        criteria = criteria.with_keywords(&keywords);
    }
    let reviews = library.filter_reviews(&criteria);

    output.data(&reviews);
    if output.is_human() {
        print_reviews(&reviews, output);
        output.info(format!("{} of {} reviews", reviews.len(), library.reviews().len()));
    }
    Ok(())
}

/// One game with the reviews written about it.
pub async fn run_game_reviews(id: String, session: &Session, output: &Output) -> Result<()> {
    let id = parse_id(&id)?;
    let backend = session.backend()?;
    let (game, reviews) = tokio::try_join!(backend.get_game(&id), backend.get_reviews_for_game(&id))
        .wrap_err_with(|| format!("Failed to load game {} and its reviews", id))?;
    let reviews = enrich_reviews(&reviews, std::slice::from_ref(&game));

    output.data(&json!({ "game": game, "reviews": reviews }));
    if output.is_human() {
        print_games(std::slice::from_ref(&game), output);
        print_reviews(&reviews, output);
        output.info(format!("{} reviews for {}", reviews.len(), game.title));
    }
    Ok(())
}

pub async fn run_stats(session: &Session, output: &Output) -> Result<()> {
    let library = session.library().await?;
    let game_stats = library.game_stats(&session.config.stats);
    let review_stats = library.review_stats(&session.config.stats);

    output.data(&json!({ "games": game_stats, "reviews": review_stats }));
    if output.is_human() {
        print_game_stats(&game_stats, output);
        print_review_stats(&review_stats, output);
    }
    Ok(())
}

pub async fn run_facets(session: &Session, output: &Output) -> Result<()> {
    let library = session.library().await?;
    let facets = library.facets();

    output.data(&facets);
    if output.is_human() {
        let years: Vec<String> = facets.years.iter().map(|y| y.to_string()).collect();
        let mut table = new_table(["Filter", "Options"]);
        table.add_row(vec!["Platforms".to_string(), facets.platforms.join(", ")]);
        table.add_row(vec!["Genres".to_string(), facets.genres.join(", ")]);
        table.add_row(vec!["Years".to_string(), years.join(", ")]);
        output.table(&table);
    }
    Ok(())
}

fn print_games(games: &[Game], output: &Output) {
    let mut table = new_table(["Title", "Platform", "Genre", "Year", "Hours", "Score", "Done"]);
    for game in games {
        table.add_row(vec![
            Cell::new(&game.title),
            Cell::new(or_dash(&game.platforms.joined())),
            Cell::new(or_dash(&game.genres.joined())),
            Cell::new(game.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(format_hours(game.hours())),
            score_cell(game.score),
            Cell::new(if game.completed { "yes" } else { "" }),
        ]);
    }
    output.table(&table);
}

fn print_reviews(reviews: &[EnrichedReview], output: &Output) {
    let mut table = new_table(["Game", "Review", "Score", "Platform", "Date", "ID"]);
    for review in reviews {
        table.add_row(vec![
            Cell::new(&review.game_title),
            Cell::new(or_dash(&review.review.title)),
            score_cell(Some(review.score10)),
            Cell::new(or_dash(&review.game_platform)),
            Cell::new(
                review
                    .review
                    .created_at
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(review.review.id.as_ref().map(|id| id.as_str()).unwrap_or("-")),
        ]);
    }
    output.table(&table);
}

fn print_game_stats(stats: &GameStats, output: &Output) {
    output.heading("Library");
    let mut summary = new_table(["Metric", "Value"]);
    summary.add_row(vec!["Total games".to_string(), stats.total_games.to_string()]);
    summary.add_row(vec!["Completed".to_string(), stats.completed.to_string()]);
    summary.add_row(vec!["Backlog".to_string(), stats.backlog.to_string()]);
    summary.add_row(vec!["Total hours".to_string(), format_hours(stats.total_hours)]);
    summary.add_row(vec!["Average hours".to_string(), format_hours(round1(stats.average_hours))]);
    summary.add_row(vec!["Average score".to_string(), format_score(round1(stats.average_score))]);
    output.table(&summary);

    output.heading("Hours by platform");
    let mut platforms = new_table(["Platform", "Hours"]);
    for row in &stats.hours_by_platform {
        platforms.add_row(vec![row.platform.clone(), format_hours(row.hours)]);
    }
    output.table(&platforms);

    output.heading("Games by genre");
    let mut genres = new_table(["Genre", "Games"]);
    for row in &stats.games_by_genre {
        genres.add_row(vec![row.genre.clone(), row.count.to_string()]);
    }
    output.table(&genres);

    output.heading("Score distribution");
    let max_count = stats
        .score_distribution
        .iter()
        .map(|band| band.count)
        .max()
        .unwrap_or(0)
        .max(1);
    let mut bands = new_table(["Range", "Games", ""]);
    for band in &stats.score_distribution {
        let bar = "█".repeat(band.count * 20 / max_count);
        bands.add_row(vec![band.label.clone(), band.count.to_string(), bar]);
    }
    output.table(&bands);

    output.heading("Recently added");
    let mut recent = new_table(["Title", "Platform", "Added"]);
    for game in &stats.recent_games {
        recent.add_row(vec![
            game.title.clone(),
            or_dash(&game.platforms.joined()).to_string(),
            game.date_added
                .or(game.created_at)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    output.table(&recent);
}

fn print_review_stats(stats: &ReviewStats, output: &Output) {
    output.heading("Reviews");
    let mut summary = new_table(["Metric", "Value"]);
    summary.add_row(vec!["Total reviews".to_string(), stats.total_reviews.to_string()]);
    summary.add_row(vec!["Average score".to_string(), format_score(round1(stats.average_score))]);
    summary.add_row(vec!["High scores".to_string(), stats.high_scores.to_string()]);
    summary.add_row(vec!["Low scores".to_string(), stats.low_scores.to_string()]);
    summary.add_row(vec!["Games reviewed".to_string(), stats.games_reviewed.to_string()]);
    summary.add_row(vec![
        "Latest review".to_string(),
        stats
            .latest_review
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
    ]);
    output.table(&summary);

    if !stats.recent_reviews.is_empty() {
        output.heading("Recent reviews");
        print_reviews(&stats.recent_reviews, output);
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_into_criteria() {
        let args = FilterArgs {
            platform: Some("ps5".to_string()),
            min_score: Some(7.0),
            search: Some("souls".to_string()),
            ..FilterArgs::default()
        };
        let criteria = FilterCriteria::from(args);

        assert_eq!(criteria.platform.as_deref(), Some("ps5"));
        assert_eq!(criteria.min_score, Some(7.0));
        assert_eq!(criteria.query.as_deref(), Some("souls"));
        assert!(criteria.keywords.is_empty());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(7.125), 7.1);
        assert_eq!(round1(0.0), 0.0);
    }
}
