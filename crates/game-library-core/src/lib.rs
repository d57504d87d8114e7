pub mod filter;
pub mod index;
pub mod library;
pub mod rating;
pub mod reconcile;
pub mod stats;

pub use filter::{filter_items, FilterCriteria, FilterFacets, Filterable};
pub use index::GameIndex;
pub use library::LibraryView;
pub use rating::{to_storage_scale, to_ten_scale};
pub use reconcile::{enrich_review, enrich_reviews, find_by_title, resolve_game, EnrichedReview, Resolution, ResolvedGame, GAME_NOT_FOUND};
pub use stats::{GameStats, GenreCount, PlatformHours, ReviewStats, ScoreBand};
