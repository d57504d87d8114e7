pub mod decode;
pub mod game;
pub mod rating;
pub mod record_id;
pub mod review;
pub mod tags;

pub use decode::{games_from_values, reviews_from_values};
pub use game::Game;
pub use rating::{RatingScale, ScaledRating};
pub use record_id::RecordId;
pub use review::{GameRef, LegacyGameFields, Review};
pub use tags::TagList;
