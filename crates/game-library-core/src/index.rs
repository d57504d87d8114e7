// Identifier index over the game collection

use game_library_models::Game;
use std::collections::HashMap;
use tracing::debug;

/// Lookup table from stringified game identifier to game.
///
/// Borrows the collection it was built from. Games without a usable
/// identifier are left out; when two games share an identifier the later
/// one wins.
#[derive(Debug, Clone, Default)]
pub struct GameIndex<'a> {
    by_id: HashMap<&'a str, &'a Game>,
}

impl<'a> GameIndex<'a> {
    pub fn from_games(games: &'a [Game]) -> Self {
        Self::build(games.iter())
    }

    pub fn build<I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a Game>,
    {
        let mut by_id = HashMap::new();
        let mut skipped = 0usize;

        for game in games {
            match &game.id {
                Some(id) => {
                    by_id.insert(id.as_str(), game);
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("GameIndex: skipped {} games without an identifier", skipped);
        }

        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Game> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_library_models::games_from_values;
    use serde_json::json;

    #[test]
    fn test_index_by_every_identifier_encoding() {
        let games = games_from_values(vec![
            json!({ "_id": "g1", "titulo": "String id" }),
            json!({ "_id": 42, "titulo": "Numeric id" }),
            json!({ "_id": { "$oid": "65a1" }, "titulo": "Oid" }),
            json!({ "_id": { "_id": "nested" }, "titulo": "Wrapped" }),
        ]);
        let index = GameIndex::from_games(&games);

        assert_eq!(index.len(), 4);
        assert_eq!(index.get("g1").unwrap().title, "String id");
        assert_eq!(index.get("42").unwrap().title, "Numeric id");
        assert_eq!(index.get("65a1").unwrap().title, "Oid");
        assert_eq!(index.get("nested").unwrap().title, "Wrapped");
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_null_entries_and_unidentified_games_are_skipped() {
        let games = games_from_values(vec![
            json!(null),
            json!({ "titulo": "No id" }),
            json!({ "_id": true, "titulo": "Bad id" }),
            json!({ "_id": "g1", "titulo": "Kept" }),
        ]);
        let index = GameIndex::from_games(&games);

        assert_eq!(index.len(), 1);
        assert!(index.contains("g1"));
    }

    #[test]
    fn test_duplicate_identifier_last_wins() {
        let games = games_from_values(vec![
            json!({ "_id": "g1", "titulo": "First" }),
            json!({ "_id": "g1", "titulo": "Second" }),
        ]);
        let index = GameIndex::from_games(&games);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("g1").unwrap().title, "Second");
    }

    #[test]
    fn test_empty_collection() {
        let index = GameIndex::from_games(&[]);
        assert!(index.is_empty());
    }
}
