use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::decode::{self, Object};
use crate::game::{self, Game};
use crate::record_id::RecordId;
use crate::tags::TagList;

const GAME_ID_KEYS: &[&str] = &["juegoId", "gameId", "juego_id"];
const GAME_KEYS: &[&str] = &["juego", "game"];
const LEGACY_TITLE_KEYS: &[&str] = &["juegoTitulo", "nombreJuego", "juegoNombre", "gameTitle"];
const TITLE_KEYS: &[&str] = &["titulo", "title"];
const CONTENT_KEYS: &[&str] = &["contenido", "content", "texto"];
const SCORE_KEYS: &[&str] = &["puntuacion", "score", "rating"];
const DATE_KEYS: &[&str] = &["fecha", "createdAt", "date"];

/// How a review points at its game.
///
/// Records from different backend generations use different shapes; each
/// variant is resolved by its own rule (see the reconciler in the core crate).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GameRef {
    /// Populated game object carried on the review itself.
    Embedded(Box<Game>),
    /// Identifier into the game collection.
    Id(RecordId),
    /// Bare string: tried as an identifier first, then as a game title.
    Named(String),
    /// No reference at all (legacy records before the relational model).
    #[default]
    Missing,
}

impl GameRef {
    /// Identifier candidate for index lookup, if this reference has one.
    pub fn candidate_id(&self) -> Option<RecordId> {
        match self {
            GameRef::Embedded(game) => game.id.clone(),
            GameRef::Id(id) => Some(id.clone()),
            GameRef::Named(name) => RecordId::new(name),
            GameRef::Missing => None,
        }
    }
}

/// Game attributes stored directly on legacy reviews.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegacyGameFields {
    #[serde(rename = "juegoTitulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Bare `juego` name stored next to a `juegoId`.
    #[serde(rename = "juego", skip_serializing_if = "Option::is_none")]
    pub game_name: Option<String>,
    #[serde(rename = "portada", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "plataforma", skip_serializing_if = "TagList::is_empty")]
    pub platforms: TagList,
    #[serde(rename = "genero", skip_serializing_if = "TagList::is_empty")]
    pub genres: TagList,
    #[serde(rename = "anio", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "desarrollador", skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(rename = "horasJugadas", skip_serializing_if = "Option::is_none")]
    pub hours_played: Option<f64>,
}

impl LegacyGameFields {
    fn from_object(obj: &Object) -> Self {
        Self {
            title: decode::text(obj, LEGACY_TITLE_KEYS),
            game_name: None,
            cover_url: decode::text(obj, game::COVER_KEYS),
            platforms: decode::field(obj, game::PLATFORM_KEYS)
                .map(TagList::from_value)
                .unwrap_or_default(),
            genres: decode::field(obj, game::GENRE_KEYS)
                .map(TagList::from_value)
                .unwrap_or_default(),
            year: decode::integer(obj, game::YEAR_KEYS),
            developer: decode::text(obj, game::DEVELOPER_KEYS),
            hours_played: decode::number(obj, game::HOURS_KEYS),
        }
    }

    /// Title to fall back on when the game cannot be resolved.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().or(self.game_name.as_deref())
    }

    fn write_into(&self, map: &mut Map<String, Value>) {
        if let Ok(Value::Object(fields)) = serde_json::to_value(self) {
            map.extend(fields);
        }
    }
}

/// A user review as stored by the backend.
///
/// `score` is kept exactly as stored; its scale is ambiguous (legacy records
/// use 0-5, newer ones 0-10) and is only interpreted by the rating normalizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Review {
    pub id: Option<RecordId>,
    pub game: GameRef,
    pub title: String,
    pub content: String,
    pub score: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub legacy: LegacyGameFields,
}

impl Review {
    /// Decode a backend record. Returns `None` only when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let mut legacy = LegacyGameFields::from_object(obj);
        let game = decode_game_ref(obj, &mut legacy);

        Some(Self {
            id: decode::field(obj, game::ID_KEYS).and_then(RecordId::from_value),
            game,
            title: decode::text(obj, TITLE_KEYS).unwrap_or_default(),
            content: decode::text(obj, CONTENT_KEYS).unwrap_or_default(),
            score: decode::number(obj, SCORE_KEYS),
            created_at: decode::timestamp(obj, DATE_KEYS),
            legacy,
        })
    }

    /// Encode the full record with the backend's field names, legacy
    /// fields and embedded game included. Decodes back to the same review.
    pub fn to_value(&self) -> Value {
        let mut map = self.core_fields();
        if let Some(id) = &self.id {
            map.insert("_id".to_string(), Value::String(id.to_string()));
        }
        if let GameRef::Embedded(game) = &self.game {
            if let Ok(value) = serde_json::to_value(game.as_ref()) {
                map.insert("juego".to_string(), value);
            }
        }
        self.legacy.write_into(&mut map);
        Value::Object(map)
    }

    /// Body for create and update requests: `juegoId`, `titulo`,
    /// `contenido`, `puntuacion` and, when known, `fecha`.
    pub fn to_request_body(&self) -> Value {
        Value::Object(self.core_fields())
    }

    fn core_fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        match &self.game {
            GameRef::Embedded(game) => {
                if let Some(id) = &game.id {
                    map.insert("juegoId".to_string(), Value::String(id.to_string()));
                }
            }
            GameRef::Id(id) => {
                map.insert("juegoId".to_string(), Value::String(id.to_string()));
            }
            GameRef::Named(name) => {
                map.insert("juego".to_string(), Value::String(name.clone()));
            }
            GameRef::Missing => {}
        }
        map.insert("titulo".to_string(), Value::String(self.title.clone()));
        map.insert("contenido".to_string(), Value::String(self.content.clone()));
        if let Some(score) = self.score {
            map.insert("puntuacion".to_string(), Value::from(score));
        }
        if let Some(created_at) = self.created_at {
            map.insert("fecha".to_string(), Value::String(created_at.to_rfc3339()));
        }
        map
    }

    /// Stored score, missing counted as 0. Scale is not interpreted here.
    pub fn raw_score(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Pick the game reference out of a review record.
///
/// A populated game object wins wherever it appears. Otherwise the explicit
/// `juegoId` field is preferred over a `juego` stub or string; if both an id
/// and a bare game name are present, the name is kept as `game_name` so it
/// can still serve as the title-match fallback.
fn decode_game_ref(obj: &Object, legacy: &mut LegacyGameFields) -> GameRef {
    let id_field = decode::field(obj, GAME_ID_KEYS);
    let game_field = decode::field(obj, GAME_KEYS);

    for candidate in [id_field, game_field].into_iter().flatten() {
        if let Some(game) = Game::from_value(candidate).filter(Game::has_details) {
            return GameRef::Embedded(Box::new(game));
        }
    }

    let name = game_field.and_then(|value| value.as_str()).and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    if let Some(id) = id_field.and_then(RecordId::from_value) {
        legacy.game_name = name;
        return GameRef::Id(id);
    }

    if let Some(name) = name {
        return GameRef::Named(name);
    }

    match game_field.and_then(RecordId::from_value) {
        Some(id) => GameRef::Id(id),
        None => GameRef::Missing,
    }
}

impl From<Value> for Review {
    fn from(value: Value) -> Self {
        Self::from_value(&value).unwrap_or_default()
    }
}

impl From<Review> for Value {
    fn from(review: Review) -> Self {
        review.to_value()
    }
}
