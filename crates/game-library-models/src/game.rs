use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::decode::{self, Object};
use crate::record_id::RecordId;
use crate::tags::TagList;

pub(crate) const ID_KEYS: &[&str] = &["_id", "id"];
pub(crate) const TITLE_KEYS: &[&str] = &["titulo", "title", "nombre", "name"];
pub(crate) const COVER_KEYS: &[&str] = &["portada", "cover", "coverUrl", "imagen"];
pub(crate) const PLATFORM_KEYS: &[&str] = &["plataforma", "plataformas", "platform", "platforms"];
pub(crate) const GENRE_KEYS: &[&str] = &["genero", "generos", "genre", "genres"];
pub(crate) const YEAR_KEYS: &[&str] = &["anio", "año", "year", "releaseYear"];
pub(crate) const DEVELOPER_KEYS: &[&str] = &["desarrollador", "developer"];
pub(crate) const HOURS_KEYS: &[&str] = &["horasJugadas", "hoursPlayed", "horas", "hours"];
const COMPLETED_KEYS: &[&str] = &["completado", "completed"];
const SCORE_KEYS: &[&str] = &["puntuacion", "score", "rating"];
const DESCRIPTION_KEYS: &[&str] = &["descripcion", "description"];
const DATE_ADDED_KEYS: &[&str] = &["fechaAgregado", "dateAdded"];
const CREATED_AT_KEYS: &[&str] = &["createdAt", "created_at"];

/// A catalogued game as stored by the backend.
///
/// Deserialization goes through [`Game::from_value`] and never fails: fields
/// with an unexpected shape are left empty. Serialization uses the backend's
/// field names so snapshots decode back to the same record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Game {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "portada", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "plataforma")]
    pub platforms: TagList,
    #[serde(rename = "genero")]
    pub genres: TagList,
    #[serde(rename = "anio", skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "desarrollador", skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(rename = "completado")]
    pub completed: bool,
    #[serde(rename = "puntuacion", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>, // 0-10
    #[serde(rename = "horasJugadas", skip_serializing_if = "Option::is_none")]
    pub hours_played: Option<f64>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "fechaAgregado", skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Decode a backend record. Returns `None` only when the value is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }

    pub(crate) fn from_object(obj: &Object) -> Self {
        Self {
            id: decode::field(obj, ID_KEYS).and_then(RecordId::from_value),
            title: decode::text(obj, TITLE_KEYS).unwrap_or_default(),
            cover_url: decode::text(obj, COVER_KEYS),
            platforms: decode::field(obj, PLATFORM_KEYS)
                .map(TagList::from_value)
                .unwrap_or_default(),
            genres: decode::field(obj, GENRE_KEYS)
                .map(TagList::from_value)
                .unwrap_or_default(),
            year: decode::integer(obj, YEAR_KEYS),
            developer: decode::text(obj, DEVELOPER_KEYS),
            completed: decode::flag(obj, COMPLETED_KEYS),
            score: decode::number(obj, SCORE_KEYS),
            hours_played: decode::number(obj, HOURS_KEYS),
            description: decode::text(obj, DESCRIPTION_KEYS),
            date_added: decode::timestamp(obj, DATE_ADDED_KEYS),
            created_at: decode::timestamp(obj, CREATED_AT_KEYS),
        }
    }

    /// Whether the record carries anything beyond an identifier.
    ///
    /// Reviews sometimes embed a bare `{ "_id": ... }` stub instead of the
    /// populated game; such stubs must be resolved through the index.
    pub fn has_details(&self) -> bool {
        !self.title.is_empty()
    }

    /// Hours played, missing or negative values counted as 0.
    pub fn hours(&self) -> f64 {
        self.hours_played.unwrap_or(0.0).max(0.0)
    }

    /// Score on the 0-10 scale, missing counted as 0.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    /// Date used for "recently added" ordering: date added, then creation
    /// date, then the Unix epoch.
    pub fn recency_date(&self) -> DateTime<Utc> {
        self.date_added
            .or(self.created_at)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl From<Value> for Game {
    fn from(value: Value) -> Self {
        Self::from_value(&value).unwrap_or_default()
    }
}
