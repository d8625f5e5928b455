use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::response_log::MOOD_PREFIX;

/// Submission rejection reasons. The variant order is the validation order;
/// the messages are part of the API contract.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("participant_id required")]
    ParticipantIdRequired,
    #[error("song_id required")]
    SongIdRequired,
    #[error("current_mood required")]
    CurrentMoodRequired,
    #[error("selected_emotions must be a list")]
    SelectedEmotionsNotAList,
    #[error("selected_emotions required unless allow_empty")]
    SelectedEmotionsRequired,
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Interprets a JSON value as an integer, accepting numeric strings.
pub fn parse_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(raw) => raw.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Submission body as received. `song_id` and `selected_emotions` stay
/// untyped here because their validation errors depend on the JSON type the
/// client actually sent.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SubmitBody {
    pub participant_id: String,
    pub song_id: Value,
    pub current_mood: String,
    pub selected_emotions: Value,
    pub allow_empty: bool,
    pub advance_song: bool,
    pub timestamp: String,
}

/// A fully validated submission; only constructed by `SubmitBody::validate`.
#[derive(Debug, PartialEq)]
pub struct SubmitRequest {
    pub participant_id: String,
    pub song_id: i64,
    pub current_mood: String,
    /// Non-empty emotion tags only; blank entries are dropped after the
    /// emptiness rule has been checked against the raw list.
    pub selected_emotions: Vec<String>,
    pub advance_song: bool,
    pub timestamp: Option<String>,
}

impl SubmitBody {
    /// First failing rule wins.
    pub fn validate(self) -> Result<SubmitRequest, ValidationError> {
        let participant_id = self.participant_id.trim().to_string();
        if participant_id.is_empty() {
            return Err(ValidationError::ParticipantIdRequired);
        }

        let song_id = parse_integer(&self.song_id).ok_or(ValidationError::SongIdRequired)?;

        let current_mood = self.current_mood.trim().to_string();
        if current_mood.is_empty() || !current_mood.starts_with(MOOD_PREFIX) {
            return Err(ValidationError::CurrentMoodRequired);
        }

        let raw_emotions = match self.selected_emotions {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            _ => return Err(ValidationError::SelectedEmotionsNotAList),
        };
        if raw_emotions.is_empty() && !self.allow_empty {
            return Err(ValidationError::SelectedEmotionsRequired);
        }
        let selected_emotions = raw_emotions
            .iter()
            .filter_map(|item| item.as_str())
            .filter(|emotion| !emotion.is_empty())
            .map(|emotion| emotion.to_string())
            .collect();

        let timestamp = match self.timestamp.trim() {
            "" => None,
            trimmed => Some(trimmed.to_string()),
        };

        Ok(SubmitRequest {
            participant_id,
            song_id,
            current_mood,
            selected_emotions,
            advance_song: self.advance_song,
            timestamp,
        })
    }
}
