use serde::{Deserialize, Serialize};

/// Prefix marking a respondent's pre-listening mood tag. Every other emotion
/// string is a hierarchical reaction tag such as "energy.high".
pub const MOOD_PREFIX: &str = "mood.";

/// One logged answer. A single submission produces one mood row plus one row
/// per selected emotion, all sharing the same song fields, participant and
/// timestamp. Field order is the CSV column order.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct ResponseRow {
    /// 1-based display index of the song at submission time, 0 when the
    /// catalog was empty.
    pub song_index: u32,
    pub song_id: i64,
    pub song_title: String,
    pub participant_id: String,
    pub emotion: String,
    pub timestamp: String,
}

impl ResponseRow {
    pub fn is_mood(&self) -> bool {
        self.emotion.starts_with(MOOD_PREFIX)
    }

    /// Level-1 category of the emotion, its first dot segment.
    pub fn level1(&self) -> &str {
        self.emotion.split('.').next().unwrap_or_default()
    }
}
