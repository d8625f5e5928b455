//! Pure aggregation over a response-log snapshot. Nothing here touches
//! storage; callers pass the rows from `ResponseLog::read_all`.

use crate::response_log::ResponseRow;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Serialize, Debug, PartialEq)]
pub struct EmotionCount {
    pub song_index: u32,
    pub emotion: String,
    pub count: u64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Level1Count {
    pub song_index: u32,
    pub level1: String,
    pub count: u64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct MoodCount {
    pub song_index: u32,
    pub mood: String,
    pub count: u64,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct SongSummary {
    pub song_index: u32,
    pub unique_participants: usize,
    pub mood_count: u64,
    pub emotion_count: u64,
    pub total_rows: u64,
}

#[derive(Serialize, Debug, PartialEq, Default)]
pub struct Summary {
    pub by_song: Vec<SongSummary>,
    pub by_emotion: Vec<EmotionCount>,
    pub by_level1: Vec<Level1Count>,
    pub by_mood: Vec<MoodCount>,
}

#[derive(Default)]
struct SongAccumulator {
    total_rows: u64,
    mood_count: u64,
    emotion_count: u64,
    participants: HashSet<String>,
}

/// Group lists sort by (song_index asc, count desc, key asc); the per-song
/// list by song_index asc. The order is part of the API contract.
fn sorted_counts<T>(
    counter: BTreeMap<(u32, String), u64>,
    build: impl Fn(u32, String, u64) -> T,
) -> Vec<T> {
    let mut groups: Vec<((u32, String), u64)> = counter.into_iter().collect();
    groups.sort_by(|a, b| {
        let ((a_song, a_key), a_count) = a;
        let ((b_song, b_key), b_count) = b;
        a_song
            .cmp(b_song)
            .then(b_count.cmp(a_count))
            .then(a_key.cmp(b_key))
    });
    groups
        .into_iter()
        .map(|((song_index, key), count)| build(song_index, key, count))
        .collect()
}

pub fn summarize(rows: &[ResponseRow]) -> Summary {
    let mut by_emotion: BTreeMap<(u32, String), u64> = BTreeMap::new();
    let mut by_level1: BTreeMap<(u32, String), u64> = BTreeMap::new();
    let mut by_mood: BTreeMap<(u32, String), u64> = BTreeMap::new();
    let mut per_song: BTreeMap<u32, SongAccumulator> = BTreeMap::new();

    for row in rows {
        let song = per_song.entry(row.song_index).or_default();
        song.total_rows += 1;
        if !row.participant_id.is_empty() {
            song.participants.insert(row.participant_id.clone());
        }

        *by_emotion
            .entry((row.song_index, row.emotion.clone()))
            .or_default() += 1;

        if row.is_mood() {
            song.mood_count += 1;
            *by_mood
                .entry((row.song_index, row.emotion.clone()))
                .or_default() += 1;
        } else {
            song.emotion_count += 1;
            *by_level1
                .entry((row.song_index, row.level1().to_string()))
                .or_default() += 1;
        }
    }

    Summary {
        by_song: per_song
            .into_iter()
            .map(|(song_index, song)| SongSummary {
                song_index,
                unique_participants: song.participants.len(),
                mood_count: song.mood_count,
                emotion_count: song.emotion_count,
                total_rows: song.total_rows,
            })
            .collect(),
        by_emotion: sorted_counts(by_emotion, |song_index, emotion, count| EmotionCount {
            song_index,
            emotion,
            count,
        }),
        by_level1: sorted_counts(by_level1, |song_index, level1, count| Level1Count {
            song_index,
            level1,
            count,
        }),
        by_mood: sorted_counts(by_mood, |song_index, mood, count| MoodCount {
            song_index,
            mood,
            count,
        }),
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ParticipantRow {
    pub song_id: i64,
    pub emotion: String,
    pub timestamp: String,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ParticipantGroup {
    pub song_index: u32,
    pub song_title: String,
    pub rows: Vec<ParticipantRow>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct ParticipantHistory {
    pub participant_id: String,
    pub groups: Vec<ParticipantGroup>,
}

/// One participant's rows grouped per song (ascending song_index), keeping
/// the first-seen title per group and the rows in log order within it.
pub fn participant_history(rows: &[ResponseRow], participant_id: &str) -> ParticipantHistory {
    let mut groups: BTreeMap<u32, ParticipantGroup> = BTreeMap::new();

    for row in rows.iter().filter(|row| row.participant_id == participant_id) {
        let group = groups.entry(row.song_index).or_insert_with(|| ParticipantGroup {
            song_index: row.song_index,
            song_title: row.song_title.clone(),
            rows: Vec::new(),
        });
        group.rows.push(ParticipantRow {
            song_id: row.song_id,
            emotion: row.emotion.clone(),
            timestamp: row.timestamp.clone(),
        });
    }

    ParticipantHistory {
        participant_id: participant_id.to_string(),
        groups: groups.into_values().collect(),
    }
}

/// Sorted set of non-empty participant ids across the whole log.
pub fn distinct_participants(rows: &[ResponseRow]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.participant_id.is_empty())
        .map(|row| row.participant_id.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
