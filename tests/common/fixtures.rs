//! Test fixture creation for the survey data directory

use super::constants::*;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a temporary data directory with a five-song catalog.
/// Returns (temp_dir, data_dir, songs_path).
pub fn create_test_data_dir() -> Result<(TempDir, PathBuf, PathBuf)> {
    let dir = TempDir::new()?;
    let data_dir = dir.path().to_path_buf();
    let songs_path = data_dir.join("songs.json");

    let songs: Vec<serde_json::Value> = SONG_IDS
        .iter()
        .zip(SONG_TITLES.iter())
        .map(|(id, title)| {
            json!({
                "id": id,
                "title": title,
                "url": format!("https://songs.example/{}", id),
            })
        })
        .collect();
    std::fs::write(&songs_path, serde_json::to_string_pretty(&songs)?)?;

    Ok((dir, data_dir, songs_path))
}

/// Creates a temporary data directory without any songs file, for the
/// empty-catalog scenarios.
pub fn create_empty_data_dir() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;
    let data_dir = dir.path().to_path_buf();
    Ok((dir, data_dir))
}
