use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
struct PlaybackState {
    current_index: i64,
}

/// Durable store for the single "current song index" shared by every
/// participant. This is the one piece of cross-request mutable state in the
/// system: every load/clamp/save sequence runs inside the store's mutex so
/// concurrent navigation and submissions never interleave incoherently.
pub struct PlaybackStateStore {
    file_path: PathBuf,
    lock: Mutex<()>,
}

impl PlaybackStateStore {
    pub fn initialize(file_path: PathBuf) -> PlaybackStateStore {
        PlaybackStateStore {
            file_path,
            lock: Mutex::new(()),
        }
    }

    /// Clamping policy: an empty catalog pins the index to 0, otherwise the
    /// requested index saturates into `[0, total - 1]`. No wraparound.
    pub fn clamp(requested: i64, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        requested.clamp(0, total as i64 - 1) as usize
    }

    /// Caller must hold the lock. Absent, unreadable or malformed state
    /// (including a non-integer or negative index) loads as 0, never an error.
    fn load_state(&self) -> i64 {
        let content = match std::fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(_) => return 0,
        };
        match serde_json::from_str::<PlaybackState>(&content) {
            Ok(state) => state.current_index.max(0),
            Err(_) => 0,
        }
    }

    /// Caller must hold the lock. Writes to a temp file in the same directory
    /// and renames it over the target, so a concurrent reader never observes
    /// a partially written value.
    fn save_state(&self, index: usize) -> Result<()> {
        let state = PlaybackState {
            current_index: index as i64,
        };
        let json_string = serde_json::to_string(&state)?;

        let dir = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp state file in {:?}", dir))?;
        tmp.write_all(json_string.as_bytes())
            .context("Failed to write playback state")?;
        tmp.persist(&self.file_path)
            .with_context(|| format!("Failed to persist playback state to {:?}", self.file_path))?;
        Ok(())
    }

    /// Returns the current index clamped against the catalog length,
    /// rewriting the persisted state if clamping changed it.
    pub fn current(&self, total: usize) -> Result<usize> {
        let _guard = self.lock.lock().unwrap();
        let stored = self.load_state();
        let index = Self::clamp(stored, total);
        if index as i64 != stored {
            self.save_state(index)?;
        }
        Ok(index)
    }

    /// Moves the index by `delta` (clamped) and returns the new index.
    pub fn advance(&self, delta: i64, total: usize) -> Result<usize> {
        let _guard = self.lock.lock().unwrap();
        let index = Self::clamp(self.load_state() + delta, total);
        self.save_state(index)?;
        Ok(index)
    }

    /// Jumps to `requested` (clamped) and returns the new index.
    pub fn set(&self, requested: i64, total: usize) -> Result<usize> {
        let _guard = self.lock.lock().unwrap();
        let index = Self::clamp(requested, total);
        self.save_state(index)?;
        Ok(index)
    }

    /// Optimistic advance used after a submission: moves forward by one only
    /// if the stored index still equals `expected`. A no-op when someone
    /// already navigated away; an index that merely landed back on `expected`
    /// counts as still current. Returns whether an advance happened.
    pub fn advance_if_current(&self, expected: usize, total: usize) -> Result<bool> {
        let _guard = self.lock.lock().unwrap();
        let stored = self.load_state();
        if Self::clamp(stored, total) != expected {
            return Ok(false);
        }
        let next = Self::clamp(expected as i64 + 1, total);
        self.save_state(next)?;
        Ok(true)
    }
}
