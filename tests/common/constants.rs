//! Shared constants for end-to-end tests
//!
//! When the test catalog or participants change, update only this file.

// ============================================================================
// Test Catalog
// ============================================================================

/// Ids of the five songs in the test catalog, in catalog order.
pub const SONG_IDS: [i64; 5] = [101, 102, 103, 104, 105];

/// Titles of the five songs in the test catalog, in catalog order.
pub const SONG_TITLES: [&str; 5] = [
    "Opening Track",
    "Second Wind",
    "Midpoint",
    "Penultimate",
    "Closing Credits",
];

pub const TOTAL_SONGS: usize = 5;

// ============================================================================
// Test Participants
// ============================================================================

pub const PARTICIPANT_1: &str = "participant-1";
pub const PARTICIPANT_2: &str = "participant-2";

// ============================================================================
// Timeouts
// ============================================================================

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
