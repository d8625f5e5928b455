use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// A single catalog entry. Identity is the 0-based position in the catalog
/// sequence plus the `id`.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// Ordered, immutable song catalog, loaded once at startup.
pub struct Catalog {
    songs: Vec<Song>,
}

impl Catalog {
    pub fn new(songs: Vec<Song>) -> Catalog {
        Catalog { songs }
    }

    /// Loads the catalog from a JSON array of songs. A missing or malformed
    /// file degrades to an empty catalog, "no songs yet" is a normal state.
    pub fn load<P: AsRef<Path>>(path: P) -> Catalog {
        let path = path.as_ref();
        let songs = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Vec<Song>>(&content) {
                Ok(songs) => songs,
                Err(err) => {
                    warn!("Could not parse songs file {:?}: {}", path, err);
                    Vec::new()
                }
            },
            Err(err) => {
                warn!("Could not read songs file {:?}: {}", path, err);
                Vec::new()
            }
        };

        info!("Catalog has {} songs", songs.len());
        Catalog::new(songs)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
