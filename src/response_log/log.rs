use super::row::ResponseRow;
use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

pub const READ_TAIL_MAX_LIMIT: usize = 5000;

/// Append-only, header-first CSV log of submitted rows. Appends are
/// serialized under the log's mutex at batch granularity, so a reader never
/// observes a partial submission; reads take no lock and simply may or may
/// not include rows appended while they scan.
pub struct ResponseLog {
    file_path: PathBuf,
    append_lock: Mutex<()>,
}

impl ResponseLog {
    pub fn initialize(file_path: PathBuf) -> ResponseLog {
        ResponseLog {
            file_path,
            append_lock: Mutex::new(()),
        }
    }

    /// Durably appends one submission's rows, writing the column header
    /// first if the log is empty. Errors propagate: a dropped row is data
    /// loss, not something to paper over.
    pub fn append(&self, rows: &[ResponseRow]) -> Result<()> {
        let _guard = self.append_lock.lock().unwrap();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .with_context(|| format!("Failed to open response log {:?}", self.file_path))?;
        let needs_header = file
            .metadata()
            .context("Failed to stat response log")?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        for row in rows {
            writer
                .serialize(row)
                .context("Failed to append response row")?;
        }
        writer.flush().context("Failed to flush response log")?;
        Ok(())
    }

    /// Every row currently in the log, in append order. An absent or empty
    /// log reads as no rows, and rows that fail to decode are skipped:
    /// "no data yet" is a normal state, never an error.
    pub fn read_all(&self) -> Vec<ResponseRow> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(_) => return Vec::new(),
        };

        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file)
            .into_deserialize::<ResponseRow>()
            .filter_map(|row| row.ok())
            .collect()
    }

    /// The last `limit` rows in original order, `limit` clamped to
    /// `[1, READ_TAIL_MAX_LIMIT]`.
    pub fn read_tail(&self, limit: usize) -> Vec<ResponseRow> {
        let limit = limit.clamp(1, READ_TAIL_MAX_LIMIT);
        let mut rows = self.read_all();
        let start = rows.len().saturating_sub(limit);
        rows.split_off(start)
    }
}
