use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};

use emotion_survey_server::response_log::ResponseLog;
use emotion_survey_server::stats;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Offline batch re-aggregation over a responses CSV. Writes per-group
/// summary CSVs next to the input and prints the leading rows of each.
#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the responses CSV produced by the server.
    #[clap(value_parser = parse_path, default_value = "data/responses.csv")]
    pub responses_path: PathBuf,

    /// Directory for the summary CSVs. Defaults to the responses directory.
    #[clap(long, value_parser = parse_path)]
    pub out_dir: Option<PathBuf>,
}

const HEAD_ROWS: usize = 5;

fn to_csv_string<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("Failed to flush summary CSV: {}", err))?;
    Ok(String::from_utf8(bytes)?)
}

fn write_summary<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let content = to_csv_string(rows)?;
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write summary file {:?}", path))?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!("{}", file_name);
    // Header plus the first few rows, the way you would skim a dataframe.
    for line in content.lines().take(HEAD_ROWS + 1) {
        println!("{}", line);
    }
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let rows = ResponseLog::initialize(cli_args.responses_path.clone()).read_all();
    if rows.is_empty() {
        println!("No responses found.");
        return Ok(());
    }

    let out_dir = match cli_args.out_dir {
        Some(dir) => dir,
        None => cli_args
            .responses_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let summary = stats::summarize(&rows);
    write_summary(&out_dir.join("summary_by_emotion.csv"), &summary.by_emotion)?;
    write_summary(&out_dir.join("summary_by_level1.csv"), &summary.by_level1)?;
    write_summary(&out_dir.join("summary_by_mood.csv"), &summary.by_mood)?;

    Ok(())
}
