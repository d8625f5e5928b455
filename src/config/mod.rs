mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::Result;
use std::path::PathBuf;

/// CLI arguments that take part in config resolution. TOML values override
/// these where present.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub songs_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding state.json and responses.csv.
    pub data_dir: PathBuf,
    pub songs_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file
    /// config. TOML values override CLI values where present; the songs path
    /// defaults to `<data_dir>/songs.json`.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .or_else(|| cli.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from("data"));

        let songs_path = file
            .songs_path
            .map(PathBuf::from)
            .or_else(|| cli.songs_path.clone())
            .unwrap_or_else(|| data_dir.join("songs.json"));

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|value| parse_logging_level(&value))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        Ok(AppConfig {
            data_dir,
            songs_path,
            port,
            logging_level,
            frontend_dir_path,
        })
    }
}

fn parse_logging_level(value: &str) -> Option<RequestsLoggingLevel> {
    match value.to_lowercase().as_str() {
        "none" => Some(RequestsLoggingLevel::None),
        "path" => Some(RequestsLoggingLevel::Path),
        "headers" => Some(RequestsLoggingLevel::Headers),
        "body" => Some(RequestsLoggingLevel::Body),
        _ => None,
    }
}
