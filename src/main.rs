use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use emotion_survey_server::catalog::Catalog;
use emotion_survey_server::config::{AppConfig, CliConfig, FileConfig};
use emotion_survey_server::playback::PlaybackStateStore;
use emotion_survey_server::response_log::ResponseLog;
use emotion_survey_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

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

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding state.json and responses.csv; created if missing.
    #[clap(long, value_parser = parse_path, default_value = "data")]
    pub data_dir: PathBuf,

    /// Path to the songs catalog JSON. Defaults to <data-dir>/songs.json.
    #[clap(long, value_parser = parse_path)]
    pub songs_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5001)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Optional TOML config file; its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    info!("Starting survey server ({})", env!("GIT_HASH"));

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        data_dir: Some(cli_args.data_dir),
        songs_path: cli_args.songs_path,
        port: cli_args.port,
        logging_level: cli_args.logging_level,
        frontend_dir_path: cli_args.frontend_dir_path,
    };
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    std::fs::create_dir_all(&app_config.data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", app_config.data_dir))?;

    let catalog = Catalog::load(&app_config.songs_path);
    let playback = PlaybackStateStore::initialize(app_config.data_dir.join("state.json"));
    let response_log = ResponseLog::initialize(app_config.data_dir.join("responses.csv"));

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
    };
    run_server(server_config, catalog, playback, response_log).await
}
