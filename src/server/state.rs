use axum::extract::FromRef;

use crate::catalog::Catalog;
use crate::playback::PlaybackStateStore;
use crate::response_log::ResponseLog;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalog = Arc<Catalog>;
pub type GuardedPlaybackStore = Arc<PlaybackStateStore>;
pub type GuardedResponseLog = Arc<ResponseLog>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalog,
    pub playback: GuardedPlaybackStore,
    pub response_log: GuardedResponseLog,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        catalog: GuardedCatalog,
        playback: GuardedPlaybackStore,
        response_log: GuardedResponseLog,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog,
            playback,
            response_log,
        }
    }
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedPlaybackStore {
    fn from_ref(input: &ServerState) -> Self {
        input.playback.clone()
    }
}

impl FromRef<ServerState> for GuardedResponseLog {
    fn from_ref(input: &ServerState) -> Self {
        input.response_log.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
