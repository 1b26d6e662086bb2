use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::mining::ProcessMiner;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub miner: ProcessMiner,
}
