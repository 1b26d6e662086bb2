use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
    pub max_body_size: usize,
    pub log_level: String,
    pub graphviz_dot: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_or("DATABASE_URL", "sqlite://database.db?mode=rwc");

        let host: IpAddr = env_or("DFG_MINER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid DFG_MINER_HOST: {e}"))?;

        let port: u16 = env_or("DFG_MINER_PORT", "5000")
            .parse()
            .map_err(|e| format!("Invalid DFG_MINER_PORT: {e}"))?;

        let static_dir = PathBuf::from(env_or("DFG_MINER_STATIC_DIR", "static"));

        let max_body_size: usize = env_or("DFG_MINER_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid DFG_MINER_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("DFG_MINER_LOG_LEVEL", "info");

        let graphviz_dot = env_or("DFG_MINER_GRAPHVIZ_DOT", "dot");

        Ok(Config {
            database_url,
            host,
            port,
            static_dir,
            max_body_size,
            log_level,
            graphviz_dot,
        })
    }

    /// Fixed location of the rendered graph inside the static directory.
    pub fn artifact_path(&self) -> PathBuf {
        self.static_dir.join(crate::mining::ARTIFACT_FILE_NAME)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
