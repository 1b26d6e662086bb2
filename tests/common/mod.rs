use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use dfg_miner::config::Config;
use dfg_miner::mining::ProcessMiner;

/// A running test server with its own database file and static directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.config.artifact_path()
    }

    /// Post an event payload, return (body, status).
    pub async fn ingest(&self, payload: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/endpoint"))
            .json(payload)
            .send()
            .await
            .expect("ingest request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Post a raw body with a JSON content type, return (body, status).
    pub async fn ingest_raw(&self, body: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/endpoint"))
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("ingest request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Fetch all events through the query API.
    pub async fn list(&self) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url("/api/data"))
            .send()
            .await
            .expect("list request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn event_count(&self) -> i64 {
        dfg_miner::db::events::count(&self.pool)
            .await
            .expect("count query failed")
    }
}

pub fn event(case_id: i64, activity: &str, start_ms: i64, end_ms: i64) -> Value {
    json!({
        "CaseID": case_id,
        "ActivityCode": activity,
        "StartTime": start_ms,
        "EndTime": end_ms,
    })
}

/// PNG signature the stand-in `dot` prints before echoing its input.
pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Install a stand-in for the Graphviz `dot` binary in `dir`. It ignores its
/// arguments, prints [`PNG_SIGNATURE`] and then copies stdin to stdout.
pub fn fake_dot(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-dot");
    std::fs::write(&path, "#!/bin/sh\nprintf '\\211PNG\\r\\n\\032\\n'\ncat\n")
        .expect("Failed to write fake dot");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark fake dot executable");
    path
}

pub async fn spawn_app() -> TestApp {
    spawn_with(|config| ProcessMiner::from_config(config)).await
}

/// Spawn a test app whose mining collaborators come from `miner`.
pub async fn spawn_with(miner: impl FnOnce(&Config) -> ProcessMiner) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("events.db");
    let static_dir = dir.path().join("static");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(&db_path)
                .create_if_missing(true),
        )
        .await
        .expect("Failed to open test database");

    dfg_miner::db::ensure_schema(&pool)
        .await
        .expect("Failed to create schema");

    let config = Config {
        database_url: format!("sqlite://{}", db_path.display()),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        static_dir,
        max_body_size: 1_048_576,
        log_level: "warn".to_string(),
        graphviz_dot: fake_dot(dir.path()).display().to_string(),
    };

    let app = dfg_miner::build_app_with_miner(pool.clone(), config.clone(), miner(&config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        config,
        _dir: dir,
    }
}
