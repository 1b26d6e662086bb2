pub mod dfg;
pub mod event_log;
pub mod log_view;
pub mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

use dfg::{DirectlyFollowsGraph, Rust4pmDiscovery};
use event_log::{ProcessEventLog, TabularLogConverter};
use log_view::EventLogView;
use render::graphviz::GraphvizVisualizer;
use render::Rendering;

pub const ARTIFACT_FILE_NAME: &str = "directly_follows_graph.png";

#[derive(Debug)]
pub enum MiningError {
    Storage(sqlx::Error),
    Conversion(String),
    Discovery(String),
    Visualization(String),
    Io(std::io::Error),
    Aborted(String),
}

impl MiningError {
    /// Short name of the step that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            MiningError::Storage(_) => "load",
            MiningError::Conversion(_) => "conversion",
            MiningError::Discovery(_) => "discovery",
            MiningError::Visualization(_) => "visualization",
            MiningError::Io(_) => "save",
            MiningError::Aborted(_) => "worker",
        }
    }
}

impl std::fmt::Display for MiningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MiningError::Storage(err) => write!(f, "failed to load events: {err}"),
            MiningError::Conversion(msg) => write!(f, "log conversion failed: {msg}"),
            MiningError::Discovery(msg) => write!(f, "dfg discovery failed: {msg}"),
            MiningError::Visualization(msg) => write!(f, "visualization failed: {msg}"),
            MiningError::Io(err) => write!(f, "failed to write artifact: {err}"),
            MiningError::Aborted(msg) => write!(f, "mining task aborted: {msg}"),
        }
    }
}

impl From<std::io::Error> for MiningError {
    fn from(err: std::io::Error) -> Self {
        MiningError::Io(err)
    }
}

/// Turns the tabular view into a case-grouped, time-ordered event log.
pub trait LogConverter: Send + Sync {
    fn convert(&self, view: &EventLogView) -> Result<ProcessEventLog, MiningError>;
}

/// Derives a directly-follows graph from an event log.
pub trait DfgDiscovery: Send + Sync {
    fn discover(&self, log: &ProcessEventLog) -> Result<DirectlyFollowsGraph, MiningError>;
}

/// Renders a graph and persists the result as an image.
#[async_trait]
pub trait DfgVisualizer: Send + Sync {
    fn name(&self) -> &str;

    fn apply(
        &self,
        dfg: &DirectlyFollowsGraph,
        log: &ProcessEventLog,
    ) -> Result<Rendering, MiningError>;

    async fn save(&self, rendering: &Rendering, path: &Path) -> Result<(), MiningError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum MiningOutcome {
    /// No events stored; nothing was rendered.
    EmptyData,
    Generated(MiningReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiningReport {
    pub artifact: PathBuf,
    pub cases: usize,
    pub events: usize,
    pub transitions: usize,
}

pub struct ProcessMiner {
    converter: Arc<dyn LogConverter>,
    discovery: Arc<dyn DfgDiscovery>,
    visualizer: Arc<dyn DfgVisualizer>,
}

impl ProcessMiner {
    pub fn new(
        converter: Arc<dyn LogConverter>,
        discovery: Arc<dyn DfgDiscovery>,
        visualizer: Arc<dyn DfgVisualizer>,
    ) -> Self {
        Self {
            converter,
            discovery,
            visualizer,
        }
    }

    /// Tabular conversion, rust4pm discovery and Graphviz rendering through
    /// the configured `dot` binary.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(TabularLogConverter),
            Arc::new(Rust4pmDiscovery),
            Arc::new(GraphvizVisualizer::new(&config.graphviz_dot)),
        )
    }

    pub fn visualizer_name(&self) -> &str {
        self.visualizer.name()
    }

    /// Load every stored event, mine the graph and write it to `artifact`.
    ///
    /// An empty store short-circuits to [`MiningOutcome::EmptyData`] before
    /// any collaborator runs. Collaborator failures abort the run and leave
    /// the previous artifact, if any, untouched.
    pub async fn run(&self, pool: &SqlitePool, artifact: &Path) -> Result<MiningOutcome, MiningError> {
        let events = db::events::list_all(pool)
            .await
            .map_err(MiningError::Storage)?;

        if events.is_empty() {
            tracing::info!("No events stored, skipping DFG generation");
            return Ok(MiningOutcome::EmptyData);
        }

        let view = EventLogView::from_events(&events);
        let converter = self.converter.clone();
        let discovery = self.discovery.clone();
        let visualizer = self.visualizer.clone();

        let (log, dfg, rendering) = tokio::task::spawn_blocking(move || {
            let view = view.coerce_timestamps()?;
            let log = converter.convert(&view)?;
            let dfg = discovery.discover(&log)?;
            let rendering = visualizer.apply(&dfg, &log)?;
            Ok::<_, MiningError>((log, dfg, rendering))
        })
        .await
        .map_err(|e| MiningError::Aborted(e.to_string()))??;

        self.visualizer.save(&rendering, artifact).await?;

        let report = MiningReport {
            artifact: artifact.to_path_buf(),
            cases: log.case_count(),
            events: log.event_count(),
            transitions: dfg.edges.len(),
        };

        tracing::info!(
            "DFG written to {} ({} cases, {} events, {} transitions, renderer={})",
            report.artifact.display(),
            report.cases,
            report.events,
            report.transitions,
            self.visualizer.name()
        );

        Ok(MiningOutcome::Generated(report))
    }
}
