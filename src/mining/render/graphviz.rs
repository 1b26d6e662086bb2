use std::fmt::Write as _;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{write_artifact, Rendering};
use crate::mining::dfg::DirectlyFollowsGraph;
use crate::mining::event_log::ProcessEventLog;
use crate::mining::{DfgVisualizer, MiningError};

/// Emits DOT source and lays it out with the Graphviz `dot` binary.
pub struct GraphvizVisualizer {
    dot_binary: String,
}

impl GraphvizVisualizer {
    pub fn new(dot_binary: &str) -> Self {
        Self {
            dot_binary: dot_binary.to_string(),
        }
    }
}

#[async_trait]
impl DfgVisualizer for GraphvizVisualizer {
    fn name(&self) -> &str {
        "graphviz"
    }

    fn apply(
        &self,
        dfg: &DirectlyFollowsGraph,
        _log: &ProcessEventLog,
    ) -> Result<Rendering, MiningError> {
        Ok(Rendering::Dot(to_dot(dfg)))
    }

    async fn save(&self, rendering: &Rendering, path: &Path) -> Result<(), MiningError> {
        let source = match rendering {
            Rendering::Dot(source) => source,
            Rendering::Png(bytes) => return write_artifact(path, bytes).await,
        };

        let mut child = Command::new(&self.dot_binary)
            .arg("-Tpng")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                MiningError::Visualization(format!("failed to run '{}': {e}", self.dot_binary))
            })?;

        // A binary that exits without reading reports through its exit status.
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(source.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(MiningError::Visualization(format!(
                "'{}' exited with {}: {}",
                self.dot_binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        write_artifact(path, &output.stdout).await
    }
}

/// Longest activity name, in characters, that is written into a label.
/// Longer names are cut and end in `...`.
pub const MAX_LABEL_CHARS: usize = 64;

/// DOT source for the graph: one box per activity with its occurrence count,
/// one edge per transition labelled with its frequency, plus start and end
/// markers.
pub fn to_dot(dfg: &DirectlyFollowsGraph) -> String {
    let ids: std::collections::BTreeMap<&str, String> = dfg
        .activities
        .keys()
        .enumerate()
        .map(|(i, name)| (name.as_str(), format!("n{i}")))
        .collect();
    let max_count = dfg.activities.values().copied().max().unwrap_or(1).max(1);
    let max_freq = dfg.max_edge_frequency().max(1);

    let mut out = String::from("digraph dfg {\n");
    out.push_str("  rankdir=TB;\n  bgcolor=\"transparent\";\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");
    out.push_str("  \"@start\" [label=\"\", shape=circle, style=filled, fillcolor=\"#32CD32\", width=0.3];\n");
    out.push_str("  \"@end\" [label=\"\", shape=doublecircle, style=filled, fillcolor=\"#FFA500\", width=0.3];\n");

    for (name, count) in &dfg.activities {
        let _ = writeln!(
            out,
            "  {} [label=\"{} ({count})\", fillcolor=\"{}\"];",
            ids[name.as_str()],
            escape(&truncate(name)),
            shade(*count, max_count)
        );
    }

    for name in dfg.start_activities.iter().filter_map(|n| ids.get(n.as_str())) {
        let _ = writeln!(out, "  \"@start\" -> {name};");
    }

    for ((from, to), frequency) in &dfg.edges {
        let (Some(from), Some(to)) = (ids.get(from.as_str()), ids.get(to.as_str())) else {
            continue;
        };
        let width = 1.0 + 4.0 * *frequency as f64 / max_freq as f64;
        let _ = writeln!(out, "  {from} -> {to} [label=\"{frequency}\", penwidth={width:.2}];");
    }

    for name in dfg.end_activities.iter().filter_map(|n| ids.get(n.as_str())) {
        let _ = writeln!(out, "  {name} -> \"@end\";");
    }

    out.push_str("}\n");
    out
}

fn truncate(label: &str) -> std::borrow::Cow<'_, str> {
    match label.char_indices().nth(MAX_LABEL_CHARS) {
        Some((cut, _)) => format!("{}...", &label[..cut]).into(),
        None => label.into(),
    }
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Darker blue for more frequent activities.
fn shade(count: u64, max: u64) -> String {
    let level = 255 - (155 * count / max) as u8;
    format!("#{level:02X}{level:02X}FF")
}
