use std::collections::{BTreeMap, BTreeSet};

use process_mining::core::process_models::case_centric::dfg::DirectlyFollowsGraph as XesDfg;
use process_mining::discovery::case_centric::dfg::discover_dfg;

use super::event_log::ProcessEventLog;
use super::{DfgDiscovery, MiningError};

/// Frequency-annotated directly-follows graph with stable (sorted) iteration
/// order, so renderings of the same log are identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectlyFollowsGraph {
    /// How often `to` directly followed `from` within a case, keyed by `(from, to)`.
    pub edges: BTreeMap<(String, String), u64>,
    /// Occurrences of each activity.
    pub activities: BTreeMap<String, u64>,
    pub start_activities: BTreeSet<String>,
    pub end_activities: BTreeSet<String>,
}

impl DirectlyFollowsGraph {
    pub fn max_edge_frequency(&self) -> u64 {
        self.edges.values().copied().max().unwrap_or(0)
    }

    pub fn frequency(&self, from: &str, to: &str) -> Option<u64> {
        self.edges.get(&(from.to_string(), to.to_string())).copied()
    }
}

impl From<XesDfg<'_>> for DirectlyFollowsGraph {
    fn from(dfg: XesDfg<'_>) -> Self {
        Self {
            edges: dfg
                .directly_follows_relations
                .into_iter()
                .map(|((from, to), freq)| ((from.into_owned(), to.into_owned()), u64::from(freq)))
                .collect(),
            activities: dfg
                .activities
                .into_iter()
                .map(|(name, count)| (name, u64::from(count)))
                .collect(),
            start_activities: dfg.start_activities.into_iter().collect(),
            end_activities: dfg.end_activities.into_iter().collect(),
        }
    }
}

/// Discovery through the `process_mining` crate (rust4pm), classifying events
/// by `concept:name`.
pub struct Rust4pmDiscovery;

impl DfgDiscovery for Rust4pmDiscovery {
    fn discover(&self, log: &ProcessEventLog) -> Result<DirectlyFollowsGraph, MiningError> {
        if log.event_count() == 0 {
            return Err(MiningError::Discovery("event log has no events".to_string()));
        }

        let dfg: DirectlyFollowsGraph = discover_dfg(&log.to_xes()).into();
        tracing::debug!(
            "Discovered {} activities and {} directly-follows relations",
            dfg.activities.len(),
            dfg.edges.len()
        );
        Ok(dfg)
    }
}
