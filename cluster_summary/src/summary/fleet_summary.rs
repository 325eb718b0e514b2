use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    cluster_target::ClusterTarget, BriefRecord, ClusterRecord, ErrorRecord, FullRecord,
    PollOutcome, ReportDetail,
};

/// The whole report: one record per configured cluster plus fleet-wide tallies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    /// Configured clusters, including the ones that could not be polled.
    #[serde(rename = "#clusters")]
    pub cluster_count: usize,
    /// Nodes across every successfully polled cluster.
    #[serde(rename = "#nodes")]
    pub total_node_count: usize,
    #[serde(rename = "#nodeVersions")]
    pub node_version_counts: BTreeMap<String, usize>,
    /// In configuration order.
    pub clusters: Vec<ClusterRecord>,
}

impl FleetSummary {
    /// Folds the poll outcomes, in configuration order, into a report.
    pub fn assemble<I>(detail: ReportDetail, outcomes: I) -> Self
    where
        I: IntoIterator<Item = (ClusterTarget, PollOutcome)>,
    {
        outcomes
            .into_iter()
            .fold(Self::default(), |summary, (target, outcome)| {
                summary.with_cluster(detail, target, outcome)
            })
    }

    /// Appends the record for one more cluster and updates the tallies.
    ///
    /// Failed clusters add a record but leave node and version tallies untouched.
    pub fn with_cluster(
        mut self,
        detail: ReportDetail,
        target: ClusterTarget,
        outcome: PollOutcome,
    ) -> Self {
        self.cluster_count += 1;

        let record = match outcome {
            Err(e) => {
                tracing::warn!(
                    "Cluster {} reported as an error: {}",
                    self.cluster_count - 1,
                    e
                );
                ClusterRecord::Error(ErrorRecord {
                    source_cluster: target,
                    message: e.to_string(),
                })
            }
            Ok(snapshot) => {
                for node in &snapshot.pools_default.nodes {
                    *self
                        .node_version_counts
                        .entry(node.version.clone())
                        .or_default() += 1;
                }

                match detail {
                    ReportDetail::Full => ClusterRecord::Full(FullRecord::from(snapshot)),
                    ReportDetail::Brief => ClusterRecord::Brief(BriefRecord::from(&snapshot)),
                }
            }
        };

        self.total_node_count += record.node_count();
        self.clusters.push(record);
        self
    }
}
