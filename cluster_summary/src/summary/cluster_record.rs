use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    cluster_target::ClusterTarget,
    pools::{NodeInfo, StorageTotals},
    ClusterSnapshot,
};

/// The report entry for one configured cluster.
///
/// Serialized without a tag: the three shapes are told apart by which keys are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterRecord {
    Full(FullRecord),
    Brief(BriefRecord),
    Error(ErrorRecord),
}

impl ClusterRecord {
    /// Number of nodes the record describes. Error records describe none.
    pub fn node_count(&self) -> usize {
        match self {
            ClusterRecord::Full(full) => full.node_count,
            ClusterRecord::Brief(brief) => brief.cluster_size,
            ClusterRecord::Error(_) => 0,
        }
    }
}

/// Everything `/pools` and `/pools/default` say about a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullRecord {
    pub implementation_version: String,
    pub is_enterprise: bool,
    pub uuid: String,
    pub balanced: bool,
    pub cluster_name: String,
    pub fts_memory_quota: i64,
    pub index_memory_quota: i64,
    pub memory_quota: i64,
    pub name: String,
    pub node_count: usize,
    pub node_versions: BTreeMap<String, usize>,
    pub nodes: Vec<NodeInfo>,
    pub rebalance_status: String,
    pub storage_totals: StorageTotals,
}

impl From<ClusterSnapshot> for FullRecord {
    fn from(snapshot: ClusterSnapshot) -> Self {
        let ClusterSnapshot {
            pools,
            pools_default,
        } = snapshot;

        Self {
            implementation_version: pools.implementation_version,
            is_enterprise: pools.is_enterprise,
            uuid: pools.uuid,
            balanced: pools_default.balanced,
            cluster_name: pools_default.cluster_name,
            fts_memory_quota: pools_default.fts_memory_quota,
            index_memory_quota: pools_default.index_memory_quota,
            memory_quota: pools_default.memory_quota,
            name: pools_default.name,
            node_count: pools_default.nodes.len(),
            node_versions: version_histogram(&pools_default.nodes),
            nodes: pools_default.nodes,
            rebalance_status: pools_default.rebalance_status,
            storage_totals: pools_default.storage_totals,
        }
    }
}

/// Capacity-only view of a cluster, as needed for license audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefRecord {
    pub nodes: Vec<BriefNode>,
    pub cluster_size: usize,
    pub cluster_uuid: String,
}

impl From<&ClusterSnapshot> for BriefRecord {
    fn from(snapshot: &ClusterSnapshot) -> Self {
        let nodes = snapshot
            .pools_default
            .nodes
            .iter()
            .map(BriefNode::from)
            .collect::<Vec<_>>();

        Self {
            cluster_size: nodes.len(),
            cluster_uuid: snapshot.pools.uuid.clone(),
            nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefNode {
    /// `None` when the node's server version does not report cores.
    #[serde(rename = "cpu_cores_available")]
    pub cpu_cores: Option<f64>,
    /// Total memory in GiB.
    #[serde(rename = "mem_total")]
    pub ram_gib: f64,
    pub hostname: String,
    pub version: String,
}

impl From<&NodeInfo> for BriefNode {
    fn from(node: &NodeInfo) -> Self {
        Self {
            cpu_cores: node.cpu_cores(),
            ram_gib: node.memory_total_gib(),
            hostname: node.hostname.clone(),
            version: node.version.clone(),
        }
    }
}

/// Stands in for a cluster none of whose nodes could be polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "error_with_cluster")]
    pub source_cluster: ClusterTarget,
    #[serde(rename = "error_message")]
    pub message: String,
}

/// Counts nodes per reported server version.
pub fn version_histogram(nodes: &[NodeInfo]) -> BTreeMap<String, usize> {
    nodes.iter().fold(BTreeMap::new(), |mut counts, node| {
        *counts.entry(node.version.clone()).or_default() += 1;
        counts
    })
}
