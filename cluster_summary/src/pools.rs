//! Payloads returned by the cluster management API.
//!
//! Servers of different versions omit different fields, so everything defaults when absent.
//! Integers stay integers and byte counts stay floats on the way in and on the way out.
use serde::{Deserialize, Serialize};

/// First server version whose nodes report `cpu_cores_available`.
pub const CORE_COUNT_MIN_VERSION: [u64; 2] = [6, 5];

/// Payload of `GET /pools`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolsInfo {
    pub components_version: ComponentsVersion,
    pub implementation_version: String,
    pub is_enterprise: bool,
    pub uuid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentsVersion {
    pub ale: String,
    pub asn1: String,
    pub crypto: String,
    pub inets: String,
    pub kernel: String,
    pub lhttpc: String,
    pub ns_server: String,
    pub os_mon: String,
    pub public_key: String,
    pub sasl: String,
    pub ssl: String,
    pub stdlib: String,
}

/// Payload of `GET /pools/default`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolsDefaultInfo {
    pub balanced: bool,
    pub cluster_name: String,
    pub fts_memory_quota: i64,
    pub index_memory_quota: i64,
    pub memory_quota: i64,
    pub name: String,
    pub nodes: Vec<NodeInfo>,
    pub rebalance_status: String,
    pub storage_totals: StorageTotals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInfo {
    pub cluster_membership: String,
    pub hostname: String,
    pub interesting_stats: InterestingStats,
    pub mcd_memory_allocated: f64,
    pub mcd_memory_reserved: f64,
    pub memory_free: f64,
    pub memory_total: f64,
    pub os: String,
    pub services: Vec<String>,
    pub status: String,
    pub system_stats: SystemStats,
    pub uptime: String,
    pub version: String,
}

impl NodeInfo {
    /// Cores available to the node, or `None` when the server does not report them.
    ///
    /// Older servers either omit the field or send zero; neither means "zero cores".
    pub fn cpu_cores(&self) -> Option<f64> {
        if !reports_core_count(&self.version) {
            return None;
        }
        self.system_stats
            .cpu_cores_available
            .filter(|cores| *cores > 0.0)
    }

    /// Total node memory in GiB.
    pub fn memory_total_gib(&self) -> f64 {
        self.memory_total / 1024.0 / 1024.0 / 1024.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestingStats {
    pub cmd_get: f64,
    pub couch_docs_actual_disk_size: f64,
    pub couch_docs_data_size: f64,
    pub couch_spatial_data_size: f64,
    pub couch_spatial_disk_size: f64,
    pub couch_views_actual_disk_size: f64,
    pub couch_views_data_size: f64,
    pub curr_items: f64,
    pub curr_items_tot: f64,
    pub ep_bg_fetched: f64,
    pub get_hits: f64,
    pub mem_used: f64,
    pub ops: f64,
    pub vb_active_num_non_resident: f64,
    pub vb_replica_curr_items: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStats {
    pub cpu_utilization_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_cores_available: Option<f64>,
    pub mem_free: f64,
    pub mem_total: f64,
    pub swap_total: f64,
    pub swap_used: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageTotals {
    pub hdd: HddStorage,
    pub ram: RamStorage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HddStorage {
    pub free: f64,
    pub quota_total: f64,
    pub total: f64,
    pub used: f64,
    pub used_by_data: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RamStorage {
    pub quota_total: f64,
    pub quota_total_per_node: f64,
    pub quota_used: f64,
    pub quota_used_per_node: f64,
    pub total: f64,
    pub used: f64,
    pub used_by_data: f64,
}

/// Whether a server of `version` populates `cpu_cores_available`.
///
/// Compares the leading dotted numeric components, so `"6.10.0"` sorts after `"6.5"`.
/// A version without a numeric prefix is treated as too old.
pub fn reports_core_count(version: &str) -> bool {
    let components = version_components(version);
    if components.is_empty() {
        return false;
    }
    components.as_slice() >= CORE_COUNT_MIN_VERSION.as_slice()
}

/// `"7.1.3-3479-enterprise"` -> `[7, 1, 3]`
fn version_components(version: &str) -> Vec<u64> {
    let numeric = version
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .next()
        .unwrap_or_default();

    numeric
        .split('.')
        .map_while(|part| part.parse::<u64>().ok())
        .collect()
}
