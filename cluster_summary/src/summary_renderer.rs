//! Turns a [`FleetSummary`] into the bytes written to the report file.
use std::fmt::Write;

use crate::{pools::reports_core_count, BriefNode, ClusterRecord, FleetSummary, ReportFormat};

pub const TABULAR_HEADER: &str =
    "cluster_num\tcluster_uuid\tcluster_size\thostname\tcpu_cores\tRAM\n";

pub fn render(summary: &FleetSummary, format: ReportFormat) -> Result<Vec<u8>, serde_json::Error> {
    match format {
        ReportFormat::Json => render_json(summary),
        ReportFormat::Tabular => Ok(render_tabular(summary).into_bytes()),
    }
}

/// Indented JSON with two spaces per level.
pub fn render_json(summary: &FleetSummary) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(summary)
}

/// Tab separated text, one line per node of every brief record.
///
/// Other record shapes have no per-node capacity columns and are skipped with a warning.
pub fn render_tabular(summary: &FleetSummary) -> String {
    let mut buffer = String::from(TABULAR_HEADER);

    for (cluster_num, record) in summary.clusters.iter().enumerate() {
        match record {
            ClusterRecord::Brief(brief) => {
                for node in &brief.nodes {
                    // writing to a String cannot fail
                    let _ = writeln!(
                        buffer,
                        "{}\t{}\t{}\t{}\t{}\t{:.1}",
                        cluster_num,
                        brief.cluster_uuid,
                        brief.cluster_size,
                        node.hostname,
                        cpu_cores_cell(node),
                        node.ram_gib
                    );
                }
            }
            ClusterRecord::Error(error) => tracing::warn!(
                "Cluster {} left out of tabular report: {}",
                cluster_num,
                error.message
            ),
            ClusterRecord::Full(full) => tracing::warn!(
                "Cluster {} ({}) left out of tabular report: full records have no tabular form",
                cluster_num,
                full.uuid
            ),
        }
    }

    buffer
}

/// Servers older than 6.5 do not report cores, so their cell reads `N/A`.
fn cpu_cores_cell(node: &BriefNode) -> String {
    match node.cpu_cores {
        Some(cores) if reports_core_count(&node.version) => format!("{:.1}", cores),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::{cluster_target::ClusterTarget, BriefRecord, ErrorRecord};

    use super::*;

    fn brief_node(hostname: &str, version: &str, cores: Option<f64>, ram_gib: f64) -> BriefNode {
        BriefNode {
            cpu_cores: cores,
            ram_gib,
            hostname: hostname.to_string(),
            version: version.to_string(),
        }
    }

    fn fleet() -> FleetSummary {
        FleetSummary {
            cluster_count: 3,
            total_node_count: 3,
            node_version_counts: [("6.1.0".to_string(), 1), ("6.6.0".to_string(), 2)]
                .into_iter()
                .collect(),
            clusters: vec![
                ClusterRecord::Brief(BriefRecord {
                    nodes: vec![
                        brief_node("10.0.0.1:8091", "6.1.0", Some(4.0), 16.0),
                        brief_node("10.0.0.2:8091", "6.6.0", Some(8.0), 31.26),
                    ],
                    cluster_size: 2,
                    cluster_uuid: "uuid-0".to_string(),
                }),
                ClusterRecord::Error(ErrorRecord {
                    source_cluster: ClusterTarget::new("admin", "pw", &["http://x:8091"]),
                    message: "Unknown Error".to_string(),
                }),
                ClusterRecord::Brief(BriefRecord {
                    nodes: vec![brief_node("10.0.1.1:8091", "6.6.0", None, 7.96)],
                    cluster_size: 1,
                    cluster_uuid: "uuid-2".to_string(),
                }),
            ],
        }
    }

    #[test]
    fn tabular_output_has_header_and_one_line_per_node() {
        // Act
        let text = render_tabular(&fleet());

        // Assert
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "cluster_num\tcluster_uuid\tcluster_size\thostname\tcpu_cores\tRAM",
                "0\tuuid-0\t2\t10.0.0.1:8091\tN/A\t16.0",
                "0\tuuid-0\t2\t10.0.0.2:8091\t8.0\t31.3",
                "2\tuuid-2\t1\t10.0.1.1:8091\tN/A\t8.0",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn tabular_output_for_empty_fleet_is_header_only() {
        assert_eq!(render_tabular(&FleetSummary::default()), TABULAR_HEADER);
    }

    #[test]
    fn render_json_is_two_space_indented() {
        let bytes = render(&fleet(), ReportFormat::Json).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("{\n  \"#clusters\": 3,\n  \"#nodes\": 3,"));
        let parsed = serde_json::from_str::<FleetSummary>(&text).unwrap();
        assert_eq!(parsed.clusters.len(), 3);
        assert_eq!(parsed.node_version_counts, fleet().node_version_counts);
    }

    #[test]
    fn render_tabular_format_matches_render_tabular() {
        let bytes = render(&fleet(), ReportFormat::Tabular).unwrap();

        assert_eq!(String::from_utf8(bytes).unwrap(), render_tabular(&fleet()));
    }
}
