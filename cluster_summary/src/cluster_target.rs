//! Configuration model: which clusters to poll and how to log into them.
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ClusterSummaryError;

/// One configured cluster. The order of targets in the configuration defines the order of
/// the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterTarget {
    pub login: String,
    /// Never written back out in a report.
    #[serde(alias = "password", default, skip_serializing)]
    pub pass: String,
    /// Node addresses, e.g. `http://10.0.0.1:8091`, tried in listed order.
    #[serde(default)]
    pub nodes: Vec<String>,
}

impl ClusterTarget {
    pub fn new<T>(login: &str, pass: &str, nodes: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            login: login.to_string(),
            pass: pass.to_string(),
            nodes: nodes.iter().map(|n| n.as_ref().to_string()).collect(),
        }
    }
}

/// The documented layout of the configuration file.
#[derive(Debug, Deserialize)]
struct WrappedConfig {
    clusters: Vec<ClusterTarget>,
}

/// Parses configuration text. Both `{"clusters": [...]}` and a bare array are accepted.
///
/// The layout is picked before decoding the targets so field errors keep their line and column.
pub fn parse_cluster_targets(text: &str) -> Result<Vec<ClusterTarget>, serde_json::Error> {
    if serde_json::from_str::<serde_json::Value>(text)?.is_array() {
        serde_json::from_str::<Vec<ClusterTarget>>(text)
    } else {
        serde_json::from_str::<WrappedConfig>(text).map(|config| config.clusters)
    }
}

#[instrument(level = "debug", name = "Load Cluster Targets")]
pub fn load_cluster_targets(path: &Path) -> Result<Vec<ClusterTarget>, ClusterSummaryError> {
    let text = fs::read_to_string(path).map_err(|source| {
        tracing::error!("Unable to read configuration file {}", path.display());
        ClusterSummaryError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let targets = parse_cluster_targets(&text).map_err(|source| {
        tracing::error!("Unable to parse configuration file {}", path.display());
        ClusterSummaryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::debug!("Loaded {} cluster targets", targets.len());
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cluster_targets_accepts_wrapped_document() {
        // Arrange
        let text = r#"{ "clusters": [
            {"login": "Administrator", "pass": "password1", "nodes": ["http://192.168.1.1:8091"]},
            {"login": "Administrator", "pass": "password2", "nodes": ["http://192.166.1.1:8091", "http://192.16.1.2:8091"]}
        ]}"#;

        // Act
        let targets = parse_cluster_targets(text).unwrap();

        // Assert
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].pass, "password1");
        assert_eq!(
            targets[1].nodes,
            vec!["http://192.166.1.1:8091", "http://192.16.1.2:8091"]
        );
    }

    #[test]
    fn parse_cluster_targets_accepts_flat_array_and_password_alias() {
        let text = r#"[{"login": "admin", "password": "secret", "nodes": ["http://a:8091"]}]"#;

        let targets = parse_cluster_targets(text).unwrap();

        assert_eq!(
            targets,
            vec![ClusterTarget::new("admin", "secret", &["http://a:8091"])]
        );
    }

    #[test]
    fn parse_cluster_targets_rejects_garbage() {
        assert!(parse_cluster_targets("{ not json").is_err());
        assert!(parse_cluster_targets(r#"{"clusters": 3}"#).is_err());
    }

    #[test]
    fn parse_cluster_targets_names_the_bad_field_and_position() {
        // Arrange
        let wrong_type = "{ \"clusters\": [\n  {\"login\": \"admin\", \"nodes\": \"x\"}\n]}";
        let missing_login = r#"[{"pass": "pw", "nodes": ["http://a:8091"]}]"#;

        // Act
        let wrong_type = parse_cluster_targets(wrong_type).unwrap_err().to_string();
        let missing_login = parse_cluster_targets(missing_login).unwrap_err().to_string();

        // Assert
        assert!(wrong_type.contains("expected a sequence"), "{}", wrong_type);
        assert!(wrong_type.contains("line 2"), "{}", wrong_type);
        assert!(missing_login.contains("missing field `login`"), "{}", missing_login);
    }

    #[test]
    fn serialized_target_omits_password() {
        let target = ClusterTarget::new("admin", "hunter2", &["http://a:8091"]);

        let json = serde_json::to_string(&target).unwrap();

        assert!(!json.contains("hunter2"));
        assert!(json.contains("\"login\":\"admin\""));
    }

    #[test]
    fn load_cluster_targets_reports_missing_file() {
        let path = std::env::temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));

        let result = load_cluster_targets(&path);

        assert!(matches!(result, Err(ClusterSummaryError::ConfigRead { .. })));
    }

    #[test]
    fn load_cluster_targets_reports_parse_failure() {
        let path = std::env::temp_dir().join(format!("{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, "[{]").unwrap();

        let result = load_cluster_targets(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(ClusterSummaryError::ConfigParse { .. })));
    }
}
