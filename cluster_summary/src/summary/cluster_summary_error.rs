use std::path::PathBuf;

use crate::{error_chain_fmt, RestClientError};

#[derive(thiserror::Error)]
pub enum ClusterSummaryError {
    #[error("CSV format is not available for full reports.")]
    IncompatibleReportFormat,
    #[error("You must specify a configuration file.")]
    MissingConfig,
    #[error("Error reading configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error parsing configuration file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    RestClient(#[from] RestClientError),
    #[error("Error marshalling summary: {0}")]
    Render(#[source] serde_json::Error),
    #[error("Error writing output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
impl std::fmt::Debug for ClusterSummaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
