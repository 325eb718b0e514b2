use std::{path::PathBuf, time::Duration};

use tracing::instrument;

use crate::{
    cluster_target::{load_cluster_targets, ClusterTarget},
    ClusterPoller, ClusterSummary, ClusterSummaryError, ReportOptions, RestClientBuilder,
};

/// Collects the settings of one reporting run.
///
/// [`build`](Self::build) performs every check that can fail before the first request is
/// sent: conflicting report flags, configuration loading and TLS setup.
#[derive(Debug, Default, Clone)]
pub struct ClusterSummaryBuilder {
    ca_certificate_path: Option<String>,
    cluster_targets: Option<Vec<ClusterTarget>>,
    config_path: Option<PathBuf>,
    full: bool,
    no_ssl_verify: bool,
    output_path: Option<PathBuf>,
    parallel: bool,
    tabular: bool,
    timeout: Option<Duration>,
}

impl ClusterSummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// JSON file listing the clusters to poll.
    pub fn set_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Uses `targets` directly instead of reading a configuration file.
    pub fn set_cluster_targets(mut self, targets: Vec<ClusterTarget>) -> Self {
        self.cluster_targets = Some(targets);
        self
    }

    pub fn set_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn set_full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    pub fn set_tabular(mut self, tabular: bool) -> Self {
        self.tabular = tabular;
        self
    }

    pub fn set_no_ssl_verify(mut self, no_ssl_verify: bool) -> Self {
        self.no_ssl_verify = no_ssl_verify;
        self
    }

    pub fn set_ca_certificate(mut self, certificate_path: &str) -> Self {
        self.ca_certificate_path = Some(certificate_path.to_string());
        self
    }

    /// Polls clusters concurrently. Nodes within a cluster are still tried one at a time.
    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[instrument(level = "debug", name = "Build ClusterSummaryBuilder", skip(self))]
    pub fn build(&self) -> Result<ClusterSummary, ClusterSummaryError> {
        let options = ReportOptions::from_flags(self.full, self.tabular).ok_or_else(|| {
            tracing::error!("Full reports cannot be rendered in tabular format");
            ClusterSummaryError::IncompatibleReportFormat
        })?;

        let targets = match (&self.cluster_targets, &self.config_path) {
            (Some(targets), _) => targets.clone(),
            (None, Some(path)) => {
                tracing::info!("Working from config file: {}", path.display());
                load_cluster_targets(path)?
            }
            (None, None) => {
                tracing::error!("No configuration was supplied");
                return Err(ClusterSummaryError::MissingConfig);
            }
        };

        let mut rest_client = RestClientBuilder::new().set_accept_invalid_certs(self.no_ssl_verify);
        if let Some(path) = &self.ca_certificate_path {
            rest_client = rest_client.set_ca_certificate(path);
        }
        if let Some(timeout) = self.timeout {
            rest_client = rest_client.set_timeout(timeout);
        }
        let poller = ClusterPoller::new(rest_client.build()?);

        let output_path = self
            .output_path
            .clone()
            .unwrap_or_else(default_output_path);

        tracing::debug!(
            "Reporting on {} clusters with {:?} to {}",
            targets.len(),
            options,
            output_path.display()
        );

        Ok(ClusterSummary::new(
            targets,
            options,
            poller,
            output_path,
            self.parallel,
        ))
    }
}

/// `cluster-summary.out.<YYYY-MM-DD-HH:MM:SS>` in local time.
pub fn default_output_path() -> PathBuf {
    let now = chrono::Local::now();
    PathBuf::from(format!(
        "cluster-summary.out.{}",
        now.format("%Y-%m-%d-%H:%M:%S")
    ))
}
