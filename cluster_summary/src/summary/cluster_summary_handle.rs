use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tracing::{instrument, Span};
use uuid::Uuid;

use crate::{
    cluster_target::ClusterTarget, summary_renderer, ClusterPoller, ClusterSummaryError,
    FleetSummary, PollOutcome, ReportOptions,
};

/**
A validated reporting run, ready to poll.

Created through [`ClusterSummaryBuilder`](crate::ClusterSummaryBuilder). Polling never fails
as a whole: clusters that cannot be reached become error records in the returned
[`FleetSummary`].
*/
#[derive(Debug, Clone)]
pub struct ClusterSummary {
    targets: Vec<ClusterTarget>,
    options: ReportOptions,
    poller: ClusterPoller,
    output_path: PathBuf,
    parallel: bool,
}

impl ClusterSummary {
    // This is pub(crate) so only the builder can crank it out
    pub(crate) fn new(
        targets: Vec<ClusterTarget>,
        options: ReportOptions,
        poller: ClusterPoller,
        output_path: PathBuf,
        parallel: bool,
    ) -> Self {
        Self {
            targets,
            options,
            poller,
            output_path,
            parallel,
        }
    }

    pub fn targets(&self) -> &[ClusterTarget] {
        &self.targets
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Polls every configured cluster and assembles the report.
    #[instrument(
        level = "info",
        name = "Collect Fleet Summary",
        skip(self),
        fields(correlation_id)
    )]
    pub async fn collect(&self) -> FleetSummary {
        Span::current().record(
            "correlation_id",
            tracing::field::display(Uuid::new_v4()),
        );

        let outcomes = if self.parallel {
            tracing::debug!("Polling {} clusters concurrently", self.targets.len());
            join_all(self.targets.iter().map(|target| self.poller.poll(target))).await
        } else {
            let mut outcomes: Vec<PollOutcome> = Vec::with_capacity(self.targets.len());
            for target in &self.targets {
                outcomes.push(self.poller.poll(target).await);
            }
            outcomes
        };

        let summary = FleetSummary::assemble(
            self.options.detail(),
            self.targets.iter().cloned().zip(outcomes),
        );
        tracing::info!(
            "Collected {} clusters with {} nodes",
            summary.cluster_count,
            summary.total_node_count
        );
        summary
    }

    /// Serializes `summary` in the configured format.
    pub fn render(&self, summary: &FleetSummary) -> Result<Vec<u8>, ClusterSummaryError> {
        summary_renderer::render(summary, self.options.format()).map_err(|e| {
            tracing::error!("Unable to render summary. Caused by: {}", e);
            ClusterSummaryError::Render(e)
        })
    }

    /// Renders `summary` and writes it to the output path.
    #[instrument(level = "debug", name = "Write Fleet Summary", skip(self, summary))]
    pub fn write(&self, summary: &FleetSummary) -> Result<(), ClusterSummaryError> {
        let body = self.render(summary)?;
        std::fs::write(&self.output_path, body).map_err(|source| {
            tracing::error!("Unable to write {}", self.output_path.display());
            ClusterSummaryError::OutputWrite {
                path: self.output_path.clone(),
                source,
            }
        })?;
        tracing::info!(
            "Wrote information on {} clusters to file {}",
            summary.cluster_count,
            self.output_path.display()
        );
        Ok(())
    }
}
