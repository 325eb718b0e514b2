/*!
cluster_summary polls a fleet of database clusters over their HTTP management API and
produces a single point-in-time report of core/RAM utilization and node version
distribution. It is meant for periodic license-compliance and capacity audits.

Each configured cluster is asked for `/pools` and `/pools/default`. Nodes of a cluster are
tried in the order they are listed and the first node that answers both calls wins; the
remaining nodes of that cluster are never contacted. A cluster where every node fails is
still represented in the report, as an error record.

# Example
```no_run
# tokio_test::block_on(async {
use cluster_summary::ClusterSummaryBuilder;

let summary = ClusterSummaryBuilder::new()
    .set_config_path("clusters.json")
    .set_output_path("report.json")
    .build()?;

let fleet = summary.collect().await;
summary.write(&fleet)?;
# Ok::<(), cluster_summary::ClusterSummaryError>(())
# });
```
*/

mod cluster_poller;
mod report_options;
mod rest_client;
mod summary;

pub mod cluster_target;
pub mod pools;
pub mod summary_renderer;

pub use cluster_poller::*;
pub use report_options::*;
pub use rest_client::*;
pub use summary::*;

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
