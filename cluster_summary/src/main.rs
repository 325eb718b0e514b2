use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use cluster_summary::ClusterSummaryBuilder;
use tracing::{level_filters::LevelFilter, subscriber::set_global_default};
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

const LONG_ABOUT: &str = r#"cluster-summary connects to a set of database clusters and generates a summary report.

The config file contains JSON specifying an array of information on each cluster,
giving the login/password and one or more addresses for cluster nodes.
An example config file giving information about 2 clusters is:

  { "clusters": [
    {"login": "Administrator", "pass": "password1", "nodes": ["http://192.168.1.1:8091"]},
    {"login": "Administrator", "pass": "password2", "nodes": ["http://192.166.1.1:8091","http://192.16.1.2:8091"]}
  ]}

The default report format includes RAM and Core utilization across each specified cluster,
since that information is useful in determining license compliance. If you specify --csv,
then the report is generated as tab separated text instead of JSON. If, instead, you
specify --full, then a much more detailed report is generated.

The summary report is sent to the file 'cluster-summary.out.<timestamp>', unless a different
file name is specified with the --output option."#;

#[derive(Parser, Clone, Debug)]
#[clap(author, version, about, long_about = LONG_ABOUT)]
struct Cli {
    /// Config file listing clusters and credentials to summarize.
    #[arg(long)]
    config: PathBuf,
    /// Name for output file (default cluster-summary.out.<timestamp>).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Produce an extensive report, instead of just core and RAM usage.
    #[arg(long)]
    full: bool,
    /// Produce a report in tab separated format. Not compatible with full reports.
    #[arg(long)]
    csv: bool,
    /// Skip TLS certificate verification. Vulnerable to man-in-the-middle attacks.
    #[arg(long)]
    no_ssl_verify: bool,
    /// PEM file of an extra certificate authority to trust.
    #[arg(long)]
    cacert: Option<String>,
    /// Poll clusters concurrently.
    #[arg(long)]
    parallel: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}\n", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.clone();
    let mut builder = ClusterSummaryBuilder::new()
        .set_config_path(cli.config)
        .set_full(cli.full)
        .set_tabular(cli.csv)
        .set_no_ssl_verify(cli.no_ssl_verify)
        .set_parallel(cli.parallel);
    if let Some(output) = cli.output {
        builder = builder.set_output_path(output);
    }
    if let Some(cacert) = &cli.cacert {
        builder = builder.set_ca_certificate(cacert);
    }

    let summary = builder.build()?;
    println!("Working from config file: {}", config.display());

    let fleet = summary.collect().await;
    summary.write(&fleet)?;
    println!(
        "Wrote information on {} clusters to file {}.",
        fleet.cluster_count,
        summary.output_path().display()
    );
    Ok(())
}

fn setup_tracing() {
    // Redirect all `log`'s events to the subscriber
    if let Err(e) = LogTracer::init() {
        eprintln!("Failed to set logger: {}", e);
    }
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("CLUSTER_SUMMARY_LOG")
        .from_env_lossy();
    let subscriber = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    if let Err(e) = set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", e);
    }
}
