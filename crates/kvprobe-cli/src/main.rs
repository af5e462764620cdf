//! kvprobe - native KV driver installation smoke test
//!
//! Verifies the driver is installed and loadable, checks its API surface,
//! and (when TARGET_HOST is configured) runs a put/get/remove round trip
//! against the live cluster. Exit codes distinguish each failure class so
//! CI pipelines can branch on cause.

use clap::Parser;
use kvprobe_driver::{NativeConfig, NativeRuntime};
use kvprobe_harness::availability;
use kvprobe_harness::{ClusterTarget, Reporter, SmokePipeline};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "kvprobe")]
#[command(about = "Smoke test for the native KV driver installation")]
#[command(version)]
struct Args {
    /// Target cluster host (overrides TARGET_HOST; unset means skip the live test)
    #[arg(long)]
    host: Option<String>,

    /// Target cluster port (overrides TARGET_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Namespace for the test record (overrides TARGET_NAMESPACE)
    #[arg(long)]
    namespace: Option<String>,

    /// Set name for the test record (overrides TARGET_SET)
    #[arg(long)]
    set_name: Option<String>,

    /// Extra driver module path tried before the default candidates (repeatable)
    #[arg(long = "driver-path")]
    driver_paths: Vec<PathBuf>,

    /// Log level for internal diagnostics (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Internal diagnostics go to stderr so stdout stays the operator channel
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut target = ClusterTarget::from_env();
    if let Some(host) = args.host {
        target.host = Some(host).filter(|h| !h.is_empty());
    }
    if let Some(port) = args.port {
        target.port = port;
    }
    if let Some(namespace) = args.namespace {
        target.namespace = namespace;
    }
    if let Some(set_name) = args.set_name {
        target.set_name = set_name;
    }

    let mut candidates = args.driver_paths;
    candidates.extend(availability::default_candidates());

    let runtime = NativeRuntime::new(NativeConfig::default());
    let reporter = Reporter::console();
    let pipeline = SmokePipeline::new(&runtime, candidates, target);

    let verdict = pipeline.run(&reporter).await;
    verdict.summarize(&reporter);
    std::process::exit(verdict.exit_code())
}
