//! dc-facts
//!
//! Loads a `CassandraDatacenter` manifest (YAML or JSON) and prints, as JSON,
//! every fact the reconciler would derive from it: images, the config builder
//! document, container ports and the per-rack node counts.
//!
//! The base OS selector comes from `BASE_IMAGE_OS` unless `--base-image-os`
//! is given. Logs go to stderr.

mod facts;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crds::{CassandraDatacenter, DeploymentProfile};
use structopt::StructOpt;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use facts::DatacenterFacts;

/// Print the deployment facts derived from a CassandraDatacenter manifest.
#[derive(Debug, StructOpt)]
#[structopt(name = "dc-facts")]
struct Opts {
    /// Path to the CassandraDatacenter manifest.
    #[structopt(parse(from_os_str))]
    manifest: PathBuf,
    /// Enable debug logging.
    #[structopt(short, long)]
    verbose: bool,
    /// Base OS selector, overriding BASE_IMAGE_OS.
    #[structopt(long)]
    base_image_os: Option<String>,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    tracing_subscriber::registry().with(filter_layer).with(fmt_layer).init();
}

fn main() -> Result<()> {
    let opts = Opts::from_args();
    init_logging(opts.verbose);

    let profile = match opts.base_image_os {
        Some(base_image_os) => DeploymentProfile::with_base_image_os(base_image_os),
        None => DeploymentProfile::from_env(),
    };
    info!("Configuration:");
    info!("  Manifest: {}", opts.manifest.display());
    info!("  Base image OS: {}", profile.base_image_os().unwrap_or("default"));

    let raw = fs::read_to_string(&opts.manifest)
        .with_context(|| format!("error reading manifest {}", opts.manifest.display()))?;
    // YAML is a superset of JSON, so this handles both.
    let dc: CassandraDatacenter = serde_yaml::from_str(&raw)
        .with_context(|| {
            format!("error parsing CassandraDatacenter from {}", opts.manifest.display())
        })?;
    debug!(name = ?dc.metadata.name, "Loaded manifest");

    let facts = DatacenterFacts::derive(&dc, &profile)?;
    let output = serde_json::to_string_pretty(&facts).context("error serializing facts")?;
    println!("{output}");

    Ok(())
}
