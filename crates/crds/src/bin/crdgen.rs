//! Prints the CassandraDatacenter CRD as YAML.
//!
//! Run whenever the spec types change and commit the output alongside the
//! deployment manifests: `cargo run --bin crdgen > cassandradatacenter.yaml`

use anyhow::{Context, Result};
use crds::CassandraDatacenter;
use kube::CustomResourceExt;

fn main() -> Result<()> {
    let crd = CassandraDatacenter::crd();
    let yaml = serde_yaml::to_string(&crd)
        .context("error serializing CassandraDatacenter CRD to yaml")?;
    print!("{yaml}");
    Ok(())
}
