use anyhow::{Context, Result};
use clap::Parser;
use kube::CustomResourceExt;
use model::SpinnakerAccount;

/// Print the SpinnakerAccount custom resource definition as YAML.
#[derive(Debug, Parser)]
pub(crate) struct Crd {}

impl Crd {
    pub(crate) fn run(self) -> Result<()> {
        print!(
            "{}",
            serde_yaml::to_string(&SpinnakerAccount::crd())
                .context("Unable to serialize the SpinnakerAccount CRD")?
        );
        Ok(())
    }
}
