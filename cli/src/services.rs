use anyhow::{Context, Result};
use clap::Parser;
use model::{AccountKind, AccountTypes};

/// Print the services that receive accounts of a type, one per line. The list comes from the
/// `CLOUDDRIVER_DEPLOYMENTS` environment variable.
#[derive(Debug, Parser)]
pub(crate) struct Services {
    /// The account type (case-insensitive).
    #[clap(long = "type", default_value = "kubernetes")]
    kind: String,
}

impl Services {
    pub(crate) fn run(self, types: &AccountTypes) -> Result<()> {
        let kind: AccountKind = self
            .kind
            .parse()
            .with_context(|| format!("Unable to use account type '{}'", self.kind))?;
        let account_type = types.get(kind)?;
        let mut services: Vec<&String> = account_type.services().iter().collect();
        services.sort();
        for service in services {
            println!("{}", service);
        }
        Ok(())
    }
}
