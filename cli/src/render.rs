use crate::load::load_accounts;
use anyhow::{Context, Result};
use clap::{value_parser, Parser};
use model::{
    read_validation, service_settings, validate_accounts, AccountTypes, ServiceSettings,
    SpinnakerValidation,
};
use std::path::PathBuf;

/// Print, as YAML, the settings each service receives for the accounts stored at `path`. Accounts
/// that fail validation under a `required` policy are left out.
#[derive(Debug, Parser)]
pub(crate) struct Render {
    /// Path to a YAML file of SpinnakerAccount objects.
    #[clap(value_parser = value_parser!(PathBuf))]
    path: PathBuf,

    /// Path to a YAML file with the validation settings.
    #[clap(long = "validation", value_parser = value_parser!(PathBuf))]
    validation: Option<PathBuf>,
}

impl Render {
    pub(crate) fn run(self, types: &AccountTypes) -> Result<()> {
        let validation = match &self.validation {
            Some(path) => read_validation(path).with_context(|| {
                format!("Unable to read validation settings '{}'", path.display())
            })?,
            None => SpinnakerValidation::default(),
        };
        let loaded = load_accounts(&self.path, types)?;
        let reports = validate_accounts(&loaded.accounts, types, &validation);
        let wireable: Vec<_> = loaded
            .accounts
            .into_iter()
            .zip(reports.iter())
            .filter(|(_, report)| report.is_wireable())
            .map(|(account, _)| account)
            .collect();
        let settings = service_settings(types, &wireable, &ServiceSettings::new())
            .context("Unable to build service settings")?;
        print!(
            "{}",
            serde_yaml::to_string(&settings).context("Unable to serialize service settings")?
        );
        Ok(())
    }
}
