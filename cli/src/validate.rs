use crate::load::load_accounts;
use anyhow::{Context, Result};
use clap::{value_parser, Parser};
use model::{
    read_validation, validate_accounts, AccountKind, AccountTypes, SpinnakerAccountStatus,
    SpinnakerValidation, ValidationState,
};
use serde::Serialize;
use std::path::PathBuf;

/// Validate the accounts stored in a YAML file at `path`.
#[derive(Debug, Parser)]
pub(crate) struct Validate {
    /// Path to a YAML file of SpinnakerAccount objects.
    #[clap(value_parser = value_parser!(PathBuf))]
    path: PathBuf,

    /// Path to a YAML file with the validation settings. Without it every provider uses the
    /// `optional` policy.
    #[clap(long = "validation", value_parser = value_parser!(PathBuf))]
    validation: Option<PathBuf>,

    /// Output the account statuses in JSON format.
    #[clap(long = "json")]
    json: bool,
}

/// The `--json` output. Accounts are listed in manifest order, so accounts sharing a name each
/// keep their own entry.
#[derive(Debug, Serialize)]
struct ValidationOutput {
    accounts: Vec<AccountOutput>,
    disabled: Vec<String>,
    unreadable: Vec<UnreadableOutput>,
    duplicates: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AccountOutput {
    name: String,
    #[serde(rename = "type")]
    kind: AccountKind,
    status: SpinnakerAccountStatus,
}

#[derive(Debug, Serialize)]
struct UnreadableOutput {
    name: String,
    reason: String,
}

impl Validate {
    pub(crate) fn run(self, types: &AccountTypes) -> Result<()> {
        let validation = match &self.validation {
            Some(path) => read_validation(path).with_context(|| {
                format!("Unable to read validation settings '{}'", path.display())
            })?,
            None => SpinnakerValidation::default(),
        };
        let loaded = load_accounts(&self.path, types)?;
        let reports = validate_accounts(&loaded.accounts, types, &validation);

        let blocked = reports
            .iter()
            .filter(|report| !report.is_wireable())
            .count();

        if self.json {
            let output = ValidationOutput {
                accounts: reports
                    .iter()
                    .map(|report| AccountOutput {
                        name: report.name.clone(),
                        kind: report.kind,
                        status: SpinnakerAccountStatus::from_result(&report.result),
                    })
                    .collect(),
                disabled: loaded.disabled.clone(),
                unreadable: loaded
                    .unreadable
                    .iter()
                    .map(|(name, reason)| UnreadableOutput {
                        name: name.clone(),
                        reason: reason.clone(),
                    })
                    .collect(),
                duplicates: loaded.duplicates.clone(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&output)
                    .context("Could not create string from statuses.")?
            );
        } else {
            for name in &loaded.duplicates {
                println!("{}\tDuplicate\tthe name is used by more than one account", name);
            }
            for (name, reason) in &loaded.unreadable {
                println!("{}\tUnreadable\t{}", name, reason);
            }
            for name in &loaded.disabled {
                println!("{}\tDisabled", name);
            }
            for report in &reports {
                match &report.result {
                    Ok(ValidationState::Invalid(failure)) => println!(
                        "{}\t{}\tInvalid ({})\t{}",
                        report.name,
                        report.kind,
                        failure.policy,
                        failure.reasons.join("; ")
                    ),
                    Ok(state) => println!("{}\t{}\t{}", report.name, report.kind, state.phase()),
                    Err(e) => println!("{}\t{}\tInvalid\t{}", report.name, report.kind, e),
                }
            }
        }

        if blocked > 0 || loaded.has_errors() {
            anyhow::bail!(
                "{} account(s) failed validation, {} could not be read, {} duplicate name(s)",
                blocked,
                loaded.unreadable.len(),
                loaded.duplicates.len()
            );
        }
        Ok(())
    }
}
