use crate::account_type::AccountKind;
use crate::configuration::FreeForm;
use crate::error::{self, Result};
use crate::validation::{ValidationFailure, ValidationSetting};
use std::collections::{BTreeSet, HashSet};
use std::fmt::Debug;

/// One configured deployment target. An account is populated once by a loader, validated, and
/// then treated as read-only.
pub trait Account: Debug + Send + Sync {
    /// The backend tag. Every account of a backend reports the same value.
    fn kind(&self) -> AccountKind;

    fn name(&self) -> &str;

    fn settings(&self) -> &FreeForm;

    /// The free-form payload, for callers that annotate it before handing it to a service. Callers
    /// that share an account between threads must serialize access themselves.
    fn settings_mut(&mut self) -> &mut FreeForm;

    /// A fast, local well-formedness check. Semantic checks belong to the validator.
    fn validate_format(&self) -> Result<()>;

    /// A validator bound to this account, created fresh for each validation pass.
    fn new_validator(&self) -> Box<dyn AccountValidator + '_>;

    /// Flattens the account into the entry format expected under the type's
    /// `config_accounts_key`.
    fn to_spinnaker_settings(&self) -> Result<FreeForm>;
}

/// Performs full semantic validation of one account.
pub trait AccountValidator {
    /// Validates the account. The caller does not invoke this when `setting` says to skip
    /// validation; the setting's policy is recorded in any failure.
    fn validate(&self, setting: &ValidationSetting) -> std::result::Result<(), ValidationFailure>;
}

/// The name check shared by every account kind.
pub(crate) fn validate_name(kind: AccountKind, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(error::FormatSnafu {
            kind: kind.to_string(),
            name,
            reason: "Spinnaker account must have a name",
        }
        .build()
        .into());
    }
    Ok(())
}

/// Returns the names that occur more than once, sorted.
pub fn duplicate_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|name| !seen.insert(*name))
        .map(|name| name.to_owned())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}
