use anyhow::{Context, Result};
use model::{duplicate_account_names, read_manifest, Account, AccountTypes, CrdExt};
use std::path::Path;

/// The accounts of a manifest, split by what happened when they were read.
pub(crate) struct LoadedAccounts {
    /// Enabled accounts that were read successfully.
    pub(crate) accounts: Vec<Box<dyn Account>>,
    /// Names of accounts marked `enabled: false`.
    pub(crate) disabled: Vec<String>,
    /// Accounts that could not be read, with the reason.
    pub(crate) unreadable: Vec<(String, String)>,
    /// Names used by more than one account object.
    pub(crate) duplicates: Vec<String>,
}

impl LoadedAccounts {
    pub(crate) fn has_errors(&self) -> bool {
        !self.unreadable.is_empty() || !self.duplicates.is_empty()
    }
}

pub(crate) fn load_accounts(path: &Path, types: &AccountTypes) -> Result<LoadedAccounts> {
    let crds = read_manifest(path)
        .with_context(|| format!("Unable to read manifest '{}'", path.display()))?;
    let duplicates = duplicate_account_names(&crds);
    let mut loaded = LoadedAccounts {
        accounts: Vec::new(),
        disabled: Vec::new(),
        unreadable: Vec::new(),
        duplicates,
    };
    for crd in &crds {
        let name = crd.object_name().to_owned();
        if !crd.is_enabled() {
            log::info!("Skipping disabled account '{}'", name);
            loaded.disabled.push(name);
            continue;
        }
        match types.account_from_crd(crd) {
            Ok(account) => loaded.accounts.push(account),
            Err(e) => loaded.unreadable.push((name, e.to_string())),
        }
    }
    Ok(loaded)
}
