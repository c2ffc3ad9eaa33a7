use crate::account::Account;
use crate::account_type::{AccountKind, AccountType};
use crate::configuration::FreeForm;
use crate::crd::SpinnakerAccount;
use crate::error::{self, Result};
use crate::kubernetes::KubernetesAccountType;
use snafu::OptionExt;
use std::collections::BTreeMap;

/// The account types known to the process, keyed by backend tag. Built once at startup and read
/// only afterwards.
#[derive(Debug, Default)]
pub struct AccountTypes {
    types: BTreeMap<AccountKind, Box<dyn AccountType>>,
}

impl AccountTypes {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every supported backend, configured from the process environment.
    pub fn from_env() -> Result<Self> {
        let mut types = Self::new();
        types.register(Box::new(KubernetesAccountType::from_env()?));
        Ok(types)
    }

    /// Adds `account_type`, replacing any type previously registered for the same backend.
    pub fn register(&mut self, account_type: Box<dyn AccountType>) {
        self.types.insert(account_type.kind(), account_type);
    }

    pub fn get(&self, kind: AccountKind) -> Result<&dyn AccountType> {
        Ok(self
            .types
            .get(&kind)
            .context(error::NotRegisteredSnafu {
                kind: kind.to_string(),
            })?
            .as_ref())
    }

    /// Looks a type up by provider name, ignoring case.
    pub fn find(&self, provider: &str) -> Result<&dyn AccountType> {
        self.get(provider.parse()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AccountType> {
        self.types.values().map(|account_type| account_type.as_ref())
    }

    /// Builds an account from a `SpinnakerAccount` object using the type named by `spec.type`.
    pub fn account_from_crd(&self, crd: &SpinnakerAccount) -> Result<Box<dyn Account>> {
        self.get(crd.account_kind())?.from_crd(crd)
    }

    /// Builds an account of `kind` from one entry of flat settings.
    pub fn account_from_settings(
        &self,
        kind: AccountKind,
        settings: FreeForm,
    ) -> Result<Box<dyn Account>> {
        self.get(kind)?.from_spinnaker_settings(settings)
    }
}
