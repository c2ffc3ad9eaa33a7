use crate::account::Account;
use crate::configuration::FreeForm;
use crate::crd::SpinnakerAccount;
use crate::error::{self, Result};
use crate::validation::{SpinnakerValidation, ValidationSetting};
use schemars::JsonSchema;
use serde::Serialize;
use serde_plain::{derive_deserialize_from_fromstr, derive_display_from_serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::str::FromStr;

/// The backend tag of a supported account kind.
#[derive(Serialize, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, JsonSchema)]
pub enum AccountKind {
    Kubernetes,
}

impl AccountKind {
    pub const ALL: [AccountKind; 1] = [AccountKind::Kubernetes];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Kubernetes => "Kubernetes",
        }
    }
}

impl Default for AccountKind {
    fn default() -> Self {
        Self::Kubernetes
    }
}

derive_display_from_serialize!(AccountKind);
derive_deserialize_from_fromstr!(AccountKind, "a supported account type, e.g. Kubernetes");

/// Parses a backend tag ignoring case, since operators write provider names by hand.
impl FromStr for AccountKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| error::UnknownAccountKindSnafu { value: s }.build().into())
    }
}

/// The capabilities of one backend. There is a single, read-only instance per backend for the
/// life of the process, held in [`crate::AccountTypes`].
pub trait AccountType: Debug + Send + Sync {
    /// The backend tag.
    fn kind(&self) -> AccountKind;

    /// The key under which accounts of this type are listed in flat (legacy) settings, e.g.
    /// `kubernetes.accounts`.
    fn accounts_key(&self) -> &'static str;

    /// The key under which accounts of this type live in structured provider settings, e.g.
    /// `providers.kubernetes.accounts`.
    fn config_accounts_key(&self) -> &'static str;

    /// The key that names the implicit default account of this type.
    fn primary_account_key(&self) -> &'static str;

    /// The platform services that must receive accounts of this type. Never empty.
    fn services(&self) -> &HashSet<String>;

    /// A zero-valued account with its nested structures present and empty, ready to be
    /// populated.
    fn new_account(&self) -> Box<dyn Account>;

    /// Picks this backend's policy out of the platform-wide validation document.
    fn validation_setting<'a>(&self, validation: &'a SpinnakerValidation) -> &'a ValidationSetting {
        validation.provider_setting(self.kind())
    }

    /// Builds an account from a `SpinnakerAccount` object.
    fn from_crd(&self, crd: &SpinnakerAccount) -> Result<Box<dyn Account>>;

    /// Builds an account from one entry of the flat settings list found under `accounts_key`.
    fn from_spinnaker_settings(&self, settings: FreeForm) -> Result<Box<dyn Account>>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_from_str() {
        for s in ["Kubernetes", "kubernetes", "KUBERNETES", " kubernetes "] {
            assert_eq!(s.parse::<AccountKind>().unwrap(), AccountKind::Kubernetes);
        }
        assert!("aws".parse::<AccountKind>().is_err());
    }

    #[test]
    fn kind_serde() {
        assert_eq!(AccountKind::Kubernetes.to_string(), "Kubernetes");
        for s in [r#""kubernetes""#, r#""KUBERNETES""#, r#""Kubernetes""#] {
            let kind: AccountKind = serde_json::from_str(s).unwrap();
            assert_eq!(kind, AccountKind::Kubernetes);
        }
        assert!(serde_json::from_str::<AccountKind>(r#""aws""#).is_err());
    }
}
