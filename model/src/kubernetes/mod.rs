/*!

Kubernetes accounts. When read from flat Spinnaker settings they support `kubeconfigFile`,
`kubeconfigContents` and `serviceAccount`. When read from a `SpinnakerAccount` object they may
also reference a Kubernetes secret or ask a provider to generate the kubeconfig.

!*/

mod auth;
mod env;
mod validator;

pub use auth::{AuthMechanism, GeneratedKubeconfig, KubernetesAuth, SecretReference};
pub use env::{CustomKubernetesResource, Env, ScopeAxis};

use crate::account::{validate_name, Account, AccountValidator};
use crate::account_type::{AccountKind, AccountType};
use crate::configuration::{take_key, Configuration, FreeForm};
use crate::constants::{
    CLOUDDRIVER, ENV_CLOUDDRIVER_PREFIX, KUBECONFIG_CONTENTS, KUBECONFIG_FILE,
    KUBERNETES_ACCOUNTS_KEY, KUBERNETES_CONFIG_ACCOUNTS_KEY, KUBERNETES_PRIMARY_ACCOUNT_KEY, NAME,
    USE_SERVICE_ACCOUNT,
};
use crate::crd::SpinnakerAccount;
use crate::error::{self, Result};
use crate::CrdExt;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;
use std::collections::HashSet;
use validator::KubernetesAccountValidator;

/// The Kubernetes account type. The set of target services is derived once, when the type is
/// constructed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct KubernetesAccountType {
    services: HashSet<String>,
}

/// The `CLOUDDRIVER_*` variables read by [`KubernetesAccountType::from_env`].
#[derive(Debug, Deserialize)]
struct ClouddriverEnv {
    /// `CLOUDDRIVER_DEPLOYMENTS`: a comma-separated list of services that run clouddriver.
    #[serde(default)]
    deployments: Option<String>,
}

impl KubernetesAccountType {
    /// Creates the account type, reading the target services from `CLOUDDRIVER_DEPLOYMENTS`.
    pub fn from_env() -> Result<Self> {
        let env = envy::prefixed(ENV_CLOUDDRIVER_PREFIX)
            .from_env::<ClouddriverEnv>()
            .context(error::EnvironmentSnafu {
                prefix: ENV_CLOUDDRIVER_PREFIX,
            })?;
        Ok(Self::with_deployments(env.deployments.as_deref()))
    }

    /// Creates the account type from the value `CLOUDDRIVER_DEPLOYMENTS` would have.
    pub fn with_deployments(deployments: Option<&str>) -> Self {
        let services = parse_deployments(deployments);
        debug!("Kubernetes accounts target services {:?}", services);
        Self { services }
    }

    /// A blank account with an empty (not missing) environment scope.
    pub fn new_kubernetes_account(&self) -> KubernetesAccount {
        KubernetesAccount {
            env: Env::default(),
            ..KubernetesAccount::default()
        }
    }
}

impl Default for KubernetesAccountType {
    fn default() -> Self {
        Self::with_deployments(None)
    }
}

/// Splits a comma-separated service list, trimming and deduplicating entries. Blank entries are
/// dropped, and an empty result falls back to `clouddriver`.
pub(crate) fn parse_deployments(deployments: Option<&str>) -> HashSet<String> {
    let services: HashSet<String> = deployments
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|service| !service.is_empty())
        .map(str::to_owned)
        .collect();
    if services.is_empty() {
        return HashSet::from([CLOUDDRIVER.to_owned()]);
    }
    services
}

impl AccountType for KubernetesAccountType {
    fn kind(&self) -> AccountKind {
        AccountKind::Kubernetes
    }

    fn accounts_key(&self) -> &'static str {
        KUBERNETES_ACCOUNTS_KEY
    }

    fn config_accounts_key(&self) -> &'static str {
        KUBERNETES_CONFIG_ACCOUNTS_KEY
    }

    fn primary_account_key(&self) -> &'static str {
        KUBERNETES_PRIMARY_ACCOUNT_KEY
    }

    fn services(&self) -> &HashSet<String> {
        &self.services
    }

    fn new_account(&self) -> Box<dyn Account> {
        Box::new(self.new_kubernetes_account())
    }

    fn from_crd(&self, crd: &SpinnakerAccount) -> Result<Box<dyn Account>> {
        Ok(Box::new(KubernetesAccount::from_crd(crd)?))
    }

    fn from_spinnaker_settings(&self, settings: FreeForm) -> Result<Box<dyn Account>> {
        Ok(Box::new(KubernetesAccount::from_spinnaker_settings(
            settings,
        )?))
    }
}

/// A Kubernetes cluster known to the platform.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesAccount {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub auth: KubernetesAuth,
    #[serde(default)]
    pub env: Env,
    #[serde(default)]
    pub settings: FreeForm,
}

impl KubernetesAccount {
    /// Reads an account from a `SpinnakerAccount` object. The object's name becomes the account
    /// name, `spec.kubernetes` the authentication, and the scope keys are lifted out of
    /// `spec.settings`.
    pub fn from_crd(crd: &SpinnakerAccount) -> Result<Self> {
        let mut settings = crd.spec.settings.clone().unwrap_or_default();
        let env = Env::take_from(&mut settings)?;
        Ok(Self {
            name: crd.object_name().to_owned(),
            auth: crd.spec.kubernetes.clone().unwrap_or_default(),
            env,
            settings,
        })
    }

    /// Reads an account from one entry of the flat `kubernetes.accounts` list.
    pub fn from_spinnaker_settings(mut settings: FreeForm) -> Result<Self> {
        let name: String = take_key(&mut settings, NAME)?;
        let auth = KubernetesAuth {
            kubeconfig_file: take_key(&mut settings, KUBECONFIG_FILE)?,
            kubeconfig_contents: take_key(&mut settings, KUBECONFIG_CONTENTS)?,
            use_service_account: take_key(&mut settings, USE_SERVICE_ACCOUNT)?,
            ..KubernetesAuth::default()
        };
        let env = Env::take_from(&mut settings)?;
        Ok(Self {
            name,
            auth,
            env,
            settings,
        })
    }
}

impl Account for KubernetesAccount {
    fn kind(&self) -> AccountKind {
        AccountKind::Kubernetes
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn settings(&self) -> &FreeForm {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut FreeForm {
        &mut self.settings
    }

    fn validate_format(&self) -> Result<()> {
        validate_name(self.kind(), &self.name)
    }

    fn new_validator(&self) -> Box<dyn AccountValidator + '_> {
        Box::new(KubernetesAccountValidator::new(self))
    }

    /// Secret references and generated credentials have no flat form; they are resolved into a
    /// kubeconfig before the account reaches a service.
    fn to_spinnaker_settings(&self) -> Result<FreeForm> {
        let mut settings = self.settings.clone();
        settings.extend(self.env.clone().into_map()?);
        settings.insert(NAME.to_owned(), Value::String(self.name.clone()));
        if let Some(file) = &self.auth.kubeconfig_file {
            settings.insert(KUBECONFIG_FILE.to_owned(), Value::String(file.clone()));
        }
        if let Some(contents) = &self.auth.kubeconfig_contents {
            settings.insert(
                KUBECONFIG_CONTENTS.to_owned(),
                Value::String(contents.clone()),
            );
        }
        if let Some(use_service_account) = self.auth.use_service_account {
            settings.insert(
                USE_SERVICE_ACCOUNT.to_owned(),
                Value::Bool(use_service_account),
            );
        }
        Ok(settings)
    }
}
