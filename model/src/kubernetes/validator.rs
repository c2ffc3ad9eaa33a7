use super::KubernetesAccount;
use crate::account::AccountValidator;
use crate::account_type::AccountKind;
use crate::validation::{ValidationFailure, ValidationSetting};

/// Checks that a Kubernetes account describes a usable cluster without contacting it.
#[derive(Debug)]
pub(crate) struct KubernetesAccountValidator<'a> {
    account: &'a KubernetesAccount,
}

impl<'a> KubernetesAccountValidator<'a> {
    pub(crate) fn new(account: &'a KubernetesAccount) -> Self {
        Self { account }
    }

    fn auth_problems(&self) -> Vec<String> {
        let auth = &self.account.auth;
        let mut problems = Vec::new();
        if auth.mechanisms().is_empty() {
            problems.push("no means of authentication is configured".to_string());
        }
        if matches!(auth.kubeconfig_file.as_deref(), Some(file) if file.trim().is_empty()) {
            problems.push("kubeconfigFile is empty".to_string());
        }
        if matches!(auth.kubeconfig_contents.as_deref(), Some(contents) if contents.trim().is_empty())
        {
            problems.push("kubeconfigContents is empty".to_string());
        }
        if let Some(secret) = &auth.kubeconfig_secret {
            if secret.name.is_empty() || secret.key.is_empty() {
                problems.push("kubeconfigSecret must name both a secret and a key".to_string());
            }
        }
        if let Some(generated) = &auth.generated {
            if generated.provider.is_empty() {
                problems.push("generated kubeconfig must name a provider".to_string());
            }
        }
        problems
    }

    fn env_problems(&self) -> Vec<String> {
        let env = &self.account.env;
        let mut problems: Vec<String> = env
            .conflicting_axes()
            .into_iter()
            .map(|axis| {
                format!(
                    "both {} and its omit list are set, only one may be used",
                    axis
                )
            })
            .collect();
        problems.extend(
            env.custom_resources
                .iter()
                .enumerate()
                .filter(|(_, resource)| resource.kubernetes_kind.is_empty())
                .map(|(i, _)| format!("customResources[{}] is missing kubernetesKind", i)),
        );
        problems
    }
}

impl AccountValidator for KubernetesAccountValidator<'_> {
    fn validate(&self, setting: &ValidationSetting) -> Result<(), ValidationFailure> {
        let mut reasons = self.auth_problems();
        reasons.extend(self.env_problems());
        if reasons.is_empty() {
            return Ok(());
        }
        Err(ValidationFailure {
            kind: AccountKind::Kubernetes,
            account: self.account.name.clone(),
            policy: setting.policy,
            reasons,
        })
    }
}
