use crate::configuration::FreeForm;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_plain::derive_display_from_serialize;

/// How the platform obtains credentials for a Kubernetes account. Several mechanisms may be
/// declared at once; choosing between them is left to whatever resolves the credentials.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesAuth {
    /// A path to a kubeconfig file, or a reference to an externally stored one (for example
    /// `encrypted:s3!r:us-west-2!b:bucket!f:kubeconfig`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig_file: Option<String>,
    /// The kubeconfig content inlined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig_contents: Option<String>,
    /// A key of a Kubernetes secret holding the kubeconfig.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig_secret: Option<SecretReference>,
    /// Use the service account of the pod running the service. An explicit `false` is kept so
    /// that it survives a trip through flat settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_service_account: Option<bool>,
    /// Have a provider generate the kubeconfig.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<GeneratedKubeconfig>,
}

/// Points to one key of a secret in the account's namespace.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
pub struct SecretReference {
    pub name: String,
    pub key: String,
}

/// Provider-generated credentials, e.g. from a cloud provider's cluster API.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
pub struct GeneratedKubeconfig {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::schema_utils::free_form_schema")]
    pub options: Option<FreeForm>,
}

/// The authentication mechanisms a descriptor can declare.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub enum AuthMechanism {
    KubeconfigFile,
    KubeconfigContents,
    KubeconfigSecret,
    ServiceAccount,
    Generated,
}

derive_display_from_serialize!(AuthMechanism);

impl KubernetesAuth {
    /// The mechanisms declared by this descriptor, in field order.
    pub fn mechanisms(&self) -> Vec<AuthMechanism> {
        let declared = [
            (self.kubeconfig_file.is_some(), AuthMechanism::KubeconfigFile),
            (
                self.kubeconfig_contents.is_some(),
                AuthMechanism::KubeconfigContents,
            ),
            (
                self.kubeconfig_secret.is_some(),
                AuthMechanism::KubeconfigSecret,
            ),
            (
                self.use_service_account == Some(true),
                AuthMechanism::ServiceAccount,
            ),
            (self.generated.is_some(), AuthMechanism::Generated),
        ];
        declared
            .into_iter()
            .filter(|(present, _)| *present)
            .map(|(_, mechanism)| mechanism)
            .collect()
    }
}
