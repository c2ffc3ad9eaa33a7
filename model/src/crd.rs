use crate::account::duplicate_names;
use crate::account_type::AccountKind;
use crate::configuration::FreeForm;
use crate::kubernetes::KubernetesAuth;
use crate::validation::{ValidationPhase, ValidationState};
use crate::CrdExt;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{CustomResource, Resource as Kresource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A deployment target declared as a Kubernetes object. The `CustomResource` derive also produces
/// a struct named `SpinnakerAccount` which represents an account object in the k8s API.
#[derive(Clone, CustomResource, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
#[kube(
    derive = "Default",
    derive = "PartialEq",
    group = "spinnaker.io",
    kind = "SpinnakerAccount",
    namespaced,
    plural = "spinnakeraccounts",
    shortname = "spinaccount",
    singular = "spinnakeraccount",
    status = "SpinnakerAccountStatus",
    version = "v1alpha2",
    printcolumn = r#"{"name":"Type", "type":"string", "jsonPath":".spec.type"}"#,
    printcolumn = r#"{"name":"Validation", "type":"string", "jsonPath":".status.state"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SpinnakerAccountSpec {
    /// Disabled accounts are not given to any service. Defaults to `true`.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    /// The backend of this account.
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// Roles allowed to perform each kind of action (e.g. `READ`, `WRITE`) on this account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<BTreeMap<String, Vec<String>>>,
    /// How to authenticate against a Kubernetes account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesAuth>,
    /// Backend-specific settings, passed through to the services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::schema_utils::free_form_schema")]
    pub settings: Option<FreeForm>,
}

fn enabled_default() -> bool {
    true
}

impl Default for SpinnakerAccountSpec {
    fn default() -> Self {
        Self {
            enabled: enabled_default(),
            kind: AccountKind::default(),
            permissions: None,
            kubernetes: None,
            settings: None,
        }
    }
}

/// The status field of the `SpinnakerAccount` CRD, written after validation.
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpinnakerAccountStatus {
    #[serde(deserialize_with = "crate::schema_utils::null_to_default")]
    #[serde(default)]
    pub state: ValidationPhase,
    /// Why the account is invalid, if it is.
    pub invalid_reason: Option<String>,
    /// RFC 3339 time of the last validation.
    pub last_validated: Option<String>,
}

impl SpinnakerAccountStatus {
    /// The status recording a validation result at the current time. A format error is recorded
    /// as `Invalid`.
    pub fn from_result(result: &crate::Result<ValidationState>) -> Self {
        let (state, invalid_reason) = match result {
            Ok(ValidationState::Invalid(failure)) => {
                (ValidationPhase::Invalid, Some(failure.reasons.join("; ")))
            }
            Ok(state) => (state.phase(), None),
            Err(e) => (ValidationPhase::Invalid, Some(e.to_string())),
        };
        Self {
            state,
            invalid_reason,
            last_validated: Some(chrono::Utc::now().to_rfc3339()),
        }
    }
}

impl SpinnakerAccount {
    /// The backend named by `spec.type`.
    pub fn account_kind(&self) -> AccountKind {
        self.spec.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.spec.enabled
    }
}

impl CrdExt for SpinnakerAccount {
    fn object_meta(&self) -> &ObjectMeta {
        self.meta()
    }
}

/// Returns the names shared by more than one account object, sorted.
pub fn duplicate_account_names(accounts: &[SpinnakerAccount]) -> Vec<String> {
    duplicate_names(accounts.iter().map(|account| account.object_name()))
}
