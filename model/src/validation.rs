use crate::account::Account;
use crate::account_type::{AccountKind, AccountType};
use crate::error::{self, Result};
use crate::registry::AccountTypes;
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_plain::{derive_display_from_serialize, derive_fromstr_from_deserialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// How strictly accounts of a provider are validated.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ValidationPolicy {
    /// The validator runs and an invalid account must not be wired into any service.
    Required,
    /// The validator runs and failures are reported, but the account may still be wired.
    Optional,
    /// The validator does not run at all.
    Skip,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::Optional
    }
}

derive_display_from_serialize!(ValidationPolicy);
derive_fromstr_from_deserialize!(ValidationPolicy);

/// The validation policy for one provider (or the global default).
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSetting {
    #[serde(default)]
    pub policy: ValidationPolicy,
    /// How often the surrounding controller should re-run validation. Not interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_seconds: Option<u64>,
}

impl ValidationSetting {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            policy,
            frequency_seconds: None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.policy == ValidationPolicy::Skip
    }
}

/// The platform-wide validation document: a global default plus per-provider overrides. Provider
/// names are matched case-insensitively, so `Kubernetes`, `kubernetes` and `KUBERNETES` all
/// address the same provider.
///
/// ```yaml
/// defaults:
///   policy: optional
/// providers:
///   Kubernetes:
///     policy: required
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Clone, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpinnakerValidation {
    #[serde(default)]
    pub defaults: ValidationSetting,
    #[serde(default)]
    pub providers: BTreeMap<String, ValidationSetting>,
}

impl SpinnakerValidation {
    /// The global default policy.
    pub fn default_setting(&self) -> &ValidationSetting {
        &self.defaults
    }

    /// Returns the first provider override whose name matches `kind` ignoring case, falling back
    /// to the global default. Every account type resolves its policy through here.
    pub fn provider_setting(&self, kind: AccountKind) -> &ValidationSetting {
        let tag = kind.as_str();
        self.providers
            .iter()
            .find(|(provider, _)| provider.eq_ignore_ascii_case(tag))
            .map(|(provider, setting)| {
                debug!("Using '{}' validation settings for {} accounts", provider, kind);
                setting
            })
            .unwrap_or_else(|| self.default_setting())
    }
}

/// A non-fatal semantic validation failure attached to one account.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidationFailure {
    pub kind: AccountKind,
    pub account: String,
    pub policy: ValidationPolicy,
    pub reasons: Vec<String>,
}

impl ValidationFailure {
    /// Whether the failure prevents the account from being wired into its services.
    pub fn blocks_wiring(&self) -> bool {
        self.policy == ValidationPolicy::Required
    }
}

impl Display for ValidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} account '{}' is invalid: {}",
            self.kind,
            self.account,
            self.reasons.join("; ")
        )
    }
}

/// Where an account is in its validation lifecycle. `Skipped`, `Valid` and `Invalid` are terminal.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ValidationState {
    Unvalidated,
    FormatChecked,
    Skipped,
    Valid,
    Invalid(ValidationFailure),
}

impl Default for ValidationState {
    fn default() -> Self {
        Self::Unvalidated
    }
}

impl ValidationState {
    pub fn phase(&self) -> ValidationPhase {
        match self {
            ValidationState::Unvalidated => ValidationPhase::Unvalidated,
            ValidationState::FormatChecked => ValidationPhase::FormatChecked,
            ValidationState::Skipped => ValidationPhase::Skipped,
            ValidationState::Valid => ValidationPhase::Valid,
            ValidationState::Invalid(_) => ValidationPhase::Invalid,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ValidationState::Skipped | ValidationState::Valid | ValidationState::Invalid(_)
        )
    }

    /// Whether an account in this state may be handed to its target services.
    pub fn is_wireable(&self) -> bool {
        match self {
            ValidationState::Skipped | ValidationState::Valid => true,
            ValidationState::Invalid(failure) => !failure.blocks_wiring(),
            ValidationState::Unvalidated | ValidationState::FormatChecked => false,
        }
    }

    /// Moves account `name` to `next`. Only `Unvalidated -> FormatChecked` and
    /// `FormatChecked -> Skipped | Valid | Invalid` are allowed.
    pub fn advance(self, name: &str, next: ValidationState) -> Result<ValidationState> {
        let allowed = matches!(
            (&self, &next),
            (ValidationState::Unvalidated, ValidationState::FormatChecked)
                | (ValidationState::FormatChecked, ValidationState::Skipped)
                | (ValidationState::FormatChecked, ValidationState::Valid)
                | (ValidationState::FormatChecked, ValidationState::Invalid(_))
        );
        if allowed {
            Ok(next)
        } else {
            Err(error::IllegalTransitionSnafu {
                name,
                from: self.phase().to_string(),
                to: next.phase().to_string(),
            }
            .build()
            .into())
        }
    }
}

/// The data-free projection of [`ValidationState`], used in the account CRD status.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy, JsonSchema)]
pub enum ValidationPhase {
    Unvalidated,
    FormatChecked,
    Skipped,
    Valid,
    Invalid,
}

impl Default for ValidationPhase {
    fn default() -> Self {
        Self::Unvalidated
    }
}

derive_display_from_serialize!(ValidationPhase);
derive_fromstr_from_deserialize!(ValidationPhase);

/// Drives one account through its validation lifecycle. A format error is returned immediately;
/// a semantic failure is reported as `ValidationState::Invalid`.
pub fn validate_account(
    account: &dyn Account,
    account_type: &dyn AccountType,
    validation: &SpinnakerValidation,
) -> Result<ValidationState> {
    let state = ValidationState::Unvalidated;
    account.validate_format()?;
    let state = state.advance(account.name(), ValidationState::FormatChecked)?;

    let setting = account_type.validation_setting(validation);
    let next = if setting.is_skipped() {
        ValidationState::Skipped
    } else {
        match account.new_validator().validate(setting) {
            Ok(()) => ValidationState::Valid,
            Err(failure) => ValidationState::Invalid(failure),
        }
    };

    match &next {
        ValidationState::Invalid(failure) if failure.blocks_wiring() => warn!("{}", failure),
        ValidationState::Invalid(failure) => {
            warn!("{} (validation is optional, the account will still be used)", failure)
        }
        other => info!(
            "{} account '{}' is {}",
            account.kind(),
            account.name(),
            other.phase()
        ),
    }
    state.advance(account.name(), next)
}

/// The result of validating one account in a batch.
#[derive(Debug)]
pub struct AccountReport {
    pub name: String,
    pub kind: AccountKind,
    pub result: Result<ValidationState>,
}

impl AccountReport {
    pub fn is_wireable(&self) -> bool {
        self.result
            .as_ref()
            .map(ValidationState::is_wireable)
            .unwrap_or(false)
    }
}

/// Validates every account in order. Neither a format error nor a validation failure for one
/// account stops the others from being processed.
pub fn validate_accounts(
    accounts: &[Box<dyn Account>],
    types: &AccountTypes,
    validation: &SpinnakerValidation,
) -> Vec<AccountReport> {
    accounts
        .iter()
        .map(|account| {
            let account = account.as_ref();
            let result = types
                .get(account.kind())
                .and_then(|account_type| validate_account(account, account_type, validation));
            if let Err(e) = &result {
                warn!("{}", e);
            }
            AccountReport {
                name: account.name().to_owned(),
                kind: account.kind(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use maplit::btreemap;

    fn failure(policy: ValidationPolicy) -> ValidationFailure {
        ValidationFailure {
            kind: AccountKind::Kubernetes,
            account: "prod".to_string(),
            policy,
            reasons: vec!["no credentials".to_string()],
        }
    }

    #[test]
    fn provider_setting_ignores_case() {
        for key in ["Kubernetes", "kubernetes", "KUBERNETES"] {
            let validation = SpinnakerValidation {
                defaults: ValidationSetting::new(ValidationPolicy::Optional),
                providers: btreemap! {
                    "aws".to_string() => ValidationSetting::new(ValidationPolicy::Skip),
                    key.to_string() => ValidationSetting::new(ValidationPolicy::Required),
                },
            };
            assert_eq!(
                validation.provider_setting(AccountKind::Kubernetes).policy,
                ValidationPolicy::Required,
                "key {}",
                key
            );
        }
    }

    #[test]
    fn provider_setting_falls_back_to_default() {
        let validation = SpinnakerValidation {
            defaults: ValidationSetting {
                policy: ValidationPolicy::Skip,
                frequency_seconds: Some(60),
            },
            providers: btreemap! {
                "aws".to_string() => ValidationSetting::new(ValidationPolicy::Required),
            },
        };
        assert_eq!(
            validation.provider_setting(AccountKind::Kubernetes),
            &ValidationSetting {
                policy: ValidationPolicy::Skip,
                frequency_seconds: Some(60),
            }
        );
    }

    #[test]
    fn deserialize_document() {
        let validation: SpinnakerValidation = serde_yaml::from_str(
            r#"
defaults:
  policy: skip
providers:
  KUBERNETES:
    policy: required
    frequencySeconds: 300
"#,
        )
        .unwrap();
        assert_eq!(validation.defaults.policy, ValidationPolicy::Skip);
        let setting = validation.provider_setting(AccountKind::Kubernetes);
        assert_eq!(setting.policy, ValidationPolicy::Required);
        assert_eq!(setting.frequency_seconds, Some(300));
    }

    #[test]
    fn empty_document_is_optional() {
        let validation: SpinnakerValidation = serde_yaml::from_str("{}").unwrap();
        assert_eq!(
            validation.provider_setting(AccountKind::Kubernetes).policy,
            ValidationPolicy::Optional
        );
    }

    #[test]
    fn lifecycle_transitions() {
        let state = ValidationState::Unvalidated
            .advance("a", ValidationState::FormatChecked)
            .unwrap();
        assert!(!state.is_terminal());
        let state = state.advance("a", ValidationState::Valid).unwrap();
        assert!(state.is_terminal());
        assert!(state
            .clone()
            .advance("a", ValidationState::Unvalidated)
            .is_err());
        assert!(state.advance("a", ValidationState::Skipped).is_err());
        assert!(ValidationState::Unvalidated
            .advance("a", ValidationState::Valid)
            .is_err());
        assert!(ValidationState::FormatChecked
            .advance("a", ValidationState::FormatChecked)
            .is_err());
    }

    #[test]
    fn wireable_states() {
        assert!(ValidationState::Valid.is_wireable());
        assert!(ValidationState::Skipped.is_wireable());
        assert!(!ValidationState::FormatChecked.is_wireable());
        assert!(ValidationState::Invalid(failure(ValidationPolicy::Optional)).is_wireable());
        assert!(!ValidationState::Invalid(failure(ValidationPolicy::Required)).is_wireable());
    }

    #[test]
    fn failure_display() {
        assert_eq!(
            failure(ValidationPolicy::Required).to_string(),
            "Kubernetes account 'prod' is invalid: no credentials"
        );
    }

    #[test]
    fn batch_continues_past_errors() {
        use crate::kubernetes::{KubernetesAccount, KubernetesAccountType, KubernetesAuth};

        let mut types = AccountTypes::new();
        types.register(Box::new(KubernetesAccountType::default()));
        let account = |name: &str, use_service_account: bool| -> Box<dyn Account> {
            Box::new(KubernetesAccount {
                name: name.to_string(),
                auth: KubernetesAuth {
                    use_service_account: Some(use_service_account),
                    ..KubernetesAuth::default()
                },
                ..KubernetesAccount::default()
            })
        };
        let accounts = vec![account("", true), account("a", false), account("b", true)];
        let validation = SpinnakerValidation {
            defaults: ValidationSetting::new(ValidationPolicy::Required),
            ..SpinnakerValidation::default()
        };

        let reports = validate_accounts(&accounts, &types, &validation);
        assert_eq!(reports.len(), 3);
        assert!(reports[0].result.as_ref().unwrap_err().is_format_error());
        assert!(matches!(
            reports[1].result,
            Ok(ValidationState::Invalid(_))
        ));
        assert!(!reports[1].is_wireable());
        assert_eq!(reports[2].name, "b");
        assert!(matches!(reports[2].result, Ok(ValidationState::Valid)));
        assert!(reports[2].is_wireable());
    }

    #[test]
    fn policy_from_str() {
        assert_eq!(
            "skip".parse::<ValidationPolicy>().unwrap(),
            ValidationPolicy::Skip
        );
        assert_eq!(ValidationPolicy::Required.to_string(), "required");
    }
}
