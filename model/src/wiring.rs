use crate::account::Account;
use crate::configuration::{get_path, insert_path, FreeForm};
use crate::error::Result;
use crate::registry::AccountTypes;
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// The settings documents to give each platform service, keyed by service name.
pub type ServiceSettings = BTreeMap<String, FreeForm>;

/// Adds `accounts` to the settings of every service that must know about them.
///
/// Each service document starts from its entry in `existing` (or empty). Every account is
/// flattened and appended, in order, to the list under its type's `config_accounts_key` for each
/// of the type's services. When a service's document has no primary account for a type, the
/// first account of that type becomes the primary account.
///
/// The caller decides which accounts are eligible (enabled, and valid under its policy).
pub fn service_settings(
    types: &AccountTypes,
    accounts: &[Box<dyn Account>],
    existing: &ServiceSettings,
) -> Result<ServiceSettings> {
    let mut settings = existing.clone();
    for account_type in types.iter() {
        let of_type: Vec<&dyn Account> = accounts
            .iter()
            .map(|account| account.as_ref())
            .filter(|account| account.kind() == account_type.kind())
            .collect();
        if of_type.is_empty() {
            continue;
        }
        let entries = of_type
            .iter()
            .map(|account| account.to_spinnaker_settings().map(Value::Object))
            .collect::<Result<Vec<Value>>>()?;

        for service in account_type.services() {
            debug!(
                "Giving {} {} account(s) to '{}'",
                entries.len(),
                account_type.kind(),
                service
            );
            let document = settings.entry(service.to_owned()).or_default();
            insert_path(
                document,
                account_type.config_accounts_key(),
                Value::Array(entries.clone()),
            );
            let has_primary = get_path(document, account_type.primary_account_key())
                .map(|primary| !primary.is_null())
                .unwrap_or(false);
            if !has_primary {
                insert_path(
                    document,
                    account_type.primary_account_key(),
                    Value::String(of_type[0].name().to_owned()),
                );
            }
        }
    }
    Ok(settings)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::kubernetes::{KubernetesAccount, KubernetesAccountType, KubernetesAuth};
    use maplit::btreemap;
    use serde_json::json;

    fn types(deployments: &str) -> AccountTypes {
        let mut types = AccountTypes::new();
        types.register(Box::new(KubernetesAccountType::with_deployments(Some(
            deployments,
        ))));
        types
    }

    fn account(name: &str) -> Box<dyn Account> {
        Box::new(KubernetesAccount {
            name: name.to_string(),
            auth: KubernetesAuth {
                use_service_account: Some(true),
                ..KubernetesAuth::default()
            },
            ..KubernetesAccount::default()
        })
    }

    #[test]
    fn every_service_gets_the_accounts() {
        let settings = service_settings(
            &types("clouddriver-rw, clouddriver-ro"),
            &[account("a"), account("b")],
            &ServiceSettings::new(),
        )
        .unwrap();
        let expected = json!({
            "providers": {
                "kubernetes": {
                    "accounts": [
                        {"name": "a", "serviceAccount": true},
                        {"name": "b", "serviceAccount": true}
                    ],
                    "primaryAccount": "a"
                }
            }
        });
        assert_eq!(settings.len(), 2);
        for service in ["clouddriver-rw", "clouddriver-ro"] {
            assert_eq!(Value::Object(settings[service].clone()), expected);
        }
    }

    #[test]
    fn existing_primary_account_is_kept() {
        let existing = btreemap! {
            "clouddriver".to_string() => json!({
                "providers": {"kubernetes": {"primaryAccount": "b", "enabled": true}},
                "sql": {"enabled": true}
            }).as_object().cloned().unwrap(),
        };
        let settings =
            service_settings(&types(""), &[account("a"), account("b")], &existing).unwrap();
        let clouddriver = &settings["clouddriver"];
        assert_eq!(
            get_path(clouddriver, "providers.kubernetes.primaryAccount"),
            Some(&json!("b"))
        );
        assert_eq!(
            get_path(clouddriver, "providers.kubernetes.enabled"),
            Some(&json!(true))
        );
        assert_eq!(get_path(clouddriver, "sql.enabled"), Some(&json!(true)));
    }

    #[test]
    fn no_accounts_leaves_settings_alone() {
        let settings = service_settings(&types(""), &[], &ServiceSettings::new()).unwrap();
        assert!(settings.is_empty());
    }
}
