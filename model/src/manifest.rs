use crate::crd::SpinnakerAccount;
use crate::error::{self, Result};
use crate::validation::SpinnakerValidation;
use serde::Deserialize;
use snafu::ResultExt;
use std::path::Path;

/// Reads a YAML file containing one or more `SpinnakerAccount` documents.
pub fn read_manifest(path: &Path) -> Result<Vec<SpinnakerAccount>> {
    let manifest_string = std::fs::read_to_string(path).context(error::FileSnafu { path })?;
    convert_manifest(&manifest_string)
}

/// Deserializes every `SpinnakerAccount` document of a multi-document YAML string. Empty documents
/// are ignored.
pub fn convert_manifest(manifest_string: &str) -> Result<Vec<SpinnakerAccount>> {
    let mut accounts = Vec::new();
    for doc in serde_yaml::Deserializer::from_str(manifest_string) {
        let value = serde_yaml::Value::deserialize(doc).context(error::SerdeYamlSnafu {
            action: "deserialize manifest",
        })?;
        if value.is_null() {
            continue;
        }
        let account: SpinnakerAccount =
            serde_yaml::from_value(value).context(error::SerdeYamlSnafu {
                action: "deserialize account",
            })?;
        accounts.push(account);
    }
    Ok(accounts)
}

/// Reads a validation document from a YAML (or JSON) file.
pub fn read_validation(path: &Path) -> Result<SpinnakerValidation> {
    let validation_string = std::fs::read_to_string(path).context(error::FileSnafu { path })?;
    Ok(
        serde_yaml::from_str(&validation_string).context(error::SerdeYamlSnafu {
            action: "deserialize validation settings",
        })?,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::CrdExt;

    #[test]
    fn multiple_documents() {
        let accounts = convert_manifest(
            r#"
---
apiVersion: spinnaker.io/v1alpha2
kind: SpinnakerAccount
metadata:
  name: account1
spec:
  type: Kubernetes
---
---
apiVersion: spinnaker.io/v1alpha2
kind: SpinnakerAccount
metadata:
  name: account2
spec:
  type: KUBERNETES
"#,
        )
        .unwrap();
        let names: Vec<&str> = accounts.iter().map(|a| a.object_name()).collect();
        assert_eq!(names, vec!["account1", "account2"]);
        assert!(accounts
            .iter()
            .all(|a| a.account_kind() == crate::AccountKind::Kubernetes));
    }

    #[test]
    fn bad_document() {
        let err = convert_manifest("metadata: [").unwrap_err();
        assert!(err.to_string().starts_with("Unable to deserialize"));
    }

    #[test]
    fn missing_file() {
        assert!(read_manifest(Path::new("/nonexistent/accounts.yaml")).is_err());
    }
}
