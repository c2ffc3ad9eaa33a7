/// Helper macro to avoid retyping the API group of the account CRD when creating further string
/// constants from it. When given no parameters, this returns the group name. When given a string
/// literal parameter it adds `/parameter` to the end.
macro_rules! spinnaker {
    () => {
        "spinnaker.io"
    };
    ($s:literal) => {
        concat!(spinnaker!(), "/", $s)
    };
}

// System identifiers
pub const API_GROUP: &str = spinnaker!();
pub const API_VERSION: &str = spinnaker!("v1alpha2");

// Environment variables
pub const ENV_CLOUDDRIVER_PREFIX: &str = "CLOUDDRIVER_";
pub const ENV_CLOUDDRIVER_DEPLOYMENTS: &str = "CLOUDDRIVER_DEPLOYMENTS";

// Services
pub const CLOUDDRIVER: &str = "clouddriver";

// Kubernetes account settings keys
pub const KUBERNETES_ACCOUNTS_KEY: &str = "kubernetes.accounts";
pub const KUBERNETES_CONFIG_ACCOUNTS_KEY: &str = "providers.kubernetes.accounts";
pub const KUBERNETES_PRIMARY_ACCOUNT_KEY: &str = "providers.kubernetes.primaryAccount";

// Legacy Kubernetes authentication keys
pub const KUBECONFIG_FILE: &str = "kubeconfigFile";
pub const KUBECONFIG_CONTENTS: &str = "kubeconfigContents";
pub const USE_SERVICE_ACCOUNT: &str = "serviceAccount";

// Environment scope keys
pub const NAMESPACES: &str = "namespaces";
pub const OMIT_NAMESPACES: &str = "omitNamespaces";
pub const KINDS: &str = "kinds";
pub const OMIT_KINDS: &str = "omitKinds";
pub const CUSTOM_RESOURCES: &str = "customResources";

// Account keys
pub const NAME: &str = "name";

#[test]
fn spinnaker_constants_macro_test() {
    assert_eq!("spinnaker.io", spinnaker!());
    assert_eq!("spinnaker.io/v1alpha2", API_VERSION);
    assert_eq!("spinnaker.io/foo", spinnaker!("foo"));
}
