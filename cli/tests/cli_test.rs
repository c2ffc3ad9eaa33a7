use assert_cmd::Command;

fn spinaccounts() -> Command {
    let mut cmd = Command::cargo_bin("spinaccounts").unwrap();
    cmd.env_remove("CLOUDDRIVER_DEPLOYMENTS").env_remove("RUST_LOG");
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn validate_valid_accounts() {
    let mut cmd = spinaccounts();
    cmd.args(&["validate", data::accounts_path().to_str().unwrap()]);
    let out = stdout(&mut cmd);
    assert!(out.contains("account1\tKubernetes\tValid"));
    assert!(out.contains("account2\tKubernetes\tValid"));
    assert!(out.contains("account3\tDisabled"));
}

#[test]
fn validate_required_policy_fails() {
    let mut cmd = spinaccounts();
    cmd.args(&[
        "validate",
        data::invalid_accounts_path().to_str().unwrap(),
        "--validation",
        data::required_validation_path().to_str().unwrap(),
    ]);
    let assert = cmd.assert().failure();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(out.contains("good\tKubernetes\tValid"));
    assert!(out.contains("no-credentials\tKubernetes\tInvalid (required)"));
    assert!(out.contains("no means of authentication is configured"));
}

#[test]
fn validate_optional_policy_passes() {
    let mut cmd = spinaccounts();
    cmd.args(&["validate", data::invalid_accounts_path().to_str().unwrap()]);
    let out = stdout(&mut cmd);
    assert!(out.contains("no-credentials\tKubernetes\tInvalid (optional)"));
}

#[test]
fn validate_skip_policy() {
    let mut cmd = spinaccounts();
    cmd.args(&[
        "validate",
        data::invalid_accounts_path().to_str().unwrap(),
        "--validation",
        data::skip_validation_path().to_str().unwrap(),
        "--json",
    ]);
    let out = stdout(&mut cmd);
    let output: serde_json::Value = serde_json::from_str(&out).unwrap();
    let accounts = output["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["name"], "good");
    assert_eq!(accounts[0]["type"], "Kubernetes");
    assert_eq!(accounts[0]["status"]["state"], "Skipped");
    assert_eq!(accounts[1]["name"], "no-credentials");
    assert_eq!(accounts[1]["status"]["state"], "Skipped");
}

#[test]
fn validate_json_keeps_every_account() {
    let mut cmd = spinaccounts();
    cmd.args(&[
        "validate",
        data::duplicate_accounts_path().to_str().unwrap(),
        "--json",
    ]);
    let assert = cmd.assert().failure();
    let out = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let output: serde_json::Value = serde_json::from_str(&out).unwrap();
    let accounts = output["accounts"].as_array().unwrap();
    assert_eq!(accounts.len(), 3);
    assert_eq!(accounts[0]["name"], "shared");
    assert_eq!(accounts[1]["name"], "shared");
    assert_eq!(accounts[1]["status"]["state"], "Valid");
    assert_eq!(accounts[2]["name"], "");
    assert_eq!(accounts[2]["status"]["state"], "Invalid");
    assert_eq!(output["duplicates"], serde_json::json!(["shared"]));
    assert_eq!(output["disabled"], serde_json::json!(["retired"]));
    assert_eq!(output["unreadable"], serde_json::json!([]));
}

#[test]
fn services_default() {
    let mut cmd = spinaccounts();
    cmd.arg("services");
    assert_eq!(stdout(&mut cmd), "clouddriver\n");
}

#[test]
fn services_from_environment() {
    let mut cmd = spinaccounts();
    cmd.env("CLOUDDRIVER_DEPLOYMENTS", "clouddriver-ro, clouddriver-rw ,clouddriver-ro")
        .args(&["services", "--type", "KUBERNETES"]);
    assert_eq!(stdout(&mut cmd), "clouddriver-ro\nclouddriver-rw\n");
}

#[test]
fn render() {
    let mut cmd = spinaccounts();
    cmd.env("CLOUDDRIVER_DEPLOYMENTS", "clouddriver-rw,clouddriver-ro")
        .args(&["render", data::accounts_path().to_str().unwrap()]);
    let out = stdout(&mut cmd);
    let settings: serde_json::Value = serde_yaml::from_str(&out).unwrap();
    for service in ["clouddriver-rw", "clouddriver-ro"] {
        let kubernetes = &settings[service]["providers"]["kubernetes"];
        assert_eq!(kubernetes["primaryAccount"], "account1");
        let accounts = kubernetes["accounts"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1]["kubeconfigFile"], "/home/spinnaker/.kube/account2");
        assert_eq!(accounts[1]["cacheThreads"], 2);
    }
}

#[test]
fn render_drops_blocked_accounts() {
    let mut cmd = spinaccounts();
    cmd.args(&[
        "render",
        data::invalid_accounts_path().to_str().unwrap(),
        "--validation",
        data::required_validation_path().to_str().unwrap(),
    ]);
    let out = stdout(&mut cmd);
    let settings: serde_json::Value = serde_yaml::from_str(&out).unwrap();
    let accounts = settings["clouddriver"]["providers"]["kubernetes"]["accounts"]
        .as_array()
        .unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["name"], "good");
}

#[test]
fn crd() {
    let mut cmd = spinaccounts();
    cmd.arg("crd");
    let out = stdout(&mut cmd);
    assert!(out.contains("spinnakeraccounts.spinnaker.io"));
    assert!(out.contains("x-kubernetes-preserve-unknown-fields"));
}
