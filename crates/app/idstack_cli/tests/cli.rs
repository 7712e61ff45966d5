//! End-to-end tests of the `idstack` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const STACK: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../stacks/unified_login.yaml"
);

fn idstack() -> Command {
    let mut cmd = Command::cargo_bin("idstack").unwrap();
    cmd.env_remove("IDSTACK_REGION").env("RUST_LOG", "info");
    cmd
}

/// Copy the shipped stack into `dir`, rewriting `from` to `to`.
fn variant(dir: &Path, name: &str, from: &str, to: &str) -> PathBuf {
    let source = std::fs::read_to_string(STACK).unwrap();
    assert!(source.contains(from), "{from} not in stack");
    let path = dir.join(name);
    std::fs::write(&path, source.replace(from, to)).unwrap();
    path
}

#[test]
fn version_prints_binary_name() {
    idstack()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("idstack "));
}

#[test]
fn validate_reports_warnings() {
    idstack()
        .args(["validate", STACK])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid (5 resources, 3 warnings)"))
        .stdout(predicate::str::contains("implicit grant"));
}

#[test]
fn outputs_are_camel_case_json() {
    idstack()
        .args(["outputs", STACK])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"directoryId\": \"us-east-1_"))
        .stdout(predicate::str::contains("\"federationId\": \"us-east-1:"))
        .stdout(predicate::str::contains("\"region\": \"us-east-1\""));
}

#[test]
fn region_flag_and_env_override_the_file() {
    idstack()
        .args(["outputs", STACK, "--region", "ap-southeast-2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"region\": \"ap-southeast-2\""));

    idstack()
        .env("IDSTACK_REGION", "eu-central-1")
        .args(["outputs", STACK])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"region\": \"eu-central-1\""));
}

#[test]
fn weak_password_fails_with_status_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = variant(dir.path(), "weak.yaml", "min_length: 8", "min_length: 6");
    idstack()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Weak password policy on UserPool"));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stack.toml");
    std::fs::write(&path, "stack = 'S'").unwrap();
    idstack()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported config format"));
}

#[test]
fn synth_yaml_contains_descriptors() {
    idstack()
        .args(["synth", STACK, "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: federation"))
        .stdout(predicate::str::contains("provider_name: cognito-idp.us-east-1.amazonaws.com/"));
}

#[test]
fn domain_rename_needs_acknowledgment() {
    let dir = tempfile::tempdir().unwrap();
    let next = variant(
        dir.path(),
        "next.yaml",
        "prefix: unifiedlogin",
        "prefix: unifiedlogin-v2",
    );

    idstack()
        .args(["plan", STACK, next.to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"action\": \"replace\""))
        .stderr(predicate::str::contains("Disruptive changes need acknowledgment"));

    idstack()
        .args(["plan", STACK, next.to_str().unwrap(), "--acknowledge-disruptive"])
        .assert()
        .success();
}

#[test]
fn remove_rejects_referenced_resource() {
    idstack()
        .args(["remove", STACK, "IdentityPool"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("referenced by AuthenticatedRole"));

    idstack()
        .args(["remove", STACK, "IdentityPool", "--cascade"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AuthenticatedRole"));
}

#[test]
fn teardown_lists_dependents_first() {
    let output = idstack().args(["teardown", STACK]).output().unwrap();
    assert!(output.status.success());
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let order: Vec<&str> = plan
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["resource"].as_str().unwrap())
        .collect();
    assert_eq!(
        order,
        vec!["AuthenticatedRole", "IdentityPool", "Domain", "UserPoolClient", "UserPool"]
    );
}
