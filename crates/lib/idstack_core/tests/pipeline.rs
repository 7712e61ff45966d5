//! Scenario tests: full pipeline runs over YAML stack records.

use idstack_core::config::{self, ConfigFormat};
use idstack_core::models::OAuthFlow;
use idstack_core::{
    ChangeAction, ChangeError, ChangeSet, ConfigurationError, ConfigurationWarning, Draft,
    PipelineError, PipelineState, StackConfig, Warning, run,
};

const BASELINE: &str = r#"
stack: UnifiedLoginStack
region: us-east-1
directories:
  - id: UserPool
    name: MyAppUserPool
    self_sign_up: true
    sign_in_aliases: [email]
    auto_verify: [email]
    standard_attributes:
      email: { required: true, mutable: true }
      phone_number: { required: false }
    password_policy:
      min_length: 8
      require_symbols: false
    recovery: email_only
clients:
  - id: UserPoolClient
    directory: UserPool
    auth_flows: [user_password, user_srp]
    oauth:
      flows: [authorization_code_grant]
      scopes: [email]
      callback_urls: ["https://your-production-domain.com/callback"]
      logout_urls: ["https://your-production-domain.com/logout"]
domains:
  - id: Domain
    directory: UserPool
    prefix: unifiedlogin
federations:
  - id: IdentityPool
    name: MyAppIdentityPool
    providers:
      - { client: UserPoolClient, directory: UserPool }
roles:
  - id: AuthenticatedRole
    federation: IdentityPool
    statements:
      - effect: allow
        actions: [mobileanalytics:PutEvents, "cognito-sync:*"]
        resources: ["*"]
"#;

const SHIPPED: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../../stacks/unified_login.yaml"
));

fn baseline() -> StackConfig {
    config::parse(BASELINE, ConfigFormat::Yaml).expect("baseline parses")
}

#[test]
fn baseline_reaches_exported_without_warnings() {
    let exported = run(baseline()).expect("exported");
    assert_eq!(exported.state(), PipelineState::Exported);
    assert!(exported.warnings().is_empty());

    let outputs = exported.outputs();
    for (name, value) in outputs.as_map() {
        assert!(!value.is_empty(), "{name} is empty");
    }
    assert_eq!(outputs.region, "us-east-1");
    assert!(outputs.directory_id.starts_with("us-east-1_"));
    assert!(outputs.federation_id.starts_with("us-east-1:"));
}

#[test]
fn implicit_grant_adds_exactly_one_warning() {
    let mut config = baseline();
    config.clients[0].oauth.flows.push(OAuthFlow::ImplicitCodeGrant);

    let exported = run(config).expect("exported");
    assert_eq!(
        exported.warnings().as_slice(),
        &[Warning::Configuration(
            ConfigurationWarning::InsecureGrantCombination {
                client: "UserPoolClient".into()
            }
        )]
    );
}

#[test]
fn short_minimum_length_aborts() {
    let mut config = baseline();
    config.directories[0].password_policy.min_length = 6;
    assert_eq!(
        run(config).unwrap_err(),
        PipelineError::Configuration(ConfigurationError::WeakPasswordPolicy {
            directory: "UserPool".into(),
            min_length: 6,
        })
    );
}

#[test]
fn rerun_is_structurally_equal() {
    let first = run(baseline()).expect("first");
    let second = run(baseline()).expect("second");
    assert_eq!(first.graph(), second.graph());
    assert_eq!(first.outputs(), second.outputs());
}

#[test]
fn federation_client_cycle_is_detected() {
    let mut config = baseline();
    config.clients[0].directory = "IdentityPool".into();
    match Draft::new(config).validate() {
        Err(ConfigurationError::CycleDetected(path)) => {
            assert!(path.contains(&"IdentityPool".to_string()), "{path:?}");
            assert!(path.contains(&"UserPoolClient".to_string()), "{path:?}");
            assert_eq!(path.first(), path.last());
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn foreign_audience_fails_validation() {
    let mut config = baseline();
    config.roles[0].audience = Some("us-east-1:11111111-2222-3333-4444-555555555555".into());
    assert!(matches!(
        Draft::new(config).validate(),
        Err(ConfigurationError::AudienceMismatch { .. })
    ));
}

#[test]
fn unknown_directory_is_unresolved() {
    let mut config = baseline();
    config.clients[0].directory = "OtherPool".into();
    assert!(matches!(
        Draft::new(config).validate(),
        Err(ConfigurationError::UnresolvedReference { ref target, .. }) if target == "OtherPool"
    ));
}

#[test]
fn domain_rename_needs_acknowledgment() {
    let previous = run(baseline()).expect("previous");
    let mut config = baseline();
    config.domains[0].prefix = "unifiedlogin-v2".into();
    let next = run(config).expect("next");

    let plan = ChangeSet::between(previous.graph(), next.graph());
    assert_eq!(plan.changes.len(), 1);
    assert_eq!(plan.changes[0].action, ChangeAction::Replace);
    assert_eq!(plan.disruptive().count(), 1);

    assert!(matches!(
        plan.clone().approve(false),
        Err(ChangeError::UnacknowledgedDisruptiveChange { .. })
    ));
    assert!(plan.approve(true).is_ok());
}

#[test]
fn shipped_stack_composes_with_its_warnings() {
    let config = config::parse(SHIPPED, ConfigFormat::Yaml).expect("shipped stack parses");
    let exported = run(config).expect("exported");

    let warnings: Vec<String> = exported.warnings().iter().map(ToString::to_string).collect();
    assert_eq!(warnings.len(), 3, "{warnings:#?}");
    assert!(warnings[0].contains("implicit grant"));
    assert!(warnings[1].contains("http://localhost:3000/callback"));
    assert!(warnings[2].contains("http://localhost:3000/logout"));
}

#[test]
fn composed_graph_serializes_for_provisioning() {
    let composed = Draft::new(baseline())
        .validate()
        .expect("validated")
        .compose()
        .expect("composed");
    let yaml = serde_yaml::to_string(composed.graph()).expect("yaml");
    assert!(yaml.contains("kind: directory"));
    assert!(yaml.contains("prefix: unifiedlogin"));
}
