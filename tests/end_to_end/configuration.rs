//! Stack policy embedded in application configuration

use serde::Deserialize;

use faultline::{
    Environment, ErrorBuilder, ErrorKind, StackCapturePolicy, StackOverride,
};

#[derive(Debug, Deserialize)]
struct AppConfig {
    name: String,
    #[serde(default)]
    errors: Option<StackCapturePolicy>,
}

#[test]
fn test_policy_from_app_config() {
    let config: AppConfig = serde_json::from_str(
        r#"{"name": "ingest", "errors": {"environment": "production", "override": "force_on"}}"#,
    )
    .unwrap();
    assert_eq!(config.name, "ingest");

    let policy = config.errors.unwrap();
    assert_eq!(policy.environment(), &Environment::Production);
    assert_eq!(policy.stack_override(), StackOverride::ForceOn);

    let record = ErrorBuilder::with_policy(ErrorKind::ConnectionFailed, policy)
        .message("upstream refused connection")
        .build()
        .unwrap();
    assert!(record.has_stack());
}

#[test]
fn test_production_policy_without_override() {
    let config: AppConfig =
        serde_json::from_str(r#"{"name": "ingest", "errors": {"environment": "production"}}"#)
            .unwrap();
    let record = ErrorBuilder::with_policy(ErrorKind::ConnectionFailed, config.errors.unwrap())
        .message("upstream refused connection")
        .build()
        .unwrap();
    assert!(!record.has_stack());
}
