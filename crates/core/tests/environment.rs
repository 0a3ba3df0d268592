//! Reading the deployment environment from `FAULTLINE_ENV`
//!
//! Environment variables are process-wide, so everything that touches them
//! lives in this one test; the process-wide policy is first read inside it.

use faultline_core::stack::ENV_VAR;
use faultline_core::{
    file_not_found, global_policy, invalid_field_value, Environment, ErrorKind, StackCapturePolicy,
    StackOverride,
};

#[test]
fn test_environment_variable_drives_capture() {
    std::env::remove_var(ENV_VAR);
    assert_eq!(Environment::from_env(), Environment::Other(String::new()));
    assert!(!StackCapturePolicy::from_env().effective_capture());

    std::env::set_var(ENV_VAR, " Production ");
    assert_eq!(Environment::from_env(), Environment::Production);
    assert!(!StackCapturePolicy::from_env().effective_capture());

    std::env::set_var(ENV_VAR, "staging");
    assert_eq!(
        Environment::from_env(),
        Environment::Other("staging".to_string())
    );
    assert!(!StackCapturePolicy::default().effective_capture());

    std::env::set_var(ENV_VAR, "development");
    assert!(StackCapturePolicy::from_env().effective_capture());

    // the process-wide policy is initialized from the variable on first use
    std::env::set_var(ENV_VAR, "test");
    assert_eq!(global_policy().environment(), &Environment::Test);
    assert_eq!(global_policy().stack_override(), StackOverride::Unset);

    let record = file_not_found("/etc/app.json");
    assert!(record.has_stack());
    assert!(!invalid_field_value("port", "eighty", "not a number").has_stack());

    let wrapped = record.wrap(ErrorKind::MissingConfig, "configuration unavailable");
    assert!(wrapped.has_stack());
    let quiet = record.wrap_with(
        ErrorKind::MissingConfig,
        "configuration unavailable",
        &StackCapturePolicy::new(Environment::Production),
    );
    assert!(!quiet.has_stack());

    // later changes to the variable don't reach the initialized global
    std::env::set_var(ENV_VAR, "production");
    assert_eq!(global_policy().environment(), &Environment::Test);
    assert!(file_not_found("/etc/app.json").has_stack());

    std::env::remove_var(ENV_VAR);
}
