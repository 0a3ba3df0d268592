//! Config loading scenario: a missing file surfaces as structured data

use faultline::observe::{cause_chain, log_context, metric_labels};
use faultline::{
    file_not_found, invalid_json, json, DomainResult, ErrorKind, ErrorRecord, ResultExt,
};

fn read_config(path: &str) -> DomainResult<String> {
    if path.starts_with("/missing") {
        return Err(file_not_found(path));
    }
    Ok(r#"{"port": "eighty"}"#.to_string())
}

fn parse_port(path: &str, text: &str) -> DomainResult<u16> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| invalid_json(path, e.to_string()))?;
    value["port"]
        .as_u64()
        .and_then(|port| u16::try_from(port).ok())
        .ok_or_else(|| invalid_json(path, "port must be a number"))
}

fn load_port(path: &str) -> DomainResult<u16> {
    let text = read_config(path).wrap_err(ErrorKind::MissingConfig, "configuration unavailable")?;
    parse_port(path, &text).with_context("stage", "parse")
}

#[test]
fn test_file_not_found_record() {
    let record = file_not_found("/etc/app.json");
    assert_eq!(record.kind(), ErrorKind::FileNotFound);
    assert!(record.message().contains("/etc/app.json"));
    assert_eq!(record.context_value("path"), Some(&json!("/etc/app.json")));
}

#[test]
fn test_missing_file_is_wrapped() {
    let err = load_port("/missing/app.json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingConfig);

    let chain = cause_chain(&err);
    assert_eq!(chain.depth(), 1);
    assert_eq!(
        chain.root().and_then(|c| c.as_record()).map(ErrorRecord::kind),
        Some(ErrorKind::FileNotFound)
    );
    assert_eq!(metric_labels(&err)["error_category"], "Config");
}

#[test]
fn test_parse_failure_carries_context() {
    let err = load_port("/etc/app.json").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidJson);
    assert_eq!(err.context_value("stage"), Some(&json!("parse")));
    assert!(err.message().contains("port must be a number"));
}

#[test]
fn test_records_travel_as_json() {
    let err = load_port("/missing/app.json").unwrap_err();
    let wire = serde_json::to_string(&err).unwrap();

    let received = ErrorRecord::from_json(&wire).unwrap();
    assert_eq!(received, err);
    assert_eq!(log_context(&received)["cause"]["kind"], "FileNotFound");
}
