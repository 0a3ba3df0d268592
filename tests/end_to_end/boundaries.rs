//! Boundary scenarios: foreign failures are normalized exactly once

use faultline::{
    file_not_found, from_error, json, to_sentry_error, try_result_safe, try_result_safe_sync,
    try_result_safe_sync_value, try_result_safe_value, Cause, DomainError, ErrorKind, ErrorRecord,
    IntoDomainResult,
};

#[derive(Debug, thiserror::Error)]
#[error("bad")]
struct TypeError;

#[test]
fn test_failed_callback_becomes_unexpected() {
    let err = try_result_safe_sync(|| Err::<(), _>(TypeError)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(err.message(), "bad");
    assert_eq!(
        err.context_value("originalError"),
        Some(&json!({"name": "TypeError", "message": "bad"}))
    );
}

#[test]
fn test_panicking_callback_becomes_unexpected() {
    let err = try_result_safe_sync(|| -> Result<u8, ErrorRecord> {
        let items: Vec<u8> = Vec::new();
        Ok(items[3])
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.message().contains("index out of bounds"), "{}", err.message());
    assert!(err.has_stack());
}

#[test]
fn test_domain_errors_keep_their_kind() {
    let err = try_result_safe_sync(|| {
        Err::<(), _>(DomainError::Timeout {
            operation: "fetch".into(),
            duration_ms: 500,
        })
    })
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.context_value("durationMs"), Some(&json!(500)));
}

#[tokio::test]
async fn test_async_ok_not_double_wrapped() {
    let value = try_result_safe(async { Ok::<_, ErrorRecord>(5) }).await;
    assert_eq!(value.unwrap(), 5);
}

#[tokio::test]
async fn test_async_record_not_double_wrapped() {
    let record = file_not_found("/data/input.csv");
    let expected = record.clone();
    let err = try_result_safe(async move {
        tokio::task::yield_now().await;
        Err::<(), _>(record)
    })
    .await
    .unwrap_err();
    assert_eq!(err, expected);
    assert!(err.cause().is_none());
}

#[test]
fn test_anyhow_errors_are_converted() {
    let err = from_error(anyhow::anyhow!("socket closed").context("sync"));
    assert_eq!(err.message(), "sync: socket closed");
    assert!(err.cause().and_then(Cause::as_foreign).is_some());
}

#[test]
fn test_monitor_sees_context_as_properties() {
    let sentry = to_sentry_error(&file_not_found("/srv/blob"));
    assert_eq!(sentry.name(), "FileNotFound");
    assert_eq!(sentry.property("path"), Some(&json!("/srv/blob")));
}

fn fetch_manifest(url: &str) -> anyhow::Result<String> {
    anyhow::ensure!(url.starts_with("https://"), "refusing plain transport for {}", url);
    Ok(format!("manifest from {}", url))
}

#[test]
fn test_anyhow_callbacks_are_converted() {
    let ok = try_result_safe_sync(|| fetch_manifest("https://cdn/app")).unwrap();
    assert_eq!(ok, "manifest from https://cdn/app");

    let err = try_result_safe_sync(|| fetch_manifest("http://cdn/app")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(err.message(), "refusing plain transport for http://cdn/app");

    let err = fetch_manifest("ftp://cdn/app").into_domain().unwrap_err();
    assert!(err.cause().and_then(Cause::as_foreign).is_some());
}

#[tokio::test]
async fn test_infallible_callbacks_only_catch_panics() {
    assert_eq!(try_result_safe_sync_value(|| 3 + 4).unwrap(), 7);
    assert_eq!(try_result_safe_value(async { "warm" }).await.unwrap(), "warm");

    let err = try_result_safe_value(async {
        let cache: Vec<&str> = Vec::new();
        cache[0]
    })
    .await
    .unwrap_err();
    assert!(err.message().contains("index out of bounds"), "{}", err.message());
}
