//! Property tests for the record model
//!
//! ```bash
//! cargo test -p faultline-core --test record_properties
//! ```

use proptest::prelude::*;
use serde_json::{json, Value};

use faultline_core::{
    ErrorBuilder, ErrorCategory, ErrorKind, ErrorRecord, ForeignCause, StackCapturePolicy,
    MAX_CAUSE_DEPTH,
};

// ============================================================================
// Strategies
// ============================================================================

fn any_kind() -> impl Strategy<Value = ErrorKind> {
    (0..ErrorKind::ALL.len()).prop_map(|i| ErrorKind::ALL[i])
}

fn message() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 /:._-]{0,40}".prop_map(|s| format!("m{}", s))
}

fn context_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,12}".prop_map(Value::from),
    ]
}

fn context_entries() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::vec(("[a-z]{1,6}", context_value()), 0..8)
}

fn build(kind: ErrorKind, message: &str, entries: &[(String, Value)]) -> ErrorRecord {
    ErrorBuilder::with_policy(kind, StackCapturePolicy::never())
        .message(message)
        .context(entries.iter().cloned())
        .build()
        .unwrap()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn kind_name_roundtrips(kind in any_kind()) {
        prop_assert_eq!(kind.as_str().parse::<ErrorKind>().unwrap(), kind);
        prop_assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        prop_assert!(ErrorCategory::ALL.contains(&kind.category()));
    }

    #[test]
    fn builder_keeps_kind_and_message(kind in any_kind(), msg in message()) {
        let record = build(kind, &msg, &[]);
        prop_assert_eq!(record.kind(), kind);
        prop_assert_eq!(record.message(), msg.as_str());
        prop_assert!(record.context().is_none());
        prop_assert!(record.timestamp().is_some());
    }

    #[test]
    fn context_later_entries_win(entries in context_entries()) {
        let record = build(ErrorKind::InvalidConfig, "bad", &entries);
        let mut expected = serde_json::Map::new();
        for (key, value) in &entries {
            expected.insert(key.clone(), value.clone());
        }
        match record.context() {
            Some(context) => prop_assert_eq!(context, &expected),
            None => prop_assert!(expected.is_empty()),
        }
    }

    #[test]
    fn json_roundtrip_is_lossless(
        kind in any_kind(),
        msg in message(),
        entries in context_entries(),
        foreign in proptest::option::of(("[A-Z][a-z]{0,8}", message())),
    ) {
        let mut builder = ErrorBuilder::with_policy(kind, StackCapturePolicy::never())
            .message(msg)
            .context(entries);
        if let Some((name, text)) = foreign {
            builder = builder.cause(ForeignCause::new(name, text));
        }
        let record = builder.build().unwrap();

        let text = serde_json::to_string(&record).unwrap();
        let restored = ErrorRecord::from_json(&text).unwrap();
        prop_assert_eq!(restored, record);
    }

    #[test]
    fn cause_traversal_never_exceeds_cap(depth in 1usize..25) {
        let mut current = build(ErrorKind::FileNotFound, "root", &[]);
        for level in 1..depth {
            current = current.wrap(ErrorKind::Unexpected, format!("level {}", level));
        }
        let mut causes = current.causes();
        let walked = causes.by_ref().count();
        prop_assert_eq!(walked, (depth - 1).min(MAX_CAUSE_DEPTH));
        prop_assert_eq!(causes.is_truncated(), depth - 1 > MAX_CAUSE_DEPTH);
    }

    #[test]
    fn transported_chain_keeps_capped_traversal(depth in 1usize..60) {
        let quiet = StackCapturePolicy::never();
        let mut current = build(ErrorKind::FileNotFound, "root", &[]);
        for level in 1..depth {
            current = current.wrap_with(ErrorKind::Unexpected, format!("level {}", level), &quiet);
        }
        let restored = ErrorRecord::from_json(&current.to_json().to_string()).unwrap();

        let mut causes = restored.causes();
        prop_assert_eq!(causes.by_ref().count(), (depth - 1).min(MAX_CAUSE_DEPTH));
        prop_assert_eq!(causes.is_truncated(), depth - 1 > MAX_CAUSE_DEPTH);
        if depth - 1 <= MAX_CAUSE_DEPTH {
            prop_assert_eq!(restored, current);
        }
    }

    #[test]
    fn blank_messages_never_build(kind in any_kind(), blank in "[ \t\n]{0,5}") {
        let result = ErrorBuilder::new(kind).message(blank).build();
        prop_assert!(result.is_err());
    }
}
