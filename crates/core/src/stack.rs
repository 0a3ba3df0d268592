//! Stack capture policy
//!
//! Decides whether a record gets a `stack` when it is built. The decision has
//! three layers, highest precedence first:
//!
//! 1. a per-builder override (`ErrorBuilder::capture_stack` / `skip_stack`)
//! 2. the policy override ([`StackOverride::ForceOn`] / [`StackOverride::ForceOff`])
//! 3. the environment default: capture in `development` and `test`, not otherwise
//!
//! A policy is a plain value that can be threaded into
//! [`ErrorBuilder::with_policy`](crate::ErrorBuilder::with_policy). For call
//! sites that don't carry one there is a process-wide fallback, initialized
//! from [`ENV_VAR`] on first use. Configure it once at startup; it is not meant
//! to be toggled while errors are being built on other threads.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use tracing::debug;

use crate::record::ForeignCause;

/// Environment variable selecting the default capture behaviour
pub const ENV_VAR: &str = "FAULTLINE_ENV";

/// Symbols of the capture routine, stripped from the top of every stack
const CAPTURE_FRAMES: [&str; 3] = [
    "faultline_core::stack::force_capture",
    "faultline_core::stack::capture_current_stack",
    "faultline_core::stack::StackCapturePolicy::capture_current_stack",
];

/// Explicit override of the environment default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOverride {
    /// Defer to the environment
    #[default]
    Unset,
    /// Always capture
    ForceOn,
    /// Never capture
    ForceOff,
}

impl From<bool> for StackOverride {
    fn from(capture: bool) -> Self {
        if capture {
            StackOverride::ForceOn
        } else {
            StackOverride::ForceOff
        }
    }
}

impl From<Option<bool>> for StackOverride {
    fn from(capture: Option<bool>) -> Self {
        capture.map_or(StackOverride::Unset, StackOverride::from)
    }
}

/// Deployment environment, as read from [`ENV_VAR`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
    /// `development`
    Development,
    /// `test`
    Test,
    /// `production`
    Production,
    /// Any other value, including unset (empty)
    Other(String),
}

impl Environment {
    /// Parse an environment name (case-insensitive, surrounding whitespace ignored)
    pub fn parse(name: &str) -> Self {
        let trimmed = name.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "development" => Environment::Development,
            "test" => Environment::Test,
            "production" => Environment::Production,
            _ => Environment::Other(trimmed.to_string()),
        }
    }

    /// Read [`ENV_VAR`]; unset or non-unicode values yield `Other("")`
    pub fn from_env() -> Self {
        std::env::var(ENV_VAR)
            .map(|value| Environment::parse(&value))
            .unwrap_or_else(|_| Environment::Other(String::new()))
    }

    /// Whether stacks are captured when no override is set
    pub fn captures_by_default(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }

    /// Canonical name
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
            Environment::Other(name) => name,
        }
    }
}

impl From<String> for Environment {
    fn from(name: String) -> Self {
        Environment::parse(&name)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

/// Whether to materialize a stack trace for new records
///
/// Deserializable so applications can embed it in their own configuration:
///
/// ```
/// use faultline_core::{StackCapturePolicy, StackOverride};
///
/// let policy: StackCapturePolicy =
///     serde_json::from_str(r#"{"environment": "production", "override": "force_on"}"#).unwrap();
/// assert_eq!(policy.stack_override(), StackOverride::ForceOn);
/// assert!(policy.effective_capture());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackCapturePolicy {
    #[serde(default, rename = "override")]
    stack_override: StackOverride,
    #[serde(default = "Environment::from_env")]
    environment: Environment,
}

impl StackCapturePolicy {
    /// Policy for an explicit environment, no override
    pub fn new(environment: Environment) -> Self {
        Self {
            stack_override: StackOverride::Unset,
            environment,
        }
    }

    /// Policy for the environment named by [`ENV_VAR`]
    pub fn from_env() -> Self {
        Self::new(Environment::from_env())
    }

    /// Policy that always captures
    pub fn always() -> Self {
        Self::new(Environment::Other(String::new())).with_override(StackOverride::ForceOn)
    }

    /// Policy that never captures
    pub fn never() -> Self {
        Self::new(Environment::Other(String::new())).with_override(StackOverride::ForceOff)
    }

    /// Builder-style override
    pub fn with_override(mut self, value: impl Into<StackOverride>) -> Self {
        self.stack_override = value.into();
        self
    }

    /// Set the override; [`StackOverride::Unset`] resets to the environment default
    pub fn set_override(&mut self, value: impl Into<StackOverride>) {
        self.stack_override = value.into();
    }

    /// Current override
    pub fn stack_override(&self) -> StackOverride {
        self.stack_override
    }

    /// Environment the default is derived from
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The override if set, else the environment default
    pub fn effective_capture(&self) -> bool {
        match self.stack_override {
            StackOverride::ForceOn => true,
            StackOverride::ForceOff => false,
            StackOverride::Unset => self.environment.captures_by_default(),
        }
    }

    /// Capture the caller's stack, or return an empty string when disabled
    pub fn capture_current_stack(&self) -> String {
        if !self.effective_capture() {
            return String::new();
        }
        force_capture()
    }

    /// Stack text already embedded in a foreign error, or empty when disabled
    /// or when the foreign error carries none
    pub fn capture_from_foreign_error(&self, foreign: &ForeignCause) -> String {
        if !self.effective_capture() {
            return String::new();
        }
        foreign.stack().unwrap_or_default().to_string()
    }
}

impl Default for StackCapturePolicy {
    /// Same as [`StackCapturePolicy::from_env`]
    fn default() -> Self {
        Self::from_env()
    }
}

// =============================================================================
// Process-wide fallback policy
// =============================================================================

static GLOBAL_POLICY: Lazy<RwLock<StackCapturePolicy>> =
    Lazy::new(|| RwLock::new(StackCapturePolicy::from_env()));

/// Snapshot of the process-wide policy
pub fn global_policy() -> StackCapturePolicy {
    GLOBAL_POLICY.read().clone()
}

/// Set the process-wide override; pass [`StackOverride::Unset`] to reset
pub fn set_global_override(value: impl Into<StackOverride>) {
    let value = value.into();
    let mut policy = GLOBAL_POLICY.write();
    let previous = policy.stack_override;
    policy.stack_override = value;
    debug!(
        target: "faultline::stack",
        previous = ?previous,
        current = ?value,
        environment = policy.environment.as_str(),
        "Stack capture override changed"
    );
}

/// Effective decision of the process-wide policy
pub fn effective_capture() -> bool {
    GLOBAL_POLICY.read().effective_capture()
}

/// [`StackCapturePolicy::capture_current_stack`] against the process-wide policy
pub fn capture_current_stack() -> String {
    if !effective_capture() {
        return String::new();
    }
    force_capture()
}

// =============================================================================
// Backtrace rendering
// =============================================================================

/// Capture unconditionally, dropping the frames of the capture machinery
pub(crate) fn force_capture() -> String {
    let backtrace = Backtrace::force_capture();
    let rendered = backtrace.to_string();
    let frames = parse_frames(&rendered);
    if frames.is_empty() {
        // unsupported platform or no symbols: keep whatever std produced
        return rendered.trim().to_string();
    }
    strip_capture_frames(frames).join("\n")
}

/// Split std's backtrace rendering into one `at symbol (location)` line per frame
fn parse_frames(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim();
        if let Some(location) = trimmed.strip_prefix("at ") {
            if let Some(last) = frames.last_mut() {
                last.push_str(&format!(" ({})", location));
            }
            continue;
        }
        if let Some((index, symbol)) = trimmed.split_once(": ") {
            if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                frames.push(format!("    at {}", symbol));
            }
        }
    }
    frames
}

fn strip_capture_frames(frames: Vec<String>) -> Vec<String> {
    let last_internal = frames
        .iter()
        .rposition(|frame| CAPTURE_FRAMES.iter().any(|marker| frame.contains(marker)))
        .or_else(|| {
            frames
                .iter()
                .position(|frame| !frame.contains("std::backtrace"))
                .and_then(|first_user| first_user.checked_sub(1))
        });
    let frames = match last_internal {
        Some(index) if index + 1 < frames.len() => frames.into_iter().skip(index + 1).collect(),
        _ => frames,
    };
    skip_leading(frames, is_library_frame)
}

/// Render a backtrace captured by another library (e.g. `anyhow`) in the
/// same `at symbol (location)` format, starting at the first caller frame
pub(crate) fn normalize_foreign_backtrace(rendered: &str) -> String {
    let frames = parse_frames(rendered);
    if frames.is_empty() {
        return rendered.trim().to_string();
    }
    skip_leading(frames, |frame| {
        frame.contains("std::backtrace") || frame.contains("anyhow::")
    })
    .join("\n")
}

/// Frames of this crate's builder, factories and conversions
fn is_library_frame(frame: &str) -> bool {
    let symbol = frame
        .trim_start()
        .trim_start_matches("at ")
        .trim_start_matches('<');
    symbol.starts_with("faultline_core::") && !symbol.contains("::tests::")
}

/// Drop the leading run of frames matching `internal`; keeps everything if
/// nothing else is left
fn skip_leading(frames: Vec<String>, internal: impl Fn(&str) -> bool) -> Vec<String> {
    match frames.iter().position(|frame| !internal(frame)) {
        Some(first) => frames.into_iter().skip(first).collect(),
        None => frames,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn production() -> StackCapturePolicy {
        StackCapturePolicy::new(Environment::Production)
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("TEST"), Environment::Test);
        assert_eq!(Environment::parse(" production "), Environment::Production);
        assert_eq!(
            Environment::parse("staging"),
            Environment::Other("staging".to_string())
        );
    }

    #[test]
    fn test_environment_defaults() {
        assert!(Environment::Development.captures_by_default());
        assert!(Environment::Test.captures_by_default());
        assert!(!Environment::Production.captures_by_default());
        assert!(!Environment::Other("staging".into()).captures_by_default());
        assert!(!Environment::Other(String::new()).captures_by_default());
    }

    #[test]
    fn test_override_precedence() {
        let mut policy = production();
        assert!(!policy.effective_capture());

        policy.set_override(true);
        assert!(policy.effective_capture());

        let mut dev = StackCapturePolicy::new(Environment::Development);
        assert!(dev.effective_capture());
        dev.set_override(StackOverride::ForceOff);
        assert!(!dev.effective_capture());

        dev.set_override(StackOverride::Unset);
        assert!(dev.effective_capture(), "unset restores the environment default");
    }

    #[test]
    fn test_override_from_option() {
        assert_eq!(StackOverride::from(None), StackOverride::Unset);
        assert_eq!(StackOverride::from(Some(true)), StackOverride::ForceOn);
        assert_eq!(StackOverride::from(Some(false)), StackOverride::ForceOff);
    }

    #[test]
    fn test_disabled_capture_is_empty() {
        assert_eq!(production().capture_current_stack(), "");
        assert_eq!(StackCapturePolicy::never().capture_current_stack(), "");
    }

    #[test]
    fn test_enabled_capture_is_not_empty() {
        let stack = StackCapturePolicy::always().capture_current_stack();
        assert!(!stack.is_empty());
        assert!(
            !stack.contains("faultline_core::stack::StackCapturePolicy::capture_current_stack"),
            "capture routine frames are stripped:\n{}",
            stack
        );
    }

    #[test]
    fn test_capture_from_foreign_error_gating() {
        let foreign = ForeignCause::new("TypeError", "bad").with_stack("at origin (a.rs:1)");
        assert_eq!(
            StackCapturePolicy::always().capture_from_foreign_error(&foreign),
            "at origin (a.rs:1)"
        );
        assert_eq!(production().capture_from_foreign_error(&foreign), "");

        let bare = ForeignCause::new("TypeError", "bad");
        assert_eq!(StackCapturePolicy::always().capture_from_foreign_error(&bare), "");
    }

    #[test]
    fn test_parse_frames() {
        let rendered = "   0: std::backtrace::Backtrace::create\n             at /rustc/x/backtrace.rs:331:13\n   1: faultline_core::stack::force_capture\n             at ./src/stack.rs:10:5\n   2: my_app::load\n             at ./src/main.rs:7:9\n   3: main\n";
        let frames = parse_frames(rendered);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[2], "    at my_app::load (./src/main.rs:7:9)");
        assert_eq!(frames[3], "    at main");

        let stripped = strip_capture_frames(frames);
        assert_eq!(
            stripped,
            vec![
                "    at my_app::load (./src/main.rs:7:9)".to_string(),
                "    at main".to_string()
            ]
        );
    }

    #[test]
    fn test_strip_without_marker_drops_backtrace_frames() {
        let frames = vec![
            "    at std::backtrace_rs::trace".to_string(),
            "    at std::backtrace::Backtrace::create".to_string(),
            "    at user::code".to_string(),
        ];
        assert_eq!(strip_capture_frames(frames), vec!["    at user::code".to_string()]);
    }

    #[test]
    fn test_strip_drops_library_frames_above_caller() {
        let frames = vec![
            "    at faultline_core::stack::force_capture (./src/stack.rs:270:21)".to_string(),
            "    at faultline_core::builder::ErrorBuilder::assemble (./src/builder.rs:150:18)"
                .to_string(),
            "    at <faultline_core::domain::DomainError as core::convert::Into<faultline_core::record::ErrorRecord>>::into"
                .to_string(),
            "    at faultline_core::factories::file_not_found (./src/factories.rs:31:5)".to_string(),
            "    at my_app::load (./src/main.rs:7:9)".to_string(),
            "    at faultline_core::safe::try_result_safe_sync (./src/safe.rs:60:5)".to_string(),
            "    at main".to_string(),
        ];
        assert_eq!(
            strip_capture_frames(frames),
            vec![
                "    at my_app::load (./src/main.rs:7:9)".to_string(),
                "    at faultline_core::safe::try_result_safe_sync (./src/safe.rs:60:5)".to_string(),
                "    at main".to_string(),
            ]
        );
    }

    #[test]
    fn test_strip_keeps_in_crate_test_frames() {
        let frames = vec![
            "    at faultline_core::stack::force_capture".to_string(),
            "    at faultline_core::builder::ErrorBuilder::build".to_string(),
            "    at faultline_core::record::tests::test_wrap".to_string(),
        ];
        assert_eq!(
            strip_capture_frames(frames),
            vec!["    at faultline_core::record::tests::test_wrap".to_string()]
        );
    }

    #[test]
    fn test_strip_keeps_frames_when_all_internal() {
        let frames = vec![
            "    at faultline_core::factories::timeout".to_string(),
            "    at faultline_core::builder::ErrorBuilder::build".to_string(),
        ];
        assert_eq!(strip_capture_frames(frames.clone()), frames);
    }

    #[test]
    fn test_captured_stack_starts_outside_builder() {
        let record =
            crate::ErrorBuilder::with_policy(crate::ErrorKind::Timeout, StackCapturePolicy::always())
                .message("slow")
                .build()
                .unwrap();
        let first = record.stack().unwrap().lines().next().unwrap();
        assert!(!first.contains("faultline_core::builder::"), "{}", first);
        assert!(!first.contains("force_capture"), "{}", first);
    }

    #[test]
    fn test_normalize_foreign_backtrace() {
        let rendered = "   0: std::backtrace_rs::backtrace::trace\n             at /rustc/x/mod.rs:66:5\n   1: std::backtrace::Backtrace::create\n             at /rustc/x/backtrace.rs:331:13\n   2: anyhow::error::<impl anyhow::Error>::msg\n             at /cargo/anyhow/src/error.rs:83:36\n   3: anyhow::__private::format_err\n             at /cargo/anyhow/src/lib.rs:689:13\n   4: sync::run\n             at ./src/sync.rs:12:9\n   5: main\n";
        assert_eq!(
            normalize_foreign_backtrace(rendered),
            "    at sync::run (./src/sync.rs:12:9)\n    at main"
        );
    }

    #[test]
    fn test_normalize_foreign_backtrace_unparsed_text_kept() {
        assert_eq!(
            normalize_foreign_backtrace("  disabled backtrace \n"),
            "disabled backtrace"
        );
    }

    #[test]
    fn test_policy_deserialize_defaults() {
        let policy: StackCapturePolicy =
            serde_json::from_str(r#"{"environment": "development"}"#).unwrap();
        assert_eq!(policy.stack_override(), StackOverride::Unset);
        assert_eq!(policy.environment(), &Environment::Development);

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["override"], "unset");
        assert_eq!(json["environment"], "development");
    }
}
