//! Observability adapters for Faultline records
//!
//! Stateless functions that read the record shape (`kind`, `message`,
//! `context`, `cause`, `stack`, `timestamp`) and map it onto what logging,
//! tracing and metrics backends expect:
//! - [`cause_chain`]: depth-capped list of causes
//! - [`log_context`]: nested JSON fields for structured loggers
//! - [`span_attributes`]: flat `error.*` span attributes
//! - [`metric_labels`]: low-cardinality metric labels
//! - [`report`]: a single `tracing` error event

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod log;
pub mod metrics;
pub mod report;
pub mod span;

pub use chain::{cause_chain, CauseChain};
pub use log::{log_context, DEPTH_EXCEEDED_KEY};
pub use metrics::{metric_labels, CATEGORY_LABEL, HTTP_STATUS_LABEL, KIND_LABEL};
pub use report::report;
pub use span::{span_attributes, AttrValue};

#[cfg(test)]
pub(crate) mod test_support {
    use faultline_core::{ErrorBuilder, ErrorKind, ErrorRecord, StackCapturePolicy};
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;

    /// `depth` records, each caused by the previous; the outermost is
    /// `level {depth - 1}`
    pub fn chain_of(depth: usize) -> ErrorRecord {
        let policy = StackCapturePolicy::never();
        let mut current = ErrorBuilder::with_policy(ErrorKind::FileNotFound, policy.clone())
            .message("level 0")
            .build()
            .unwrap();
        for level in 1..depth {
            current = ErrorBuilder::with_policy(ErrorKind::Unexpected, policy.clone())
                .message(format!("level {}", level))
                .cause(current)
                .build()
                .unwrap();
        }
        current
    }

    /// In-memory writer for capturing subscriber output
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
