//! Report records through `tracing`

use tracing::{event, Level};

use faultline_core::ErrorRecord;

use crate::chain::cause_chain;
use crate::log::log_context;

/// Emit one `error` event (target `faultline::report`) describing `record`
///
/// The full log context, cause chain included, is attached as JSON in the
/// `error.details` field.
pub fn report(record: &ErrorRecord) {
    let chain = cause_chain(record);
    event!(
        target: "faultline::report",
        Level::ERROR,
        error.kind = record.kind().as_str(),
        error.category = record.category().as_str(),
        error.cause_depth = chain.depth(),
        error.cause_truncated = chain.truncated,
        error.has_stack = record.has_stack(),
        error.details = %log_context(record),
        "{}",
        record.message()
    );
}
