//! Cause chain flattening

use faultline_core::{Cause, ErrorRecord, MAX_CAUSE_DEPTH};

/// The cause links of a record, outermost first
#[derive(Debug, Clone, PartialEq)]
pub struct CauseChain<'a> {
    /// Links in traversal order, at most [`MAX_CAUSE_DEPTH`]
    pub links: Vec<&'a Cause>,
    /// The chain continued past the cap
    pub truncated: bool,
}

impl<'a> CauseChain<'a> {
    /// Number of links collected
    pub fn depth(&self) -> usize {
        self.links.len()
    }

    /// Last collected link
    pub fn root(&self) -> Option<&'a Cause> {
        self.links.last().copied()
    }

    /// Messages of every collected link
    pub fn messages(&self) -> Vec<&'a str> {
        self.links.iter().map(|cause| cause.message()).collect()
    }
}

/// Walk the cause chain of `record`, stopping at [`MAX_CAUSE_DEPTH`] links
pub fn cause_chain(record: &ErrorRecord) -> CauseChain<'_> {
    let mut causes = record.causes();
    let links: Vec<&Cause> = causes.by_ref().collect();
    CauseChain {
        links,
        truncated: causes.is_truncated(),
    }
}
