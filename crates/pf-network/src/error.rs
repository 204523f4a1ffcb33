//! Network-level error types.
//!
//! These cover structural problems only (bad ids, dangling references).
//! Hydraulic failures never surface here: the propagation engine degrades
//! them to warnings per the partial-failure policy.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Duplicate node id '{id}'")]
    DuplicateNode { id: String },

    #[error("Duplicate segment id '{id}'")]
    DuplicateSegment { id: String },

    #[error("Segment '{segment}' references unknown node '{node}'")]
    UnknownNode { segment: String, node: String },

    #[error("Start node '{id}' not found in network")]
    UnknownStartNode { id: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
