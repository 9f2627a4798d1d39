//! Diagnostic errors for index validation.
//!
//! Regular store operations never fail: unknown ids and duplicate inserts
//! are silent no-ops by contract. These errors are produced only by
//! [`crate::TreeStore::validate`], which audits the derived indices.

use thiserror::Error;

/// Violations of the consistency invariants between the item sequence,
/// the id index, and the children adjacency.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("id appears more than once in the item sequence: {0}")]
    DuplicateId(String),

    #[error("item sequence and id index disagree: {0}")]
    IndexOutOfSync(String),

    #[error("item not registered exactly once under its parent key: {0}")]
    BrokenChildLink(String),

    #[error("live id has no children entry: {0}")]
    MissingChildrenEntry(String),

    #[error("cycle detected in parent chain starting at: {0}")]
    CycleDetected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
