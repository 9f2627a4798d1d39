//! Item record type stored by the container.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single tree node record: a unique id, an optional parent reference,
/// and a payload the container never inspects.
///
/// `parent == None` is the root sentinel. The serialized form keeps the
/// flat record shape `{ "id": .., "parent": .., ..payload fields }`: the
/// payload is flattened into the top level, and a missing `parent` field
/// deserializes as the root sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeItem<I, P> {
    /// Unique identifier within one store instance
    pub id: I,
    /// Id of the parent item, None for root items
    #[serde(default)]
    pub parent: Option<I>,
    /// Opaque payload, passed through unchanged
    #[serde(flatten)]
    pub data: P,
}

impl<I, P> TreeItem<I, P> {
    pub fn new(id: I, parent: Option<I>, data: P) -> Self {
        Self { id, parent, data }
    }

    /// true if this item's parent is the root sentinel
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl<I: fmt::Display, P> fmt::Display for TreeItem<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
