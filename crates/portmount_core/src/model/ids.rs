//! Identifiers for host components and their attachment points.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one host component mount/unmount cycle.
///
/// Kept as a type alias so registry signatures read by intent.
pub type InstanceId = Uuid;

/// Stable reference to the element a host component renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef(Uuid);

impl NodeRef {
    /// Allocates a new, never reused reference.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "node-{}", self.0)
    }
}
