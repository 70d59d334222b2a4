//! Fail-fast input validation.
//!
//! Every check here is stateless and returns the first classified error.

use crate::config::{json_type_name, MountOptions};
use crate::error::{PortError, PortResult};
use crate::runtime::NamespaceNode;
use serde_json::{Map, Value};

/// Checks that the runtime handle is a namespace, not a bare module.
pub fn validate_runtime(root: &NamespaceNode) -> PortResult<()> {
    match root {
        NamespaceNode::Inner(_) => Ok(()),
        NamespaceNode::Leaf(_) => Err(PortError::InvalidInstance),
    }
}

pub fn validate_options(options: &MountOptions) -> PortResult<()> {
    options.validate()
}

/// Unwraps a JSON object, rejecting every other shape with `InvalidProps`.
pub fn ensure_plain_mapping(value: Value) -> PortResult<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(PortError::InvalidProps(format!(
            "expected an object, got {}",
            json_type_name(&other)
        ))),
    }
}
