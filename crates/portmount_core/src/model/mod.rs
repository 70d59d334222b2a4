//! Host-side data model for embedded components.
//!
//! # Responsibility
//! - Define the property values a host hands to an embedded component.
//! - Define the identifiers that key registry entries.
//!
//! # Invariants
//! - A property's kind is derived from its value, never stored separately.
//! - Listener equality is allocation identity, never structural.

pub mod ids;
pub mod props;

pub use ids::{InstanceId, NodeRef};
pub use props::{Listener, Payload, PropKind, PropValue, PropertySet};
