//! Live instance and port contracts.
//!
//! # Responsibility
//! - Describe what an initialized embedded module exposes to the host.
//! - Make a missing port capability a detectable `None`, never an error.
//!
//! # Invariants
//! - A `MountTarget` is created fresh for every mount and never reused.
//! - `AttachmentElement::node_ref` is stable for the life of a host component.

use crate::model::{Listener, NodeRef, Payload};
use uuid::Uuid;

/// Host → embedded direction.
pub trait IncomingPort {
    fn send(&self, payload: Payload);
}

/// Embedded → host direction.
///
/// Subscribing the same listener twice registers it twice; callers must
/// track what they already subscribed.
pub trait OutgoingPort {
    fn subscribe(&self, listener: Listener);
    fn unsubscribe(&self, listener: &Listener);
}

/// One named channel on an instance.
pub trait Port {
    fn incoming(&self) -> Option<&dyn IncomingPort> {
        None
    }

    fn outgoing(&self) -> Option<&dyn OutgoingPort> {
        None
    }

    fn capabilities(&self) -> PortCapabilities {
        PortCapabilities {
            send: self.incoming().is_some(),
            subscribe: self.outgoing().is_some(),
        }
    }
}

/// Capability summary for one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortCapabilities {
    pub send: bool,
    pub subscribe: bool,
}

/// Live handle returned by `ModuleDescriptor::initialize`.
pub trait Instance {
    fn port(&self, name: &str) -> Option<&dyn Port>;

    fn port_names(&self) -> Vec<String>;
}

/// Opaque attachment point handed to `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTarget {
    id: Uuid,
    parent: NodeRef,
}

impl MountTarget {
    /// Creates a new attachment point under `parent`.
    pub fn fresh(parent: NodeRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn parent(&self) -> NodeRef {
        self.parent
    }
}

/// Rendered output of a host component: one element with a stable ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentElement {
    node_ref: NodeRef,
}

impl AttachmentElement {
    pub fn new() -> Self {
        Self {
            node_ref: NodeRef::fresh(),
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        self.node_ref
    }
}

impl Default for AttachmentElement {
    fn default() -> Self {
        Self::new()
    }
}
