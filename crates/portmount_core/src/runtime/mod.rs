//! Contracts implemented by the embedded runtime.
//!
//! The embedded runtime is an external collaborator. This module only
//! describes its boundary: a namespace of module descriptors, the instances
//! they create, and the ports those instances expose.

pub mod instance;
pub mod namespace;

pub use instance::{
    AttachmentElement, IncomingPort, Instance, MountTarget, OutgoingPort, Port, PortCapabilities,
};
pub use namespace::{ModuleDescriptor, NamespaceNode};
