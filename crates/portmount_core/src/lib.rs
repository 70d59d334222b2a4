//! Core embedding engine for PortMount.
//! Mounts modules from an embedded runtime inside host components and keeps
//! their ports in sync with host properties.

pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod model;
pub mod runtime;

pub use config::{LoggingConfig, MountOptions};
pub use engine::lifecycle::{EmbeddedComponent, HostComponent, LifecycleState};
pub use engine::reconcile::{reconcile, PortOperation, ReconcileReport};
pub use engine::registry::{InstanceRegistry, RegistryEntry};
pub use engine::resolver::{descriptor_paths, resolve};
pub use error::{PortError, PortResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{InstanceId, Listener, NodeRef, Payload, PropKind, PropValue, PropertySet};
pub use runtime::{
    AttachmentElement, IncomingPort, Instance, ModuleDescriptor, MountTarget, NamespaceNode,
    OutgoingPort, Port, PortCapabilities,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
