//! Embedding engine: validation, resolution, registry, reconciliation and
//! the lifecycle adapter that ties them to host mount/update/unmount events.
//!
//! # Invariants
//! - Validation runs before any instance is created.
//! - Only the reconciliation engine mutates a registry entry's listeners.
//! - Mount, update and unmount for one host component are strictly sequential.

pub mod lifecycle;
pub mod reconcile;
pub mod registry;
pub mod resolver;
pub mod validate;
