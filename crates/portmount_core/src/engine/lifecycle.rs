//! Lifecycle adapter between the host framework and the engine.
//!
//! # Responsibility
//! - Validate the runtime handle and options once, when a module is wrapped.
//! - Drive resolution, registration and reconciliation on mount.
//! - Reconcile on update and tear down on unmount.
//!
//! # Invariants
//! - `HostComponent` moves `Unmounted -> Mounted -> TornDown` and never back.
//! - A failed mount leaves no registry entry behind.
//! - `update` and `unmount` never return an error to the host; ordering
//!   violations are logged as defects.

use crate::config::MountOptions;
use crate::engine::reconcile::{reconcile, ReconcileReport};
use crate::engine::registry::InstanceRegistry;
use crate::engine::resolver::resolve;
use crate::engine::validate::{validate_options, validate_runtime};
use crate::error::{PortError, PortResult};
use crate::model::{InstanceId, PropertySet};
use crate::runtime::{AttachmentElement, MountTarget, NamespaceNode};
use log::{debug, info, log, Level};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Host component lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unmounted,
    Mounted,
    TornDown,
}

/// A validated runtime handle plus options, ready to be hosted any number
/// of times.
#[derive(Debug, Clone)]
pub struct EmbeddedComponent {
    runtime: Arc<NamespaceNode>,
    options: MountOptions,
}

impl EmbeddedComponent {
    /// Wraps a runtime handle for hosting.
    ///
    /// # Errors
    /// - `InvalidInstance` when `runtime` is a bare module, not a namespace.
    /// - `InvalidOpts` when `options` are malformed.
    pub fn new(runtime: NamespaceNode, options: MountOptions) -> PortResult<Self> {
        validate_runtime(&runtime)?;
        validate_options(&options)?;
        Ok(Self {
            runtime: Arc::new(runtime),
            options,
        })
    }

    /// Same as [`EmbeddedComponent::new`] with options taken from JSON.
    pub fn with_json_options(runtime: NamespaceNode, options: &Value) -> PortResult<Self> {
        // Runtime shape is reported ahead of option errors.
        validate_runtime(&runtime)?;
        Self::new(runtime, MountOptions::from_json(options)?)
    }

    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    pub fn runtime(&self) -> &NamespaceNode {
        &self.runtime
    }

    /// Creates one host component with a fresh id, not yet mounted.
    pub fn host(&self) -> HostComponent {
        HostComponent {
            component: self.clone(),
            id: Uuid::new_v4(),
            element: AttachmentElement::new(),
            state: LifecycleState::Unmounted,
        }
    }
}

/// One host-side component embedding one runtime instance.
#[derive(Debug)]
pub struct HostComponent {
    component: EmbeddedComponent,
    id: InstanceId,
    element: AttachmentElement,
    state: LifecycleState,
}

impl HostComponent {
    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Rendered output; its node ref is stable across renders.
    pub fn render(&self) -> &AttachmentElement {
        &self.element
    }

    /// Resolves, initializes and registers the instance, then applies the
    /// initial properties.
    ///
    /// # Errors
    /// - `InvalidPath`, `PathRequired` or `InvalidInstance` from resolution.
    /// - `DuplicateInstance` when this component is not `Unmounted` or its
    ///   id is already registered.
    pub fn mount(
        &mut self,
        registry: &mut InstanceRegistry,
        props: &PropertySet,
    ) -> PortResult<ReconcileReport> {
        if self.state != LifecycleState::Unmounted || registry.contains(self.id) {
            return Err(self.log_failure(PortError::DuplicateInstance(self.id), "mount"));
        }

        let descriptor = resolve(&self.component.runtime, self.component.options.path.as_deref())
            .map_err(|err| self.log_failure(err, "mount"))?;

        let target = MountTarget::fresh(self.element.node_ref());
        let target_id = target.id();
        let instance = descriptor.initialize(target);
        let entry = registry
            .create(self.id, instance)
            .map_err(|err| self.log_failure(err, "mount"))?;
        let report = reconcile(entry, props);
        self.state = LifecycleState::Mounted;

        info!(
            "event=mount module=lifecycle status=ok id={} target={} operations={} missing={}",
            self.id,
            target_id,
            report.operations().len(),
            report.missing_ports().len()
        );
        Ok(report)
    }

    /// Re-applies the full property set.
    ///
    /// Returns `None` when there is no live instance to reconcile; the
    /// ordering defect is logged instead of returned.
    pub fn update(
        &mut self,
        registry: &mut InstanceRegistry,
        props: &PropertySet,
    ) -> Option<ReconcileReport> {
        if self.state != LifecycleState::Mounted {
            self.log_failure(PortError::MissingInstance(self.id), "update");
            return None;
        }

        match registry.get_mut(self.id) {
            Ok(entry) => Some(reconcile(entry, props)),
            Err(err) => {
                self.log_failure(err, "update");
                None
            }
        }
    }

    /// Tears the instance down. Only the first call after mount has any
    /// effect.
    ///
    /// Returns the number of listeners unsubscribed.
    pub fn unmount(&mut self, registry: &mut InstanceRegistry) -> usize {
        match self.state {
            LifecycleState::Mounted => {
                let unsubscribed = registry.teardown(self.id);
                self.state = LifecycleState::TornDown;
                info!(
                    "event=unmount module=lifecycle status=ok id={} unsubscribed={}",
                    self.id, unsubscribed
                );
                unsubscribed
            }
            LifecycleState::TornDown => {
                debug!(
                    "event=unmount module=lifecycle status=skip id={} reason=already_torn_down",
                    self.id
                );
                0
            }
            LifecycleState::Unmounted => {
                self.log_failure(PortError::MissingInstance(self.id), "unmount");
                0
            }
        }
    }

    /// Logs a failed lifecycle call. Ordering defects go out at `error`,
    /// input problems at `warn`.
    fn log_failure(&self, err: PortError, event: &str) -> PortError {
        let level = if err.is_defect() {
            Level::Error
        } else {
            Level::Warn
        };
        log!(
            level,
            "event={} module=lifecycle status=error id={} state={:?} error_code={} error={}",
            event,
            self.id,
            self.state,
            err.code(),
            err
        );
        err
    }
}
