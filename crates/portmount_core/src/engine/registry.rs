//! Live instance registry.
//!
//! # Responsibility
//! - Own every live instance, keyed by its host component id.
//! - Unsubscribe every active listener before an instance is discarded.
//!
//! # Invariants
//! - At most one entry per `InstanceId`.
//! - `teardown` on an absent id is a no-op and never fails.
//! - The registry is an explicit object; there is no process-global table.

use crate::error::{PortError, PortResult};
use crate::model::{InstanceId, Listener};
use crate::runtime::Instance;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Live state for one mounted host component.
pub struct RegistryEntry {
    pub(crate) instance: Box<dyn Instance>,
    pub(crate) active_listeners: BTreeMap<String, Listener>,
}

impl RegistryEntry {
    fn new(instance: Box<dyn Instance>) -> Self {
        Self {
            instance,
            active_listeners: BTreeMap::new(),
        }
    }

    pub fn instance(&self) -> &dyn Instance {
        self.instance.as_ref()
    }

    /// Listener currently subscribed on `port`, if any.
    pub fn active_listener(&self, port: &str) -> Option<&Listener> {
        self.active_listeners.get(port)
    }

    /// Names of ports with an active subscription, sorted.
    pub fn subscribed_ports(&self) -> impl Iterator<Item = &str> {
        self.active_listeners.keys().map(String::as_str)
    }

    pub fn listener_count(&self) -> usize {
        self.active_listeners.len()
    }
}

impl Debug for RegistryEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("ports", &self.instance.port_names())
            .field("active_listeners", &self.active_listeners)
            .finish()
    }
}

/// Registry of live instances.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    entries: BTreeMap<InstanceId, RegistryEntry>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly initialized instance with no listeners.
    ///
    /// # Errors
    /// - `DuplicateInstance` when `id` already has an entry.
    pub fn create(
        &mut self,
        id: InstanceId,
        instance: Box<dyn Instance>,
    ) -> PortResult<&mut RegistryEntry> {
        if self.entries.contains_key(&id) {
            return Err(PortError::DuplicateInstance(id));
        }
        debug!("event=registry_create module=registry status=ok id={id}");
        Ok(self.entries.entry(id).or_insert(RegistryEntry::new(instance)))
    }

    /// # Errors
    /// - `MissingInstance` when `id` has no entry.
    pub fn get(&self, id: InstanceId) -> PortResult<&RegistryEntry> {
        self.entries
            .get(&id)
            .ok_or(PortError::MissingInstance(id))
    }

    /// # Errors
    /// - `MissingInstance` when `id` has no entry.
    pub fn get_mut(&mut self, id: InstanceId) -> PortResult<&mut RegistryEntry> {
        self.entries
            .get_mut(&id)
            .ok_or(PortError::MissingInstance(id))
    }

    /// Unsubscribes every active listener, then discards the entry.
    ///
    /// Returns the number of `unsubscribe` calls made.
    pub fn teardown(&mut self, id: InstanceId) -> usize {
        let Some(entry) = self.entries.remove(&id) else {
            debug!("event=registry_teardown module=registry status=skip id={id} reason=absent");
            return 0;
        };

        let mut unsubscribed = 0;
        for (port, listener) in &entry.active_listeners {
            match entry.instance.port(port).and_then(|p| p.outgoing()) {
                Some(outgoing) => {
                    outgoing.unsubscribe(listener);
                    unsubscribed += 1;
                }
                None => warn!(
                    "event=registry_teardown module=registry status=warn id={id} port={port} reason=unsubscribe_unavailable"
                ),
            }
        }

        info!(
            "event=registry_teardown module=registry status=ok id={id} unsubscribed={unsubscribed}"
        );
        unsubscribed
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<InstanceId> {
        self.entries.keys().copied().collect()
    }
}
