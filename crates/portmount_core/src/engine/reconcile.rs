//! Port reconciliation engine.
//!
//! # Responsibility
//! - Bring an instance's open channels in line with the current host
//!   properties using the fewest send/subscribe/unsubscribe calls.
//!
//! # Invariants
//! - An unchanged listener (same allocation) is never resubscribed.
//! - A replaced listener is unsubscribed before its successor subscribes.
//! - Every property present in the set is applied before the clean pass
//!   unsubscribes listeners whose property disappeared.
//! - A missing port is reported and never aborts the pass.

use crate::engine::registry::RegistryEntry;
use crate::error::PortError;
use crate::model::{Listener, Payload, PropValue, PropertySet};
use crate::runtime::Instance;
use log::{debug, warn};
use std::collections::BTreeMap;

/// One channel call made during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortOperation {
    Send { port: String },
    Subscribe { port: String },
    Unsubscribe { port: String },
}

impl PortOperation {
    pub fn port(&self) -> &str {
        match self {
            Self::Send { port } | Self::Subscribe { port } | Self::Unsubscribe { port } => port,
        }
    }
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    operations: Vec<PortOperation>,
    missing_ports: Vec<String>,
}

impl ReconcileReport {
    /// Channel calls in the order they were made.
    pub fn operations(&self) -> &[PortOperation] {
        &self.operations
    }

    /// Properties whose port was absent or lacked the needed capability.
    pub fn missing_ports(&self) -> &[String] {
        &self.missing_ports
    }

    pub fn errors(&self) -> Vec<PortError> {
        self.missing_ports
            .iter()
            .map(|name| PortError::MissingPort(name.clone()))
            .collect()
    }

    /// True when every property found a usable port.
    pub fn is_complete(&self) -> bool {
        self.missing_ports.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.operations.is_empty() && self.missing_ports.is_empty()
    }
}

/// Runs one reconciliation pass against `entry`.
pub fn reconcile(entry: &mut RegistryEntry, props: &PropertySet) -> ReconcileReport {
    let mut pass = Pass {
        instance: entry.instance.as_ref(),
        listeners: &mut entry.active_listeners,
        report: ReconcileReport::default(),
    };

    for (name, value) in props.iter() {
        match value {
            PropValue::Data(payload) => pass.apply_data(name, payload),
            PropValue::Listener(listener) => pass.apply_listener(name, listener),
        }
    }
    pass.clean(props);

    debug!(
        "event=reconcile module=reconcile status=ok props={} operations={} missing={}",
        props.len(),
        pass.report.operations.len(),
        pass.report.missing_ports.len()
    );
    pass.report
}

struct Pass<'a> {
    instance: &'a dyn Instance,
    listeners: &'a mut BTreeMap<String, Listener>,
    report: ReconcileReport,
}

impl Pass<'_> {
    fn apply_data(&mut self, name: &str, payload: &Payload) {
        // A property that used to be a listener releases its subscription
        // before anything is sent.
        if let Some(prior) = self.listeners.remove(name) {
            self.unsubscribe(name, &prior);
        }

        let instance = self.instance;
        match instance.port(name).and_then(|port| port.incoming()) {
            Some(incoming) => {
                incoming.send(payload.clone());
                self.record(PortOperation::Send {
                    port: name.to_string(),
                });
            }
            None => self.missing(name, "incoming"),
        }
    }

    fn apply_listener(&mut self, name: &str, listener: &Listener) {
        if self
            .listeners
            .get(name)
            .is_some_and(|prior| prior.same(listener))
        {
            return;
        }

        if let Some(prior) = self.listeners.remove(name) {
            self.unsubscribe(name, &prior);
        }

        let instance = self.instance;
        match instance.port(name).and_then(|port| port.outgoing()) {
            Some(outgoing) => {
                outgoing.subscribe(listener.clone());
                self.listeners.insert(name.to_string(), listener.clone());
                self.record(PortOperation::Subscribe {
                    port: name.to_string(),
                });
            }
            None => self.missing(name, "outgoing"),
        }
    }

    fn clean(&mut self, props: &PropertySet) {
        let stale: Vec<String> = self
            .listeners
            .keys()
            .filter(|name| !props.contains(name))
            .cloned()
            .collect();

        for name in stale {
            if let Some(prior) = self.listeners.remove(&name) {
                self.unsubscribe(&name, &prior);
            }
        }
    }

    fn unsubscribe(&mut self, name: &str, listener: &Listener) {
        let instance = self.instance;
        match instance.port(name).and_then(|port| port.outgoing()) {
            Some(outgoing) => {
                outgoing.unsubscribe(listener);
                self.record(PortOperation::Unsubscribe {
                    port: name.to_string(),
                });
            }
            None => warn!(
                "event=unsubscribe module=reconcile status=warn port={name} reason=capability_lost"
            ),
        }
    }

    fn missing(&mut self, name: &str, direction: &str) {
        match self.instance.port(name).map(|port| port.capabilities()) {
            Some(found) => warn!(
                "event=port_missing module=reconcile status=warn port={name} direction={direction} present=true send={} subscribe={}",
                found.send, found.subscribe
            ),
            None => warn!(
                "event=port_missing module=reconcile status=warn port={name} direction={direction} present=false"
            ),
        }
        self.report.missing_ports.push(name.to_string());
    }

    fn record(&mut self, operation: PortOperation) {
        self.report.operations.push(operation);
    }
}
