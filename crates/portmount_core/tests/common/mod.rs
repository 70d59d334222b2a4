#![allow(dead_code)]

use portmount_core::{
    IncomingPort, Instance, Listener, ModuleDescriptor, MountTarget, NamespaceNode, OutgoingPort,
    Payload, Port,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// One channel call observed by the mock runtime.
#[derive(Debug, Clone)]
pub enum Call {
    Send { port: String, payload: Payload },
    Subscribe { port: String, listener: Listener },
    Unsubscribe { port: String, listener: Listener },
}

impl Call {
    pub fn port(&self) -> &str {
        match self {
            Call::Send { port, .. } | Call::Subscribe { port, .. } | Call::Unsubscribe { port, .. } => {
                port
            }
        }
    }

    pub fn listener(&self) -> Option<&Listener> {
        match self {
            Call::Subscribe { listener, .. } | Call::Unsubscribe { listener, .. } => Some(listener),
            Call::Send { .. } => None,
        }
    }
}

/// Shared log of every call made against instances of one module.
#[derive(Debug, Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    subscribers: Mutex<BTreeMap<String, Vec<Listener>>>,
    targets: Mutex<Vec<MountTarget>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn sends(&self, port: &str) -> Vec<Payload> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send { port: p, payload } if p == port => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn subscribes(&self, port: &str) -> Vec<Listener> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Subscribe { port: p, listener } if p == port => Some(listener),
                _ => None,
            })
            .collect()
    }

    pub fn unsubscribes(&self, port: &str) -> Vec<Listener> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Unsubscribe { port: p, listener } if p == port => Some(listener),
                _ => None,
            })
            .collect()
    }

    pub fn subscriber_count(&self, port: &str) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .get(port)
            .map_or(0, Vec::len)
    }

    /// Fires `payload` at every listener currently subscribed on `port`.
    pub fn emit(&self, port: &str, payload: &Payload) {
        let listeners = self
            .subscribers
            .lock()
            .unwrap()
            .get(port)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener.call(payload);
        }
    }

    /// Mount targets handed to `initialize`, in call order.
    pub fn targets(&self) -> Vec<MountTarget> {
        self.targets.lock().unwrap().clone()
    }

    pub fn initialize_count(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Which directions a mock port supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    Both,
}

struct MockPort {
    name: String,
    direction: Direction,
    recorder: Arc<Recorder>,
}

impl IncomingPort for MockPort {
    fn send(&self, payload: Payload) {
        self.recorder.push(Call::Send {
            port: self.name.clone(),
            payload,
        });
    }
}

impl OutgoingPort for MockPort {
    fn subscribe(&self, listener: Listener) {
        self.recorder
            .subscribers
            .lock()
            .unwrap()
            .entry(self.name.clone())
            .or_default()
            .push(listener.clone());
        self.recorder.push(Call::Subscribe {
            port: self.name.clone(),
            listener,
        });
    }

    fn unsubscribe(&self, listener: &Listener) {
        if let Some(active) = self.recorder.subscribers.lock().unwrap().get_mut(&self.name) {
            if let Some(index) = active.iter().position(|l| l.same(listener)) {
                active.remove(index);
            }
        }
        self.recorder.push(Call::Unsubscribe {
            port: self.name.clone(),
            listener: listener.clone(),
        });
    }
}

impl Port for MockPort {
    fn incoming(&self) -> Option<&dyn IncomingPort> {
        matches!(self.direction, Direction::In | Direction::Both)
            .then_some(self as &dyn IncomingPort)
    }

    fn outgoing(&self) -> Option<&dyn OutgoingPort> {
        matches!(self.direction, Direction::Out | Direction::Both)
            .then_some(self as &dyn OutgoingPort)
    }
}

struct MockInstance {
    ports: BTreeMap<String, MockPort>,
}

impl Instance for MockInstance {
    fn port(&self, name: &str) -> Option<&dyn Port> {
        self.ports.get(name).map(|port| port as &dyn Port)
    }

    fn port_names(&self) -> Vec<String> {
        self.ports.keys().cloned().collect()
    }
}

/// Module descriptor whose instances expose a fixed port table and record
/// every call into one shared [`Recorder`].
#[derive(Clone)]
pub struct MockModule {
    ports: Vec<(String, Direction)>,
    recorder: Arc<Recorder>,
}

impl MockModule {
    pub fn new(ports: &[(&str, Direction)]) -> Self {
        Self {
            ports: ports
                .iter()
                .map(|(name, direction)| (name.to_string(), *direction))
                .collect(),
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn recorder(&self) -> Arc<Recorder> {
        Arc::clone(&self.recorder)
    }
}

impl ModuleDescriptor for MockModule {
    fn initialize(&self, target: MountTarget) -> Box<dyn Instance> {
        self.recorder.targets.lock().unwrap().push(target);
        let ports = self
            .ports
            .iter()
            .map(|(name, direction)| {
                (
                    name.clone(),
                    MockPort {
                        name: name.clone(),
                        direction: *direction,
                        recorder: Arc::clone(&self.recorder),
                    },
                )
            })
            .collect();
        Box::new(MockInstance { ports })
    }
}

/// Port table used by most scenarios.
pub fn widget_ports() -> Vec<(&'static str, Direction)> {
    vec![
        ("name", Direction::Both),
        ("className", Direction::In),
        ("onUpdate", Direction::Out),
        ("classChange", Direction::Out),
    ]
}

/// `{ Main: module }`, plus the recorder for that module.
pub fn single_module_runtime() -> (NamespaceNode, Arc<Recorder>) {
    let module = MockModule::new(&widget_ports());
    let recorder = module.recorder();
    (NamespaceNode::inner([("Main", NamespaceNode::leaf(module))]), recorder)
}
