//! Host property values and property sets.
//!
//! # Responsibility
//! - Represent the key/value set a host supplies on every render.
//! - Distinguish listener properties (callables) from data properties.
//!
//! # Invariants
//! - Payloads are passed through opaquely; nothing here inspects them.
//! - Two listeners are the same only if they share one allocation.

use crate::engine::validate::ensure_plain_mapping;
use crate::error::PortResult;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Opaque value carried across a channel.
pub type Payload = Value;

type Callback = dyn Fn(&Payload) + Send + Sync;

/// Reference-counted host callback subscribed to an outgoing port.
///
/// Cloning shares the same callback, so clones compare equal under
/// [`Listener::same`]. Wrapping the same closure twice yields two distinct
/// listeners.
#[derive(Clone)]
pub struct Listener {
    callback: Arc<Callback>,
}

impl Listener {
    pub fn new(callback: impl Fn(&Payload) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invokes the callback. Collaborators may call this at any time,
    /// including between reconciliation passes.
    pub fn call(&self, payload: &Payload) {
        (self.callback)(payload)
    }

    /// Identity comparison by allocation address.
    pub fn same(&self, other: &Listener) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.callback), Arc::as_ptr(&other.callback))
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.callback) as *const ())
    }
}

/// Derived property kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    Data,
    Listener,
}

/// One host property value.
#[derive(Debug, Clone)]
pub enum PropValue {
    Data(Payload),
    Listener(Listener),
}

impl PropValue {
    pub fn kind(&self) -> PropKind {
        match self {
            Self::Data(_) => PropKind::Data,
            Self::Listener(_) => PropKind::Listener,
        }
    }
}

impl From<Listener> for PropValue {
    fn from(value: Listener) -> Self {
        Self::Listener(value)
    }
}

impl From<Payload> for PropValue {
    fn from(value: Payload) -> Self {
        Self::Data(value)
    }
}

/// Host-supplied mapping from property name to value.
///
/// Iteration order is by name, which keeps reconciliation passes
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    entries: BTreeMap<String, PropValue>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a data-only property set from an untyped JSON value.
    ///
    /// # Errors
    /// - `InvalidProps` when `value` is not a JSON object.
    pub fn from_json(value: Value) -> PortResult<Self> {
        let object = ensure_plain_mapping(value)?;
        Ok(object
            .into_iter()
            .map(|(name, payload)| (name, PropValue::Data(payload)))
            .collect())
    }

    pub fn with_data(mut self, name: impl Into<String>, payload: impl Into<Payload>) -> Self {
        self.entries
            .insert(name.into(), PropValue::Data(payload.into()));
        self
    }

    pub fn with_listener(mut self, name: impl Into<String>, listener: Listener) -> Self {
        self.entries
            .insert(name.into(), PropValue::Listener(listener));
        self
    }

    /// Inserts or replaces one property, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: PropValue) -> Option<PropValue> {
        self.entries.insert(name.into(), value)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, PropValue)> for PropertySet {
    fn from_iter<T: IntoIterator<Item = (String, PropValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
