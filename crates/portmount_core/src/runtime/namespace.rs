//! Hierarchical module namespace.
//!
//! # Responsibility
//! - Model the runtime handle as a tree of inner nodes and descriptors.
//! - Allow building a namespace one module path at a time.
//!
//! # Invariants
//! - A node is either inner or a descriptor, never both.
//! - `insert` never replaces an existing node.

use crate::error::{PortError, PortResult};
use crate::runtime::instance::{Instance, MountTarget};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Leaf capability: creates one live instance per call.
pub trait ModuleDescriptor {
    fn initialize(&self, target: MountTarget) -> Box<dyn Instance>;
}

/// One node of the module namespace.
#[derive(Clone)]
pub enum NamespaceNode {
    Inner(BTreeMap<String, NamespaceNode>),
    Leaf(Arc<dyn ModuleDescriptor>),
}

impl NamespaceNode {
    /// Empty inner node.
    pub fn empty() -> Self {
        Self::Inner(BTreeMap::new())
    }

    pub fn leaf(descriptor: impl ModuleDescriptor + 'static) -> Self {
        Self::Leaf(Arc::new(descriptor))
    }

    /// Builds an inner node from named children.
    pub fn inner<I, S>(children: I) -> Self
    where
        I: IntoIterator<Item = (S, NamespaceNode)>,
        S: Into<String>,
    {
        Self::Inner(
            children
                .into_iter()
                .map(|(name, node)| (name.into(), node))
                .collect(),
        )
    }

    /// Places `descriptor` at `path`, creating intermediate inner nodes.
    ///
    /// # Errors
    /// - `InvalidPath` when `path` is empty, crosses an existing descriptor,
    ///   or names a node that already exists.
    pub fn insert<S: AsRef<str>>(
        &mut self,
        path: &[S],
        descriptor: Arc<dyn ModuleDescriptor>,
    ) -> PortResult<()> {
        let owned_path = || path.iter().map(|s| s.as_ref().to_string()).collect();
        let Some((last, parents)) = path.split_last() else {
            return Err(PortError::InvalidPath(vec![]));
        };

        let mut current = self;
        for segment in parents {
            current = match current {
                Self::Inner(children) => children
                    .entry(segment.as_ref().to_string())
                    .or_insert_with(Self::empty),
                Self::Leaf(_) => return Err(PortError::InvalidPath(owned_path())),
            };
        }

        match current {
            Self::Inner(children) if !children.contains_key(last.as_ref()) => {
                children.insert(last.as_ref().to_string(), Self::Leaf(descriptor));
                Ok(())
            }
            _ => Err(PortError::InvalidPath(owned_path())),
        }
    }

    pub fn child(&self, name: &str) -> Option<&NamespaceNode> {
        match self {
            Self::Inner(children) => children.get(name),
            Self::Leaf(_) => None,
        }
    }

    pub fn as_descriptor(&self) -> Option<&Arc<dyn ModuleDescriptor>> {
        match self {
            Self::Leaf(descriptor) => Some(descriptor),
            Self::Inner(_) => None,
        }
    }

    pub fn is_descriptor(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

impl Debug for NamespaceNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inner(children) => f.debug_map().entries(children.iter()).finish(),
            Self::Leaf(_) => write!(f, "<module>"),
        }
    }
}
