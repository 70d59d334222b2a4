//! Module descriptor resolution.
//!
//! # Responsibility
//! - Locate exactly one module descriptor inside a namespace.
//!
//! # Invariants
//! - Resolution is pure: it never calls `initialize`.
//! - An explicit path must end exactly on a descriptor.
//! - Without a path, descent follows single-child namespaces only and must
//!   end on a descriptor.

use crate::error::{PortError, PortResult};
use crate::runtime::{ModuleDescriptor, NamespaceNode};
use log::debug;
use std::sync::Arc;

/// Resolves the descriptor to instantiate.
///
/// # Errors
/// - `InvalidPath` when `explicit_path` is given and does not end on a
///   descriptor.
/// - `InvalidInstance` when no path is given and descent reaches an empty
///   namespace, or a fork with fewer than two descriptors below it.
/// - `PathRequired` when no path is given and descent reaches a fork with
///   two or more descriptors below it.
pub fn resolve(
    namespace: &NamespaceNode,
    explicit_path: Option<&[String]>,
) -> PortResult<Arc<dyn ModuleDescriptor>> {
    match explicit_path {
        Some(path) => resolve_path(namespace, path),
        None => resolve_only(namespace),
    }
}

fn resolve_path(
    namespace: &NamespaceNode,
    path: &[String],
) -> PortResult<Arc<dyn ModuleDescriptor>> {
    if path.is_empty() {
        return Err(PortError::InvalidPath(vec![]));
    }

    let mut node = namespace;
    for segment in path {
        node = node
            .child(segment)
            .ok_or_else(|| PortError::InvalidPath(path.to_vec()))?;
    }

    node.as_descriptor()
        .cloned()
        .ok_or_else(|| PortError::InvalidPath(path.to_vec()))
}

fn resolve_only(namespace: &NamespaceNode) -> PortResult<Arc<dyn ModuleDescriptor>> {
    let mut node = namespace;
    loop {
        let children = match node {
            NamespaceNode::Leaf(descriptor) => return Ok(Arc::clone(descriptor)),
            NamespaceNode::Inner(children) => children,
        };

        let mut values = children.values();
        match (values.next(), values.next()) {
            (Some(only), None) => node = only,
            (None, _) => return Err(PortError::InvalidInstance),
            (Some(_), Some(_)) => return Err(fork_error(node)),
        }
    }
}

/// Classifies a namespace level with several children.
fn fork_error(fork: &NamespaceNode) -> PortError {
    let mut found = Vec::with_capacity(2);
    collect_descriptors(fork, &mut found, 2);
    if found.len() < 2 {
        return PortError::InvalidInstance;
    }

    debug!(
        "event=resolve module=resolver status=ambiguous candidates={}",
        descriptor_paths(fork)
            .iter()
            .map(|path| path.join("."))
            .collect::<Vec<_>>()
            .join(",")
    );
    PortError::PathRequired
}

/// Collects descriptors depth-first, stopping once `limit` are found.
fn collect_descriptors(
    node: &NamespaceNode,
    found: &mut Vec<Arc<dyn ModuleDescriptor>>,
    limit: usize,
) {
    if found.len() >= limit {
        return;
    }
    match node {
        NamespaceNode::Leaf(descriptor) => found.push(Arc::clone(descriptor)),
        NamespaceNode::Inner(children) => {
            for child in children.values() {
                collect_descriptors(child, found, limit);
            }
        }
    }
}

/// Lists the path of every descriptor in the namespace, sorted.
pub fn descriptor_paths(namespace: &NamespaceNode) -> Vec<Vec<String>> {
    fn walk(node: &NamespaceNode, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        match node {
            NamespaceNode::Leaf(_) => out.push(prefix.clone()),
            NamespaceNode::Inner(children) => {
                for (name, child) in children {
                    prefix.push(name.clone());
                    walk(child, prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(namespace, &mut Vec::new(), &mut out);
    out
}
