//! Error taxonomy for embedding, resolution and port reconciliation.
//!
//! # Responsibility
//! - Classify every malformed input into one fixed set of variants.
//! - Carry integrator-facing guidance next to each terse message.
//!
//! # Invariants
//! - `MissingPort` is the only recoverable variant; it never aborts a pass.
//! - `DuplicateInstance` and `MissingInstance` indicate the lifecycle adapter
//!   was driven out of order by its host.

use crate::model::InstanceId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PortResult<T> = Result<T, PortError>;

/// Fixed error taxonomy raised at the point of detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    /// Runtime handle has the wrong top-level shape, or holds no module.
    InvalidInstance,
    /// Explicit path does not lead to a module descriptor.
    InvalidPath(Vec<String>),
    /// More than one module is reachable and no path was given.
    PathRequired,
    /// Mount options carry unknown or malformed fields.
    InvalidOpts(String),
    /// Host properties are not a plain key/value mapping.
    InvalidProps(String),
    /// A registry entry already exists for this id.
    DuplicateInstance(InstanceId),
    /// No registry entry exists for this id.
    MissingInstance(InstanceId),
    /// Channel is absent or lacks the capability the property needs.
    MissingPort(String),
}

impl PortError {
    /// Stable machine-readable code, used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInstance => "invalid_instance",
            Self::InvalidPath(_) => "invalid_path",
            Self::PathRequired => "path_required",
            Self::InvalidOpts(_) => "invalid_opts",
            Self::InvalidProps(_) => "invalid_props",
            Self::DuplicateInstance(_) => "duplicate_instance",
            Self::MissingInstance(_) => "missing_instance",
            Self::MissingPort(_) => "missing_port",
        }
    }

    /// Returns whether processing may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingPort(_))
    }

    /// Returns whether this error signals a lifecycle ordering defect.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::DuplicateInstance(_) | Self::MissingInstance(_))
    }

    /// Multi-line guidance for the integrator.
    pub fn help(&self) -> String {
        match self {
            Self::InvalidInstance => format!(
                "The runtime handle does not look like a module namespace.\n\
                 Pass the namespace root (an inner node), not a single module,\n\
                 and make sure it contains at least one module.\n\
                 Without `path`, every namespace on the way to the module must\n\
                 have exactly one child.\n\n{EXPECTED_WRAP}"
            ),
            Self::InvalidPath(path) => format!(
                "The path [{}] could not be resolved to a module.\n\
                 Every segment but the last must name a namespace, and the last\n\
                 must name a module.\n\n{MODULE_PATH_HINT}",
                path.join(", ")
            ),
            Self::PathRequired => format!(
                "The runtime handle contains more than one module, so `path` is\n\
                 required to pick one.\n\n{MODULE_PATH_HINT}"
            ),
            Self::InvalidOpts(reason) => format!(
                "The provided options could not be used: {reason}\n\n{EXPECTED_OPTS}"
            ),
            Self::InvalidProps(reason) => format!(
                "Host properties must be a key/value object: {reason}"
            ),
            Self::DuplicateInstance(id) => internal_error(2, *id),
            Self::MissingInstance(id) => internal_error(3, *id),
            Self::MissingPort(name) => format!(
                "Unable to find a usable port for `{name}`.\n\
                 A callable property needs an outgoing port that supports subscribe;\n\
                 any other value needs an incoming port that supports send.\n\
                 It is also possible an unforeseen property reached the component."
            ),
        }
    }
}

const EXPECTED_WRAP: &str = "Expected: EmbeddedComponent::new(runtime: NamespaceNode, options: MountOptions)";

const EXPECTED_OPTS: &str = "Expected options shaped like:\n  { \"path\": [\"Name\", ...] }  (path is optional)";

const MODULE_PATH_HINT: &str =
    "A module declared as `Elements.Button` translates to `path: [\"Elements\", \"Button\"]`.";

fn internal_error(code: u32, id: InstanceId) -> String {
    format!(
        "portmount experienced an internal error (code {code}) for instance {id}.\n\
         The host drove mount/update/unmount out of order."
    )
}

impl Display for PortError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInstance => write!(f, "runtime handle is not a usable module namespace"),
            Self::InvalidPath(path) => {
                write!(f, "path does not resolve to a module: {}", path.join("."))
            }
            Self::PathRequired => write!(f, "multiple modules found; an explicit path is required"),
            Self::InvalidOpts(reason) => write!(f, "invalid mount options: {reason}"),
            Self::InvalidProps(reason) => write!(f, "invalid host properties: {reason}"),
            Self::DuplicateInstance(id) => write!(f, "instance already registered: {id}"),
            Self::MissingInstance(id) => write!(f, "instance not registered: {id}"),
            Self::MissingPort(name) => write!(f, "no usable port for property: {name}"),
        }
    }
}

impl Error for PortError {}
