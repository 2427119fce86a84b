//! Error types for registry construction and resolution.

use crate::resource::ResourceKey;
use std::fmt;

/// Errors raised while defining or resolving I/O resources.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A resource with the same `(name, index)` was already defined.
    #[error("resource '{0}' is already defined")]
    DuplicateResource(ResourceKey),

    /// A connector with the same name was already defined.
    #[error("connector '{0}' is already defined")]
    DuplicateConnector(String),

    /// No resource is registered under the requested name (and index).
    #[error("unknown resource '{name}{}'", index_suffix(.index))]
    UnknownResource {
        /// The requested resource name.
        name: String,
        /// The requested index, or `None` for a whole-name request.
        index: Option<u32>,
    },

    /// A connector-relative pin reference does not name a physical pin.
    #[error("resource '{resource}': pin reference '{reference}' does not resolve ({fault})")]
    UnresolvedReference {
        /// The resource containing the reference.
        resource: ResourceKey,
        /// The reference as written (e.g. `"JP1:11"`).
        reference: String,
        /// Why resolution failed.
        fault: ReferenceFault,
    },

    /// A resource or one of its subsignals has no pins.
    #[error("resource '{resource}' has an empty pin list{}", subsignal_suffix(.subsignal))]
    EmptyPinList {
        /// The offending resource.
        resource: ResourceKey,
        /// The offending subsignal, if the emptiness is inside one.
        subsignal: Option<String>,
    },

    /// A pin reference string could not be parsed.
    #[error("invalid pin reference '{0}'")]
    InvalidPinReference(String),
}

fn index_suffix(index: &Option<u32>) -> String {
    index.map(|i| format!(":{i}")).unwrap_or_default()
}

fn subsignal_suffix(subsignal: &Option<String>) -> String {
    subsignal
        .as_ref()
        .map(|s| format!(" (subsignal '{s}')"))
        .unwrap_or_default()
}

/// The reason a connector-relative reference failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFault {
    /// The named connector does not exist.
    UnknownConnector,
    /// The position exists on the header but carries no pin (power/ground).
    AbsentPosition,
    /// The position is beyond the end of the header (or zero).
    OutOfRange,
}

impl fmt::Display for ReferenceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ReferenceFault::UnknownConnector => "unknown connector",
            ReferenceFault::AbsentPosition => "position is absent on the connector",
            ReferenceFault::OutOfRange => "position is out of range",
        };
        f.write_str(text)
    }
}
