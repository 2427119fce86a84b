//! Error types for board loading.

use bringup_registry::RegistryError;

/// Errors raised while loading or converting a board description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    /// No built-in board has this name.
    #[error("unknown board '{name}' (available: {})", .available.join(", "))]
    UnknownBoard {
        /// The requested name.
        name: String,
        /// Built-in board names.
        available: Vec<String>,
    },

    /// The board TOML is malformed.
    #[error("board description parse error: {0}")]
    ParseError(String),

    /// An I/O entry does not give exactly one of `pins`, `each` or `subsignals`.
    #[error("I/O entry '{name}': {reason}")]
    InvalidEntry {
        /// The entry's resource name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The I/O table does not form a valid registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
