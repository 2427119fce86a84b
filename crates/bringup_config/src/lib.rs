//! Parsing and validation of `bringup.toml` build configuration files.
//!
//! This crate reads the build configuration and produces a strongly-typed
//! [`BuildConfig`]. Command-line flags are layered on top with
//! [`apply_overrides`]; option conflicts are left for the composer to report.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod overrides;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use overrides::{apply_overrides, ConfigOverrides};
pub use types::*;
