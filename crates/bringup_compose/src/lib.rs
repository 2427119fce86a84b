//! Feature composition: validated options wired against a board and its
//! clock plan.
//!
//! [`compose_build`] runs the whole pipeline for a [`BuildConfig`]: the
//! optional features are validated first, then the board registry is frozen,
//! the clock plan solved, timing directives emitted, the console resolved and
//! finally every enabled feature wired into an ordered list of
//! [`SubsystemDirective`]s. The result is all-or-nothing.
//!
//! # Usage
//!
//! ```
//! use bringup_compose::compose_build;
//! use bringup_config::BuildConfig;
//!
//! let result = compose_build(&BuildConfig::default()).unwrap();
//! assert!(result.domains().contains("sys_ps"));
//! println!("{}", result.summary());
//! ```
//!
//! # Architecture
//!
//! - [`flags`]: raw switches and their validated, conflict-free form
//! - [`console`]: console transport resolution rules
//! - [`features`]: subsystem directives and their resource checks
//! - [`pipeline`]: the staged composition and its lifecycle
//! - [`result`]: the composed output
//!
//! [`BuildConfig`]: bringup_config::BuildConfig

#![warn(missing_docs)]

pub mod console;
pub mod error;
pub mod features;
pub mod flags;
pub mod pipeline;
pub mod result;

pub use console::{resolve_console, ConsoleResolution, ConsoleRule, ConsoleTransport};
pub use error::{ComposeError, Dependency, FeatureError};
pub use features::{compose, PhyVariant, SubsystemDirective};
pub use flags::{FeatureFlags, FeatureRequest, MemoryMode, StorageMode, VideoMode};
pub use pipeline::{compose_build, compose_for_board};
pub use result::CompositionResult;
