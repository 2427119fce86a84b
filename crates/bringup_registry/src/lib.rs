//! Constraint registry: logical I/O resources bound to physical package pins.
//!
//! A board describes its I/O as a table of [`IoResource`]s keyed by
//! `(name, index)`. Pins are given either directly (`"M9"`) or relative to a
//! header [`Connector`] (`"JP1:10"`). The [`RegistryBuilder`] collects
//! definitions and [`RegistryBuilder::build`] resolves every connector
//! reference up front, producing a frozen [`Registry`] that is either entirely
//! valid or not constructed at all.
//!
//! # Usage
//!
//! ```
//! use bringup_registry::{Connector, IoResource, RegistryBuilder};
//!
//! let mut builder = RegistryBuilder::new();
//! builder.add_connector(Connector::parse("JP1", "N16 B16 - M16")).unwrap();
//! builder
//!     .define(IoResource::with_pins("led", 0, "JP1:4", "3.3-V LVTTL").unwrap())
//!     .unwrap();
//! let registry = builder.build().unwrap();
//! assert_eq!(registry.resolve("led", 0).unwrap().pins(), vec!["M16"]);
//! ```

#![warn(missing_docs)]

pub mod connector;
pub mod error;
pub mod pin;
pub mod registry;
pub mod resource;

pub use connector::Connector;
pub use error::{ReferenceFault, RegistryError};
pub use pin::{parse_pin_list, PinReference};
pub use registry::{Registry, RegistryBuilder};
pub use resource::{
    IoResource, ResolvedResource, ResolvedSignals, ResolvedSubsignal, ResourceKey, Signals,
    Subsignal,
};
