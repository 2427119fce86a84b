//! Static board descriptions and the built-in board catalog.
//!
//! A board is a TOML document listing its I/O table, header connectors, the
//! reference oscillator and the PLL it feeds. Built-in boards are embedded at
//! compile time; [`BoardDefinition::from_toml_str`] accepts any other.
//!
//! # Usage
//!
//! ```
//! use bringup_board::load_board;
//!
//! let board = load_board("terasic_de0cv").unwrap();
//! let registry = board.registry().unwrap();
//! assert_eq!(registry.request_all("user_led").unwrap().len(), 10);
//! ```
//!
//! # Architecture
//!
//! - [`board`]: the board description schema and its conversions
//! - [`catalog`]: built-in boards by name
//! - [`error`]: board loading errors

#![warn(missing_docs)]

pub mod board;
pub mod catalog;
pub mod error;

pub use board::{
    BoardDefinition, ClockSection, DebugClockSection, FixedDomain, IoEntry, MemorySection,
    PllSection, SubsignalEntry,
};
pub use catalog::{board_names, load_board};
pub use error::BoardError;
