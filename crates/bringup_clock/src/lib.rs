//! Clock-domain generation from a single reference oscillator.
//!
//! A [`GeneratorPlan`] is computed by [`plan`] from the oscillator, the
//! requested output domains and a [`Topology`] selected by the memory rate
//! mode. The PLL settings are searched exactly: every output must be the VCO
//! frequency divided by an integer counter, with no rounding.
//!
//! # Usage
//!
//! ```
//! use bringup_clock::{plan, DomainRequest, Oscillator, PllSpec, Topology};
//! use bringup_common::Frequency;
//!
//! let osc = Oscillator::new("clk50", Frequency::from_mhz(50));
//! let plan = plan(
//!     Topology::FullRate,
//!     osc,
//!     vec![
//!         DomainRequest::primary("sys", Frequency::from_mhz(50)),
//!         DomainRequest::auxiliary("vga", Frequency::from_mhz(25)),
//!     ],
//!     PllSpec::cyclone_v("-I7".parse().unwrap()),
//! )
//! .unwrap();
//! assert!(plan.domains().contains("sys_ps"));
//! ```
//!
//! # Architecture
//!
//! - [`domain`]: clock domains, phases and the active domain set
//! - [`topology`]: full-rate vs half-rate memory clocking
//! - [`pll`]: device PLL limits and the exact counter search
//! - [`plan`](mod@plan): request validation and plan assembly
//! - [`graph`]: the oscillator → PLL → domain graph

#![warn(missing_docs)]

pub mod domain;
pub mod error;
pub mod graph;
pub mod plan;
pub mod pll;
pub mod topology;

pub use domain::{ClockDomain, ClockDomainSet, DomainRequest, Phase, Provenance};
pub use error::ClockError;
pub use graph::{ClockGraph, ClockNode, ClockStep};
pub use plan::{plan, GeneratorPlan, Oscillator};
pub use pll::{PllConfig, PllFamily, PllLimits, PllOutput, PllSpec, SpeedGrade};
pub use topology::Topology;
