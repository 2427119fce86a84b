//! Timing directives derived from the clock plan and the board's reset pin.
//!
//! The emitter produces structured records only. [`TimingConstraints::to_sdc`]
//! renders them as SDC text for inspection; nothing here drives a vendor tool.
//!
//! # Usage
//!
//! ```ignore
//! use bringup_timing::{emit, TimingSources};
//!
//! let sources = TimingSources::new("reset_n").with_debug_clock("altera_reserved_tck", tck);
//! let constraints = emit(&registry, &plan, &sources)?;
//! println!("{}", constraints.to_sdc());
//! ```
//!
//! # Architecture
//!
//! - [`constraints`]: timing directive records and SDC rendering
//! - [`emit`](mod@emit): derivation from the registry and the clock plan
//! - [`error`]: emitter errors

#![warn(missing_docs)]

pub mod constraints;
pub mod emit;
pub mod error;

pub use constraints::{TimingConstraints, TimingDirective};
pub use emit::{emit, DebugClock, TimingSources};
pub use error::TimingError;
