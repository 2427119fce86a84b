//! Shared foundational types used across the bringup workspace.
//!
//! This crate provides exact rational frequency values and content
//! fingerprints used to check that compositions are reproducible.

#![warn(missing_docs)]

pub mod fingerprint;
pub mod frequency;

pub use fingerprint::Fingerprint;
pub use frequency::{Frequency, ParseFrequencyError};
