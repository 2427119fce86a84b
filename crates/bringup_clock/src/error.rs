//! Error types for clock planning.

use crate::domain::Phase;
use bringup_common::Frequency;

/// Errors raised while validating clock requests or searching PLL settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Two requested (or topology-generated) domains share a name.
    #[error("duplicate clock domain '{0}'")]
    DuplicateDomainName(String),

    /// No requested domain is flagged as the primary system clock.
    #[error("no clock domain is marked as primary")]
    MissingPrimaryDomain,

    /// More than one requested domain is flagged as primary.
    #[error("multiple primary clock domains: {}", .0.join(", "))]
    MultiplePrimaryDomains(Vec<String>),

    /// No integer multiply/divide setting produces the requested frequency.
    #[error(
        "clock domain '{domain}': {requested} is not reachable from {reference}{}",
        nearest_suffix(.nearest)
    )]
    UnachievableFrequency {
        /// The offending domain.
        domain: String,
        /// The requested frequency.
        requested: Frequency,
        /// The reference oscillator frequency.
        reference: Frequency,
        /// The closest frequency the PLL can produce, if any.
        nearest: Option<Frequency>,
    },

    /// The frequency is reachable but the phase is not a whole number of
    /// PLL phase steps for any valid setting.
    #[error("clock domain '{domain}': phase {phase} is not reachable at {frequency}")]
    UnachievablePhase {
        /// The offending domain.
        domain: String,
        /// The requested phase.
        phase: Phase,
        /// The requested frequency.
        frequency: Frequency,
    },

    /// Each domain is reachable alone but no single VCO setting serves all.
    #[error("no common PLL setting for clock domains: {}", .domains.join(", "))]
    NoCommonVco {
        /// The domains that were requested together.
        domains: Vec<String>,
    },

    /// More outputs were requested than the PLL has counters.
    #[error("{requested} clock outputs requested, PLL provides at most {max}")]
    TooManyOutputs {
        /// Number of requested outputs.
        requested: usize,
        /// Number of available output counters.
        max: usize,
    },

    /// The reference frequency is outside the PLL input range.
    #[error("reference {reference} is outside the PLL input range {min}..{max}")]
    ReferenceOutOfRange {
        /// The reference oscillator frequency.
        reference: Frequency,
        /// Lowest accepted input.
        min: Frequency,
        /// Highest accepted input.
        max: Frequency,
    },

    /// A rate mode string is neither `"1:1"` nor `"1:2"`.
    #[error("invalid rate mode '{0}' (expected \"1:1\" or \"1:2\")")]
    InvalidRateMode(String),

    /// A phase is outside 0–360 degrees.
    #[error("invalid phase {0} (expected 0..=360 degrees)")]
    InvalidPhase(u16),

    /// A PLL speed grade string is not recognized.
    #[error("unknown PLL speed grade '{0}'")]
    UnknownSpeedGrade(String),

    /// A PLL family name is not recognized.
    #[error("unknown PLL family '{0}'")]
    UnknownPllFamily(String),
}

fn nearest_suffix(nearest: &Option<Frequency>) -> String {
    nearest
        .map(|f| format!(" (nearest achievable: {f})"))
        .unwrap_or_default()
}
