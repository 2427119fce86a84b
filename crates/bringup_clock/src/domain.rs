//! Clock domains, phase offsets and the active domain set.

use crate::error::ClockError;
use bringup_common::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A phase offset in whole degrees, `0..=360`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Phase(u16);

impl Phase {
    /// No phase shift.
    pub const ZERO: Phase = Phase(0);
    /// Quarter-period shift.
    pub const DEG_90: Phase = Phase(90);
    /// Half-period shift.
    pub const DEG_180: Phase = Phase(180);

    /// Creates a phase, rejecting values above 360 degrees.
    pub fn new(degrees: u16) -> Result<Self, ClockError> {
        if degrees > 360 {
            return Err(ClockError::InvalidPhase(degrees));
        }
        Ok(Self(degrees))
    }

    /// Returns the phase in degrees.
    pub fn degrees(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl From<Phase> for u16 {
    fn from(value: Phase) -> Self {
        value.0
    }
}

impl TryFrom<u16> for Phase {
    type Error = ClockError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Phase::new(value)
    }
}

/// One requested PLL output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRequest {
    /// The clock domain name (e.g. `"sys"`, `"vga"`).
    pub name: String,
    /// The exact output frequency.
    pub frequency: Frequency,
    /// Phase offset relative to the primary domain.
    pub phase: Phase,
    /// Whether this is the primary system clock.
    pub primary: bool,
}

impl DomainRequest {
    /// Requests the primary system clock.
    pub fn primary(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            phase: Phase::ZERO,
            primary: true,
        }
    }

    /// Requests a non-primary domain at zero phase.
    pub fn auxiliary(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            phase: Phase::ZERO,
            primary: false,
        }
    }

    /// Sets the phase offset.
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }
}

/// Where a domain's clock comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// The reference oscillator name.
    pub oscillator: String,
    /// The PLL output counter index driving this domain.
    pub output: usize,
    /// Input pre-divider (N).
    pub pre_divide: u32,
    /// Feedback multiplier (M).
    pub multiply: u32,
    /// Output post-divider (C).
    pub divide: u32,
    /// Phase shift in 1/8-VCO-period steps.
    pub phase_steps: u32,
}

/// A generated clock domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockDomain {
    /// Unique domain name.
    pub name: String,
    /// Exact frequency.
    pub frequency: Frequency,
    /// Phase offset.
    pub phase: Phase,
    /// Whether this is the primary system clock.
    pub primary: bool,
    /// The PLL step that derived it.
    pub provenance: Provenance,
}

/// The active clock domains of one build, in PLL output order.
///
/// Exactly one domain is primary; the set is only built by
/// [`plan`](crate::plan()).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockDomainSet {
    domains: Vec<ClockDomain>,
    #[serde(skip)]
    primary: usize,
}

impl ClockDomainSet {
    pub(crate) fn new(domains: Vec<ClockDomain>, primary: usize) -> Self {
        Self { domains, primary }
    }

    /// Returns the domain with the given name.
    pub fn get(&self, name: &str) -> Option<&ClockDomain> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Returns `true` if a domain with the given name is active.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the primary system domain.
    pub fn primary(&self) -> &ClockDomain {
        &self.domains[self.primary]
    }

    /// Iterates over the domains in PLL output order.
    pub fn iter(&self) -> impl Iterator<Item = &ClockDomain> {
        self.domains.iter()
    }

    /// Returns the domain names in PLL output order.
    pub fn names(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.name.as_str()).collect()
    }

    /// Returns the number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}
