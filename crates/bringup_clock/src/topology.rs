//! Memory clocking topologies selected by the SDRAM rate mode.

use crate::domain::{DomainRequest, Phase};
use crate::error::ClockError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The clock topology for the external memory interface.
///
/// Exactly one is active per build. The auxiliary domains of the other
/// topology are never requested, so they are absent from the plan rather
/// than merely unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Topology {
    /// Rate mode `"1:1"`: one extra domain at the system frequency, +90°.
    #[default]
    FullRate,
    /// Rate mode `"1:2"`: a 2× domain at 0° and its 180° companion.
    HalfRate,
}

impl Topology {
    /// Returns the auxiliary domains this topology adds for `primary`.
    ///
    /// Names derive from the primary: `sys` yields `sys_ps`, or `sys2x` and
    /// `sys2x_ps`.
    pub fn auxiliary_domains(self, primary: &DomainRequest) -> Option<Vec<DomainRequest>> {
        let name = &primary.name;
        match self {
            Topology::FullRate => Some(vec![DomainRequest::auxiliary(
                format!("{name}_ps"),
                primary.frequency,
            )
            .with_phase(Phase::DEG_90)]),
            Topology::HalfRate => {
                let doubled = primary.frequency.scale(2, 1)?;
                Some(vec![
                    DomainRequest::auxiliary(format!("{name}2x"), doubled),
                    DomainRequest::auxiliary(format!("{name}2x_ps"), doubled)
                        .with_phase(Phase::DEG_180),
                ])
            }
        }
    }

    /// Returns the name of the domain that drives the memory clock output.
    pub fn memory_clock_domain(self, primary: &str) -> String {
        match self {
            Topology::FullRate => format!("{primary}_ps"),
            Topology::HalfRate => format!("{primary}2x_ps"),
        }
    }

    /// Returns the rate mode string (`"1:1"` or `"1:2"`).
    pub fn rate(self) -> &'static str {
        match self {
            Topology::FullRate => "1:1",
            Topology::HalfRate => "1:2",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rate())
    }
}

impl FromStr for Topology {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(Topology::FullRate),
            "1:2" => Ok(Topology::HalfRate),
            other => Err(ClockError::InvalidRateMode(other.to_string())),
        }
    }
}

impl From<Topology> for String {
    fn from(value: Topology) -> Self {
        value.rate().to_string()
    }
}

impl TryFrom<String> for Topology {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
