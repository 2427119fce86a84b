//! Device PLL limits and the exact counter search.
//!
//! A PLL multiplies the reference by `M / N` to reach the VCO frequency, then
//! divides the VCO by an integer counter `C` per output. Phase shifts are
//! realised in eighths of a VCO period, so a phase is reachable only when
//! `phase * 8 * C / 360` is a whole number of steps.

use crate::domain::{DomainRequest, Phase};
use crate::error::ClockError;
use bringup_common::Frequency;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phase steps per VCO period.
const STEPS_PER_PERIOD: u64 = 8;

/// Device speed grade, which bounds the PLL input and VCO ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SpeedGrade {
    /// Commercial, fastest.
    C6,
    /// Commercial.
    C7,
    /// Industrial, same PLL limits as C7.
    I7,
    /// Commercial, slowest.
    C8,
}

impl fmt::Display for SpeedGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpeedGrade::C6 => "-C6",
            SpeedGrade::C7 => "-C7",
            SpeedGrade::I7 => "-I7",
            SpeedGrade::C8 => "-C8",
        };
        f.write_str(s)
    }
}

impl FromStr for SpeedGrade {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix('-').unwrap_or(trimmed);
        match bare.to_ascii_uppercase().as_str() {
            "C6" => Ok(SpeedGrade::C6),
            "C7" => Ok(SpeedGrade::C7),
            "I7" => Ok(SpeedGrade::I7),
            "C8" => Ok(SpeedGrade::C8),
            _ => Err(ClockError::UnknownSpeedGrade(s.to_string())),
        }
    }
}

impl From<SpeedGrade> for String {
    fn from(value: SpeedGrade) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SpeedGrade {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The PLL block family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PllFamily {
    /// Cyclone IV PLL (5 outputs).
    CycloneIv,
    /// Cyclone V fractional PLL used in integer mode (9 outputs).
    CycloneV,
}

impl fmt::Display for PllFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PllFamily::CycloneIv => f.write_str("cyclone_iv"),
            PllFamily::CycloneV => f.write_str("cyclone_v"),
        }
    }
}

impl FromStr for PllFamily {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyclone_iv" | "cycloneiv" | "cyclone-iv" | "cyclone4" => Ok(PllFamily::CycloneIv),
            "cyclone_v" | "cyclonev" | "cyclone-v" | "cyclone5" => Ok(PllFamily::CycloneV),
            _ => Err(ClockError::UnknownPllFamily(s.to_string())),
        }
    }
}

impl From<PllFamily> for String {
    fn from(value: PllFamily) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PllFamily {
    type Error = ClockError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Numeric limits of one PLL family and speed grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PllLimits {
    /// Lowest reference input frequency.
    pub input_min: Frequency,
    /// Highest reference input frequency.
    pub input_max: Frequency,
    /// Lowest phase-frequency-detector frequency (`ref / N`).
    pub pfd_min: Frequency,
    /// Highest phase-frequency-detector frequency.
    pub pfd_max: Frequency,
    /// Lowest VCO frequency.
    pub vco_min: Frequency,
    /// Highest VCO frequency.
    pub vco_max: Frequency,
    /// Largest pre-divider N.
    pub n_max: u32,
    /// Largest feedback multiplier M.
    pub m_max: u32,
    /// Largest output counter C.
    pub c_max: u32,
    /// Number of output counters.
    pub outputs: usize,
}

/// A PLL family at a given speed grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PllSpec {
    /// The PLL family.
    pub family: PllFamily,
    /// The device speed grade.
    pub grade: SpeedGrade,
}

impl PllSpec {
    /// A Cyclone V PLL at the given speed grade.
    pub fn cyclone_v(grade: SpeedGrade) -> Self {
        Self {
            family: PllFamily::CycloneV,
            grade,
        }
    }

    /// A Cyclone IV PLL at the given speed grade.
    pub fn cyclone_iv(grade: SpeedGrade) -> Self {
        Self {
            family: PllFamily::CycloneIv,
            grade,
        }
    }

    /// Returns the numeric limits for this family and grade.
    pub fn limits(&self) -> PllLimits {
        match self.family {
            PllFamily::CycloneV => {
                let (input_max, vco_max) = match self.grade {
                    SpeedGrade::C6 => (670, 1600),
                    SpeedGrade::C7 | SpeedGrade::I7 => (622, 1600),
                    SpeedGrade::C8 => (500, 1300),
                };
                PllLimits {
                    input_min: Frequency::from_mhz(5),
                    input_max: Frequency::from_mhz(input_max),
                    pfd_min: Frequency::from_mhz(5),
                    pfd_max: Frequency::from_mhz(325),
                    vco_min: Frequency::from_mhz(600),
                    vco_max: Frequency::from_mhz(vco_max),
                    n_max: 512,
                    m_max: 512,
                    c_max: 512,
                    outputs: 9,
                }
            }
            PllFamily::CycloneIv => PllLimits {
                input_min: Frequency::from_mhz(5),
                input_max: Frequency::from_khz(472_500),
                pfd_min: Frequency::from_mhz(5),
                pfd_max: Frequency::from_mhz(325),
                vco_min: Frequency::from_mhz(600),
                vco_max: Frequency::from_mhz(1300),
                n_max: 512,
                m_max: 512,
                c_max: 512,
                outputs: 5,
            },
        }
    }

    /// Finds integer N, M and per-output C values producing every request
    /// exactly from `reference`.
    ///
    /// N is searched upward and M downward, so the first hit has the highest
    /// VCO for the smallest pre-divider. On failure each output is solved
    /// alone to name the offending domain.
    pub fn solve(
        &self,
        reference: Frequency,
        requests: &[DomainRequest],
    ) -> Result<PllConfig, ClockError> {
        let limits = self.limits();
        if reference < limits.input_min || reference > limits.input_max {
            return Err(ClockError::ReferenceOutOfRange {
                reference,
                min: limits.input_min,
                max: limits.input_max,
            });
        }
        if requests.len() > limits.outputs {
            return Err(ClockError::TooManyOutputs {
                requested: requests.len(),
                max: limits.outputs,
            });
        }

        if let Some(config) = search(&limits, reference, requests) {
            tracing::debug!(
                n = config.pre_divide,
                m = config.multiply,
                vco = %config.vco,
                "PLL settings found"
            );
            return Ok(config);
        }
        Err(diagnose(&limits, reference, requests))
    }
}

/// A solved PLL configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PllConfig {
    /// The reference input frequency.
    pub reference: Frequency,
    /// Input pre-divider N.
    pub pre_divide: u32,
    /// Feedback multiplier M.
    pub multiply: u32,
    /// Resulting VCO frequency.
    pub vco: Frequency,
    /// One entry per request, in request order.
    pub outputs: Vec<PllOutput>,
}

/// One solved output counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PllOutput {
    /// The domain this counter drives.
    pub domain: String,
    /// Output counter C.
    pub divide: u32,
    /// Exact output frequency (`vco / C`).
    pub frequency: Frequency,
    /// Phase offset.
    pub phase: Phase,
    /// Phase shift in eighths of a VCO period.
    pub phase_steps: u32,
}

/// Iterates every valid `(N, M, VCO)` in search order.
fn vco_candidates(
    limits: &PllLimits,
    reference: Frequency,
) -> impl Iterator<Item = (u32, u32, Frequency)> + '_ {
    (1..=limits.n_max)
        .map_while(move |n| {
            let pfd = reference.scale(1, u64::from(n))?;
            (pfd >= limits.pfd_min).then_some((n, pfd))
        })
        .filter(move |(_, pfd)| *pfd <= limits.pfd_max)
        .flat_map(move |(n, pfd)| {
            (1..=limits.m_max)
                .rev()
                .filter_map(move |m| Some((m, pfd.scale(u64::from(m), 1)?)))
                .skip_while(move |(_, vco)| *vco > limits.vco_max)
                .take_while(move |(_, vco)| *vco >= limits.vco_min)
                .map(move |(m, vco)| (n, m, vco))
        })
}

fn search(limits: &PllLimits, reference: Frequency, requests: &[DomainRequest]) -> Option<PllConfig> {
    vco_candidates(limits, reference).find_map(|(n, m, vco)| {
        let outputs = requests
            .iter()
            .map(|req| counter_for(limits, vco, req))
            .collect::<Option<Vec<_>>>()?;
        Some(PllConfig {
            reference,
            pre_divide: n,
            multiply: m,
            vco,
            outputs,
        })
    })
}

/// Returns the output counter producing `req` exactly from `vco`, if any.
fn counter_for(limits: &PllLimits, vco: Frequency, req: &DomainRequest) -> Option<PllOutput> {
    let (c, den) = vco.ratio_to(req.frequency)?;
    if den != 1 || c == 0 || c > u128::from(limits.c_max) {
        return None;
    }
    let steps = u128::from(req.phase.degrees()) * u128::from(STEPS_PER_PERIOD) * c;
    if steps % 360 != 0 {
        return None;
    }
    Some(PllOutput {
        domain: req.name.clone(),
        divide: u32::try_from(c).ok()?,
        frequency: req.frequency,
        phase: req.phase,
        phase_steps: u32::try_from(steps / 360).ok()?,
    })
}

fn diagnose(limits: &PllLimits, reference: Frequency, requests: &[DomainRequest]) -> ClockError {
    for req in requests {
        if search(limits, reference, std::slice::from_ref(req)).is_some() {
            continue;
        }
        let unshifted = req.clone().with_phase(Phase::ZERO);
        if search(limits, reference, std::slice::from_ref(&unshifted)).is_some() {
            return ClockError::UnachievablePhase {
                domain: req.name.clone(),
                phase: req.phase,
                frequency: req.frequency,
            };
        }
        return ClockError::UnachievableFrequency {
            domain: req.name.clone(),
            requested: req.frequency,
            reference,
            nearest: nearest(limits, reference, req.frequency),
        };
    }
    ClockError::NoCommonVco {
        domains: requests.iter().map(|r| r.name.clone()).collect(),
    }
}

/// Returns the achievable output frequency closest to `target`.
fn nearest(limits: &PllLimits, reference: Frequency, target: Frequency) -> Option<Frequency> {
    let mut best: Option<(f64, Frequency)> = None;
    for (_, _, vco) in vco_candidates(limits, reference) {
        let c = (vco.hz() / target.hz())
            .round()
            .clamp(1.0, f64::from(limits.c_max)) as u64;
        let Some(candidate) = vco.scale(1, c) else {
            continue;
        };
        let error = (candidate.hz() - target.hz()).abs();
        if best.map_or(true, |(e, _)| error < e) {
            best = Some((error, candidate));
        }
    }
    best.map(|(_, f)| f)
}
