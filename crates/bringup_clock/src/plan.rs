//! Request validation and generator plan assembly.

use crate::domain::{ClockDomain, ClockDomainSet, DomainRequest, Provenance};
use crate::error::ClockError;
use crate::graph::ClockGraph;
use crate::pll::{PllConfig, PllSpec};
use crate::topology::Topology;
use bringup_common::Frequency;
use serde::Serialize;
use std::collections::BTreeSet;

/// A board reference oscillator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Oscillator {
    /// The name of the clock input pin resource (e.g. `"clk50"`).
    pub name: String,
    /// The oscillator frequency.
    pub frequency: Frequency,
}

impl Oscillator {
    /// Creates an oscillator.
    pub fn new(name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            name: name.into(),
            frequency,
        }
    }
}

/// The result of clock planning: PLL settings plus the active domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorPlan {
    oscillator: Oscillator,
    pll: PllSpec,
    topology: Topology,
    config: PllConfig,
    domains: ClockDomainSet,
    memory_clock: String,
}

impl GeneratorPlan {
    /// Returns the reference oscillator.
    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Returns the PLL family and speed grade that was searched.
    pub fn pll(&self) -> &PllSpec {
        &self.pll
    }

    /// Returns the memory clocking topology.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Returns the solved PLL counters.
    pub fn config(&self) -> &PllConfig {
        &self.config
    }

    /// Returns the active clock domains.
    pub fn domains(&self) -> &ClockDomainSet {
        &self.domains
    }

    /// Returns the name of the domain that drives the external memory clock.
    pub fn memory_clock_domain(&self) -> &str {
        &self.memory_clock
    }

    /// Builds the oscillator → PLL → domain graph for this plan.
    pub fn graph(&self) -> ClockGraph {
        ClockGraph::from_plan(self)
    }
}

/// Plans the clock domains for one build.
///
/// Exactly one request must be primary. The topology's auxiliary domains are
/// inserted right after the primary, then every output is solved against one
/// shared PLL configuration.
pub fn plan(
    topology: Topology,
    oscillator: Oscillator,
    requested: Vec<DomainRequest>,
    pll: PllSpec,
) -> Result<GeneratorPlan, ClockError> {
    let primaries: Vec<String> = requested
        .iter()
        .filter(|r| r.primary)
        .map(|r| r.name.clone())
        .collect();
    match primaries.len() {
        0 => return Err(ClockError::MissingPrimaryDomain),
        1 => {}
        _ => return Err(ClockError::MultiplePrimaryDomains(primaries)),
    }

    let mut expanded = Vec::with_capacity(requested.len() + 2);
    let mut primary_index = 0;
    let mut memory_clock = String::new();
    for req in requested {
        if req.primary {
            primary_index = expanded.len();
            memory_clock = topology.memory_clock_domain(&req.name);
            let aux = topology.auxiliary_domains(&req).ok_or_else(|| {
                ClockError::UnachievableFrequency {
                    domain: topology.memory_clock_domain(&req.name),
                    requested: req.frequency,
                    reference: oscillator.frequency,
                    nearest: None,
                }
            })?;
            expanded.push(req);
            expanded.extend(aux);
        } else {
            expanded.push(req);
        }
    }

    let mut seen = BTreeSet::new();
    for req in &expanded {
        if !seen.insert(req.name.as_str()) {
            return Err(ClockError::DuplicateDomainName(req.name.clone()));
        }
    }

    let config = pll.solve(oscillator.frequency, &expanded)?;
    let domains = expanded
        .iter()
        .zip(&config.outputs)
        .enumerate()
        .map(|(output, (req, counter))| ClockDomain {
            name: req.name.clone(),
            frequency: counter.frequency,
            phase: counter.phase,
            primary: req.primary,
            provenance: Provenance {
                oscillator: oscillator.name.clone(),
                output,
                pre_divide: config.pre_divide,
                multiply: config.multiply,
                divide: counter.divide,
                phase_steps: counter.phase_steps,
            },
        })
        .collect();

    tracing::info!(
        topology = %topology,
        vco = %config.vco,
        domains = expanded.len(),
        "clock plan ready"
    );

    Ok(GeneratorPlan {
        oscillator,
        pll,
        topology,
        config,
        domains: ClockDomainSet::new(domains, primary_index),
        memory_clock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Phase;
    use crate::pll::SpeedGrade;

    fn osc() -> Oscillator {
        Oscillator::new("clk50", Frequency::from_mhz(50))
    }

    fn spec() -> PllSpec {
        PllSpec::cyclone_v(SpeedGrade::I7)
    }

    fn requests(sys_mhz: u64) -> Vec<DomainRequest> {
        vec![
            DomainRequest::primary("sys", Frequency::from_mhz(sys_mhz)),
            DomainRequest::auxiliary("vga", Frequency::from_mhz(25)),
        ]
    }

    #[test]
    fn full_rate_has_shifted_sys_and_no_double() {
        let plan = plan(Topology::FullRate, osc(), requests(50), spec()).unwrap();
        let domains = plan.domains();
        assert_eq!(domains.names(), vec!["sys", "sys_ps", "vga"]);
        let ps = domains.get("sys_ps").unwrap();
        assert_eq!(ps.frequency, Frequency::from_mhz(50));
        assert_eq!(ps.phase, Phase::DEG_90);
        assert!(!domains.contains("sys2x"));
        assert!(!domains.contains("sys2x_ps"));
        assert_eq!(plan.memory_clock_domain(), "sys_ps");
        assert_eq!(domains.primary().name, "sys");
    }

    #[test]
    fn half_rate_has_double_pair_and_no_quarter_shift() {
        let plan = plan(Topology::HalfRate, osc(), requests(50), spec()).unwrap();
        let domains = plan.domains();
        assert_eq!(domains.names(), vec!["sys", "sys2x", "sys2x_ps", "vga"]);
        assert_eq!(domains.get("sys2x").unwrap().frequency, Frequency::from_mhz(100));
        assert_eq!(domains.get("sys2x").unwrap().phase, Phase::ZERO);
        assert_eq!(domains.get("sys2x_ps").unwrap().phase, Phase::DEG_180);
        assert!(!domains.contains("sys_ps"));
        assert!(domains.iter().all(|d| d.phase != Phase::DEG_90));
        assert_eq!(plan.memory_clock_domain(), "sys2x_ps");
    }

    #[test]
    fn provenance_records_counters() {
        let plan = plan(Topology::FullRate, osc(), requests(50), spec()).unwrap();
        let vga = plan.domains().get("vga").unwrap();
        assert_eq!(vga.provenance.oscillator, "clk50");
        assert_eq!(vga.provenance.output, 2);
        assert_eq!(vga.provenance.divide, 64);
        assert_eq!(plan.config().vco, Frequency::from_mhz(1600));
    }

    #[test]
    fn missing_primary() {
        let reqs = vec![DomainRequest::auxiliary("vga", Frequency::from_mhz(25))];
        assert_eq!(
            plan(Topology::FullRate, osc(), reqs, spec()),
            Err(ClockError::MissingPrimaryDomain)
        );
    }

    #[test]
    fn multiple_primaries() {
        let reqs = vec![
            DomainRequest::primary("sys", Frequency::from_mhz(50)),
            DomainRequest::primary("cpu", Frequency::from_mhz(50)),
        ];
        assert_eq!(
            plan(Topology::FullRate, osc(), reqs, spec()),
            Err(ClockError::MultiplePrimaryDomains(vec![
                "sys".to_string(),
                "cpu".to_string()
            ]))
        );
    }

    #[test]
    fn duplicate_names_include_generated_domains() {
        let mut reqs = requests(50);
        reqs.push(DomainRequest::auxiliary("sys_ps", Frequency::from_mhz(50)));
        assert_eq!(
            plan(Topology::FullRate, osc(), reqs, spec()),
            Err(ClockError::DuplicateDomainName("sys_ps".to_string()))
        );
    }

    #[test]
    fn unreachable_system_clock() {
        let err = plan(Topology::FullRate, osc(), requests(1), spec()).unwrap_err();
        assert!(matches!(
            err,
            ClockError::UnachievableFrequency { ref domain, .. } if domain == "sys"
        ));
    }
}
