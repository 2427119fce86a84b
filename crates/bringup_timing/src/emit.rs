//! Derivation of timing directives from the registry and the clock plan.

use crate::constraints::{TimingConstraints, TimingDirective};
use crate::error::TimingError;
use bringup_clock::GeneratorPlan;
use bringup_common::Frequency;
use bringup_registry::Registry;
use serde::Serialize;

/// A clock that reaches the fabric outside the PLL, such as the JTAG TCK.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugClock {
    /// Clock and port name.
    pub name: String,
    /// Clock frequency.
    pub frequency: Frequency,
}

/// Board signals the emitter needs besides the clock plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingSources {
    /// Name of the reset input resource (index 0).
    pub reset: String,
    /// Debug/test-access clock, placed in its own asynchronous group.
    pub debug_clock: Option<DebugClock>,
}

impl TimingSources {
    /// Creates sources with the given reset resource and no debug clock.
    pub fn new(reset: impl Into<String>) -> Self {
        Self {
            reset: reset.into(),
            debug_clock: None,
        }
    }

    /// Adds a debug clock.
    pub fn with_debug_clock(mut self, name: impl Into<String>, frequency: Frequency) -> Self {
        self.debug_clock = Some(DebugClock {
            name: name.into(),
            frequency,
        });
        self
    }
}

/// Emits the timing directives for one build.
///
/// Order: the reference clock period, one generated clock per active domain,
/// the reset false path, then the debug clock and its asynchronous group.
pub fn emit(
    registry: &Registry,
    plan: &GeneratorPlan,
    sources: &TimingSources,
) -> Result<TimingConstraints, TimingError> {
    let reset = registry
        .get(&sources.reset, 0)
        .ok_or_else(|| TimingError::MissingResetPin(sources.reset.clone()))?;
    let oscillator = plan.oscillator();
    let clock_pin = registry
        .get(&oscillator.name, 0)
        .and_then(|r| r.pins().first().map(|p| p.to_string()))
        .ok_or_else(|| TimingError::MissingClockPin(oscillator.name.clone()))?;

    let mut constraints = TimingConstraints::new();
    constraints.push(TimingDirective::ClockPeriod {
        clock: oscillator.name.clone(),
        pin: clock_pin,
        frequency: oscillator.frequency,
    });

    for domain in plan.domains().iter() {
        let p = &domain.provenance;
        constraints.push(TimingDirective::GeneratedClock {
            domain: domain.name.clone(),
            source: p.oscillator.clone(),
            multiply: p.multiply,
            divide: p.pre_divide * p.divide,
            phase: domain.phase,
        });
    }

    constraints.push(TimingDirective::FalsePath {
        from: vec![reset.name.clone()],
        to: Vec::new(),
    });

    if let Some(debug) = &sources.debug_clock {
        constraints.push(TimingDirective::CreateClock {
            name: debug.name.clone(),
            frequency: debug.frequency,
        });
        constraints.push(TimingDirective::ClockGroups {
            asynchronous: vec![debug.name.clone()],
        });
    }

    tracing::debug!(directives = constraints.len(), "timing directives emitted");
    Ok(constraints)
}
