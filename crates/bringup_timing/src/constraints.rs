//! Timing directive records.
//!
//! Each directive corresponds to one SDC command. The list is ordered: board
//! period constraints first, then generated clocks in PLL output order, then
//! path exceptions, then the debug clock and its clock group.

use bringup_clock::Phase;
use bringup_common::Frequency;
use serde::Serialize;
use std::fmt::Write as _;

/// An ordered list of timing directives for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TimingConstraints {
    directives: Vec<TimingDirective>,
}

impl TimingConstraints {
    /// Creates an empty directive list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directive.
    pub fn push(&mut self, directive: TimingDirective) {
        self.directives.push(directive);
    }

    /// Iterates over the directives in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &TimingDirective> {
        self.directives.iter()
    }

    /// Returns the directives as a slice.
    pub fn as_slice(&self) -> &[TimingDirective] {
        &self.directives
    }

    /// Returns the number of directives.
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Returns `true` if there are no directives.
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Returns every false-path exception.
    pub fn false_paths(&self) -> impl Iterator<Item = (&[String], &[String])> {
        self.directives.iter().filter_map(|d| match d {
            TimingDirective::FalsePath { from, to } => Some((from.as_slice(), to.as_slice())),
            _ => None,
        })
    }

    /// Returns every asynchronous clock group.
    pub fn asynchronous_groups(&self) -> impl Iterator<Item = &[String]> {
        self.directives.iter().filter_map(|d| match d {
            TimingDirective::ClockGroups { asynchronous } => Some(asynchronous.as_slice()),
            _ => None,
        })
    }

    /// Returns the generated clock directive for `domain`, if any.
    pub fn find_generated(&self, domain: &str) -> Option<&TimingDirective> {
        self.directives.iter().find(|d| {
            matches!(d, TimingDirective::GeneratedClock { domain: name, .. } if name == domain)
        })
    }

    /// Renders the directives as SDC commands, one per line.
    pub fn to_sdc(&self) -> String {
        let mut out = String::new();
        for directive in &self.directives {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{}", directive.to_sdc());
        }
        out
    }
}

impl<'a> IntoIterator for &'a TimingConstraints {
    type Item = &'a TimingDirective;
    type IntoIter = std::slice::Iter<'a, TimingDirective>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// One timing directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingDirective {
    /// Period constraint on a board clock input (`create_clock` on a port).
    ClockPeriod {
        /// The input resource name.
        clock: String,
        /// The physical pin the clock enters on.
        pin: String,
        /// The clock frequency.
        frequency: Frequency,
    },
    /// A PLL output clock derived from a board clock.
    GeneratedClock {
        /// The generated domain.
        domain: String,
        /// The source clock input.
        source: String,
        /// Overall multiplication factor (M).
        multiply: u32,
        /// Overall division factor (N × C).
        divide: u32,
        /// Phase offset.
        phase: Phase,
    },
    /// Paths excluded from timing analysis.
    FalsePath {
        /// Source ports or clocks.
        from: Vec<String>,
        /// Destination ports or clocks; empty means any.
        to: Vec<String>,
    },
    /// A clock not generated by the PLL (e.g. the JTAG test clock).
    CreateClock {
        /// Clock name, also its port.
        name: String,
        /// The clock frequency.
        frequency: Frequency,
    },
    /// Clocks with no timing relationship to any other clock.
    ClockGroups {
        /// Members of the asynchronous group.
        asynchronous: Vec<String>,
    },
}

impl TimingDirective {
    /// Renders this directive as one SDC command.
    pub fn to_sdc(&self) -> String {
        match self {
            TimingDirective::ClockPeriod {
                clock, frequency, ..
            } => format!(
                "create_clock -name {clock} -period {:.3} [get_ports {{{clock}}}]",
                frequency.period_ns()
            ),
            TimingDirective::GeneratedClock {
                domain,
                source,
                multiply,
                divide,
                phase,
            } => {
                let mut cmd = format!(
                    "create_generated_clock -name {domain} -source [get_ports {{{source}}}] -multiply_by {multiply} -divide_by {divide}"
                );
                if phase.degrees() != 0 {
                    let _ = write!(cmd, " -phase {}", phase.degrees());
                }
                cmd
            }
            TimingDirective::FalsePath { from, to } => {
                let mut cmd = String::from("set_false_path");
                if !from.is_empty() {
                    let _ = write!(cmd, " -from [get_ports {{{}}}]", from.join(" "));
                }
                if !to.is_empty() {
                    let _ = write!(cmd, " -to [get_ports {{{}}}]", to.join(" "));
                }
                cmd
            }
            TimingDirective::CreateClock { name, frequency } => format!(
                "create_clock -name {name} -period {:.3} [get_ports {{{name}}}]",
                frequency.period_ns()
            ),
            TimingDirective::ClockGroups { asynchronous } => format!(
                "set_clock_groups -asynchronous -group [get_clocks {{{}}}]",
                asynchronous.join(" ")
            ),
        }
    }
}
