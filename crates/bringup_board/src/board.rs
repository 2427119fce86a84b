//! Board description schema.

use crate::error::BoardError;
use bringup_clock::{DomainRequest, Oscillator, PllFamily, PllSpec, SpeedGrade};
use bringup_common::Frequency;
use bringup_registry::{
    parse_pin_list, Connector, IoResource, Registry, RegistryBuilder, ResourceKey, Signals,
    Subsignal,
};
use bringup_timing::TimingSources;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A complete board description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDefinition {
    /// Catalog name (e.g. `"terasic_de0cv"`).
    pub name: String,
    /// Human-readable board name.
    #[serde(default)]
    pub description: String,
    /// FPGA part number.
    pub device: String,
    /// Programming cable, informational only.
    #[serde(default)]
    pub programmer: Option<String>,
    /// The PLL family and speed grade.
    pub pll: PllSection,
    /// Reference oscillator, reset and fixed clock domains.
    pub clocks: ClockSection,
    /// External memory wiring, if the board has any.
    #[serde(default)]
    pub memory: Option<MemorySection>,
    /// Header connectors as position tables starting at 1 (`-` = absent).
    #[serde(default)]
    pub connectors: BTreeMap<String, String>,
    /// The I/O table.
    #[serde(default)]
    pub io: Vec<IoEntry>,
}

/// PLL family and speed grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PllSection {
    /// The PLL family.
    pub family: PllFamily,
    /// The device speed grade.
    pub speed_grade: SpeedGrade,
}

/// Board clocking facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSection {
    /// The reference oscillator input resource.
    pub reference: String,
    /// The reference oscillator frequency.
    pub frequency: Frequency,
    /// The reset input resource.
    pub reset: String,
    /// Name of the primary system domain.
    #[serde(default = "default_primary")]
    pub primary: String,
    /// System clock used when the build configuration gives none.
    pub default_sys_clk_freq: Frequency,
    /// JTAG or other test clock outside the PLL.
    #[serde(default)]
    pub debug: Option<DebugClockSection>,
    /// Domains requested in every build (e.g. the video pixel clock).
    #[serde(default)]
    pub fixed: Vec<FixedDomain>,
}

fn default_primary() -> String {
    "sys".to_string()
}

/// A debug clock entering the fabric directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugClockSection {
    /// Clock and port name.
    pub name: String,
    /// Clock frequency.
    pub frequency: Frequency,
}

/// A fixed auxiliary clock domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDomain {
    /// Domain name.
    pub name: String,
    /// Domain frequency.
    pub frequency: Frequency,
}

/// External memory wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemorySection {
    /// The memory bus resource.
    pub resource: String,
    /// The resource the memory clock is driven out on.
    pub clock_output: String,
    /// The memory chip model.
    pub module: String,
}

/// One row of the I/O table.
///
/// Exactly one of `pins`, `each` or `subsignals` must be given. `each` expands
/// into one single-pin resource per listed pin, indexed from `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoEntry {
    /// Logical signal name.
    pub name: String,
    /// Instance index (first index for `each`).
    #[serde(default)]
    pub index: u32,
    /// Whitespace-separated pin list.
    #[serde(default)]
    pub pins: Option<String>,
    /// Whitespace-separated pins, one resource each.
    #[serde(default)]
    pub each: Option<String>,
    /// Named subsignals.
    #[serde(default)]
    pub subsignals: Vec<SubsignalEntry>,
    /// Resource I/O standard.
    #[serde(default)]
    pub io_standard: Option<String>,
    /// Resource vendor attributes.
    #[serde(default)]
    pub misc: BTreeMap<String, String>,
}

/// One subsignal of an I/O table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsignalEntry {
    /// Subsignal name.
    pub name: String,
    /// Whitespace-separated pin list.
    pub pins: String,
    /// I/O standard override.
    #[serde(default)]
    pub io_standard: Option<String>,
    /// Subsignal vendor attributes.
    #[serde(default)]
    pub misc: BTreeMap<String, String>,
}

impl IoEntry {
    /// Converts the row into registry resources.
    pub fn to_resources(&self) -> Result<Vec<IoResource>, BoardError> {
        let invalid = |reason: &str| BoardError::InvalidEntry {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        let shapes = usize::from(self.pins.is_some())
            + usize::from(self.each.is_some())
            + usize::from(!self.subsignals.is_empty());
        if shapes != 1 {
            return Err(invalid("expected exactly one of `pins`, `each` or `subsignals`"));
        }

        let resources = if let Some(pins) = &self.pins {
            vec![self.flat(self.index, pins)?]
        } else if let Some(each) = &self.each {
            let mut out = Vec::new();
            for (offset, pin) in each.split_whitespace().enumerate() {
                let index = u32::try_from(offset)
                    .ok()
                    .and_then(|offset| self.index.checked_add(offset))
                    .ok_or_else(|| invalid("index overflows u32"))?;
                out.push(self.flat(index, pin)?);
            }
            if out.is_empty() {
                return Err(invalid("`each` lists no pins"));
            }
            out
        } else {
            let subsignals = self
                .subsignals
                .iter()
                .map(SubsignalEntry::to_subsignal)
                .collect::<Result<Vec<_>, _>>()?;
            let mut resource = IoResource::with_subsignals(
                self.name.clone(),
                self.index,
                subsignals,
                self.io_standard.clone(),
            );
            resource.misc = self.misc.clone();
            vec![resource]
        };
        Ok(resources)
    }

    fn flat(&self, index: u32, pins: &str) -> Result<IoResource, BoardError> {
        Ok(IoResource {
            key: ResourceKey::new(self.name.clone(), index),
            signals: Signals::Pins(parse_pin_list(pins)?),
            io_standard: self.io_standard.clone(),
            misc: self.misc.clone(),
        })
    }
}

impl SubsignalEntry {
    fn to_subsignal(&self) -> Result<Subsignal, BoardError> {
        let mut sub = Subsignal::new(self.name.clone(), &self.pins)?;
        sub.io_standard = self.io_standard.clone();
        sub.misc = self.misc.clone();
        Ok(sub)
    }
}

impl BoardDefinition {
    /// Parses a board description from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, BoardError> {
        toml::from_str(source).map_err(|e| BoardError::ParseError(e.to_string()))
    }

    /// Builds the frozen constraint registry for this board.
    pub fn registry(&self) -> Result<Registry, BoardError> {
        let mut builder = RegistryBuilder::new();
        for (name, table) in &self.connectors {
            builder.add_connector(Connector::parse(name.clone(), table))?;
        }
        for entry in &self.io {
            for resource in entry.to_resources()? {
                builder.define(resource)?;
            }
        }
        let registry = builder.build()?;
        tracing::debug!(board = %self.name, resources = registry.len(), "board registry built");
        Ok(registry)
    }

    /// Returns the board's PLL.
    pub fn pll_spec(&self) -> PllSpec {
        PllSpec {
            family: self.pll.family,
            grade: self.pll.speed_grade,
        }
    }

    /// Returns the reference oscillator.
    pub fn oscillator(&self) -> Oscillator {
        Oscillator::new(self.clocks.reference.clone(), self.clocks.frequency)
    }

    /// Returns the domain requests for one build: the primary system clock at
    /// `sys_clk_freq`, followed by the board's fixed domains.
    pub fn clock_requests(&self, sys_clk_freq: Frequency) -> Vec<DomainRequest> {
        std::iter::once(DomainRequest::primary(
            self.clocks.primary.clone(),
            sys_clk_freq,
        ))
        .chain(
            self.clocks
                .fixed
                .iter()
                .map(|d| DomainRequest::auxiliary(d.name.clone(), d.frequency)),
        )
        .collect()
    }

    /// Returns the reset and debug clock inputs for timing emission.
    pub fn timing_sources(&self) -> TimingSources {
        let sources = TimingSources::new(self.clocks.reset.clone());
        match &self.clocks.debug {
            Some(debug) => sources.with_debug_clock(debug.name.clone(), debug.frequency),
            None => sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bringup_registry::RegistryError;

    const MINIMAL: &str = r#"
name = "tiny"
device = "5CEBA4F23C7"

[pll]
family = "cyclone_v"
speed_grade = "-C6"

[clocks]
reference = "clk"
frequency = "50MHz"
reset = "rst"
default_sys_clk_freq = "50MHz"

[connectors]
H = "A1 - B2"

[[io]]
name = "clk"
pins = "A0"
io_standard = "LVTTL"

[[io]]
name = "rst"
pins = "H:3"
"#;

    #[test]
    fn parse_minimal_board() {
        let board = BoardDefinition::from_toml_str(MINIMAL).unwrap();
        assert_eq!(board.clocks.primary, "sys");
        assert_eq!(board.pll_spec(), PllSpec::cyclone_v(SpeedGrade::C6));
        assert!(board.memory.is_none());
        let registry = board.registry().unwrap();
        assert_eq!(registry.resolve("rst", 0).unwrap().pins(), vec!["B2"]);
        assert_eq!(registry.resolve("rst", 0).unwrap().io_standard, None);
    }

    #[test]
    fn absent_connector_position_fails_build() {
        let source = MINIMAL.replace("H:3", "H:2");
        let board = BoardDefinition::from_toml_str(&source).unwrap();
        assert!(matches!(
            board.registry(),
            Err(BoardError::Registry(RegistryError::UnresolvedReference { .. }))
        ));
    }

    #[test]
    fn each_expands_indices() {
        let entry = IoEntry {
            name: "led".into(),
            index: 0,
            pins: None,
            each: Some("A1 A2 A3".into()),
            subsignals: Vec::new(),
            io_standard: Some("LVTTL".into()),
            misc: BTreeMap::new(),
        };
        let resources = entry.to_resources().unwrap();
        let indices: Vec<u32> = resources.iter().map(|r| r.key.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn each_index_overflow_is_rejected() {
        let entry = IoEntry {
            name: "led".into(),
            index: u32::MAX,
            pins: None,
            each: Some("A1 A2".into()),
            subsignals: Vec::new(),
            io_standard: None,
            misc: BTreeMap::new(),
        };
        assert_eq!(
            entry.to_resources(),
            Err(BoardError::InvalidEntry {
                name: "led".into(),
                reason: "index overflows u32".into(),
            })
        );

        let last = IoEntry {
            each: Some("A1".into()),
            ..entry
        };
        assert_eq!(last.to_resources().unwrap()[0].key.index, u32::MAX);
    }

    #[test]
    fn entry_needs_exactly_one_shape() {
        let entry = IoEntry {
            name: "bad".into(),
            index: 0,
            pins: Some("A1".into()),
            each: Some("A2".into()),
            subsignals: Vec::new(),
            io_standard: None,
            misc: BTreeMap::new(),
        };
        assert!(matches!(
            entry.to_resources(),
            Err(BoardError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn malformed_toml() {
        assert!(matches!(
            BoardDefinition::from_toml_str("name = "),
            Err(BoardError::ParseError(_))
        ));
    }
}
