//! I/O resource definitions and their resolved forms.

use crate::connector::Connector;
use crate::error::RegistryError;
use crate::pin::{parse_pin_list, PinReference};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The `(name, index)` identity of an I/O resource.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    /// The logical signal name (e.g. `"user_led"`).
    pub name: String,
    /// The instance index under that name.
    pub index: u32,
}

impl ResourceKey {
    /// Creates a resource key.
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.index)
    }
}

/// A named part of a multi-signal resource (e.g. the `dq` bus of an SDRAM).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsignal {
    /// The subsignal name.
    pub name: String,
    /// Pins in bit order.
    pub pins: Vec<PinReference>,
    /// I/O standard override for this subsignal only.
    #[serde(default)]
    pub io_standard: Option<String>,
    /// Vendor attributes applying to this subsignal only.
    #[serde(default)]
    pub misc: BTreeMap<String, String>,
}

impl Subsignal {
    /// Creates a subsignal from a whitespace-separated pin list.
    pub fn new(name: impl Into<String>, pins: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            name: name.into(),
            pins: parse_pin_list(pins)?,
            io_standard: None,
            misc: BTreeMap::new(),
        })
    }

    /// Adds a vendor attribute.
    pub fn misc(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.misc.insert(key.into(), value.into());
        self
    }

    /// Overrides the I/O standard for this subsignal.
    pub fn io_standard(mut self, standard: impl Into<String>) -> Self {
        self.io_standard = Some(standard.into());
        self
    }
}

/// The signal shape of a resource: a flat pin list or named subsignals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signals {
    /// A single (possibly multi-bit) signal.
    Pins(Vec<PinReference>),
    /// An ordered group of named subsignals.
    Subsignals(Vec<Subsignal>),
}

/// A logical I/O resource as defined in a board table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoResource {
    /// The `(name, index)` identity.
    pub key: ResourceKey,
    /// Pins or subsignals, possibly connector-relative.
    pub signals: Signals,
    /// Electrical I/O standard (e.g. `"3.3-V LVTTL"`).
    pub io_standard: Option<String>,
    /// Vendor attributes (e.g. `FAST_OUTPUT_REGISTER = "ON"`).
    pub misc: BTreeMap<String, String>,
}

impl IoResource {
    /// Creates a flat resource from a whitespace-separated pin list.
    pub fn with_pins(
        name: impl Into<String>,
        index: u32,
        pins: &str,
        io_standard: impl Into<String>,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            key: ResourceKey::new(name, index),
            signals: Signals::Pins(parse_pin_list(pins)?),
            io_standard: Some(io_standard.into()),
            misc: BTreeMap::new(),
        })
    }

    /// Creates a resource made of named subsignals.
    pub fn with_subsignals(
        name: impl Into<String>,
        index: u32,
        subsignals: Vec<Subsignal>,
        io_standard: Option<String>,
    ) -> Self {
        Self {
            key: ResourceKey::new(name, index),
            signals: Signals::Subsignals(subsignals),
            io_standard,
            misc: BTreeMap::new(),
        }
    }

    /// Adds a vendor attribute applying to the whole resource.
    pub fn misc(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.misc.insert(key.into(), value.into());
        self
    }

    /// Checks that the resource and every subsignal have at least one pin.
    pub(crate) fn check_non_empty(&self) -> Result<(), RegistryError> {
        let empty = |subsignal: Option<&str>| RegistryError::EmptyPinList {
            resource: self.key.clone(),
            subsignal: subsignal.map(str::to_string),
        };
        match &self.signals {
            Signals::Pins(pins) if pins.is_empty() => Err(empty(None)),
            Signals::Pins(_) => Ok(()),
            Signals::Subsignals(subs) if subs.is_empty() => Err(empty(None)),
            Signals::Subsignals(subs) => match subs.iter().find(|s| s.pins.is_empty()) {
                Some(sub) => Err(empty(Some(&sub.name))),
                None => Ok(()),
            },
        }
    }

    /// Resolves every pin reference through `connectors`.
    pub fn resolve(
        &self,
        connectors: &BTreeMap<String, Connector>,
    ) -> Result<ResolvedResource, RegistryError> {
        let resolve_pins = |pins: &[PinReference]| -> Result<Vec<String>, RegistryError> {
            pins.iter()
                .map(|pin| {
                    pin.resolve(connectors)
                        .map(str::to_string)
                        .map_err(|fault| RegistryError::UnresolvedReference {
                            resource: self.key.clone(),
                            reference: pin.to_string(),
                            fault,
                        })
                })
                .collect()
        };

        let signals = match &self.signals {
            Signals::Pins(pins) => ResolvedSignals::Pins(resolve_pins(pins)?),
            Signals::Subsignals(subs) => ResolvedSignals::Subsignals(
                subs.iter()
                    .map(|sub| {
                        Ok(ResolvedSubsignal {
                            name: sub.name.clone(),
                            pins: resolve_pins(&sub.pins)?,
                            io_standard: sub
                                .io_standard
                                .clone()
                                .or_else(|| self.io_standard.clone()),
                            misc: sub.misc.clone(),
                        })
                    })
                    .collect::<Result<_, RegistryError>>()?,
            ),
        };

        Ok(ResolvedResource {
            name: self.key.name.clone(),
            index: self.key.index,
            signals,
            io_standard: self.io_standard.clone(),
            misc: self.misc.clone(),
        })
    }
}

/// A subsignal with physical pins and its effective I/O standard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSubsignal {
    /// The subsignal name.
    pub name: String,
    /// Physical pins in bit order.
    pub pins: Vec<String>,
    /// The subsignal override, else the resource's standard.
    pub io_standard: Option<String>,
    /// Vendor attributes applying to this subsignal only.
    pub misc: BTreeMap<String, String>,
}

/// Resolved signal shape: only physical pin identifiers remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedSignals {
    /// A single (possibly multi-bit) signal.
    Pins(Vec<String>),
    /// An ordered group of named subsignals.
    Subsignals(Vec<ResolvedSubsignal>),
}

/// An I/O resource with every connector reference replaced by its package pin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
    /// The logical signal name.
    pub name: String,
    /// The instance index.
    pub index: u32,
    /// Resolved pins or subsignals.
    pub signals: ResolvedSignals,
    /// Electrical I/O standard of the resource.
    pub io_standard: Option<String>,
    /// Vendor attributes applying to the whole resource.
    pub misc: BTreeMap<String, String>,
}

impl ResolvedResource {
    /// Returns the `(name, index)` identity.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.name.clone(), self.index)
    }

    /// Returns every physical pin, subsignals flattened in declaration order.
    pub fn pins(&self) -> Vec<&str> {
        match &self.signals {
            ResolvedSignals::Pins(pins) => pins.iter().map(String::as_str).collect(),
            ResolvedSignals::Subsignals(subs) => subs
                .iter()
                .flat_map(|s| s.pins.iter().map(String::as_str))
                .collect(),
        }
    }

    /// Returns the total number of pins.
    pub fn width(&self) -> usize {
        match &self.signals {
            ResolvedSignals::Pins(pins) => pins.len(),
            ResolvedSignals::Subsignals(subs) => subs.iter().map(|s| s.pins.len()).sum(),
        }
    }

    /// Looks up a subsignal by name.
    pub fn subsignal(&self, name: &str) -> Option<&ResolvedSubsignal> {
        match &self.signals {
            ResolvedSignals::Pins(_) => None,
            ResolvedSignals::Subsignals(subs) => subs.iter().find(|s| s.name == name),
        }
    }
}
