//! Pin references: direct package pins or connector-relative header positions.

use crate::connector::Connector;
use crate::error::{ReferenceFault, RegistryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A pin as written in a board's I/O table.
///
/// `"M9"` is a direct package pin; `"JP1:10"` is position 10 of header `JP1`
/// and must be resolved through the matching [`Connector`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PinReference {
    /// A physical package pin identifier.
    Direct(String),
    /// A 1-based position on a named header connector.
    Connector {
        /// The connector name.
        connector: String,
        /// The 1-based header position.
        position: u32,
    },
}

impl PinReference {
    /// Creates a direct pin reference.
    pub fn direct(pin: impl Into<String>) -> Self {
        PinReference::Direct(pin.into())
    }

    /// Creates a connector-relative pin reference.
    pub fn on_connector(connector: impl Into<String>, position: u32) -> Self {
        PinReference::Connector {
            connector: connector.into(),
            position,
        }
    }

    /// Resolves this reference to a physical pin identifier.
    pub fn resolve<'a>(
        &'a self,
        connectors: &'a BTreeMap<String, Connector>,
    ) -> Result<&'a str, ReferenceFault> {
        match self {
            PinReference::Direct(pin) => Ok(pin.as_str()),
            PinReference::Connector {
                connector,
                position,
            } => connectors
                .get(connector)
                .ok_or(ReferenceFault::UnknownConnector)?
                .resolve(*position),
        }
    }
}

impl fmt::Display for PinReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinReference::Direct(pin) => f.write_str(pin),
            PinReference::Connector {
                connector,
                position,
            } => write!(f, "{connector}:{position}"),
        }
    }
}

impl FromStr for PinReference {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || RegistryError::InvalidPinReference(s.to_string());
        if s.is_empty() || s.contains(char::is_whitespace) {
            return Err(invalid());
        }
        match s.split_once(':') {
            Some((connector, position)) => {
                if connector.is_empty() {
                    return Err(invalid());
                }
                let position: u32 = position.parse().map_err(|_| invalid())?;
                Ok(PinReference::on_connector(connector, position))
            }
            None => Ok(PinReference::direct(s)),
        }
    }
}

impl From<PinReference> for String {
    fn from(value: PinReference) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PinReference {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parses a whitespace-separated pin list such as `"A9  B10 C9  A5"` or
/// `"JP1:1 JP1:2"`.
pub fn parse_pin_list(s: &str) -> Result<Vec<PinReference>, RegistryError> {
    s.split_whitespace().map(str::parse).collect()
}
