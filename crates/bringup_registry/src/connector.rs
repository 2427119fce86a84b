//! Header connectors addressed by 1-based pin position.

use crate::error::ReferenceFault;
use serde::Serialize;

/// Marker used in connector tables for a position with no FPGA pin.
const ABSENT: &str = "-";

/// A physical header whose pins are addressed by position.
///
/// Positions are 1-based. Power and ground positions carry no FPGA pin and
/// are stored as absent; referencing them is an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connector {
    name: String,
    positions: Vec<Option<String>>,
}

impl Connector {
    /// Creates a connector from an explicit position list (`positions[0]` is
    /// position 1).
    pub fn new(name: impl Into<String>, positions: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            positions,
        }
    }

    /// Parses a whitespace-separated table starting at position 1, where `-`
    /// marks an absent position.
    pub fn parse(name: impl Into<String>, table: &str) -> Self {
        let positions = table
            .split_whitespace()
            .map(|tok| (tok != ABSENT).then(|| tok.to_string()))
            .collect();
        Self::new(name, positions)
    }

    /// Returns the connector name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of header positions (present or absent).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the connector has no positions at all.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the physical pin at `position`, if present.
    pub fn pin(&self, position: u32) -> Option<&str> {
        self.resolve(position).ok()
    }

    /// Resolves a 1-based position to its physical pin identifier.
    pub fn resolve(&self, position: u32) -> Result<&str, ReferenceFault> {
        let slot = position
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| self.positions.get(i))
            .ok_or(ReferenceFault::OutOfRange)?;
        slot.as_deref().ok_or(ReferenceFault::AbsentPosition)
    }

    /// Iterates over present positions as `(position, pin)` pairs.
    pub fn present(&self) -> impl Iterator<Item = (u32, &str)> {
        (1u32..)
            .zip(&self.positions)
            .filter_map(|(position, slot)| slot.as_deref().map(|pin| (position, pin)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jp1_head() -> Connector {
        Connector::parse(
            "JP1",
            "N16 B16 M16 C16 D17 K20 K21 K22 K20 M21 -   -  N21 R22",
        )
    }

    #[test]
    fn positions_are_one_based() {
        let jp1 = jp1_head();
        assert_eq!(jp1.resolve(1), Ok("N16"));
        assert_eq!(jp1.resolve(10), Ok("M21"));
        assert_eq!(jp1.resolve(13), Ok("N21"));
    }

    #[test]
    fn absent_positions_fail() {
        let jp1 = jp1_head();
        assert_eq!(jp1.resolve(11), Err(ReferenceFault::AbsentPosition));
        assert_eq!(jp1.resolve(12), Err(ReferenceFault::AbsentPosition));
        assert_eq!(jp1.pin(12), None);
    }

    #[test]
    fn out_of_range_positions_fail() {
        let jp1 = jp1_head();
        assert_eq!(jp1.resolve(0), Err(ReferenceFault::OutOfRange));
        assert_eq!(jp1.resolve(15), Err(ReferenceFault::OutOfRange));
    }

    #[test]
    fn present_skips_gaps() {
        let jp1 = jp1_head();
        assert_eq!(jp1.len(), 14);
        let present: Vec<u32> = jp1.present().map(|(pos, _)| pos).collect();
        assert_eq!(present.len(), 12);
        assert!(!present.contains(&11));
        assert!(!present.contains(&12));
    }

    #[test]
    fn present_positions_match_resolve() {
        let jp1 = jp1_head();
        let present: Vec<(u32, &str)> = jp1.present().collect();
        assert_eq!(present.first(), Some(&(1, "N16")));
        assert_eq!(present.last(), Some(&(14, "R22")));
        for (position, pin) in present {
            assert_eq!(jp1.resolve(position), Ok(pin));
        }
        assert_eq!(jp1.len(), jp1.present().count() + 2);
    }
}
