//! Error types for timing directive emission.

/// Errors raised while deriving timing directives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    /// The board's reset input is not present in the registry.
    #[error("reset pin '{0}' does not resolve in the registry")]
    MissingResetPin(String),

    /// The reference oscillator input is not present in the registry.
    #[error("reference clock pin '{0}' does not resolve in the registry")]
    MissingClockPin(String),
}
