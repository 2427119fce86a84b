//! Error types for feature validation and composition.

use bringup_board::BoardError;
use bringup_clock::ClockError;
use bringup_timing::TimingError;
use serde::Serialize;
use std::fmt;

/// Something an enabled feature needs from the board or the clock plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Dependency {
    /// An I/O resource (any index).
    Resource(String),
    /// A clock domain.
    Domain(String),
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::Resource(name) => write!(f, "I/O resource '{name}'"),
            Dependency::Domain(name) => write!(f, "clock domain '{name}'"),
        }
    }
}

/// Errors raised while validating feature flags or wiring features.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeatureError {
    /// Two options from the same exclusion group were both enabled.
    #[error("conflicting options: {first} and {second} cannot be enabled together")]
    ConflictingFeatureFlags {
        /// The first flag, in group order.
        first: String,
        /// The second flag.
        second: String,
    },

    /// An enabled feature needs something the board or plan does not provide.
    #[error("{feature} requires {missing}, which is not available")]
    MissingDependency {
        /// The feature being wired.
        feature: String,
        /// What it needs.
        missing: Dependency,
    },

    /// The rate mode string is neither `"1:1"` nor `"1:2"`.
    #[error(transparent)]
    InvalidRateMode(ClockError),
}

impl FeatureError {
    pub(crate) fn conflict(first: &str, second: &str) -> Self {
        FeatureError::ConflictingFeatureFlags {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub(crate) fn missing_resource(feature: &str, resource: &str) -> Self {
        FeatureError::MissingDependency {
            feature: feature.to_string(),
            missing: Dependency::Resource(resource.to_string()),
        }
    }

    pub(crate) fn missing_domain(feature: &str, domain: &str) -> Self {
        FeatureError::MissingDependency {
            feature: feature.to_string(),
            missing: Dependency::Domain(domain.to_string()),
        }
    }
}

/// Errors raised by the composition pipeline.
///
/// Each stage's error is wrapped unchanged; the first failing stage wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// Feature flags were rejected or a feature could not be wired.
    #[error(transparent)]
    Feature(#[from] FeatureError),

    /// The board could not be loaded.
    #[error(transparent)]
    Board(#[from] BoardError),

    /// No clock plan satisfies the requested domains.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// Timing directives could not be derived.
    #[error(transparent)]
    Timing(#[from] TimingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_conflict_names_both_flags() {
        let err = FeatureError::conflict("with_video_terminal", "with_video_framebuffer");
        assert_eq!(
            err.to_string(),
            "conflicting options: with_video_terminal and with_video_framebuffer cannot be enabled together"
        );
    }

    #[test]
    fn display_missing_dependency() {
        assert_eq!(
            FeatureError::missing_resource("video", "vga").to_string(),
            "video requires I/O resource 'vga', which is not available"
        );
        assert_eq!(
            FeatureError::missing_domain("memory", "sys_ps").to_string(),
            "memory requires clock domain 'sys_ps', which is not available"
        );
    }

    #[test]
    fn compose_error_is_transparent() {
        let err: ComposeError = ClockError::MissingPrimaryDomain.into();
        assert_eq!(err.to_string(), "no clock domain is marked as primary");
    }
}
