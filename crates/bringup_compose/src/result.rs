//! The composed description of one build.

use crate::console::ConsoleResolution;
use crate::features::SubsystemDirective;
use crate::flags::FeatureFlags;
use bringup_clock::{ClockDomainSet, GeneratorPlan};
use bringup_common::Fingerprint;
use bringup_registry::Registry;
use bringup_timing::TimingConstraints;
use serde::Serialize;

/// Everything a downstream generator needs for one build. Immutable once
/// built.
#[derive(Debug, Clone, Serialize)]
pub struct CompositionResult {
    /// Board catalog name.
    pub board: String,
    /// FPGA part number.
    pub device: String,
    /// Validated feature selection.
    pub flags: FeatureFlags,
    /// Resolved console transport.
    pub console: ConsoleResolution,
    /// Frozen constraint registry.
    pub registry: Registry,
    /// PLL settings and active clock domains.
    pub clocks: GeneratorPlan,
    /// Timing directives.
    pub timing: TimingConstraints,
    /// Subsystem directives in instantiation order.
    pub directives: Vec<SubsystemDirective>,
}

impl CompositionResult {
    /// Returns the active clock domains.
    pub fn domains(&self) -> &ClockDomainSet {
        self.clocks.domains()
    }

    /// Renders the result as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fingerprints the canonical JSON rendering.
    ///
    /// Equal fingerprints mean byte-identical output.
    pub fn fingerprint(&self) -> Result<Fingerprint, serde_json::Error> {
        Fingerprint::of_json(self)
    }

    /// Renders a short human-readable summary.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("board   {} ({})", self.board, self.device)];
        let cfg = self.clocks.config();
        lines.push(format!(
            "pll     {} x{}/{} -> vco {}",
            self.clocks.oscillator().frequency,
            cfg.multiply,
            cfg.pre_divide,
            cfg.vco
        ));
        for domain in self.domains().iter() {
            lines.push(format!(
                "domain  {:<10} {:>12} {:>5}  /{}",
                domain.name,
                domain.frequency.to_string(),
                domain.phase.to_string(),
                domain.provenance.divide
            ));
        }
        lines.push(format!(
            "console {} -> {}",
            self.console.requested, self.console.resolved
        ));
        for directive in &self.directives {
            let line = match directive {
                SubsystemDirective::MemoryInterface {
                    module,
                    clock_domain,
                    rate,
                    ..
                } => format!("memory  {module} rate {rate} clocked by {clock_domain}"),
                SubsystemDirective::Video {
                    mode,
                    timings,
                    clock_domain,
                    ..
                } => format!("video   {mode} {timings} in {clock_domain}"),
                SubsystemDirective::StatusIndicators { resource, pins } => {
                    format!("leds    {resource} x{}", pins.len())
                }
                SubsystemDirective::Storage { resource, mode } => {
                    format!("storage {resource} ({mode})")
                }
            };
            lines.push(line);
        }
        lines.push(format!("timing  {} directives", self.timing.len()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use crate::pipeline::compose_build;
    use bringup_config::BuildConfig;

    #[test]
    fn summary_uses_mode_names() {
        let mut config = BuildConfig::default();
        config.features.video_terminal = true;
        config.features.spi_sdcard = true;
        let summary = compose_build(&config).unwrap().summary();
        assert!(summary.contains("video   terminal 640x480@60Hz in vga"));
        assert!(summary.contains("storage spisdcard (spi)"));
    }
}
