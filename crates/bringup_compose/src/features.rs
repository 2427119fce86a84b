//! Subsystem wiring for validated feature flags.

use crate::error::FeatureError;
use crate::flags::{FeatureFlags, MemoryMode, StorageMode, VideoMode};
use bringup_board::MemorySection;
use bringup_clock::{ClockDomainSet, Topology};
use bringup_registry::Registry;
use serde::Serialize;

/// Video output resource and pixel clock domain.
pub const VIDEO_RESOURCE: &str = "vga";
/// Pixel clock domain driving the video PHY.
pub const VIDEO_DOMAIN: &str = "vga";
/// Video mode timings.
pub const VIDEO_TIMINGS: &str = "640x480@60Hz";
/// Status indicator LEDs.
pub const LED_RESOURCE: &str = "user_led";
/// SD card wired for SPI mode.
pub const SPI_SDCARD_RESOURCE: &str = "spisdcard";
/// SD card wired for native mode.
pub const SDCARD_RESOURCE: &str = "sdcard";

/// SDRAM PHY variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PhyVariant {
    /// Single data rate PHY at the system clock.
    #[serde(rename = "GENSDRPHY")]
    GenSdr,
    /// Half-rate PHY, memory clocked at twice the system clock.
    #[serde(rename = "HalfRateGENSDRPHY")]
    HalfRateGenSdr,
}

impl PhyVariant {
    /// The PHY matching a memory clocking topology.
    pub fn for_topology(topology: Topology) -> Self {
        match topology {
            Topology::FullRate => PhyVariant::GenSdr,
            Topology::HalfRate => PhyVariant::HalfRateGenSdr,
        }
    }
}

/// One subsystem to instantiate, with the resources and domains it binds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubsystemDirective {
    /// External SDRAM controller.
    MemoryInterface {
        /// Memory bus resource.
        resource: String,
        /// Resource the memory clock is driven out on.
        clock_output: String,
        /// Domain driving the memory clock output.
        clock_domain: String,
        /// Rate mode.
        rate: Topology,
        /// PHY variant.
        phy: PhyVariant,
        /// Memory chip model.
        module: String,
        /// L2 cache size in bytes.
        l2_size: u32,
    },
    /// VGA video output.
    Video {
        /// Video resource.
        resource: String,
        /// Pixel clock domain.
        clock_domain: String,
        /// Terminal or framebuffer.
        mode: VideoMode,
        /// Mode timings.
        timings: String,
    },
    /// LED chaser.
    StatusIndicators {
        /// LED resource name.
        resource: String,
        /// One pin per LED, in index order.
        pins: Vec<String>,
    },
    /// SD card storage.
    Storage {
        /// SD card resource.
        resource: String,
        /// SPI or native mode.
        mode: StorageMode,
    },
}

/// Wires every enabled feature against the registry and the active domains.
///
/// Directives are ordered memory interface, video, status indicators, storage.
/// The first missing resource or domain rejects the whole composition.
pub fn compose(
    flags: &FeatureFlags,
    registry: &Registry,
    domains: &ClockDomainSet,
    memory: Option<&MemorySection>,
) -> Result<Vec<SubsystemDirective>, FeatureError> {
    let mut directives = Vec::new();

    if let MemoryMode::External { l2_size } = flags.memory {
        const FEATURE: &str = "memory";
        let memory = memory.ok_or_else(|| FeatureError::missing_resource(FEATURE, "sdram"))?;
        require_resource(registry, FEATURE, &memory.resource)?;
        require_resource(registry, FEATURE, &memory.clock_output)?;
        let clock_domain = flags.topology.memory_clock_domain(&domains.primary().name);
        require_domain(domains, FEATURE, &clock_domain)?;
        directives.push(SubsystemDirective::MemoryInterface {
            resource: memory.resource.clone(),
            clock_output: memory.clock_output.clone(),
            clock_domain,
            rate: flags.topology,
            phy: PhyVariant::for_topology(flags.topology),
            module: memory.module.clone(),
            l2_size,
        });
    }

    if flags.video != VideoMode::None {
        const FEATURE: &str = "video";
        require_resource(registry, FEATURE, VIDEO_RESOURCE)?;
        require_domain(domains, FEATURE, VIDEO_DOMAIN)?;
        directives.push(SubsystemDirective::Video {
            resource: VIDEO_RESOURCE.to_string(),
            clock_domain: VIDEO_DOMAIN.to_string(),
            mode: flags.video,
            timings: VIDEO_TIMINGS.to_string(),
        });
    }

    if flags.status_indicators {
        let leds = registry
            .request_all(LED_RESOURCE)
            .map_err(|_| FeatureError::missing_resource("status_indicators", LED_RESOURCE))?;
        let pins = leds
            .iter()
            .flat_map(|led| led.pins())
            .map(str::to_string)
            .collect();
        directives.push(SubsystemDirective::StatusIndicators {
            resource: LED_RESOURCE.to_string(),
            pins,
        });
    }

    let storage = match flags.storage {
        StorageMode::None => None,
        StorageMode::Spi => Some(SPI_SDCARD_RESOURCE),
        StorageMode::Native => Some(SDCARD_RESOURCE),
    };
    if let Some(resource) = storage {
        require_resource(registry, "storage", resource)?;
        directives.push(SubsystemDirective::Storage {
            resource: resource.to_string(),
            mode: flags.storage,
        });
    }

    Ok(directives)
}

fn require_resource(registry: &Registry, feature: &str, name: &str) -> Result<(), FeatureError> {
    if registry.contains_name(name) {
        Ok(())
    } else {
        tracing::debug!(feature, resource = name, "feature rejected");
        Err(FeatureError::missing_resource(feature, name))
    }
}

fn require_domain(
    domains: &ClockDomainSet,
    feature: &str,
    name: &str,
) -> Result<(), FeatureError> {
    if domains.contains(name) {
        Ok(())
    } else {
        tracing::debug!(feature, domain = name, "feature rejected");
        Err(FeatureError::missing_domain(feature, name))
    }
}
