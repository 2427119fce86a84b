//! Raw feature switches and their validated form.
//!
//! Switches arrive as independent booleans, so a request may enable both
//! members of an exclusion group. [`FeatureRequest::validate`] turns them into
//! [`FeatureFlags`], where each group is a single enum value and a conflict
//! can no longer be represented.

use crate::error::FeatureError;
use bringup_clock::Topology;
use bringup_config::BuildConfig;
use serde::Serialize;
use std::fmt;

/// L2 cache size used when none is configured.
pub const DEFAULT_L2_SIZE: u32 = 8192;

/// Feature switches as given by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureRequest {
    /// SDRAM rate mode string, if given.
    pub sdram_rate: Option<String>,
    /// On-chip main RAM size; replaces the external memory.
    pub integrated_main_ram_size: Option<u64>,
    /// L2 cache size.
    pub l2_size: Option<u32>,
    /// SD card in SPI mode.
    pub spi_sdcard: bool,
    /// SD card in native mode.
    pub sdcard: bool,
    /// VGA text terminal.
    pub video_terminal: bool,
    /// VGA framebuffer.
    pub video_framebuffer: bool,
    /// LED chaser.
    pub led_chaser: bool,
}

impl From<&BuildConfig> for FeatureRequest {
    fn from(config: &BuildConfig) -> Self {
        Self {
            sdram_rate: config.soc.sdram_rate.clone(),
            integrated_main_ram_size: config.soc.integrated_main_ram_size,
            l2_size: config.soc.l2_size,
            spi_sdcard: config.features.spi_sdcard,
            sdcard: config.features.sdcard,
            video_terminal: config.features.video_terminal,
            video_framebuffer: config.features.video_framebuffer,
            led_chaser: config.features.led_chaser,
        }
    }
}

impl FeatureRequest {
    /// Checks the exclusion groups and parses the rate mode.
    ///
    /// Groups are checked in order (storage, video, memory rate); the first
    /// conflict is returned.
    pub fn validate(&self) -> Result<FeatureFlags, FeatureError> {
        let storage = match (self.spi_sdcard, self.sdcard) {
            (true, true) => {
                return Err(FeatureError::conflict("with_spi_sdcard", "with_sdcard"));
            }
            (true, false) => StorageMode::Spi,
            (false, true) => StorageMode::Native,
            (false, false) => StorageMode::None,
        };

        let video = match (self.video_terminal, self.video_framebuffer) {
            (true, true) => {
                return Err(FeatureError::conflict(
                    "with_video_terminal",
                    "with_video_framebuffer",
                ));
            }
            (true, false) => VideoMode::Terminal,
            (false, true) => VideoMode::Framebuffer,
            (false, false) => VideoMode::None,
        };

        let topology = match self.sdram_rate.as_deref() {
            Some(rate) => rate.parse::<Topology>().map_err(FeatureError::InvalidRateMode)?,
            None => Topology::FullRate,
        };
        let memory = match self.integrated_main_ram_size {
            Some(_) if topology == Topology::HalfRate => {
                return Err(FeatureError::conflict(
                    "integrated_main_ram",
                    &format!("sdram_rate={}", topology.rate()),
                ));
            }
            Some(size) => MemoryMode::Integrated { size },
            None => MemoryMode::External {
                l2_size: self.l2_size.unwrap_or(DEFAULT_L2_SIZE),
            },
        };

        Ok(FeatureFlags {
            topology,
            memory,
            storage,
            video,
            status_indicators: self.led_chaser,
        })
    }
}

/// Where main memory lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemoryMode {
    /// On-chip RAM; no external memory interface is instantiated.
    Integrated {
        /// Size in bytes.
        size: u64,
    },
    /// External SDRAM behind an L2 cache.
    External {
        /// L2 cache size in bytes.
        l2_size: u32,
    },
}

/// External storage selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// No storage.
    None,
    /// SD card in SPI mode.
    Spi,
    /// SD card in native mode.
    Native,
}

/// Video output selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// No video.
    None,
    /// Text terminal.
    Terminal,
    /// Framebuffer.
    Framebuffer,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageMode::None => "none",
            StorageMode::Spi => "spi",
            StorageMode::Native => "native",
        };
        f.write_str(s)
    }
}

impl fmt::Display for VideoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VideoMode::None => "none",
            VideoMode::Terminal => "terminal",
            VideoMode::Framebuffer => "framebuffer",
        };
        f.write_str(s)
    }
}

/// Validated feature selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    /// Memory clocking topology.
    pub topology: Topology,
    /// Main memory placement.
    pub memory: MemoryMode,
    /// External storage.
    pub storage: StorageMode,
    /// Video output.
    pub video: VideoMode,
    /// LED chaser on the user LEDs.
    pub status_indicators: bool,
}
