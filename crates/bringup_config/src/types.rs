//! Configuration types deserialized from `bringup.toml`.

use bringup_common::Frequency;
use serde::{Deserialize, Serialize};

/// Board used when the configuration names none.
pub const DEFAULT_BOARD: &str = "terasic_de0cv";

/// The top-level build configuration parsed from `bringup.toml`.
///
/// Every section is optional; an empty file describes the default build for
/// the default board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Board, clocking and memory settings.
    #[serde(default)]
    pub soc: SocConfig,
    /// Optional subsystems.
    #[serde(default)]
    pub features: FeatureConfig,
    /// Console transport selection.
    #[serde(default)]
    pub console: ConsoleConfig,
}

/// Board, clocking and memory settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocConfig {
    /// Built-in board name.
    #[serde(default = "default_board")]
    pub board: String,
    /// System clock frequency; the board default when absent.
    #[serde(default)]
    pub sys_clk_freq: Option<Frequency>,
    /// SDRAM rate mode, `"1:1"` or `"1:2"`. `None` means full rate.
    #[serde(default)]
    pub sdram_rate: Option<String>,
    /// On-chip main RAM size in bytes; replaces the external memory.
    #[serde(default)]
    pub integrated_main_ram_size: Option<u64>,
    /// L2 cache size in bytes in front of the external memory.
    #[serde(default)]
    pub l2_size: Option<u32>,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            board: default_board(),
            sys_clk_freq: None,
            sdram_rate: None,
            integrated_main_ram_size: None,
            l2_size: None,
        }
    }
}

fn default_board() -> String {
    DEFAULT_BOARD.to_string()
}

/// Optional subsystem switches, as written. Conflicts are not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// SD card in SPI mode.
    #[serde(default)]
    pub spi_sdcard: bool,
    /// SD card in native 4-bit mode.
    #[serde(default)]
    pub sdcard: bool,
    /// VGA text terminal.
    #[serde(default)]
    pub video_terminal: bool,
    /// VGA framebuffer.
    #[serde(default)]
    pub video_framebuffer: bool,
    /// LED chaser on the user LEDs.
    #[serde(default = "default_true")]
    pub led_chaser: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            spi_sdcard: false,
            sdcard: false,
            video_terminal: false,
            video_framebuffer: false,
            led_chaser: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Console transport selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Requested UART: `serial`, `jtag_uart`, `crossover`, or a pad resource name.
    #[serde(default = "default_uart_name")]
    pub uart_name: String,
    /// JTAG debug bridge.
    #[serde(default)]
    pub jtagbone: bool,
    /// UART debug bridge.
    #[serde(default)]
    pub uartbone: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            uart_name: default_uart_name(),
            jtagbone: false,
            uartbone: false,
        }
    }
}

fn default_uart_name() -> String {
    "serial".to_string()
}
