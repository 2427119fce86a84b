//! Command-line overlay on top of the file configuration.

use crate::error::ConfigError;
use crate::loader::validate_config;
use crate::types::BuildConfig;
use bringup_common::Frequency;

/// Values given on the command line. `None` and `false` leave the file
/// setting untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--board`
    pub board: Option<String>,
    /// `--sys-clk-freq`
    pub sys_clk_freq: Option<Frequency>,
    /// `--sdram-rate`
    pub sdram_rate: Option<String>,
    /// `--integrated-main-ram-size`
    pub integrated_main_ram_size: Option<u64>,
    /// `--l2-size`
    pub l2_size: Option<u32>,
    /// `--with-spi-sdcard`
    pub with_spi_sdcard: bool,
    /// `--with-sdcard`
    pub with_sdcard: bool,
    /// `--with-video-terminal`
    pub with_video_terminal: bool,
    /// `--with-video-framebuffer`
    pub with_video_framebuffer: bool,
    /// `--no-led-chaser`
    pub no_led_chaser: bool,
    /// `--uart-name`
    pub uart_name: Option<String>,
    /// `--with-jtagbone`
    pub with_jtagbone: bool,
    /// `--with-uartbone`
    pub with_uartbone: bool,
}

/// Layers command-line values over `config` and re-validates the result.
///
/// Switches only ever turn features on (or the LED chaser off), so a flag set
/// in the file cannot be cleared from the command line. Mutually exclusive
/// options are copied as given.
pub fn apply_overrides(
    config: &mut BuildConfig,
    overrides: &ConfigOverrides,
) -> Result<(), ConfigError> {
    if let Some(board) = &overrides.board {
        config.soc.board = board.clone();
    }
    if let Some(freq) = overrides.sys_clk_freq {
        config.soc.sys_clk_freq = Some(freq);
    }
    if let Some(rate) = &overrides.sdram_rate {
        config.soc.sdram_rate = Some(rate.clone());
    }
    if let Some(size) = overrides.integrated_main_ram_size {
        config.soc.integrated_main_ram_size = Some(size);
    }
    if let Some(size) = overrides.l2_size {
        config.soc.l2_size = Some(size);
    }

    let features = &mut config.features;
    features.spi_sdcard |= overrides.with_spi_sdcard;
    features.sdcard |= overrides.with_sdcard;
    features.video_terminal |= overrides.with_video_terminal;
    features.video_framebuffer |= overrides.with_video_framebuffer;
    if overrides.no_led_chaser {
        features.led_chaser = false;
    }

    if let Some(uart) = &overrides.uart_name {
        config.console.uart_name = uart.clone();
    }
    config.console.jtagbone |= overrides.with_jtagbone;
    config.console.uartbone |= overrides.with_uartbone;

    validate_config(config)
}
