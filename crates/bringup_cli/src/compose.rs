//! `bringup compose`: load configuration, overlay flags, compose, report.

use std::path::{Path, PathBuf};

use bringup_compose::{compose_build, CompositionResult};
use bringup_config::{
    apply_overrides, find_config, load_config_file, BuildConfig, ConfigOverrides,
};

use crate::{ComposeArgs, GlobalArgs, ReportFormat};

/// Runs the `bringup compose` command.
///
/// Returns exit code 0 when the build composes. Rejections surface as errors.
pub fn run(args: &ComposeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut config = resolve_config(global)?;
    apply_overrides(&mut config, &overrides(args))?;

    let result = compose_build(&config)?;
    if !global.quiet {
        println!("{}", render(&result, args.format)?);
    }
    Ok(0)
}

/// Loads the build configuration.
///
/// `--config` may name a file or a directory holding `bringup.toml`. Without
/// it the current directory is searched, and the defaults apply when no file
/// exists.
pub fn resolve_config(global: &GlobalArgs) -> Result<BuildConfig, Box<dyn std::error::Error>> {
    let path = match &global.config {
        Some(explicit) => {
            let p = PathBuf::from(explicit);
            if p.is_dir() {
                find_config(&p).ok_or_else(|| format!("no bringup.toml in {}", p.display()))?
            } else {
                p
            }
        }
        None => match find_config(Path::new(".")) {
            Some(found) => found,
            None => {
                tracing::debug!("no bringup.toml found, using defaults");
                return Ok(BuildConfig::default());
            }
        },
    };
    tracing::debug!(path = %path.display(), "loading configuration");
    Ok(load_config_file(&path)?)
}

fn overrides(args: &ComposeArgs) -> ConfigOverrides {
    ConfigOverrides {
        board: args.board.clone(),
        sys_clk_freq: args.sys_clk_freq,
        sdram_rate: args.sdram_rate.clone(),
        integrated_main_ram_size: args.integrated_main_ram_size,
        l2_size: args.l2_size,
        with_spi_sdcard: args.with_spi_sdcard,
        with_sdcard: args.with_sdcard,
        with_video_terminal: args.with_video_terminal,
        with_video_framebuffer: args.with_video_framebuffer,
        no_led_chaser: args.no_led_chaser,
        uart_name: args.uart_name.clone(),
        with_jtagbone: args.with_jtagbone,
        with_uartbone: args.with_uartbone,
    }
}

fn render(
    result: &CompositionResult,
    format: ReportFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ReportFormat::Text => format!(
            "{}\nfingerprint {}",
            result.summary(),
            result.fingerprint()?
        ),
        ReportFormat::Json => result.to_json_pretty()?,
        ReportFormat::Sdc => result.timing.to_sdc(),
    })
}
