//! Bringup CLI: composes board builds from the command line.
//!
//! Provides `bringup compose` for validating a feature selection and printing
//! the composed clocks, timing and subsystem wiring, `bringup boards` for
//! listing the built-in boards, and `bringup pins` for resolving a single I/O
//! resource to package pins.

#![warn(missing_docs)]

mod boards;
mod compose;

use std::process;

use bringup_common::Frequency;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Bringup: board constraint, clock topology and feature composer.
#[derive(Parser, Debug)]
#[command(name = "bringup", version, about = "FPGA board bring-up composer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise the log level; repeat for more detail.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `bringup.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate options and compose a build.
    Compose(ComposeArgs),
    /// List the built-in boards.
    Boards,
    /// Resolve one I/O resource to package pins.
    Pins(PinsArgs),
}

/// Arguments for the `bringup compose` subcommand.
///
/// Every option overlays the configuration file. Mutually exclusive switches
/// are accepted here and rejected by the composer.
#[derive(Parser, Debug, Default)]
pub struct ComposeArgs {
    /// Built-in board name.
    #[arg(long)]
    pub board: Option<String>,

    /// System clock frequency (e.g. "50MHz", "48.5MHz").
    #[arg(long)]
    pub sys_clk_freq: Option<Frequency>,

    /// SDRAM rate mode: "1:1" or "1:2".
    #[arg(long)]
    pub sdram_rate: Option<String>,

    /// Use on-chip main RAM of this size in bytes instead of the SDRAM.
    #[arg(long)]
    pub integrated_main_ram_size: Option<u64>,

    /// L2 cache size in bytes.
    #[arg(long)]
    pub l2_size: Option<u32>,

    /// Enable the SD card in SPI mode.
    #[arg(long)]
    pub with_spi_sdcard: bool,

    /// Enable the SD card in native mode.
    #[arg(long)]
    pub with_sdcard: bool,

    /// Enable the VGA text terminal.
    #[arg(long)]
    pub with_video_terminal: bool,

    /// Enable the VGA framebuffer.
    #[arg(long)]
    pub with_video_framebuffer: bool,

    /// Disable the LED chaser.
    #[arg(long)]
    pub no_led_chaser: bool,

    /// Console UART name.
    #[arg(long)]
    pub uart_name: Option<String>,

    /// Enable the JTAG debug bridge.
    #[arg(long)]
    pub with_jtagbone: bool,

    /// Enable the UART debug bridge.
    #[arg(long)]
    pub with_uartbone: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `bringup pins` subcommand.
#[derive(Parser, Debug)]
pub struct PinsArgs {
    /// Built-in board name.
    pub board: String,

    /// Resource name (e.g. `user_led`, `sdram`).
    pub name: String,

    /// Resource index; every index is printed when omitted.
    #[arg(short, long)]
    pub index: Option<u32>,
}

/// Output format for `bringup compose`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// The full composition as JSON.
    Json,
    /// Timing directives as SDC.
    Sdc,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a configuration file or directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Compose(ref args) => compose::run(args, &global),
        Command::Boards => boards::list(&global),
        Command::Pins(ref args) => boards::pins(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn init_logging(quiet: bool, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(quiet, verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_compose_default() {
        let cli = Cli::parse_from(["bringup", "compose"]);
        match cli.command {
            Command::Compose(ref args) => {
                assert!(args.board.is_none());
                assert!(args.sys_clk_freq.is_none());
                assert!(!args.with_sdcard);
                assert!(!args.no_led_chaser);
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Compose command"),
        }
    }

    #[test]
    fn parse_compose_with_args() {
        let cli = Cli::parse_from([
            "bringup",
            "compose",
            "--board",
            "de0cv",
            "--sys-clk-freq",
            "48.5MHz",
            "--sdram-rate",
            "1:2",
            "--with-video-framebuffer",
            "--with-spi-sdcard",
            "--no-led-chaser",
            "--uart-name",
            "gpio_serial",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::Compose(ref args) => {
                assert_eq!(args.board.as_deref(), Some("de0cv"));
                assert_eq!(args.sys_clk_freq, Some(Frequency::from_hz(48_500_000)));
                assert_eq!(args.sdram_rate.as_deref(), Some("1:2"));
                assert!(args.with_video_framebuffer);
                assert!(args.with_spi_sdcard);
                assert!(args.no_led_chaser);
                assert_eq!(args.uart_name.as_deref(), Some("gpio_serial"));
                assert_eq!(args.format, ReportFormat::Json);
            }
            _ => panic!("expected Compose command"),
        }
    }

    #[test]
    fn conflicting_switches_parse() {
        let cli = Cli::parse_from([
            "bringup",
            "compose",
            "--with-video-terminal",
            "--with-video-framebuffer",
        ]);
        match cli.command {
            Command::Compose(ref args) => {
                assert!(args.with_video_terminal && args.with_video_framebuffer);
            }
            _ => panic!("expected Compose command"),
        }
    }

    #[test]
    fn bad_frequency_is_rejected() {
        let err = Cli::try_parse_from(["bringup", "compose", "--sys-clk-freq", "fast"]);
        assert!(err.is_err());
    }

    #[test]
    fn parse_pins() {
        let cli = Cli::parse_from(["bringup", "pins", "terasic_de0cv", "user_led", "--index", "3"]);
        match cli.command {
            Command::Pins(ref args) => {
                assert_eq!(args.board, "terasic_de0cv");
                assert_eq!(args.name, "user_led");
                assert_eq!(args.index, Some(3));
            }
            _ => panic!("expected Pins command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["bringup", "-vv", "--config", "/tmp/bringup.toml", "boards"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("/tmp/bringup.toml"));
        assert!(matches!(cli.command, Command::Boards));
    }

    #[test]
    fn log_levels() {
        assert_eq!(log_level(false, 0), "warn");
        assert_eq!(log_level(false, 1), "info");
        assert_eq!(log_level(false, 5), "trace");
        assert_eq!(log_level(true, 3), "error");
    }
}
