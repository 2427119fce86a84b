//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::BuildConfig;
use std::path::{Path, PathBuf};

/// The configuration file name looked up in a project directory.
pub const CONFIG_FILE: &str = "bringup.toml";

/// Loads and validates a `bringup.toml` configuration from a project directory.
///
/// Reads `<project_dir>/bringup.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<BuildConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE))
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<BuildConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Returns the path of `bringup.toml` in `project_dir`, if the file exists.
pub fn find_config(project_dir: &Path) -> Option<PathBuf> {
    let path = project_dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Parses and validates a `bringup.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<BuildConfig, ConfigError> {
    let config: BuildConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates values that are wrong regardless of board or feature selection.
pub(crate) fn validate_config(config: &BuildConfig) -> Result<(), ConfigError> {
    if config.soc.board.trim().is_empty() {
        return Err(ConfigError::MissingField("soc.board".to_string()));
    }
    if config.console.uart_name.trim().is_empty() {
        return Err(ConfigError::MissingField("console.uart_name".to_string()));
    }
    if let Some(l2) = config.soc.l2_size {
        if l2 != 0 && !l2.is_power_of_two() {
            return Err(ConfigError::ValidationError(format!(
                "soc.l2_size must be a power of two, got {l2}"
            )));
        }
    }
    if config.soc.integrated_main_ram_size == Some(0) {
        return Err(ConfigError::ValidationError(
            "soc.integrated_main_ram_size must be non-zero when set".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bringup_common::Frequency;

    #[test]
    fn empty_config_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.soc.board, "terasic_de0cv");
        assert_eq!(config.soc.sys_clk_freq, None);
        assert!(config.features.led_chaser);
        assert!(!config.features.sdcard);
        assert_eq!(config.console.uart_name, "serial");
        assert_eq!(config, BuildConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[soc]
board = "terasic_de0cv"
sys_clk_freq = "48.5MHz"
sdram_rate = "1:2"
l2_size = 16384

[features]
spi_sdcard = true
video_framebuffer = true
led_chaser = false

[console]
uart_name = "gpio_serial"
jtagbone = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.soc.sys_clk_freq, Some(Frequency::from_hz(48_500_000)));
        assert_eq!(config.soc.sdram_rate.as_deref(), Some("1:2"));
        assert_eq!(config.soc.l2_size, Some(16384));
        assert!(config.features.spi_sdcard);
        assert!(config.features.video_framebuffer);
        assert!(!config.features.led_chaser);
        assert_eq!(config.console.uart_name, "gpio_serial");
        assert!(config.console.jtagbone);
        assert!(!config.console.uartbone);
    }

    #[test]
    fn conflicting_features_are_accepted_here() {
        let toml = r#"
[features]
video_terminal = true
video_framebuffer = true
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.features.video_terminal && config.features.video_framebuffer);
    }

    #[test]
    fn bad_frequency_is_parse_error() {
        let err = load_config_from_str("[soc]\nsys_clk_freq = \"fast\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_board_is_missing_field() {
        let err = load_config_from_str("[soc]\nboard = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "soc.board"));
    }

    #[test]
    fn l2_size_must_be_power_of_two() {
        let err = load_config_from_str("[soc]\nl2_size = 3000\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_config(dir.path()).is_none());
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[soc]\nsys_clk_freq = \"50MHz\"\n",
        )
        .unwrap();
        assert!(find_config(dir.path()).is_some());
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.soc.sys_clk_freq, Some(Frequency::from_mhz(50)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
