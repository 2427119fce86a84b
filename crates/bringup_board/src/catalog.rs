//! Built-in boards, embedded at compile time.

use crate::board::BoardDefinition;
use crate::error::BoardError;

const BOARDS: &[(&str, &str)] = &[(
    "terasic_de0cv",
    include_str!("../boards/terasic_de0cv.toml"),
)];

/// Returns the names of the built-in boards.
pub fn board_names() -> Vec<&'static str> {
    BOARDS.iter().map(|(name, _)| *name).collect()
}

/// Loads a built-in board by name.
///
/// Names are matched case-insensitively and `-` is accepted for `_`; the bare
/// model (`de0cv`, `de0-cv`) also works.
pub fn load_board(name: &str) -> Result<BoardDefinition, BoardError> {
    let wanted = name.trim().to_ascii_lowercase().replace('-', "_");
    let source = BOARDS
        .iter()
        .find(|(board, _)| {
            *board == wanted
                || board
                    .split_once('_')
                    .is_some_and(|(_, model)| model == wanted.replace('_', ""))
        })
        .map(|(_, source)| *source)
        .ok_or_else(|| BoardError::UnknownBoard {
            name: name.to_string(),
            available: board_names().into_iter().map(str::to_string).collect(),
        })?;
    let board = BoardDefinition::from_toml_str(source)?;
    tracing::debug!(board = %board.name, device = %board.device, "board loaded");
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bringup_clock::{PllSpec, SpeedGrade};
    use bringup_common::Frequency;
    use bringup_registry::{ReferenceFault, RegistryError};

    #[test]
    fn catalog_lists_de0cv() {
        assert_eq!(board_names(), vec!["terasic_de0cv"]);
    }

    #[test]
    fn load_by_aliases() {
        for alias in ["terasic_de0cv", "Terasic-DE0CV", "de0cv", "de0-cv"] {
            assert_eq!(load_board(alias).unwrap().name, "terasic_de0cv", "{alias}");
        }
    }

    #[test]
    fn unknown_board() {
        let err = load_board("arty").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown board 'arty' (available: terasic_de0cv)"
        );
    }

    #[test]
    fn de0cv_board_facts() {
        let board = load_board("terasic_de0cv").unwrap();
        assert_eq!(board.device, "5CEBA4F23C7");
        assert_eq!(board.pll_spec(), PllSpec::cyclone_v(SpeedGrade::I7));
        assert_eq!(board.oscillator().frequency, Frequency::from_mhz(50));
        assert_eq!(board.clocks.default_sys_clk_freq, Frequency::from_mhz(50));
        let requests = board.clock_requests(Frequency::from_mhz(50));
        let names: Vec<&str> = requests.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["sys", "vga"]);
        assert_eq!(board.memory.as_ref().unwrap().module, "IS42S16320");
        let sources = board.timing_sources();
        assert_eq!(sources.reset, "reset_n");
        assert_eq!(sources.debug_clock.unwrap().frequency, Frequency::from_mhz(6));
    }

    #[test]
    fn de0cv_registry_resolves_everything() {
        let registry = load_board("terasic_de0cv").unwrap().registry().unwrap();
        assert_eq!(registry.resolve("clk50", 0).unwrap().pins(), vec!["M9"]);
        assert_eq!(registry.request_all("user_led").unwrap().len(), 10);
        assert_eq!(registry.request_all("key").unwrap().len(), 4);
        assert_eq!(registry.request_all("sw").unwrap().len(), 10);

        let sdram = registry.resolve("sdram", 0).unwrap();
        assert_eq!(sdram.subsignal("a").unwrap().pins.len(), 13);
        assert_eq!(sdram.subsignal("dq").unwrap().pins.len(), 16);
        assert_eq!(
            sdram.subsignal("dq").unwrap().misc["FAST_INPUT_REGISTER"],
            "ON"
        );
        assert_eq!(sdram.misc["CURRENT_STRENGTH_NEW"], "MAXIMUM CURRENT");

        let gpio = registry.resolve("gpio", 0).unwrap();
        assert_eq!(gpio.width(), 36);
        assert_eq!(gpio.pins()[0], "N16");
        assert_eq!(gpio.pins()[10], "N21");

        let serial = registry.resolve("gpio_serial", 0).unwrap();
        assert_eq!(serial.subsignal("tx").unwrap().pins, vec!["M21"]);
        assert_eq!(serial.subsignal("rx").unwrap().pins, vec!["K22"]);
        assert_eq!(
            serial.subsignal("tx").unwrap().io_standard.as_deref(),
            Some("3.3-V LVTTL")
        );
    }

    #[test]
    fn de0cv_headers_have_gaps_at_11_and_12() {
        let registry = load_board("terasic_de0cv").unwrap().registry().unwrap();
        for header in ["JP1", "JP2"] {
            let connector = registry.connector(header).unwrap();
            assert_eq!(connector.len(), 40);
            for position in [11, 12, 29, 30] {
                assert_eq!(
                    connector.resolve(position),
                    Err(ReferenceFault::AbsentPosition),
                    "{header}:{position}"
                );
            }
        }
    }

    #[test]
    fn referencing_a_gap_invalidates_the_board() {
        let mut board = load_board("terasic_de0cv").unwrap();
        let serial = board
            .io
            .iter_mut()
            .find(|e| e.name == "gpio_serial")
            .unwrap();
        serial.subsignals[0].pins = "JP1:11".into();
        assert!(matches!(
            board.registry(),
            Err(crate::BoardError::Registry(
                RegistryError::UnresolvedReference {
                    fault: ReferenceFault::AbsentPosition,
                    ..
                }
            ))
        ));
    }
}
