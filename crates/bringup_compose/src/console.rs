//! Console transport resolution.
//!
//! The requested UART name is rewritten by two rules, both applied here in
//! one place and recorded in the result:
//!
//! 1. `serial` on a board without a `serial` resource falls back to
//!    `crossover` when the JTAG bridge is enabled, else to `jtag_uart`.
//! 2. The UART bridge takes the physical UART, so it forces `crossover` over
//!    whatever was requested.

use crate::error::FeatureError;
use bringup_config::ConsoleConfig;
use bringup_registry::Registry;
use serde::Serialize;

const SERIAL: &str = "serial";
const JTAG_UART: &str = "jtag_uart";
const CROSSOVER: &str = "crossover";

/// How the console reaches the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsoleTransport {
    /// A UART on board pins.
    Pads {
        /// The I/O resource carrying tx/rx.
        resource: String,
    },
    /// JTAG UART through the debug cable.
    JtagUart,
    /// Crossover UART, accessed through a debug bridge.
    Crossover,
}

/// A rule that rewrote the requested console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleRule {
    /// `serial` requested but the board has no serial port.
    NoSerialFallback,
    /// The UART bridge forced the crossover UART.
    UartboneForcesCrossover,
}

/// The console request and what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleResolution {
    /// The UART name as requested.
    pub requested: String,
    /// The UART name after the rules.
    pub resolved: String,
    /// The resulting transport.
    pub transport: ConsoleTransport,
    /// Rules that fired, in application order.
    pub rules: Vec<ConsoleRule>,
}

/// Resolves the console transport against the board registry.
///
/// A pad UART other than the built-in transports must exist in the registry.
pub fn resolve_console(
    console: &ConsoleConfig,
    registry: &Registry,
) -> Result<ConsoleResolution, FeatureError> {
    let requested = console.uart_name.clone();
    let mut resolved = requested.clone();
    let mut rules = Vec::new();

    if resolved == SERIAL && !registry.contains_name(SERIAL) {
        resolved = if console.jtagbone { CROSSOVER } else { JTAG_UART }.to_string();
        rules.push(ConsoleRule::NoSerialFallback);
        tracing::info!(uart = %resolved, "board has no serial port, console falls back");
    }

    if console.uartbone && resolved != CROSSOVER {
        tracing::warn!(
            requested = %requested,
            "uartbone enabled, console forced to crossover"
        );
        resolved = CROSSOVER.to_string();
        rules.push(ConsoleRule::UartboneForcesCrossover);
    }

    let transport = match resolved.as_str() {
        JTAG_UART => ConsoleTransport::JtagUart,
        CROSSOVER => ConsoleTransport::Crossover,
        pads if registry.contains_name(pads) => ConsoleTransport::Pads {
            resource: pads.to_string(),
        },
        pads => return Err(FeatureError::missing_resource("console", pads)),
    };

    Ok(ConsoleResolution {
        requested,
        resolved,
        transport,
        rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Dependency;
    use bringup_registry::{IoResource, RegistryBuilder, Subsignal};

    fn registry(with_serial: bool) -> Registry {
        let mut b = RegistryBuilder::new();
        b.define(IoResource::with_subsignals(
            "gpio_serial",
            0,
            vec![
                Subsignal::new("tx", "A1").unwrap(),
                Subsignal::new("rx", "A2").unwrap(),
            ],
            Some("3.3-V LVTTL".into()),
        ))
        .unwrap();
        if with_serial {
            b.define(IoResource::with_subsignals(
                "serial",
                0,
                vec![
                    Subsignal::new("tx", "B1").unwrap(),
                    Subsignal::new("rx", "B2").unwrap(),
                ],
                None,
            ))
            .unwrap();
        }
        b.build().unwrap()
    }

    fn console(uart: &str, jtagbone: bool, uartbone: bool) -> ConsoleConfig {
        ConsoleConfig {
            uart_name: uart.to_string(),
            jtagbone,
            uartbone,
        }
    }

    #[test]
    fn serial_falls_back_to_jtag_uart() {
        let r = resolve_console(&console("serial", false, false), &registry(false)).unwrap();
        assert_eq!(r.resolved, "jtag_uart");
        assert_eq!(r.transport, ConsoleTransport::JtagUart);
        assert_eq!(r.rules, vec![ConsoleRule::NoSerialFallback]);
    }

    #[test]
    fn serial_with_jtagbone_falls_back_to_crossover() {
        let r = resolve_console(&console("serial", true, false), &registry(false)).unwrap();
        assert_eq!(r.resolved, "crossover");
        assert_eq!(r.transport, ConsoleTransport::Crossover);
    }

    #[test]
    fn serial_kept_when_board_has_one() {
        let r = resolve_console(&console("serial", false, false), &registry(true)).unwrap();
        assert_eq!(
            r.transport,
            ConsoleTransport::Pads {
                resource: "serial".into()
            }
        );
        assert!(r.rules.is_empty());
    }

    #[test]
    fn uartbone_overrides_explicit_request() {
        let r = resolve_console(&console("gpio_serial", false, true), &registry(false)).unwrap();
        assert_eq!(r.requested, "gpio_serial");
        assert_eq!(r.resolved, "crossover");
        assert_eq!(r.rules, vec![ConsoleRule::UartboneForcesCrossover]);
    }

    #[test]
    fn uartbone_after_fallback() {
        let r = resolve_console(&console("serial", false, true), &registry(false)).unwrap();
        assert_eq!(r.resolved, "crossover");
        assert_eq!(
            r.rules,
            vec![
                ConsoleRule::NoSerialFallback,
                ConsoleRule::UartboneForcesCrossover
            ]
        );
    }

    #[test]
    fn pad_console_must_exist() {
        let err = resolve_console(&console("usb_uart", false, false), &registry(false)).unwrap_err();
        assert_eq!(
            err,
            FeatureError::MissingDependency {
                feature: "console".into(),
                missing: Dependency::Resource("usb_uart".into()),
            }
        );
    }
}
