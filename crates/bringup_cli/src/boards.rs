//! `bringup boards` and `bringup pins`.

use bringup_board::{board_names, load_board};
use bringup_registry::{ResolvedResource, ResolvedSignals};

use crate::{GlobalArgs, PinsArgs};

/// Lists the built-in boards with their devices.
pub fn list(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for name in board_names() {
        let board = load_board(name)?;
        if !global.quiet {
            println!("{:<16} {:<14} {}", board.name, board.device, board.description);
        }
    }
    Ok(0)
}

/// Resolves one resource, or every index of it, to package pins.
pub fn pins(args: &PinsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = load_board(&args.board)?.registry()?;
    let resources = match args.index {
        Some(index) => vec![registry.resolve(&args.name, index)?],
        None => registry.request_all(&args.name)?,
    };
    if !global.quiet {
        for resource in resources {
            println!("{}", describe(resource));
        }
    }
    Ok(0)
}

fn describe(resource: &ResolvedResource) -> String {
    let standard = resource.io_standard.as_deref().unwrap_or("-");
    match &resource.signals {
        ResolvedSignals::Pins(pins) => format!(
            "{}:{}  {}  [{}]",
            resource.name,
            resource.index,
            pins.join(" "),
            standard
        ),
        ResolvedSignals::Subsignals(subs) => {
            let mut lines = vec![format!("{}:{}  [{}]", resource.name, resource.index, standard)];
            for sub in subs {
                lines.push(format!(
                    "  {:<8} {}  [{}]",
                    sub.name,
                    sub.pins.join(" "),
                    sub.io_standard.as_deref().unwrap_or("-")
                ));
            }
            lines.join("\n")
        }
    }
}
