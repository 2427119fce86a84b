//! The composition pipeline.
//!
//! Stages run in a fixed order: flag validation, board registry, clock plan,
//! timing directives, console, feature wiring. Flags are validated before any
//! registry or clock work so an option conflict is reported on its own. The
//! first failing stage rejects the build and no partial result escapes.

use crate::console::resolve_console;
use crate::error::ComposeError;
use crate::features::compose;
use crate::flags::{FeatureFlags, FeatureRequest};
use crate::result::CompositionResult;
use bringup_board::{load_board, BoardDefinition};
use bringup_config::BuildConfig;
use std::fmt;

/// Composition lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComposeState {
    /// Nothing checked yet.
    Unvalidated,
    /// Stages are running.
    Validating,
    /// Every stage succeeded.
    Composed,
    /// A stage failed; terminal.
    Rejected,
}

impl fmt::Display for ComposeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComposeState::Unvalidated => "unvalidated",
            ComposeState::Validating => "validating",
            ComposeState::Composed => "composed",
            ComposeState::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

struct Lifecycle {
    state: ComposeState,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: ComposeState::Unvalidated,
        }
    }

    fn enter(&mut self, next: ComposeState) {
        tracing::debug!(from = %self.state, to = %next, "composition state");
        self.state = next;
    }

    fn finish<T>(&mut self, outcome: Result<T, ComposeError>) -> Result<T, ComposeError> {
        match &outcome {
            Ok(_) => self.enter(ComposeState::Composed),
            Err(e) => {
                self.enter(ComposeState::Rejected);
                tracing::info!(error = %e, "composition rejected");
            }
        }
        outcome
    }
}

/// Composes a build for the board named in `config`.
pub fn compose_build(config: &BuildConfig) -> Result<CompositionResult, ComposeError> {
    let mut lifecycle = Lifecycle::new();
    lifecycle.enter(ComposeState::Validating);
    let outcome = validate_flags(config).and_then(|flags| {
        let board = load_board(&config.soc.board)?;
        run_stages(&board, config, flags)
    });
    lifecycle.finish(outcome)
}

/// Composes a build for an explicit board description.
///
/// `config.soc.board` is ignored.
pub fn compose_for_board(
    board: &BoardDefinition,
    config: &BuildConfig,
) -> Result<CompositionResult, ComposeError> {
    let mut lifecycle = Lifecycle::new();
    lifecycle.enter(ComposeState::Validating);
    let outcome = validate_flags(config).and_then(|flags| run_stages(board, config, flags));
    lifecycle.finish(outcome)
}

fn validate_flags(config: &BuildConfig) -> Result<FeatureFlags, ComposeError> {
    Ok(FeatureRequest::from(config).validate()?)
}

fn run_stages(
    board: &BoardDefinition,
    config: &BuildConfig,
    flags: FeatureFlags,
) -> Result<CompositionResult, ComposeError> {
    let registry = board.registry()?;

    let sys_clk_freq = config
        .soc
        .sys_clk_freq
        .unwrap_or(board.clocks.default_sys_clk_freq);
    tracing::info!(board = %board.name, topology = %flags.topology, sys_clk = %sys_clk_freq, "composing");
    let clocks = bringup_clock::plan(
        flags.topology,
        board.oscillator(),
        board.clock_requests(sys_clk_freq),
        board.pll_spec(),
    )?;

    let timing = bringup_timing::emit(&registry, &clocks, &board.timing_sources())?;
    let console = resolve_console(&config.console, &registry)?;
    let directives = compose(&flags, &registry, clocks.domains(), board.memory.as_ref())?;

    Ok(CompositionResult {
        board: board.name.clone(),
        device: board.device.clone(),
        flags,
        console,
        registry,
        clocks,
        timing,
        directives,
    })
}
