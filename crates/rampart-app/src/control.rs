//! Control surface for a presentation layer.
//!
//! Bridges requests to the game loop thread via channels. Every function
//! reports failures as [`AppError`] instead of panicking.

use std::sync::mpsc;

use thiserror::Error;
use tracing::info;

use rampart_core::commands::PlayerCommand;
use rampart_core::config::GameConfig;
use rampart_core::error::ConfigError;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::SimulationEngine;

use crate::game_loop::{self, LoopOptions};
use crate::state::{AppState, GameLoopCommand};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("simulation already running")]
    AlreadyRunning,

    #[error("simulation not started")]
    NotStarted,

    #[error("game loop is no longer receiving commands")]
    LoopGone,

    #[error("shared state lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to spawn game loop thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Start the simulation. Returns the per-tick snapshot stream.
pub fn start_simulation(
    state: &AppState,
    config: GameConfig,
    options: LoopOptions,
) -> Result<mpsc::Receiver<GameStateSnapshot>, AppError> {
    let mut tx_lock = state.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
    if tx_lock.is_some() {
        return Err(AppError::AlreadyRunning);
    }

    let engine = SimulationEngine::with_instant_loader(config)?;
    let game_loop =
        game_loop::spawn_game_loop(engine, options, state.latest_snapshot.clone())?;

    *tx_lock = Some(game_loop.commands);
    *state
        .loop_thread
        .lock()
        .map_err(|_| AppError::LockPoisoned)? = Some(game_loop.thread);
    info!(?options, "simulation started");
    Ok(game_loop.snapshots)
}

/// Send a player command to the simulation.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<(), AppError> {
    let tx_lock = state.command_tx.lock().map_err(|_| AppError::LockPoisoned)?;
    match tx_lock.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .map_err(|_| AppError::LoopGone),
        None => Err(AppError::NotStarted),
    }
}

/// Get the latest snapshot (for polling / initial state).
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>, AppError> {
    let lock = state
        .latest_snapshot
        .lock()
        .map_err(|_| AppError::LockPoisoned)?;
    Ok(lock.clone())
}

/// Ask the loop to shut down and wait for it. A loop that already exited on
/// its own is not an error.
pub fn stop_simulation(state: &AppState) -> Result<(), AppError> {
    let tx = state
        .command_tx
        .lock()
        .map_err(|_| AppError::LockPoisoned)?
        .take()
        .ok_or(AppError::NotStarted)?;
    let _ = tx.send(GameLoopCommand::Shutdown);

    let thread = state
        .loop_thread
        .lock()
        .map_err(|_| AppError::LockPoisoned)?
        .take();
    if let Some(thread) = thread {
        // A panicked loop thread has already reported on stderr.
        let _ = thread.join();
    }
    info!("simulation stopped");
    Ok(())
}
