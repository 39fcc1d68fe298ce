//! Game loop thread: drives the simulation engine one tick per frame and
//! publishes snapshots.
//!
//! Commands arrive via `mpsc`. Every snapshot is stored in shared state for
//! polling and forwarded on an outbound channel, since effects and alerts are
//! only reported once.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use rampart_core::constants::TICK_RATE;
use rampart_core::enums::GamePhase;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Nominal duration of one tick.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// How the loop paces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// Sleep to hold `TICK_RATE`; otherwise tick as fast as possible.
    pub realtime: bool,
    /// Stop by itself after this many loop iterations.
    pub max_ticks: Option<u64>,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            realtime: true,
            max_ticks: None,
        }
    }
}

/// Handles returned to whoever started the loop.
pub struct GameLoop {
    pub commands: mpsc::Sender<GameLoopCommand>,
    pub snapshots: mpsc::Receiver<GameStateSnapshot>,
    pub thread: JoinHandle<()>,
}

/// Move `engine` onto a new thread and start ticking it.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    options: LoopOptions,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> std::io::Result<GameLoop> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();
    let (snap_tx, snap_rx) = mpsc::channel::<GameStateSnapshot>();

    let thread = std::thread::Builder::new()
        .name("rampart-game-loop".into())
        .spawn(move || {
            run_game_loop(engine, options, cmd_rx, snap_tx, &latest_snapshot);
        })?;

    Ok(GameLoop {
        commands: cmd_tx,
        snapshots: snap_rx,
        thread,
    })
}

/// The game loop. Runs until Shutdown, channel disconnect or `max_ticks`.
fn run_game_loop(
    mut engine: SimulationEngine,
    options: LoopOptions,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    snap_tx: mpsc::Sender<GameStateSnapshot>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    let mut next_tick_time = Instant::now();
    let mut ticks = 0u64;
    let mut last_phase = engine.phase();
    info!(seed = engine.config().seed, "game loop started");

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => {
                    engine.queue_command(cmd);
                }
                Ok(GameLoopCommand::Shutdown) => {
                    info!(ticks, "game loop shut down");
                    return;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. Advance one tick (the engine handles pause internally)
        let snapshot = engine.tick();
        ticks += 1;
        if snapshot.phase != last_phase {
            debug!(from = ?last_phase, to = ?snapshot.phase, "phase changed");
            last_phase = snapshot.phase;
        }

        // 3. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        // 4. Forward; a dropped receiver is fine while polling is used
        let _ = snap_tx.send(snapshot);

        if options.max_ticks.is_some_and(|max| ticks >= max) {
            info!(ticks, "tick limit reached");
            return;
        }
        if !options.realtime {
            continue;
        }

        // 5. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // Too far behind; reset to avoid a catch-up spiral
            next_tick_time = now;
        }
    }
}

/// Whether the session can no longer progress without a reset.
pub fn is_terminal(snapshot: &GameStateSnapshot) -> bool {
    snapshot.phase == GamePhase::GameOver
}
