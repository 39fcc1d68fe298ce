//! Wave director system: rolls spawn requests and detects wave completion.
//!
//! Calls the wave FSM from rampart-waves and applies its transitions. The
//! spawn request itself is issued by the engine through the resource loader;
//! the counters here only change when loads complete.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use rampart_core::config::WaveTuning;
use rampart_core::enums::WavePhase;
use rampart_core::state::WaveView;

use rampart_waves::fsm::{evaluate, start_next_wave, WaveContext};

/// Director counters for the current wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveState {
    pub phase: WavePhase,
    /// Number of the current (or last finished) wave; 0 before the first.
    pub number: u32,
    pub enemies_in_wave: u32,
    /// Attackers of this wave that made it into the registry.
    pub spawned: u32,
    /// Spawn requests waiting on the loader.
    pub pending: u32,
}

/// Result of one director tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectorTick {
    pub request_spawn: bool,
    /// Bonus credited this tick, if the wave completed.
    pub completion_bonus: Option<u32>,
}

impl WaveState {
    /// Start the next wave. `false` (and no change) unless idle.
    pub fn start(&mut self, tuning: &WaveTuning) -> bool {
        let Some(start) = start_next_wave(self.phase, self.number, tuning) else {
            return false;
        };
        self.phase = WavePhase::WaveActive;
        self.number = start.wave_number;
        self.enemies_in_wave = start.enemies_in_wave;
        self.spawned = 0;
        info!(
            wave = self.number,
            enemies = self.enemies_in_wave,
            "wave started"
        );
        true
    }

    pub fn view(&self, alive: u32) -> WaveView {
        WaveView {
            number: self.number,
            phase: self.phase,
            enemies_in_wave: self.enemies_in_wave,
            enemies_spawned: self.spawned,
            remaining_to_spawn: self.enemies_in_wave.saturating_sub(self.spawned),
            alive,
        }
    }

    fn short_of_quota(&self) -> bool {
        self.spawned.saturating_add(self.pending) < self.enemies_in_wave
    }
}

/// Run the director for one tick. The RNG is only drawn while the active
/// wave still has unrequested attackers.
pub fn run(
    state: &mut WaveState,
    tuning: &WaveTuning,
    live_attackers: u32,
    rng: &mut ChaCha8Rng,
) -> DirectorTick {
    let spawn_roll = if state.phase == WavePhase::WaveActive && state.short_of_quota() {
        rng.gen::<f64>()
    } else {
        1.0
    };

    let ctx = WaveContext {
        phase: state.phase,
        wave_number: state.number,
        enemies_in_wave: state.enemies_in_wave,
        spawned: state.spawned,
        pending: state.pending,
        live_attackers,
        spawn_roll,
    };
    let update = evaluate(&ctx, tuning);
    state.phase = update.new_phase;

    if let Some(bonus) = update.completion_bonus {
        info!(wave = state.number, bonus, "wave complete");
        // WaveComplete is transient; settle back to Idle this tick.
        let settle = evaluate(
            &WaveContext {
                phase: state.phase,
                ..ctx
            },
            tuning,
        );
        state.phase = settle.new_phase;
    }

    DirectorTick {
        request_spawn: update.request_spawn,
        completion_bonus: update.completion_bonus,
    }
}
