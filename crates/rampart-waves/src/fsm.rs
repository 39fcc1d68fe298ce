//! Spawn director finite state machine.
//!
//! Pure functions that compute wave phase transitions from counters supplied
//! by the caller. No ECS dependency and no RNG: the caller draws the spawn
//! roll and passes it in, keeping the machine deterministic to test.

use rampart_core::config::WaveTuning;
use rampart_core::enums::WavePhase;

use crate::profiles::{completion_bonus, enemies_in_wave};

/// Input to the wave FSM for a single tick.
#[derive(Debug, Clone, Copy)]
pub struct WaveContext {
    pub phase: WavePhase,
    pub wave_number: u32,
    pub enemies_in_wave: u32,
    /// Attackers of this wave that have entered the registry.
    pub spawned: u32,
    /// Spawn requests still waiting on the resource loader.
    pub pending: u32,
    /// Attackers currently alive in the registry.
    pub live_attackers: u32,
    /// Uniform sample in [0, 1) drawn by the caller for this tick.
    pub spawn_roll: f64,
}

/// Output from the wave FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveUpdate {
    pub new_phase: WavePhase,
    /// Issue one new spawn request this tick.
    pub request_spawn: bool,
    /// Bonus to credit; set exactly on the WaveActive -> WaveComplete edge.
    pub completion_bonus: Option<u32>,
}

/// Parameters for a newly started wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveStart {
    pub wave_number: u32,
    pub enemies_in_wave: u32,
}

/// Handle the external "start next wave" command. Returns `None` unless the
/// director is idle; starting while a wave is active is a no-op.
pub fn start_next_wave(
    phase: WavePhase,
    last_wave: u32,
    tuning: &WaveTuning,
) -> Option<WaveStart> {
    if phase != WavePhase::Idle {
        return None;
    }
    let wave_number = last_wave.saturating_add(1);
    Some(WaveStart {
        wave_number,
        enemies_in_wave: enemies_in_wave(wave_number, tuning),
    })
}

/// Evaluate the FSM for one tick.
pub fn evaluate(ctx: &WaveContext, tuning: &WaveTuning) -> WaveUpdate {
    match ctx.phase {
        WavePhase::Idle => no_change(ctx),
        WavePhase::WaveActive => evaluate_active(ctx, tuning),
        // Transient: the bonus was credited on entry.
        WavePhase::WaveComplete => WaveUpdate {
            new_phase: WavePhase::Idle,
            request_spawn: false,
            completion_bonus: None,
        },
    }
}

fn evaluate_active(ctx: &WaveContext, tuning: &WaveTuning) -> WaveUpdate {
    if ctx.spawned >= ctx.enemies_in_wave && ctx.live_attackers == 0 {
        return WaveUpdate {
            new_phase: WavePhase::WaveComplete,
            request_spawn: false,
            completion_bonus: Some(completion_bonus(ctx.wave_number, tuning)),
        };
    }

    let outstanding = ctx.spawned.saturating_add(ctx.pending);
    let request_spawn = outstanding < ctx.enemies_in_wave && ctx.spawn_roll < tuning.spawn_chance;

    WaveUpdate {
        request_spawn,
        ..no_change(ctx)
    }
}

fn no_change(ctx: &WaveContext) -> WaveUpdate {
    WaveUpdate {
        new_phase: ctx.phase,
        request_spawn: false,
        completion_bonus: None,
    }
}
