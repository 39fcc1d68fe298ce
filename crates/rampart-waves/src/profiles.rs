//! Per-wave scaling profiles.
//!
//! Consolidates the wave-number-dependent formulas for wave size, attacker
//! stats and the completion bonus. All inputs come from [`WaveTuning`].

use rampart_core::config::WaveTuning;

/// Stats for an attacker spawned in a given wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackerProfile {
    pub wave: u32,
    pub health: f64,
    /// World units per second.
    pub speed: f64,
    pub reward: u32,
}

impl AttackerProfile {
    /// Scale attacker stats for `wave` (1-based). Every stat is
    /// non-decreasing in the wave number for non-negative growth settings.
    pub fn for_wave(wave: u32, tuning: &WaveTuning) -> Self {
        let steps = wave.saturating_sub(1);
        Self {
            wave,
            health: tuning.base_health * (1.0 + tuning.health_growth * steps as f64),
            speed: tuning.base_speed * (1.0 + tuning.speed_growth * steps as f64),
            reward: tuning
                .base_reward
                .saturating_add(tuning.reward_per_wave.saturating_mul(steps)),
        }
    }
}

/// Attackers in wave `wave`: `min(base + wave * increment, cap)`.
pub fn enemies_in_wave(wave: u32, tuning: &WaveTuning) -> u32 {
    tuning
        .base_enemies
        .saturating_add(wave.saturating_mul(tuning.enemies_per_wave))
        .min(tuning.max_enemies)
}

/// Gold and score credited when wave `wave` is cleared.
pub fn completion_bonus(wave: u32, tuning: &WaveTuning) -> u32 {
    tuning
        .bonus_base
        .saturating_add(wave.saturating_mul(tuning.bonus_per_wave))
}
