//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Defender archetype. Closed set; per-kind stats come from
/// [`crate::config::DefenderStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenderKind {
    /// Cheap single-target gun.
    Basic,
    /// Slow, long-range, explosive.
    Missile,
    /// Rapid low-damage beam bolts.
    Laser,
    /// Mid-range turret cluster.
    Colony,
    /// Short-range explosive area weapon.
    AreaAttack,
}

impl DefenderKind {
    pub const ALL: [DefenderKind; 5] = [
        DefenderKind::Basic,
        DefenderKind::Missile,
        DefenderKind::Laser,
        DefenderKind::Colony,
        DefenderKind::AreaAttack,
    ];

    /// Whether hits from this kind also produce an explosion effect.
    pub fn is_area_damage(self) -> bool {
        matches!(self, DefenderKind::Missile | DefenderKind::AreaAttack)
    }

    /// Asset stem used to derive the model path.
    pub fn asset_name(self) -> &'static str {
        match self {
            DefenderKind::Basic => "basic",
            DefenderKind::Missile => "missile",
            DefenderKind::Laser => "laser",
            DefenderKind::Colony => "colony",
            DefenderKind::AreaAttack => "area_attack",
        }
    }
}

/// Which side owns a weapon or projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Defender,
    Attacker,
}

/// Source of a shot, used by effect notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "source", content = "kind")]
pub enum WeaponKind {
    Defender(DefenderKind),
    /// Attacker counter-fire (cosmetic only).
    Attacker,
}

impl WeaponKind {
    pub fn side(self) -> Side {
        match self {
            WeaponKind::Defender(_) => Side::Defender,
            WeaponKind::Attacker => Side::Attacker,
        }
    }

    pub fn is_area_damage(self) -> bool {
        match self {
            WeaponKind::Defender(kind) => kind.is_area_damage(),
            WeaponKind::Attacker => false,
        }
    }
}

/// Spawn director state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// Waiting for an external "start next wave" command.
    #[default]
    Idle,
    /// Spawning and/or waiting for the wave's attackers to be cleared.
    WaveActive,
    /// Transient: bonus credited, returns to `Idle` within the same tick.
    WaveComplete,
}

/// Top-level simulation phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    Paused,
    /// Lives reached zero. Only a reset leaves this phase.
    GameOver,
}

/// Alert severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertLevel {
    Info,
    Warning,
    Critical,
}
