//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Handle, Position, VisualHandle};

/// Marks a placed defender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Defender {
    pub kind: DefenderKind,
    /// Gold paid at placement.
    pub cost: u32,
}

/// Marks an attacker walking the path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Attacker {
    /// Gold credited on kill.
    pub reward: u32,
    /// Wave this attacker was spawned in.
    pub wave: u32,
}

/// Attacker hit points. `current` never drops below zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
}

/// Progress along the level path.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PathFollower {
    /// Index of the waypoint the attacker last passed.
    pub path_index: usize,
    /// Fraction of the segment `path_index -> path_index + 1` covered, in [0, 1).
    pub progress: f64,
    /// World units per second.
    pub speed: f64,
}

/// A weapon mount. Defenders carry their primary weapon; attackers carry a
/// zero-damage counter-fire weapon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub damage: f64,
    /// Targets must be strictly closer than this.
    pub range: f64,
    pub fire_interval_ms: f64,
    /// `None` until the first shot; a weapon that never fired is ready.
    pub last_fire_ms: Option<f64>,
    /// World units per tick.
    pub projectile_speed: f64,
    pub projectile_ttl_ticks: u32,
}

/// Current combat target. Weak reference; may dangle after the target dies.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Target {
    pub handle: Option<Handle>,
}

/// A ballistic projectile in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub weapon: WeaponKind,
    /// Zero for attacker-fired (cosmetic) projectiles.
    pub damage: f64,
    /// World units per tick.
    pub speed: f64,
    /// Unit vector fixed at fire time.
    pub direction: DVec3,
    pub origin: Position,
    pub target: Handle,
    pub age_ticks: u32,
    pub ttl_ticks: u32,
}

/// Visual resource attached once the loader materialized it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Visual(pub VisualHandle);
