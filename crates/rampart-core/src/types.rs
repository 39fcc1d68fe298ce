//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in level space (world units).
/// x = East, y = North, z = Up. Level geometry lives on the z = 0 plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each un-paused tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

/// Weak, generation-tagged reference to a registry entity.
///
/// Produced from the entity's packed id + generation bits. Once the entity is
/// removed the handle no longer resolves, even if its slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(pub u64);

/// Opaque handle to a visual resource materialized by the resource loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position on the ground plane.
    pub fn ground(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean distance to another position.
    pub fn range_to(&self, other: &Position) -> f64 {
        self.to_dvec3().distance(other.to_dvec3())
    }

    /// Horizontal range (ignoring altitude).
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Unit vector pointing from `self` toward `other`; zero if they coincide.
    pub fn direction_to(&self, other: &Position) -> DVec3 {
        (other.to_dvec3() - self.to_dvec3()).normalize_or_zero()
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position::from_dvec3(self.to_dvec3().lerp(other.to_dvec3(), t))
    }

    /// Shortest distance from `self` to the segment `a`–`b`.
    pub fn distance_to_segment(&self, a: &Position, b: &Position) -> f64 {
        let p = self.to_dvec3();
        let a = a.to_dvec3();
        let ab = b.to_dvec3() - a;
        let len_sq = ab.length_squared();
        if len_sq == 0.0 {
            return p.distance(a);
        }
        let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }

    /// Offset this position by `direction * distance`.
    pub fn offset(&self, direction: DVec3, distance: f64) -> Position {
        Position::from_dvec3(self.to_dvec3() + direction * distance)
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Elapsed time in milliseconds, derived from the tick count so it does
    /// not accumulate floating-point drift.
    pub fn elapsed_ms(&self) -> f64 {
        self.tick as f64 * crate::constants::DT_MS
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}
