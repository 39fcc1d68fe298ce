//! The level path: an immutable, ordered waypoint sequence.

use rampart_core::types::Position;

/// Ordered waypoints attackers walk from first to last. Always has at least
/// two waypoints.
#[derive(Debug, Clone)]
pub struct Path {
    waypoints: Vec<Position>,
}

impl Path {
    /// Build a path; `None` if fewer than two waypoints are given.
    pub fn new(waypoints: Vec<Position>) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        Some(Self { waypoints })
    }

    pub fn end(&self) -> Position {
        self.waypoints[self.last_index()]
    }

    /// Index of the final waypoint. Reaching it means the attacker leaked.
    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Length of the segment starting at waypoint `index`; zero past the end.
    pub fn segment_length(&self, index: usize) -> f64 {
        match (self.waypoints.get(index), self.waypoints.get(index + 1)) {
            (Some(a), Some(b)) => a.range_to(b),
            _ => 0.0,
        }
    }

    /// Point at fractional `progress` along the segment starting at `index`.
    pub fn position_at(&self, index: usize, progress: f64) -> Position {
        match (self.waypoints.get(index), self.waypoints.get(index + 1)) {
            (Some(a), Some(b)) => a.lerp(b, progress.clamp(0.0, 1.0)),
            _ => self.end(),
        }
    }

    /// Shortest distance from `position` to any path segment.
    pub fn distance_to(&self, position: &Position) -> f64 {
        self.waypoints
            .windows(2)
            .map(|seg| position.distance_to_segment(&seg[0], &seg[1]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Middle waypoint, used as the full-map strike's detonation point.
    pub fn midpoint(&self) -> Position {
        self.waypoints[self.waypoints.len() / 2]
    }
}
