//! Placement validation for new defenders.

use rampart_core::config::{PlacementConfig, Structure};
use rampart_core::error::PlacementConflict;
use rampart_core::types::Position;

use crate::path::Path;

/// Check a candidate position against the level bounds, the path, static
/// structures and every occupied defender slot (placed or still loading).
///
/// Checks run in that order and the first conflict is reported.
pub fn validate(
    position: &Position,
    path: &Path,
    config: &PlacementConfig,
    structures: &[Structure],
    occupied: impl IntoIterator<Item = Position>,
) -> Result<(), PlacementConflict> {
    if position.x.abs() > config.half_extent || position.y.abs() > config.half_extent {
        return Err(PlacementConflict::OutOfBounds);
    }
    if path.distance_to(position) < config.path_clearance {
        return Err(PlacementConflict::NearPath);
    }
    if structures
        .iter()
        .any(|s| position.horizontal_range_to(&s.position) < s.radius + config.structure_clearance)
    {
        return Err(PlacementConflict::NearStructure);
    }
    if occupied
        .into_iter()
        .any(|other| position.horizontal_range_to(&other) < config.defender_spacing)
    {
        return Err(PlacementConflict::NearDefender);
    }
    Ok(())
}
