//! Targeting system: each armed entity picks the nearest opposing entity
//! strictly inside its weapon range.
//!
//! Candidates are snapshotted once per pass and sorted by entity id, so ties
//! on distance resolve to the lowest id. Targets are not exclusive; several
//! defenders may hold the same attacker.

use hecs::{Component, Entity, World};

use rampart_core::components::{Attacker, Defender, Target, Weapon};
use rampart_core::types::Position;

use crate::registry::handle_of;

/// Run both targeting passes: defenders onto attackers, then attackers onto
/// defenders for counter-fire.
pub fn run(world: &mut World) {
    acquire::<Defender, Attacker>(world);
    acquire::<Attacker, Defender>(world);
}

/// Retarget every `S` entity onto the nearest `C` entity in range, clearing
/// the target when nothing qualifies.
fn acquire<S: Component, C: Component>(world: &mut World) {
    let mut candidates: Vec<(Entity, Position)> = world
        .query::<(&C, &Position)>()
        .iter()
        .map(|(entity, (_, pos))| (entity, *pos))
        .collect();
    candidates.sort_by_key(|(entity, _)| entity.id());

    for (_entity, (_seeker, pos, weapon, target)) in
        world.query_mut::<(&S, &Position, &Weapon, &mut Target)>()
    {
        target.handle = nearest_within(pos, weapon.range, &candidates).map(handle_of);
    }
}

/// Closest candidate strictly closer than `range`; the first one wins ties.
pub fn nearest_within(
    origin: &Position,
    range: f64,
    candidates: &[(Entity, Position)],
) -> Option<Entity> {
    let mut best: Option<(Entity, f64)> = None;
    for &(entity, pos) in candidates {
        let distance = origin.range_to(&pos);
        if distance >= range {
            continue;
        }
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best.map(|(entity, _)| entity)
}
