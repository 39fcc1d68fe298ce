//! Path-following movement for attackers.
//!
//! Advances each attacker `speed * dt` world units along the path, carrying
//! leftover distance across waypoints. Attackers that reach the final
//! waypoint are reported as leaked; the caller removes them.

use hecs::{Entity, World};

use rampart_core::components::{Attacker, PathFollower};
use rampart_core::types::Position;

use crate::path::Path;

/// Move every attacker. Fills `leaked` with attackers at the path end,
/// sorted by entity id.
pub fn run(world: &mut World, path: &Path, dt: f64, leaked: &mut Vec<Entity>) {
    leaked.clear();
    let last = path.last_index();

    for (entity, (_attacker, follower, pos)) in
        world.query_mut::<(&Attacker, &mut PathFollower, &mut Position)>()
    {
        let mut remaining = follower.speed * dt;
        while remaining > 0.0 && follower.path_index < last {
            let length = path.segment_length(follower.path_index);
            let left = (1.0 - follower.progress) * length;
            if remaining >= left {
                remaining -= left;
                follower.path_index += 1;
                follower.progress = 0.0;
            } else {
                follower.progress += remaining / length;
                remaining = 0.0;
            }
        }
        *pos = path.position_at(follower.path_index, follower.progress);
        if follower.path_index >= last {
            leaked.push(entity);
        }
    }
    leaked.sort_by_key(|e| e.id());
}
