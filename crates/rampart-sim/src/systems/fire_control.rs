//! Fire control: launches a projectile from every armed entity whose target
//! still exists and whose fire interval has elapsed.

use hecs::Entity;

use rampart_core::components::{Projectile, Target, Weapon};
use rampart_core::enums::Side;
use rampart_core::events::EffectEvent;
use rampart_core::types::{Handle, Position};

use crate::registry::Registry;

/// A weapon is ready if it never fired or its interval has fully elapsed.
pub fn is_ready(weapon: &Weapon, now_ms: f64) -> bool {
    weapon
        .last_fire_ms
        .map_or(true, |last| now_ms - last >= weapon.fire_interval_ms)
}

struct Shot {
    shooter: Entity,
    origin: Position,
    aim: Position,
    weapon: Weapon,
    target: Handle,
}

/// Fire every ready weapon. Returns the number of shots fired.
pub fn run(registry: &mut Registry, now_ms: f64, effects: &mut Vec<EffectEvent>) -> u32 {
    let mut shots = Vec::new();
    {
        let world = registry.world();
        for (entity, (pos, weapon, target)) in
            world.query::<(&Position, &Weapon, &Target)>().iter()
        {
            let Some(handle) = target.handle else {
                continue;
            };
            if !is_ready(weapon, now_ms) {
                continue;
            }
            let resolved = match weapon.kind.side() {
                Side::Defender => registry.resolve_attacker(handle),
                Side::Attacker => registry.resolve_defender(handle),
            };
            let Some(aim) = resolved.and_then(|e| registry.position(e)) else {
                continue;
            };
            shots.push(Shot {
                shooter: entity,
                origin: *pos,
                aim,
                weapon: *weapon,
                target: handle,
            });
        }
    }
    shots.sort_by_key(|s| s.shooter.id());

    for shot in &shots {
        if let Ok(mut weapon) = registry.world_mut().get::<&mut Weapon>(shot.shooter) {
            weapon.last_fire_ms = Some(now_ms);
        }
        // Aim is frozen here; the projectile never re-targets.
        registry.insert_projectile(
            shot.origin,
            Projectile {
                weapon: shot.weapon.kind,
                damage: shot.weapon.damage,
                speed: shot.weapon.projectile_speed,
                direction: shot.origin.direction_to(&shot.aim),
                origin: shot.origin,
                target: shot.target,
                age_ticks: 0,
                ttl_ticks: shot.weapon.projectile_ttl_ticks,
            },
        );
        effects.push(EffectEvent::ShotFired {
            weapon: shot.weapon.kind,
        });
    }
    shots.len() as u32
}
