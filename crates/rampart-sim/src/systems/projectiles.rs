//! Projectile flight, hit detection and expiry.

use rampart_core::components::Projectile;
use rampart_core::enums::Side;
use rampart_core::events::EffectEvent;
use rampart_core::types::Position;

use crate::economy::Ledger;
use crate::registry::Registry;
use crate::systems::damage;

/// What happened to projectiles this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatReport {
    pub hits: u32,
    pub kills: u32,
    pub expired: u32,
}

/// Advance and age every projectile, then resolve hits and expiry in entity
/// order against the live registry.
pub fn run(
    registry: &mut Registry,
    hit_radius: f64,
    ledger: &mut Ledger,
    effects: &mut Vec<EffectEvent>,
) -> CombatReport {
    for (_entity, (pos, projectile)) in registry
        .world_mut()
        .query_mut::<(&mut Position, &mut Projectile)>()
    {
        projectile.age_ticks += 1;
        *pos = pos.offset(projectile.direction, projectile.speed);
    }

    let mut report = CombatReport::default();
    for entity in registry.projectiles() {
        let (pos, projectile) = {
            let world = registry.world();
            match (
                world.get::<&Position>(entity),
                world.get::<&Projectile>(entity),
            ) {
                (Ok(pos), Ok(projectile)) => (*pos, *projectile),
                _ => continue,
            }
        };

        let side = projectile.weapon.side();
        let target = match side {
            Side::Defender => registry.resolve_attacker(projectile.target),
            Side::Attacker => registry.resolve_defender(projectile.target),
        };
        let hit = target
            .and_then(|t| registry.position(t).map(|p| (t, p)))
            .filter(|(_, target_pos)| pos.range_to(target_pos) < hit_radius);

        if let Some((target, target_pos)) = hit {
            registry.remove_projectile(entity);
            report.hits += 1;
            effects.push(EffectEvent::Hit {
                position: target_pos,
            });
            if projectile.weapon.is_area_damage() {
                effects.push(EffectEvent::Explosion {
                    position: target_pos,
                });
            }
            // Attacker counter-fire is cosmetic.
            if side == Side::Defender
                && projectile.damage > 0.0
                && damage::apply_damage(registry, target, projectile.damage, ledger, effects)
            {
                report.kills += 1;
            }
        } else if projectile.age_ticks > projectile.ttl_ticks {
            registry.remove_projectile(entity);
            report.expired += 1;
        }
    }
    report
}
