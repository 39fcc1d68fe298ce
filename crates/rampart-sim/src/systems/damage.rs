//! Damage and kill resolution for attackers.

use hecs::Entity;
use tracing::debug;

use rampart_core::components::{Attacker, Health};
use rampart_core::events::EffectEvent;

use crate::economy::Ledger;
use crate::registry::Registry;

/// Subtract `amount` from an attacker's health, clamped at zero. Kills the
/// attacker when health reaches zero. Returns `true` on a kill.
pub fn apply_damage(
    registry: &mut Registry,
    target: Entity,
    amount: f64,
    ledger: &mut Ledger,
    effects: &mut Vec<EffectEvent>,
) -> bool {
    let dead = match registry.world_mut().get::<&mut Health>(target) {
        Ok(mut health) => {
            health.current = (health.current - amount).max(0.0);
            health.current <= 0.0
        }
        Err(_) => return false,
    };
    dead && kill_attacker(registry, target, ledger, effects)
}

/// Remove an attacker and credit its reward.
pub fn kill_attacker(
    registry: &mut Registry,
    entity: Entity,
    ledger: &mut Ledger,
    effects: &mut Vec<EffectEvent>,
) -> bool {
    let Ok(reward) = registry.world().get::<&Attacker>(entity).map(|a| a.reward) else {
        return false;
    };
    let position = registry.position(entity).unwrap_or_default();
    if !registry.remove_attacker(entity) {
        return false;
    }
    ledger.credit_kill(reward);
    effects.push(EffectEvent::Death { position });
    debug!(reward, x = position.x, y = position.y, "attacker killed");
    true
}
