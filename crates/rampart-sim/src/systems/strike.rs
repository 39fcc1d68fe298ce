//! Full-map strike: a delayed action that destroys every live attacker
//! without going through targeting or projectiles.

use serde::{Deserialize, Serialize};
use tracing::debug;

use rampart_core::events::EffectEvent;

use crate::economy::Ledger;
use crate::path::Path;
use crate::registry::Registry;
use crate::systems::damage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeCountdown {
    pub remaining_ticks: u32,
}

/// Count the pending strike down by one tick and resolve it when it expires.
/// Returns the number of attackers destroyed on the resolving tick.
pub fn run(
    strike: &mut Option<StrikeCountdown>,
    registry: &mut Registry,
    path: &Path,
    ledger: &mut Ledger,
    effects: &mut Vec<EffectEvent>,
) -> Option<u32> {
    let countdown = strike.as_mut()?;
    if countdown.remaining_ticks > 1 {
        countdown.remaining_ticks -= 1;
        return None;
    }
    *strike = None;

    let mut destroyed = 0;
    for entity in registry.attackers() {
        if damage::kill_attacker(registry, entity, ledger, effects) {
            destroyed += 1;
        }
    }
    effects.push(EffectEvent::Explosion {
        position: path.midpoint(),
    });
    debug!(destroyed, "strike resolved");
    Some(destroyed)
}
