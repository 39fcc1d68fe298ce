//! Entity registry. The only place defenders, attackers and projectiles are
//! created or destroyed.
//!
//! Wraps the hecs `World`. Cross-entity references are [`Handle`]s built from
//! the generational entity bits, so a handle to a removed entity resolves to
//! `None` even after hecs recycles its slot.

use hecs::{Entity, World};

use rampart_core::components::*;
use rampart_core::config::{CombatConfig, DefenderStats};
use rampart_core::enums::{DefenderKind, WeaponKind};
use rampart_core::types::{Handle, Position, VisualHandle};
use rampart_waves::profiles::AttackerProfile;

use crate::path::Path;

/// Weak handle for an entity.
pub fn handle_of(entity: Entity) -> Handle {
    Handle(entity.to_bits().get())
}

/// Decode a handle. Does not check liveness; see the `resolve_*` methods.
pub fn entity_of(handle: Handle) -> Option<Entity> {
    Entity::from_bits(handle.0)
}

/// Owns every live entity.
#[derive(Default)]
pub struct Registry {
    world: World,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access for queries.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable component access for systems. Systems must create and destroy
    /// entities through the registry methods, not through the world.
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Drop every entity.
    pub fn clear(&mut self) {
        self.world.clear();
    }

    // --- Insertion ---

    /// Insert a placed defender. Only called once its visual has loaded.
    pub fn insert_defender(
        &mut self,
        kind: DefenderKind,
        position: Position,
        stats: &DefenderStats,
        visual: VisualHandle,
    ) -> Entity {
        self.world.spawn((
            Defender {
                kind,
                cost: stats.cost,
            },
            position,
            Weapon {
                kind: WeaponKind::Defender(kind),
                damage: stats.damage,
                range: stats.range,
                fire_interval_ms: stats.fire_interval_ms,
                last_fire_ms: None,
                projectile_speed: stats.projectile_speed,
                projectile_ttl_ticks: stats.projectile_ttl_ticks,
            },
            Target::default(),
            Visual(visual),
        ))
    }

    /// Insert an attacker at the start of the path.
    pub fn insert_attacker(
        &mut self,
        profile: &AttackerProfile,
        combat: &CombatConfig,
        path: &Path,
        visual: VisualHandle,
    ) -> Entity {
        self.insert_attacker_at(profile, combat, path, 0, 0.0, visual)
    }

    /// Insert an attacker part-way along the path.
    pub fn insert_attacker_at(
        &mut self,
        profile: &AttackerProfile,
        combat: &CombatConfig,
        path: &Path,
        path_index: usize,
        progress: f64,
        visual: VisualHandle,
    ) -> Entity {
        self.world.spawn((
            Attacker {
                reward: profile.reward,
                wave: profile.wave,
            },
            path.position_at(path_index, progress),
            PathFollower {
                path_index,
                progress,
                speed: profile.speed,
            },
            Health {
                current: profile.health,
                max: profile.health,
            },
            Weapon {
                kind: WeaponKind::Attacker,
                damage: 0.0,
                range: combat.attacker_fire_range,
                fire_interval_ms: combat.attacker_fire_interval_ms,
                last_fire_ms: None,
                projectile_speed: combat.attacker_projectile_speed,
                projectile_ttl_ticks: combat.attacker_projectile_ttl_ticks,
            },
            Target::default(),
            Visual(visual),
        ))
    }

    /// Insert a projectile at `position`.
    pub fn insert_projectile(&mut self, position: Position, projectile: Projectile) -> Entity {
        self.world.spawn((position, projectile))
    }

    // --- Removal ---

    /// Remove a defender. `false` if `entity` is not a live defender.
    pub fn remove_defender(&mut self, entity: Entity) -> bool {
        self.is_defender(entity) && self.world.despawn(entity).is_ok()
    }

    /// Remove an attacker. `false` if `entity` is not a live attacker.
    pub fn remove_attacker(&mut self, entity: Entity) -> bool {
        self.is_attacker(entity) && self.world.despawn(entity).is_ok()
    }

    /// Remove a projectile. `false` if `entity` is not a live projectile.
    pub fn remove_projectile(&mut self, entity: Entity) -> bool {
        self.world.get::<&Projectile>(entity).is_ok() && self.world.despawn(entity).is_ok()
    }

    // --- Iteration ---
    //
    // Each returns a snapshot sorted by entity id, so callers may remove
    // entities while walking it.

    pub fn defenders(&self) -> Vec<Entity> {
        self.collect::<Defender>()
    }

    pub fn attackers(&self) -> Vec<Entity> {
        self.collect::<Attacker>()
    }

    pub fn projectiles(&self) -> Vec<Entity> {
        self.collect::<Projectile>()
    }

    pub fn defender_count(&self) -> u32 {
        self.world.query::<&Defender>().iter().count() as u32
    }

    pub fn attacker_count(&self) -> u32 {
        self.world.query::<&Attacker>().iter().count() as u32
    }

    pub fn projectile_count(&self) -> u32 {
        self.world.query::<&Projectile>().iter().count() as u32
    }

    // --- Weak lookup ---

    /// Live attacker behind `handle`, or `None` if it has been removed.
    pub fn resolve_attacker(&self, handle: Handle) -> Option<Entity> {
        entity_of(handle).filter(|&e| self.is_attacker(e))
    }

    /// Live defender behind `handle`, or `None` if it has been removed.
    pub fn resolve_defender(&self, handle: Handle) -> Option<Entity> {
        entity_of(handle).filter(|&e| self.is_defender(e))
    }

    pub fn position(&self, entity: Entity) -> Option<Position> {
        self.world.get::<&Position>(entity).ok().map(|p| *p)
    }

    pub fn is_attacker(&self, entity: Entity) -> bool {
        self.world.get::<&Attacker>(entity).is_ok()
    }

    pub fn is_defender(&self, entity: Entity) -> bool {
        self.world.get::<&Defender>(entity).is_ok()
    }

    fn collect<T: hecs::Component>(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .world
            .query::<&T>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        entities.sort_by_key(|e| e.id());
        entities
    }
}
