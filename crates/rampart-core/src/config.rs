//! Game configuration: economy, wave scaling, combat, placement rules, level
//! layout and per-kind defender stats.
//!
//! Every section is `#[serde(default)]`, so a TOML file only needs the values
//! it overrides. Defaults mirror [`crate::constants`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::DefenderKind;
use crate::error::ConfigError;
use crate::types::Position;

/// Complete configuration for one simulation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed. Same seed and same command stream = same simulation.
    pub seed: u64,
    pub economy: EconomyConfig,
    pub waves: WaveTuning,
    pub combat: CombatConfig,
    pub placement: PlacementConfig,
    pub level: LevelLayout,
    pub defenders: DefenderRoster,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub starting_gold: u32,
    pub starting_lives: u32,
    /// Score credited per gold of kill reward.
    pub score_per_reward: u64,
}

/// Wave sizing, spawn probability and attacker scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_enemies: u32,
    pub enemies_per_wave: u32,
    pub max_enemies: u32,
    /// Per-tick probability of spawning one attacker while the wave is short.
    pub spawn_chance: f64,
    pub bonus_base: u32,
    pub bonus_per_wave: u32,
    pub base_health: f64,
    pub health_growth: f64,
    pub base_speed: f64,
    pub speed_growth: f64,
    pub base_reward: u32,
    pub reward_per_wave: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub hit_radius: f64,
    pub attacker_fire_interval_ms: f64,
    pub attacker_fire_range: f64,
    pub attacker_projectile_speed: f64,
    pub attacker_projectile_ttl_ticks: u32,
    pub strike_cost: u32,
    pub strike_delay_ticks: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub path_clearance: f64,
    pub defender_spacing: f64,
    pub structure_clearance: f64,
    /// Half-extent of the square playable area centred on the origin.
    pub half_extent: f64,
}

/// Static level geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    /// Ordered waypoints. Attackers enter at the first and leak at the last.
    pub path: Vec<Position>,
    pub structures: Vec<Structure>,
}

/// A static obstacle that blocks placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    pub name: String,
    pub position: Position,
    pub radius: f64,
}

/// Stats for one defender kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenderStats {
    pub cost: u32,
    pub damage: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    /// World units per tick. Hits are sampled once per tick, so this must
    /// stay below twice `combat.hit_radius`.
    pub projectile_speed: f64,
    pub projectile_ttl_ticks: u32,
}

/// Per-kind defender stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenderRoster {
    pub basic: DefenderStats,
    pub missile: DefenderStats,
    pub laser: DefenderStats,
    pub colony: DefenderStats,
    pub area_attack: DefenderStats,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            economy: EconomyConfig::default(),
            waves: WaveTuning::default(),
            combat: CombatConfig::default(),
            placement: PlacementConfig::default(),
            level: LevelLayout::default(),
            defenders: DefenderRoster::default(),
        }
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            score_per_reward: SCORE_PER_REWARD,
        }
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemies: WAVE_BASE_ENEMIES,
            enemies_per_wave: WAVE_ENEMIES_PER_WAVE,
            max_enemies: WAVE_MAX_ENEMIES,
            spawn_chance: WAVE_SPAWN_CHANCE,
            bonus_base: WAVE_BONUS_BASE,
            bonus_per_wave: WAVE_BONUS_PER_WAVE,
            base_health: ATTACKER_BASE_HEALTH,
            health_growth: ATTACKER_HEALTH_GROWTH,
            base_speed: ATTACKER_BASE_SPEED,
            speed_growth: ATTACKER_SPEED_GROWTH,
            base_reward: ATTACKER_BASE_REWARD,
            reward_per_wave: ATTACKER_REWARD_PER_WAVE,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            hit_radius: HIT_RADIUS,
            attacker_fire_interval_ms: ATTACKER_FIRE_INTERVAL_MS,
            attacker_fire_range: ATTACKER_FIRE_RANGE,
            attacker_projectile_speed: ATTACKER_PROJECTILE_SPEED,
            attacker_projectile_ttl_ticks: PROJECTILE_TTL_TICKS,
            strike_cost: STRIKE_COST,
            strike_delay_ticks: STRIKE_DELAY_TICKS,
        }
    }
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            path_clearance: PLACEMENT_PATH_CLEARANCE,
            defender_spacing: PLACEMENT_DEFENDER_SPACING,
            structure_clearance: PLACEMENT_STRUCTURE_CLEARANCE,
            half_extent: LEVEL_HALF_EXTENT,
        }
    }
}

impl Default for LevelLayout {
    /// A winding ground-level path with the citadel at its end.
    fn default() -> Self {
        Self {
            path: vec![
                Position::ground(-100.0, 0.0),
                Position::ground(-40.0, 0.0),
                Position::ground(-40.0, 40.0),
                Position::ground(20.0, 40.0),
                Position::ground(20.0, -30.0),
                Position::ground(80.0, -30.0),
                Position::ground(80.0, 10.0),
                Position::ground(120.0, 10.0),
            ],
            structures: vec![
                Structure {
                    name: "citadel".into(),
                    position: Position::ground(126.0, 10.0),
                    radius: 5.0,
                },
                Structure {
                    name: "relay".into(),
                    position: Position::ground(50.0, 0.0),
                    radius: 3.0,
                },
                Structure {
                    name: "ridge".into(),
                    position: Position::ground(-10.0, 15.0),
                    radius: 4.0,
                },
            ],
        }
    }
}

impl Default for DefenderRoster {
    fn default() -> Self {
        Self {
            basic: DefenderStats {
                cost: 50,
                damage: 25.0,
                range: 12.0,
                fire_interval_ms: 900.0,
                projectile_speed: 0.8,
                projectile_ttl_ticks: PROJECTILE_TTL_TICKS,
            },
            missile: DefenderStats {
                cost: 120,
                damage: 60.0,
                range: 18.0,
                fire_interval_ms: 2000.0,
                projectile_speed: 0.5,
                projectile_ttl_ticks: 120,
            },
            laser: DefenderStats {
                cost: 90,
                damage: 10.0,
                range: 10.0,
                fire_interval_ms: 250.0,
                projectile_speed: 1.5,
                projectile_ttl_ticks: 40,
            },
            colony: DefenderStats {
                cost: 150,
                damage: 15.0,
                range: 14.0,
                fire_interval_ms: 600.0,
                projectile_speed: 0.7,
                projectile_ttl_ticks: PROJECTILE_TTL_TICKS,
            },
            area_attack: DefenderStats {
                cost: 200,
                damage: 40.0,
                range: 8.0,
                fire_interval_ms: 1500.0,
                projectile_speed: 0.6,
                projectile_ttl_ticks: 80,
            },
        }
    }
}

impl DefenderRoster {
    /// Stats for a defender kind.
    pub fn stats(&self, kind: DefenderKind) -> &DefenderStats {
        match kind {
            DefenderKind::Basic => &self.basic,
            DefenderKind::Missile => &self.missile,
            DefenderKind::Laser => &self.laser,
            DefenderKind::Colony => &self.colony,
            DefenderKind::AreaAttack => &self.area_attack,
        }
    }
}

impl GameConfig {
    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse and validate a TOML config string.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level.path.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "level path needs at least 2 waypoints, got {}",
                self.level.path.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.waves.spawn_chance) {
            return Err(ConfigError::Invalid(format!(
                "waves.spawn_chance must be within [0, 1], got {}",
                self.waves.spawn_chance
            )));
        }
        if self.waves.max_enemies == 0 {
            return Err(ConfigError::Invalid("waves.max_enemies must be > 0".into()));
        }
        if self.waves.base_health <= 0.0 {
            return Err(ConfigError::Invalid("waves.base_health must be > 0".into()));
        }
        if self.combat.hit_radius <= 0.0 {
            return Err(ConfigError::Invalid("combat.hit_radius must be > 0".into()));
        }
        if self.combat.attacker_fire_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid(
                "combat.attacker_fire_interval_ms must be > 0".into(),
            ));
        }
        let max_step = 2.0 * self.combat.hit_radius;
        if self.combat.attacker_projectile_speed >= max_step {
            return Err(ConfigError::Invalid(format!(
                "combat.attacker_projectile_speed must be below {max_step}"
            )));
        }
        for kind in DefenderKind::ALL {
            let stats = self.defenders.stats(kind);
            if stats.fire_interval_ms <= 0.0 || stats.projectile_speed <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "defender {} needs a positive fire interval and projectile speed",
                    kind.asset_name()
                )));
            }
            if stats.projectile_speed >= max_step {
                return Err(ConfigError::Invalid(format!(
                    "defender {} projectile_speed {} would step over a {} hit radius",
                    kind.asset_name(),
                    stats.projectile_speed,
                    self.combat.hit_radius
                )));
            }
        }
        Ok(())
    }
}
