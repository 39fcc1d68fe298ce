//! Simulation constants and default tuning parameters.
//!
//! Everything tunable here is mirrored by a field in [`crate::config`];
//! these values are the defaults used when a config file omits a field.

/// Simulation tick rate (Hz). One tick per rendered frame.
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Milliseconds per tick.
pub const DT_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- Economy ---

/// Gold available at the start of a session.
pub const STARTING_GOLD: u32 = 200;

/// Lives available at the start of a session.
pub const STARTING_LIVES: u32 = 20;

/// Score credited per gold of kill reward.
pub const SCORE_PER_REWARD: u64 = 10;

// --- Waves ---

/// Attackers in a wave before per-wave growth.
pub const WAVE_BASE_ENEMIES: u32 = 3;

/// Additional attackers per wave number.
pub const WAVE_ENEMIES_PER_WAVE: u32 = 2;

/// Hard cap on attackers in a single wave.
pub const WAVE_MAX_ENEMIES: u32 = 25;

/// Probability that one attacker is spawned on a given active tick.
pub const WAVE_SPAWN_CHANCE: f64 = 0.02;

/// Flat part of the wave-completion bonus.
pub const WAVE_BONUS_BASE: u32 = 25;

/// Per-wave-number part of the wave-completion bonus.
pub const WAVE_BONUS_PER_WAVE: u32 = 10;

// --- Attacker scaling ---

/// Wave-1 attacker health.
pub const ATTACKER_BASE_HEALTH: f64 = 60.0;

/// Fractional health growth per wave after the first.
pub const ATTACKER_HEALTH_GROWTH: f64 = 0.25;

/// Wave-1 attacker speed (world units per second).
pub const ATTACKER_BASE_SPEED: f64 = 4.0;

/// Fractional speed growth per wave after the first.
pub const ATTACKER_SPEED_GROWTH: f64 = 0.05;

/// Wave-1 kill reward (gold).
pub const ATTACKER_BASE_REWARD: u32 = 10;

/// Additional kill reward per wave after the first.
pub const ATTACKER_REWARD_PER_WAVE: u32 = 2;

/// Attacker counter-fire interval (milliseconds).
pub const ATTACKER_FIRE_INTERVAL_MS: f64 = 1500.0;

/// Attacker counter-fire range (world units).
pub const ATTACKER_FIRE_RANGE: f64 = 8.0;

/// Speed of cosmetic attacker projectiles (world units per tick).
pub const ATTACKER_PROJECTILE_SPEED: f64 = 0.6;

// --- Combat ---

/// Distance below which a projectile counts as hitting its target.
pub const HIT_RADIUS: f64 = 1.0;

/// Default projectile time-to-live (ticks).
pub const PROJECTILE_TTL_TICKS: u32 = 100;

/// Gold cost of the full-map strike.
pub const STRIKE_COST: u32 = 300;

/// Ticks between triggering the full-map strike and its resolution.
pub const STRIKE_DELAY_TICKS: u32 = 120;

// --- Placement ---

/// Minimum distance between a defender and any path segment.
pub const PLACEMENT_PATH_CLEARANCE: f64 = 2.5;

/// Minimum distance between two defenders.
pub const PLACEMENT_DEFENDER_SPACING: f64 = 3.0;

/// Clearance added to a structure's own radius.
pub const PLACEMENT_STRUCTURE_CLEARANCE: f64 = 1.0;

/// Half-extent of the square playable area centred on the origin.
pub const LEVEL_HALF_EXTENT: f64 = 150.0;
