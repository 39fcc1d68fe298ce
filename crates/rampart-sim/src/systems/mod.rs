//! ECS systems that operate on the registry each tick.
//!
//! Systems are free functions over the registry (or the raw `World` when they
//! never create or destroy entities). They own no state; counters that span
//! ticks live in small structs owned by the engine.

pub mod damage;
pub mod fire_control;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod strike;
pub mod targeting;
pub mod wave_spawner;
