//! Wave direction for RAMPART.
//!
//! Implements the spawn director state machine and the per-wave scaling
//! profiles that decide how many attackers a wave holds and how tough
//! they are.

pub mod fsm;
pub mod profiles;

pub use rampart_core as core;
