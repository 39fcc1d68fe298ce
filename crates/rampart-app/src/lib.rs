//! RAMPART application layer.
//!
//! Runs the simulation engine on its own thread and exposes a small control
//! surface (commands in, snapshots out) for a presentation layer or the
//! bundled driver binary.

pub mod autopilot;
pub mod control;
pub mod game_loop;
pub mod state;

pub use rampart_core as core;
