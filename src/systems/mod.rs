//! Simulation systems.
//!
//! This module groups the ECS systems and the exclusive world functions that
//! advance the simulation.
//!
//! Submodules overview
//! - [`ambient`] – dust motes, shower water and the ceiling fan
//! - [`curtain`] – Verlet bead curtain solver with sleep/wake
//! - [`door`] – door/container state machine and collider bookkeeping
//! - [`interaction`] – dispatch of interactive object behaviors
//! - [`keypad`] – keypad presses unlocking their door
//! - [`movement`] – player integration, ground probe and collision correction
//! - [`pooltable`] – pool table ball physics
//! - [`rat`] – rat scurry along its waypoints
//! - [`tasks`] – run the cooperative task scheduler
//! - [`time`] – update the simulation clock
//! - [`triggers`] – one-shot proximity triggers (portrait, rat, hallway wall)
//! - [`winsequence`] – getaway drive after the win

pub mod ambient;
pub mod curtain;
pub mod door;
pub mod interaction;
pub mod keypad;
pub mod movement;
pub mod pooltable;
pub mod rat;
pub mod tasks;
pub mod time;
pub mod triggers;
pub mod winsequence;
