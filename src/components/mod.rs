//! ECS components for simulated objects.
//!
//! Submodules overview:
//! - [`ambient`] – dust motes, shower water and the ceiling fan
//! - [`collider`] – static blocking boxes and walkable floors
//! - [`curtain`] – bead curtain strands for the Verlet solver
//! - [`door`] – doors and containers with closed/open poses
//! - [`interactable`] – the interactive object model and its behaviors
//! - [`keypad`] – numeric keypad guarding a door
//! - [`pooltable`] – pool table and its balls
//! - [`props`] – scripted one-off props (webs, portrait, mirror, car...)
//! - [`rat`] – the hallway rat
//! - [`transform`] – world placement and visibility

pub mod ambient;
pub mod collider;
pub mod curtain;
pub mod door;
pub mod interactable;
pub mod keypad;
pub mod pooltable;
pub mod props;
pub mod rat;
pub mod transform;
