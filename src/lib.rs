//! Verbatim simulation core.
//!
//! The world model of a first-person exploration game, with no window and
//! no renderer: interactive objects, a cooperative task scheduler, door and
//! puzzle state machines, a Verlet bead curtain, pool table physics, player
//! movement against box colliders, and a world snapshot for saving.
//!
//! # Project Structure
//!
//! - [`components`] – ECS components (doors, colliders, keypad, curtain, table, props)
//! - [`events`] – cues raised for the presentation layer
//! - [`house`] – the bundled house layout
//! - [`math`] – boxes and interpolation helpers
//! - [`persistence`] – world snapshot and save blob
//! - [`resources`] – ECS resources (time, colliders, registry, scheduler, config)
//! - [`session`] – player body, inventory and story flags
//! - [`simulation`] – the facade owning the world and its schedule
//! - [`systems`] – per-frame systems and interaction logic

pub mod components;
pub mod events;
pub mod house;
pub mod math;
pub mod persistence;
pub mod resources;
pub mod session;
pub mod simulation;
pub mod systems;
