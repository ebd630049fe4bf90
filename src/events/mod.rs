//! Messages emitted by the simulation.
//!
//! Submodules overview:
//! - [`cue`] – sound/visual cues for the presentation layer

pub mod cue;
