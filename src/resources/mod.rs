//! ECS resources shared across systems.
//!
//! Submodules overview:
//! - [`colliderset`] – the global set of blocking colliders
//! - [`player`] – player probe and movement settings
//! - [`readiness`] – bounded wait for external content
//! - [`registry`] – interactive object id registry
//! - [`scheduler`] – cooperative task scheduler
//! - [`simconfig`] – simulation tunables loaded from INI
//! - [`worldflags`] – world-wide toggles (fan, scare, key reveal)
//! - [`worldtime`] – simulation clock

pub mod colliderset;
pub mod player;
pub mod readiness;
pub mod registry;
pub mod scheduler;
pub mod simconfig;
pub mod worldflags;
pub mod worldtime;
