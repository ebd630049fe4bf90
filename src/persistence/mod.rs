//! Save and restore.
//!
//! Submodules overview:
//! - [`snapshot`] – the flat world flag record and its capture/restore
//! - [`save`] – the save blob and the key/value stores holding it

pub mod save;
pub mod snapshot;
