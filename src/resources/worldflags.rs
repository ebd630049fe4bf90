//! World-wide toggles that do not belong to a single entity.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldFlags {
    /// Ceiling fan running.
    pub fan_on: bool,
    /// Mirror apparition already shown.
    pub scare_triggered: bool,
    /// Bathroom key dropped out of the webs.
    pub key_revealed: bool,
    /// The player drove away.
    pub won: bool,
}

impl Default for WorldFlags {
    fn default() -> Self {
        Self {
            fan_on: true,
            scare_triggered: false,
            key_revealed: false,
            won: false,
        }
    }
}
