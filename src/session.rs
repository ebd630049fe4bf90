//! Player-side state living outside the simulated world.
//!
//! A [`Session`] holds what the original frame loop kept next to the world:
//! the player's body, the inventory and the few story flags that belong to
//! the player rather than the house. It implements [`InteractionContext`],
//! so it is what gets passed to
//! [`Simulation::interact`](crate::simulation::Simulation::interact).

use glam::Vec3;
use log::{debug, info};

use crate::components::interactable::{InteractionContext, Panel};
use crate::persistence::save::{LookRotation, PlayerState, SaveGame};
use crate::simulation::Simulation;
use crate::systems::movement::PlayerBody;

/// Leaving the bathroom means crossing this Z.
pub const BATHROOM_EXIT_Z: f32 = -2.6;
const BATHROOM_EXIT_LINE: &str = "Whose home am I in?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
}

/// Items carried by the player, in pickup order, and the one held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    equipped: Option<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the item was already carried.
    pub fn add(&mut self, id: &str, name: &str) -> bool {
        if self.has(id) {
            return false;
        }
        self.items.push(InventoryItem {
            id: id.to_string(),
            name: name.to_string(),
        });
        true
    }

    pub fn has(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Hold a carried item. Holding the held item again puts it away.
    pub fn equip(&mut self, id: &str) -> bool {
        if !self.has(id) {
            return false;
        }
        if self.equipped.as_deref() == Some(id) {
            self.equipped = None;
        } else {
            self.equipped = Some(id.to_string());
        }
        true
    }

    pub fn unequip(&mut self) {
        self.equipped = None;
    }

    pub fn equipped(&self) -> Option<&str> {
        self.equipped.as_deref()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|i| i.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub body: PlayerBody,
    pub inventory: Inventory,
    pub has_exited_bathroom: bool,
    pub won: bool,
    /// Subtitle lines spoken so far, oldest first.
    pub subtitles: Vec<String>,
    /// Reader panel the UI should show, if any.
    pub panel: Option<Panel>,
}

impl Session {
    pub fn new(start: Vec3) -> Self {
        Self {
            body: PlayerBody::new(start),
            inventory: Inventory::new(),
            has_exited_bathroom: false,
            won: false,
            subtitles: Vec::new(),
            panel: None,
        }
    }

    /// Check the one story beat driven by player position alone.
    pub fn update_story(&mut self) {
        if !self.has_exited_bathroom && self.body.position.z < BATHROOM_EXIT_Z {
            self.has_exited_bathroom = true;
            self.speak(BATHROOM_EXIT_LINE);
        }
    }

    pub fn last_subtitle(&self) -> Option<&str> {
        self.subtitles.last().map(String::as_str)
    }

    /// Everything needed to resume this session later.
    pub fn to_save(&self, sim: &mut Simulation) -> SaveGame {
        SaveGame {
            player: PlayerState {
                position: self.body.position,
                rotation: LookRotation {
                    x: self.body.pitch,
                    y: self.body.yaw,
                },
            },
            inventory: self.inventory.ids(),
            world: sim.world_state(),
            has_exited_bathroom: self.has_exited_bathroom,
        }
    }

    /// Rebuild a session from a save and restore the world to match.
    /// Item names are taken from the world; unknown ids keep their id as name.
    pub fn from_save(save: &SaveGame, sim: &mut Simulation) -> Self {
        let mut session = Session::new(save.player.position);
        session.body.pitch = save.player.rotation.x;
        session.body.yaw = save.player.rotation.y;
        session.has_exited_bathroom = save.has_exited_bathroom;
        for id in &save.inventory {
            let name = sim.object_name(id).unwrap_or_else(|| id.clone());
            session.inventory.add(id, &name);
        }
        sim.restore_world_state(&save.world, &session.inventory);
        info!(
            "Session restored at {:?} with {} item(s)",
            session.body.position,
            session.inventory.len()
        );
        session
    }
}

impl InteractionContext for Session {
    fn inventory_add(&mut self, id: &str, name: &str) {
        self.inventory.add(id, name);
    }

    fn inventory_has(&self, id: &str) -> bool {
        self.inventory.has(id)
    }

    fn equipped(&self) -> Option<&str> {
        self.inventory.equipped()
    }

    fn look_direction(&self) -> Option<Vec3> {
        Some(self.body.look_direction())
    }

    fn win(&mut self) {
        info!("Player won");
        self.won = true;
    }

    fn speak(&mut self, text: &str) {
        debug!("Speak: {}", text);
        self.subtitles.push(text.to_string());
    }

    fn open_panel(&mut self, panel: Panel) {
        debug!("Open panel {:?}", panel);
        self.panel = Some(panel);
    }
}
