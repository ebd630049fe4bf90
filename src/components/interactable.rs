//! Interactive object model.
//!
//! Every object the player can aim at and use carries an [`Interactable`].
//! What happens on use is decided by its [`Behavior`], a closed set of
//! strategies dispatched by
//! [`systems::interaction::interact`](crate::systems::interaction::interact).
//! Being pickable is one such strategy ([`Behavior::Pickup`]) rather than a
//! separate object kind.
//!
//! Interactions talk back to the player through an [`InteractionContext`],
//! implemented by the session layer, and report a result as an [`Outcome`].

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;

use crate::components::door::DoorAccess;
use crate::components::keypad::KeypadKey;

/// Result of interacting with an object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    None,
    /// A short line shown to the player (e.g. "Picked up Old Key").
    Message(String),
}

impl Outcome {
    pub fn message(text: impl Into<String>) -> Self {
        Outcome::Message(text.into())
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::None => None,
            Outcome::Message(t) => Some(t),
        }
    }
}

/// Auxiliary full-screen readers owned by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Panel {
    Laptop,
    Newspaper,
    Note(String),
}

/// Capabilities the player side exposes to interactions.
pub trait InteractionContext {
    /// Add an item to the inventory.
    fn inventory_add(&mut self, id: &str, name: &str);
    fn inventory_has(&self, id: &str) -> bool;
    /// Id of the item currently held, if any.
    fn equipped(&self) -> Option<&str>;
    /// World-space look direction of the player camera, when known.
    fn look_direction(&self) -> Option<Vec3>;
    /// The player reached the ending.
    fn win(&mut self);
    /// Speak a subtitle line.
    fn speak(&mut self, text: &str);
    fn open_panel(&mut self, panel: Panel);

    fn is_equipped(&self, id: &str) -> bool {
        self.equipped() == Some(id)
    }
}

/// What an object does when the player uses it.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Goes into the inventory and disappears from the world.
    Pickup,
    /// Door or container; see [`Door`](crate::components::door::Door).
    Door(DoorAccess),
    /// One button of a [`Keypad`](crate::components::keypad::Keypad).
    KeypadButton { keypad: Entity, key: KeypadKey },
    /// Cobwebs hiding the bathroom key; see
    /// [`Webs`](crate::components::props::Webs).
    Webs,
    /// The cue ball of a [`PoolTable`](crate::components::pooltable::PoolTable).
    CueBall { table: Entity },
    /// Beads of a curtain; interacting only rattles them.
    Curtain { curtain: Entity },
    /// Wall switch for the ceiling fan.
    FanSwitch,
    /// A sink tap or shower valve; see [`Tap`](crate::components::props::Tap).
    Tap,
    /// Car ignition, usable with the car keys held. `holding_hint` is
    /// spoken when the keys are owned but not held.
    Ignition { holding_hint: String },
    /// Opens a reader panel.
    Reader(Panel),
    /// Returns a fixed message.
    Remark(String),
    /// Speaks a fixed line.
    Speech(String),
    /// Aimable but does nothing on use.
    Silent,
}

/// An object the player can target and use.
#[derive(Component, Debug, Clone)]
pub struct Interactable {
    /// Unique identifier within the world.
    pub id: String,
    /// Display name, used for inventory entries.
    pub name: String,
    /// Action hint shown while targeted ("Open Door", "Pick up").
    pub prompt: String,
    pub visible: bool,
    /// Whether the object can currently be targeted. Independent of `visible`.
    pub interactive: bool,
    pub behavior: Behavior,
    /// Size of the pick box centered on the object's transform.
    pub pick_size: Vec3,
}

impl Interactable {
    pub fn new(id: impl Into<String>, name: impl Into<String>, behavior: Behavior) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: String::new(),
            visible: true,
            interactive: true,
            behavior,
            pick_size: Vec3::splat(0.3),
        }
    }

    /// Pickable item with the standard prompt.
    pub fn item(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, Behavior::Pickup).with_prompt("Pick up")
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_pick_size(mut self, size: Vec3) -> Self {
        self.pick_size = size;
        self
    }

    /// Start hidden and not targetable.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self.interactive = false;
        self
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self.behavior, Behavior::Pickup)
    }

    pub fn is_targetable(&self) -> bool {
        self.visible && self.interactive
    }

    pub fn set_present(&mut self, present: bool) {
        self.visible = present;
        self.interactive = present;
    }
}
