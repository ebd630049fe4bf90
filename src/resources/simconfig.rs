//! Simulation configuration resource.
//!
//! Tunables loaded from an INI file. Every value has a default matching the
//! shipped game, so a missing or partial file still yields a playable world.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! max_delta = 0.1
//! ready_timeout = 5.0
//! keypad_code = 1031
//!
//! [player]
//! speed = 3.0
//! jump_force = 6.0
//! gravity = 30.0
//! interact_distance = 2.8
//!
//! [door]
//! swing_duration = 1.5
//!
//! [curtain]
//! substeps = 8
//! iterations = 4
//! damping = 0.994
//!
//! [table]
//! friction = 0.98
//! restitution = 0.8
//! shot_power = 0.25
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::components::curtain::CurtainSettings;
use crate::components::door::DEFAULT_SWING_DURATION;
use crate::components::pooltable::TableSettings;
use crate::resources::player::PlayerSettings;

const DEFAULT_MAX_DELTA: f32 = 0.1;
const DEFAULT_READY_TIMEOUT: f32 = 5.0;
const DEFAULT_KEYPAD_CODE: &str = "1031";
const DEFAULT_CONFIG_PATH: &str = "./verbatim.ini";

#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Frame deltas are clamped to this many seconds.
    pub max_delta: f32,
    /// Seconds to wait for content before continuing degraded.
    pub ready_timeout: f32,
    pub keypad_code: String,
    pub door_swing_duration: f32,
    pub player: PlayerSettings,
    pub curtain: CurtainSettings,
    pub table: TableSettings,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    pub fn new() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            keypad_code: DEFAULT_KEYPAD_CODE.to_string(),
            door_swing_duration: DEFAULT_SWING_DURATION,
            player: PlayerSettings::default(),
            curtain: CurtainSettings::default(),
            table: TableSettings::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load values from the INI file. Missing values keep their current value.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config from {:?}: max_delta={}, door={}s, curtain {}x{} iters, table friction={}",
            self.config_path,
            self.max_delta,
            self.door_swing_duration,
            self.curtain.substeps,
            self.curtain.iterations,
            self.table.friction
        );
        Ok(())
    }

    /// Apply values from INI text. Used by tests and embedded defaults.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            config.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };
        let uint = |section: &str, key: &str| -> Option<u64> {
            config.getuint(section, key).ok().flatten()
        };

        // [world] section
        if let Some(v) = float("world", "max_delta") {
            self.max_delta = v.max(0.0);
        }
        if let Some(v) = float("world", "ready_timeout") {
            self.ready_timeout = v.max(0.0);
        }
        if let Some(code) = config.get("world", "keypad_code") {
            self.keypad_code = code;
        }

        // [player] section
        if let Some(v) = float("player", "speed") {
            self.player.speed = v;
        }
        if let Some(v) = float("player", "jump_force") {
            self.player.jump_force = v;
        }
        if let Some(v) = float("player", "gravity") {
            self.player.gravity = v;
        }
        if let Some(v) = float("player", "interact_distance") {
            self.player.interact_distance = v;
        }

        // [door] section
        if let Some(v) = float("door", "swing_duration") {
            self.door_swing_duration = v.max(0.0);
        }

        // [curtain] section
        if let Some(v) = uint("curtain", "substeps") {
            self.curtain.substeps = (v as u32).max(1);
        }
        if let Some(v) = uint("curtain", "iterations") {
            self.curtain.iterations = v as u32;
        }
        if let Some(v) = float("curtain", "damping") {
            self.curtain.damping = v;
        }

        // [table] section
        if let Some(v) = float("table", "friction") {
            self.table.friction = v;
        }
        if let Some(v) = float("table", "restitution") {
            self.table.restitution = v;
        }
        if let Some(v) = float("table", "shot_power") {
            self.table.shot_power = v;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("world", "max_delta", Some(self.max_delta.to_string()));
        config.set("world", "ready_timeout", Some(self.ready_timeout.to_string()));
        config.set("world", "keypad_code", Some(self.keypad_code.clone()));

        config.set("player", "speed", Some(self.player.speed.to_string()));
        config.set("player", "jump_force", Some(self.player.jump_force.to_string()));
        config.set("player", "gravity", Some(self.player.gravity.to_string()));
        config.set(
            "player",
            "interact_distance",
            Some(self.player.interact_distance.to_string()),
        );

        config.set("door", "swing_duration", Some(self.door_swing_duration.to_string()));

        config.set("curtain", "substeps", Some(self.curtain.substeps.to_string()));
        config.set("curtain", "iterations", Some(self.curtain.iterations.to_string()));
        config.set("curtain", "damping", Some(self.curtain.damping.to_string()));

        config.set("table", "friction", Some(self.table.friction.to_string()));
        config.set("table", "restitution", Some(self.table.restitution.to_string()));
        config.set("table", "shot_power", Some(self.table.shot_power.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}
