//! Magnet tuning configuration resource.
//!
//! Holds the defaults applied to newly spawned magnet structures plus the
//! global constants of the magnetic force and the physics glue. Values can be
//! loaded from an INI file; anything missing keeps its default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [magnet]
//! range = 20.0
//! connect_range = 5.0
//! update_cooldown_ms = 2000
//! joint_stiffness = 1.0
//! joint_damping = 0.7
//! strength = 2.0
//!
//! [force]
//! min_distance = 0.5
//! force_multiplier = 1.0
//! force_cap = 50.0
//!
//! [physics]
//! collide_connected = true
//! spatial_cell_size = 16.0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};

use crate::components::magnetstructure::{
    DEFAULT_CONNECT_RANGE, DEFAULT_JOINT_DAMPING, DEFAULT_JOINT_STIFFNESS, DEFAULT_RANGE,
    DEFAULT_STRENGTH, DEFAULT_UPDATE_COOLDOWN, MagnetStructure,
};
use crate::resources::spatialgrid::DEFAULT_CELL_SIZE;

const DEFAULT_MIN_DISTANCE: f32 = 0.5;
const DEFAULT_FORCE_MULTIPLIER: f32 = 1.0;
const DEFAULT_FORCE_CAP: f32 = 50.0;
const DEFAULT_COLLIDE_CONNECTED: bool = true;
const DEFAULT_CONFIG_PATH: &str = "./magdock.ini";

/// Magnet configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MagnetConfig {
    /// Default detection range for new magnets.
    pub range: f32,
    /// Default connect range for new magnets.
    pub connect_range: f32,
    /// Default time between scans for new magnets.
    pub update_cooldown: Duration,
    /// Default weld spring frequency for new magnets.
    pub joint_stiffness: f32,
    /// Default weld damping ratio for new magnets.
    pub joint_damping: f32,
    /// Default pull strength for new magnets.
    pub strength: f32,
    /// Distances below this are treated as this for the inverse-square pull.
    pub min_distance: f32,
    /// Global scale applied to every magnetic pull.
    pub force_multiplier: f32,
    /// Upper bound of a single magnet/target pull.
    pub force_cap: f32,
    /// Whether welded bodies keep colliding with each other.
    pub collide_connected: bool,
    /// Cell size of the spatial grid.
    pub spatial_cell_size: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MagnetConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            range: DEFAULT_RANGE,
            connect_range: DEFAULT_CONNECT_RANGE,
            update_cooldown: DEFAULT_UPDATE_COOLDOWN,
            joint_stiffness: DEFAULT_JOINT_STIFFNESS,
            joint_damping: DEFAULT_JOINT_DAMPING,
            strength: DEFAULT_STRENGTH,
            min_distance: DEFAULT_MIN_DISTANCE,
            force_multiplier: DEFAULT_FORCE_MULTIPLIER,
            force_cap: DEFAULT_FORCE_CAP,
            collide_connected: DEFAULT_COLLIDE_CONNECTED,
            spatial_cell_size: DEFAULT_CELL_SIZE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file at `config_path`.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file {:?}: {}", self.config_path, e))?;
        self.apply_ini(&config);
        info!("Loaded magnet config from {:?}: {:?}", self.config_path, self);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        let float = |section: &str, key: &str| -> Option<f32> {
            match config.getfloat(section, key) {
                Ok(v) => v.map(|v| v as f32).filter(|v| v.is_finite()),
                Err(e) => {
                    warn!("Ignoring [{section}] {key}: {e}");
                    None
                }
            }
        };

        // [magnet] section
        if let Some(v) = float("magnet", "range") {
            self.range = v.max(0.0);
        }
        if let Some(v) = float("magnet", "connect_range") {
            self.connect_range = v.max(0.0);
        }
        if let Some(ms) = config.getuint("magnet", "update_cooldown_ms").ok().flatten() {
            self.update_cooldown = Duration::from_millis(ms);
        }
        if let Some(v) = float("magnet", "joint_stiffness") {
            self.joint_stiffness = v;
        }
        if let Some(v) = float("magnet", "joint_damping") {
            self.joint_damping = v.clamp(0.0, 1.0);
        }
        if let Some(v) = float("magnet", "strength") {
            self.strength = v;
        }

        // [force] section
        if let Some(v) = float("force", "min_distance") {
            self.min_distance = v.max(f32::EPSILON);
        }
        if let Some(v) = float("force", "force_multiplier") {
            self.force_multiplier = v;
        }
        if let Some(v) = float("force", "force_cap") {
            self.force_cap = v.max(0.0);
        }

        // [physics] section
        if let Some(v) = config.getbool("physics", "collide_connected").ok().flatten() {
            self.collide_connected = v;
        }
        if let Some(v) = float("physics", "spatial_cell_size") {
            self.spatial_cell_size = v;
        }

        if self.connect_range > self.range {
            warn!(
                "connect_range {} exceeds range {}, capping",
                self.connect_range, self.range
            );
            self.connect_range = self.range;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [magnet] section
        config.set("magnet", "range", Some(self.range.to_string()));
        config.set("magnet", "connect_range", Some(self.connect_range.to_string()));
        config.set(
            "magnet",
            "update_cooldown_ms",
            Some(self.update_cooldown.as_millis().to_string()),
        );
        config.set("magnet", "joint_stiffness", Some(self.joint_stiffness.to_string()));
        config.set("magnet", "joint_damping", Some(self.joint_damping.to_string()));
        config.set("magnet", "strength", Some(self.strength.to_string()));

        // [force] section
        config.set("force", "min_distance", Some(self.min_distance.to_string()));
        config.set("force", "force_multiplier", Some(self.force_multiplier.to_string()));
        config.set("force", "force_cap", Some(self.force_cap.to_string()));

        // [physics] section
        config.set(
            "physics",
            "collide_connected",
            Some(self.collide_connected.to_string()),
        );
        config.set(
            "physics",
            "spatial_cell_size",
            Some(self.spatial_cell_size.to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved magnet config to {:?}", self.config_path);

        Ok(())
    }

    /// A fresh, disconnected magnet carrying this configuration's defaults.
    pub fn structure_template(&self) -> MagnetStructure {
        MagnetStructure::new()
            .with_range(self.range)
            .with_connect_range(self.connect_range)
            .with_cooldown(self.update_cooldown)
            .with_joint_tuning(self.joint_stiffness, self.joint_damping)
            .with_strength(self.strength)
    }
}
