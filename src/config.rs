//! Game configuration.
//!
//! Every field has a default taken from `constants.rs`, so a config file only
//! needs to name the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, GameError};
use crate::spawner::{AsteroidTemplate, SidePolicy};
use crate::types::Vector2D;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena: ArenaConfig,
    pub ship: ShipConfig,
    pub bullet: BulletConfig,
    pub spawner: SpawnerConfig,
    pub flash: FlashConfig,
}

/// Field geometry and simulation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Vertical half-extent of the orthographic camera, in world units
    pub orthographic_half_height: f64,
    /// Seconds per fixed physics tick
    pub fixed_timestep: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub lives: u32,
    /// Degrees per second
    pub rotation_speed: f64,
    pub force: f64,
    pub mass: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub speed: f64,
    pub mass: f64,
    /// Seconds before the bullet self-destructs
    pub time_to_live: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub initial_count: usize,
    pub first_spawn_delay: f64,
    pub interval_seconds: f64,
    pub min_force: f64,
    pub max_force: f64,
    pub asteroid_mass: f64,
    /// Scheduled spawns are skipped while the population is at this cap.
    /// `None` lets the field fill up without limit.
    pub max_asteroids: Option<usize>,
    pub side_policy: SidePolicy,
    pub catalog: Vec<AsteroidTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashConfig {
    pub duration: f64,
    pub interval: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            orthographic_half_height: DEFAULT_ORTHOGRAPHIC_HALF_HEIGHT,
            fixed_timestep: FIXED_TIMESTEP,
        }
    }
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            lives: SHIP_LIVES,
            rotation_speed: SHIP_ROTATION_SPEED,
            force: SHIP_FORCE,
            mass: SHIP_MASS,
            size: SHIP_SIZE,
        }
    }
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            speed: BULLET_SPEED,
            mass: BULLET_MASS,
            time_to_live: BULLET_TIME_TO_LIVE,
            size: BULLET_SIZE,
        }
    }
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            initial_count: INITIAL_ASTEROID_COUNT,
            first_spawn_delay: FIRST_SPAWN_DELAY_SECONDS,
            interval_seconds: ASTEROID_SPAWN_INTERVAL_SECONDS,
            min_force: ASTEROID_MIN_FORCE,
            max_force: ASTEROID_MAX_FORCE,
            asteroid_mass: ASTEROID_MASS,
            max_asteroids: None,
            side_policy: SidePolicy::default(),
            catalog: vec![
                AsteroidTemplate::new("rock-a", Vector2D::new(4.0, 4.0), '@'),
                AsteroidTemplate::new("rock-b", Vector2D::new(5.0, 3.5), '#'),
                AsteroidTemplate::new("rock-c", Vector2D::new(3.5, 4.5), '%'),
            ],
        }
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            duration: FLASH_DURATION_SECONDS,
            interval: FLASH_INTERVAL_SECONDS,
        }
    }
}

impl GameConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        ensure_toml(path)?;
        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rejects values that would make the arena unplayable or panic in a
    /// random draw.
    pub fn validate(&self) -> Result<(), GameError> {
        let spawner = &self.spawner;
        if spawner.catalog.is_empty() {
            return Err(GameError::Configuration("asteroid catalog is empty".to_string()));
        }
        if let Some(template) =
            spawner.catalog.iter().find(|t| !(t.size.x > 0.0) || !(t.size.y > 0.0))
        {
            return Err(GameError::Configuration(format!(
                "asteroid template '{}' has a non-positive size",
                template.name
            )));
        }
        if !(spawner.min_force >= 0.0) || spawner.min_force > spawner.max_force {
            return Err(GameError::Configuration(format!(
                "asteroid force range [{}, {}] is invalid",
                spawner.min_force, spawner.max_force
            )));
        }
        if !(spawner.interval_seconds > 0.0) || !(spawner.first_spawn_delay >= 0.0) {
            return Err(GameError::Configuration("spawn timing must be positive".to_string()));
        }
        if !(self.arena.fixed_timestep > 0.0) {
            return Err(GameError::Configuration("fixed timestep must be positive".to_string()));
        }
        for (name, mass) in [
            ("ship", self.ship.mass),
            ("bullet", self.bullet.mass),
            ("asteroid", spawner.asteroid_mass),
        ] {
            if !(mass > 0.0) {
                return Err(GameError::Configuration(format!("{name} mass must be positive")));
            }
        }
        if !(self.bullet.time_to_live > 0.0) {
            return Err(GameError::Configuration(
                "bullet time to live must be positive".to_string(),
            ));
        }
        if self.ship.lives == 0 {
            return Err(GameError::Configuration(
                "ship must start with at least one life".to_string(),
            ));
        }
        Ok(())
    }
}

fn ensure_toml(path: &Path) -> Result<(), ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(()),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::Side;

    #[test]
    fn defaults_are_valid() {
        GameConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            [spawner]
            initial_count = 7
            side_policy = "uniform"
            "#,
        )
        .expect("parse");
        assert_eq!(config.spawner.initial_count, 7);
        assert_eq!(config.spawner.side_policy, SidePolicy::Uniform);
        assert_eq!(config.ship, ShipConfig::default());
        assert_eq!(config.spawner.catalog.len(), 3);
    }

    #[test]
    fn fixed_side_policy_parses() {
        let config: GameConfig = toml::from_str(
            r#"
            [spawner]
            side_policy = { fixed = "top" }
            "#,
        )
        .expect("parse");
        assert_eq!(config.spawner.side_policy, SidePolicy::Fixed(Side::Top));
    }

    #[test]
    fn empty_catalog_is_a_configuration_error() {
        let mut config = GameConfig::default();
        config.spawner.catalog.clear();
        assert!(matches!(config.validate(), Err(GameError::Configuration(_))));
    }

    #[test]
    fn inverted_force_range_is_rejected() {
        let mut config = GameConfig::default();
        config.spawner.min_force = 6.0;
        assert!(matches!(config.validate(), Err(GameError::Configuration(_))));
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = std::env::temp_dir()
            .join(format!("term-asteroids-config-{}.toml", std::process::id()));
        let mut config = GameConfig::default();
        config.spawner.max_asteroids = Some(12);
        config.save_to_file(&path).expect("save");
        let loaded = GameConfig::load_from_file(&path).expect("load");
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn non_toml_extension_is_unsupported() {
        let err = GameConfig::load_from_file("settings.ron").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
