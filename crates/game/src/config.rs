//! Game configuration. Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How the fire button maps to shots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePolicy {
    /// One shot per click, any weapon, no rate limit.
    #[default]
    PerClick,
    /// Honour each weapon's fire interval; automatic weapons repeat while held.
    RateLimited,
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Look speed in radians per pointer pixel.
    #[serde(default = "default_sensitivity")]
    pub mouse_sensitivity: f32,
    #[serde(default)]
    pub fire_policy: FirePolicy,
    /// Chance that a plain floor tile gets an enemy.
    #[serde(default = "default_spawn_chance")]
    pub enemy_spawn_chance: f64,
    /// Fixed RNG seed for level population. `None` uses entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// How long the victory screen holds before looping back to level 0.
    #[serde(default = "default_victory_delay_ms")]
    pub victory_delay_ms: u64,
    /// Headless runner frame rate (Hz).
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Headless runner frame count.
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Optional RON file with a list of levels; built-in levels otherwise.
    #[serde(default)]
    pub levels_path: Option<PathBuf>,
}

fn default_sensitivity() -> f32 {
    0.002
}
fn default_spawn_chance() -> f64 {
    crate::level::ENEMY_SPAWN_CHANCE
}
fn default_victory_delay_ms() -> u64 {
    3000
}
fn default_frame_rate() -> u32 {
    60
}
fn default_frames() -> u32 {
    600
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: default_sensitivity(),
            fire_policy: FirePolicy::default(),
            enemy_spawn_chance: default_spawn_chance(),
            seed: None,
            victory_delay_ms: default_victory_delay_ms(),
            frame_rate: default_frame_rate(),
            frames: default_frames(),
            levels_path: None,
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    pub fn victory_delay(&self) -> Duration {
        Duration::from_millis(self.victory_delay_ms)
    }

    /// Fixed step for the headless runner.
    pub fn frame_delta(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate.max(1)))
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
