//! Breach - gameplay core for a tile-map first-person shooter.
//!
//! Rendering, audio and the DOM/GUI layer live outside this crate. Everything
//! here runs inside one cooperative `GameSession::tick` per frame:
//! input -> player -> enemies -> weapons -> mission -> level transition.

pub mod config;
pub mod enemy;
pub mod hud;
pub mod level;
pub mod mission;
pub mod player;
pub mod session;
pub mod weapons;

pub use config::{FirePolicy, GameConfig};
pub use enemy::{DamageOutcome, Enemy, EnemyAppearance, EnemyRoster, EnemyStats};
pub use hud::{Hud, LogHud};
pub use level::{builtin_levels, Level, LevelBuilder, LevelData, LevelError};
pub use mission::{Mission, MissionEvent, MissionState, Objective, ObjectiveSpec};
pub use player::PlayerController;
pub use session::{GamePhase, GameSession, TickOutcome};
pub use weapons::{ShotResult, WeaponSystem, WeaponType};
