//! Tile-map levels: data format, validation and construction.
//!
//! A layout is a list of equal-length rows of tile codes, centred on the world
//! origin. `'0'` is floor, `'S'` is the player spawn, `'R' 'T' 'C' 'W'` are
//! walls that differ only in material.

use engine_core::Vec3;
use physics::CollisionGrid;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::enemy::{EnemyRoster, EnemyStats};
use crate::mission::ObjectiveSpec;
use crate::player::PLAYER_HEIGHT;

/// Chance that a plain floor tile spawns an enemy: one in a hundred.
pub const ENEMY_SPAWN_CHANCE: f64 = 0.01;
/// Enemies stand with their body centre one unit above the floor.
pub const ENEMY_SPAWN_HEIGHT: f32 = 1.0;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no levels to play")]
    NoLevels,
    #[error("level layout is empty")]
    EmptyLayout,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("unknown tile {tile:?} at row {row}, column {col}")]
    UnknownTile { tile: char, row: usize, col: usize },
    #[error("tile size and wall height must be positive (got {tile_size} and {wall_height})")]
    BadDimensions { tile_size: f32, wall_height: f32 },
    #[error("{labels} HUD labels for {objectives} objectives")]
    HudMismatch { labels: usize, objectives: usize },
    #[error("could not read levels file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse levels file: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// One level as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub layout: Vec<String>,
    pub tile_size: f32,
    pub wall_height: f32,
    pub mission: Vec<ObjectiveSpec>,
    /// `mission_hud[i]` is the label for `mission[i]`.
    pub mission_hud: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Spawn,
    /// Solid wall; the char is the material code.
    Wall(char),
}

impl Tile {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '0' => Some(Tile::Floor),
            'S' => Some(Tile::Spawn),
            'R' | 'T' | 'C' | 'W' => Some(Tile::Wall(code)),
            _ => None,
        }
    }
}

impl LevelData {
    pub fn rows(&self) -> usize {
        self.layout.len()
    }

    pub fn columns(&self) -> usize {
        self.layout.first().map_or(0, |row| row.chars().count())
    }

    /// Decode the layout, rejecting anything malformed.
    pub fn tiles(&self) -> Result<Vec<Vec<Tile>>, LevelError> {
        if self.layout.is_empty() {
            return Err(LevelError::EmptyLayout);
        }
        if !(self.tile_size > 0.0 && self.wall_height > 0.0) {
            return Err(LevelError::BadDimensions {
                tile_size: self.tile_size,
                wall_height: self.wall_height,
            });
        }
        if self.mission_hud.len() != self.mission.len() {
            return Err(LevelError::HudMismatch {
                labels: self.mission_hud.len(),
                objectives: self.mission.len(),
            });
        }

        let expected = self.columns();
        self.layout
            .iter()
            .enumerate()
            .map(|(row, line)| {
                let found = line.chars().count();
                if found != expected || found == 0 {
                    return Err(LevelError::RaggedRow { row, expected, found });
                }
                line.chars()
                    .enumerate()
                    .map(|(col, tile)| Tile::from_code(tile).ok_or(LevelError::UnknownTile { tile, row, col }))
                    .collect()
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        self.tiles().map(|_| ())
    }
}

/// A wall box, `[min, max]` in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallTile {
    pub min: Vec3,
    pub max: Vec3,
    pub material: char,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorTile {
    pub center: Vec3,
    pub size: f32,
}

/// Ceiling plane centred on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ceiling {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

/// Geometry derived from a `LevelData`; discarded wholesale on reset.
#[derive(Debug, Clone)]
pub struct Level {
    pub walls: Vec<WallTile>,
    pub floors: Vec<FloorTile>,
    pub ceiling: Ceiling,
    pub spawn: Vec3,
    /// Shared by the player and every enemy.
    pub grid: CollisionGrid,
}

impl Level {
    pub fn empty() -> Self {
        Self {
            walls: Vec::new(),
            floors: Vec::new(),
            ceiling: Ceiling {
                width: 0.0,
                depth: 0.0,
                height: 0.0,
            },
            spawn: Vec3::new(0.0, PLAYER_HEIGHT, 0.0),
            grid: CollisionGrid::new(),
        }
    }

    /// Discard all geometry and collision walls.
    pub fn clear(&mut self) {
        self.walls.clear();
        self.floors.clear();
        self.grid.clear();
    }
}

/// Turns level data into geometry and populates the enemy roster.
#[derive(Debug, Clone, Copy)]
pub struct LevelBuilder {
    pub enemy_spawn_chance: f64,
    pub enemy_stats: EnemyStats,
}

impl Default for LevelBuilder {
    fn default() -> Self {
        Self {
            enemy_spawn_chance: ENEMY_SPAWN_CHANCE,
            enemy_stats: EnemyStats::human(),
        }
    }
}

impl LevelBuilder {
    pub fn new(enemy_spawn_chance: f64) -> Self {
        Self {
            enemy_spawn_chance,
            ..Default::default()
        }
    }

    /// Build a level. The roster should already be reset; enemies are added to it.
    ///
    /// Nothing is spawned if the data is invalid.
    pub fn build<R: Rng>(&self, data: &LevelData, roster: &mut EnemyRoster, rng: &mut R) -> Result<Level, LevelError> {
        let tiles = data.tiles()?;
        let size = data.tile_size;
        let rows = tiles.len();
        let mut level = Level::empty();
        let mut spawn = None;

        for (row, line) in tiles.iter().enumerate() {
            let world_z = row as f32 * size - (rows as f32 * size) / 2.0;
            for (col, tile) in line.iter().enumerate() {
                let world_x = col as f32 * size - (line.len() as f32 * size) / 2.0;
                let center = Vec3::new(world_x + size / 2.0, 0.0, world_z + size / 2.0);

                match *tile {
                    Tile::Spawn => {
                        level.floors.push(FloorTile { center, size });
                        spawn = Some(Vec3::new(center.x, PLAYER_HEIGHT, center.z));
                    }
                    Tile::Floor => {
                        level.floors.push(FloorTile { center, size });
                        if rng.gen::<f64>() < self.enemy_spawn_chance {
                            roster.spawn(Vec3::new(center.x, ENEMY_SPAWN_HEIGHT, center.z), self.enemy_stats);
                        }
                    }
                    Tile::Wall(material) => {
                        let min = Vec3::new(world_x, 0.0, world_z);
                        let max = Vec3::new(world_x + size, data.wall_height, world_z + size);
                        level.grid.register(min.x, max.x, min.z, max.z);
                        level.walls.push(WallTile { min, max, material });
                    }
                }
            }
        }

        level.ceiling = Ceiling {
            width: data.columns() as f32 * size,
            depth: rows as f32 * size,
            height: data.wall_height,
        };
        match spawn {
            Some(position) => level.spawn = position,
            None => log::warn!("Level has no 'S' tile, spawning at the origin"),
        }

        log::info!(
            "Built {}x{} level: {} walls, {} floor tiles, {} enemies",
            data.columns(),
            rows,
            level.walls.len(),
            level.floors.len(),
            roster.len()
        );
        Ok(level)
    }
}

/// Read a RON list of levels and validate each one.
pub fn load_levels(path: &Path) -> Result<Vec<LevelData>, LevelError> {
    let text = std::fs::read_to_string(path)?;
    parse_levels(&text)
}

pub fn parse_levels(text: &str) -> Result<Vec<LevelData>, LevelError> {
    let levels: Vec<LevelData> = ron::from_str(text)?;
    if levels.is_empty() {
        return Err(LevelError::NoLevels);
    }
    for level in &levels {
        level.validate()?;
    }
    Ok(levels)
}

/// The two stock levels: the warehouse and the secret base.
pub fn builtin_levels() -> Vec<LevelData> {
    let layout = |rows: &[&str]| rows.iter().map(|r| r.to_string()).collect();
    let labels = |l: &[&str]| l.iter().map(|s| s.to_string()).collect();
    vec![
        LevelData {
            layout: layout(LEVEL1_LAYOUT),
            tile_size: 2.0,
            wall_height: 7.0,
            mission: vec![
                ObjectiveSpec::FindObject { position: [2.0, 1.0, 2.0] },
                ObjectiveSpec::KillAllEnemies,
            ],
            mission_hud: labels(&["Find the secret blue gem", "Kill all soldiers in the warehouse"]),
        },
        LevelData {
            layout: layout(LEVEL2_LAYOUT),
            tile_size: 2.0,
            wall_height: 7.0,
            mission: vec![
                ObjectiveSpec::FindObject { position: [2.0, 1.0, 2.0] },
                ObjectiveSpec::FindObject { position: [0.0, 1.0, 41.0] },
                ObjectiveSpec::KillAllEnemies,
            ],
            mission_hud: labels(&[
                "Find the secret blue gem",
                "Find the secret red gem",
                "Kill all soldiers in the secret base",
            ]),
        },
    ]
}

const LEVEL1_LAYOUT: &[&str] = &[
    "RRRRRRRRRRRRRRRRRRRRRRRRR",
    "RR000RRRRRRRRRRRRRRRRRRRR",
    "RR0S0RRRRRRRRRRRRRRRRRRRR",
    "RR000RRRRRRRRRRRRRRRRRRRR",
    "RR000RRRRRRRRRRRRRRRRRRRR",
    "RT000TTTTTTTTTTTTTTTTTTTT",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT000000000RR00000000000T",
    "RT000000000RR00000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT000000000TT00000000000T",
    "RT000000000TT00000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RT0000000000000000000000T",
    "RTTTTTTTTTTTTTTTTTTTTTTTT",
];

const LEVEL2_LAYOUT: &[&str] = &[
    "WWWWWWWWWWWWWWWWWWWWWWWWW",
    "WW000WWWWWWWWWWWWWWWWWWWW",
    "WW0S0WWWWWWWWWWWWWWWWWWWW",
    "WW000WWWWWWWWWWWWWWWWWWWW",
    "WW000WWWWWWWWWWWWWWWWWWWW",
    "WW000WWWWWWWWWWWWWWWWWWWW",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW000000000CC00000000000W",
    "WW000000000CC00000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW000000000CC00000000000W",
    "WW000000000CC00000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW000000000CC00000000000W",
    "WW000000000CC00000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WW0000000000000000000000W",
    "WWWWWWWWWWWW00WWWWWWWWWWW",
    "WWWWWWWWWWWW00WWWWWWWWWWW",
    "WWWWWWWW000000WWWWWWWWWWW",
    "WWWWWWWW000000WWWWWWWWWWW",
    "WC00000000WWWWWWWWWWWWWWW",
    "WC00000000WWWWWWWWWWWWWWW",
    "WWWWWWWW00000000CWWWWWWWW",
    "WWWWWWWW00000000CWWWWWWWW",
    "WWWWWWWWWWWWWW00WWWWWWWWW",
    "WWWWWWWWWWWWWW00WWWWWWWWW",
    "WWWWWWWWWWWWWW00WWWWWWWWW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WW000000000000000000000WW",
    "WWWWWWWWWWWWWWWWWWWWWWWWW",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn data(layout: &[&str]) -> LevelData {
        LevelData {
            layout: layout.iter().map(|r| r.to_string()).collect(),
            tile_size: 2.0,
            wall_height: 3.0,
            mission: vec![ObjectiveSpec::KillAllEnemies],
            mission_hud: vec!["Kill them".to_string()],
        }
    }

    fn build(layout: &[&str], chance: f64) -> (Level, EnemyRoster) {
        let mut roster = EnemyRoster::new();
        let mut rng = StdRng::seed_from_u64(1);
        let level = LevelBuilder::new(chance)
            .build(&data(layout), &mut roster, &mut rng)
            .unwrap();
        (level, roster)
    }

    #[test]
    fn grid_is_centred_on_origin() {
        let (level, _) = build(&["RRR", "RS0", "RRR"], 0.0);
        assert_eq!(level.spawn, Vec3::new(0.0, PLAYER_HEIGHT, 0.0));
        assert_eq!(level.walls.len(), 7);
        assert_eq!(level.floors.len(), 2);
        assert_eq!(level.walls[0].min, Vec3::new(-3.0, 0.0, -3.0));
        assert_eq!(level.walls[0].max, Vec3::new(-1.0, 3.0, -1.0));
        assert_eq!(level.walls[0].material, 'R');
        assert_eq!(
            level.ceiling,
            Ceiling {
                width: 6.0,
                depth: 6.0,
                height: 3.0
            }
        );
    }

    #[test]
    fn walls_feed_the_collision_grid() {
        let (level, _) = build(&["RT", "CW", "S0"], 0.0);
        assert_eq!(level.grid.len(), 4);
        // Top-left wall centre at (-1, -2).
        assert!(level.grid.query(Vec3::new(-1.0, 0.0, -2.0), 0.0));
        // Spawn tile centre at (-1, 2) is clear with a point probe.
        assert!(!level.grid.query(Vec3::new(-1.0, 0.0, 2.0), 0.0));
    }

    #[test]
    fn enemies_only_spawn_on_plain_floor() {
        let (_, roster) = build(&["0S0", "RRR"], 1.0);
        assert_eq!(roster.len(), 2);
        let mut xs: Vec<f32> = roster
            .hit_boxes()
            .iter()
            .map(|(_, hit_box)| {
                assert_eq!(hit_box.center.y, ENEMY_SPAWN_HEIGHT);
                assert_eq!(hit_box.center.z, -1.0);
                hit_box.center.x
            })
            .collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, vec![-2.0, 2.0]);

        let (_, roster) = build(&["0S0", "RRR"], 0.0);
        assert!(roster.is_empty());
    }

    #[test]
    fn seeded_population_is_repeatable() {
        let level = &builtin_levels()[0];
        let count = |seed| {
            let mut roster = EnemyRoster::new();
            let mut rng = StdRng::seed_from_u64(seed);
            LevelBuilder::default().build(level, &mut roster, &mut rng).unwrap();
            roster.len()
        };
        assert_eq!(count(42), count(42));
    }

    #[test]
    fn clear_discards_geometry_and_walls() {
        let (mut level, _) = build(&["RRR", "RS0", "RRR"], 0.0);
        level.clear();
        assert!(level.walls.is_empty() && level.floors.is_empty());
        assert!(level.grid.is_empty());
        assert!(!level.grid.query(Vec3::new(-2.0, 0.0, -2.0), 0.7));
    }

    #[test]
    fn missing_spawn_falls_back_to_origin() {
        let (level, _) = build(&["00", "RR"], 0.0);
        assert_eq!(level.spawn, Vec3::new(0.0, PLAYER_HEIGHT, 0.0));
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        assert!(matches!(data(&[]).validate(), Err(LevelError::EmptyLayout)));
        assert!(matches!(
            data(&["RRR", "RS"]).validate(),
            Err(LevelError::RaggedRow { row: 1, expected: 3, found: 2 })
        ));
        assert!(matches!(
            data(&["RRR", "RSX"]).validate(),
            Err(LevelError::UnknownTile { tile: 'X', row: 1, col: 2 })
        ));

        let mut bad = data(&["S"]);
        bad.tile_size = 0.0;
        assert!(matches!(bad.validate(), Err(LevelError::BadDimensions { .. })));

        let mut bad = data(&["S"]);
        bad.mission_hud.push("extra label".to_string());
        assert!(matches!(
            bad.validate(),
            Err(LevelError::HudMismatch { labels: 2, objectives: 1 })
        ));
    }

    #[test]
    fn invalid_level_spawns_nothing() {
        let mut roster = EnemyRoster::new();
        let mut rng = StdRng::seed_from_u64(1);
        let result = LevelBuilder::new(1.0).build(&data(&["000", "00Q"]), &mut roster, &mut rng);
        assert!(result.is_err());
        assert!(roster.is_empty());
    }

    #[test]
    fn builtin_levels_are_valid() {
        let levels = builtin_levels();
        assert_eq!(levels.len(), 2);
        for level in &levels {
            level.validate().unwrap();
            assert_eq!(level.columns(), 25);
        }
        assert_eq!(levels[0].rows(), 31);
        assert_eq!(levels[1].rows(), 50);
    }

    #[test]
    fn levels_parse_from_ron() {
        let text = r#"[
            (
                layout: ["RRR", "RS0", "RRR"],
                tile_size: 2.0,
                wall_height: 3.0,
                mission: [FindObject(position: (2.0, 1.0, 0.0)), KillAllEnemies],
                mission_hud: ["Find it", "Clear the room"],
            ),
        ]"#;
        let levels = parse_levels(text).unwrap();
        assert_eq!(levels[0].mission[0], ObjectiveSpec::FindObject { position: [2.0, 1.0, 0.0] });
        assert!(matches!(parse_levels("[]"), Err(LevelError::NoLevels)));
        assert!(matches!(parse_levels("[(layout: 3)]"), Err(LevelError::Parse(_))));
    }
}
