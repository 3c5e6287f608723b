//! The outer game loop: one `tick` per frame, level transitions, victory and game over.

use engine_core::Time;
use input::InputState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use crate::config::GameConfig;
use crate::enemy::EnemyRoster;
use crate::hud::Hud;
use crate::level::{Level, LevelBuilder, LevelData, LevelError};
use crate::mission::{Mission, MissionEvent};
use crate::player::{PlayerController, MAX_HEALTH};
use crate::weapons::{Trigger, WeaponSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Last level cleared; level 0 reloads at `resume_at`.
    Victory { resume_at: Duration },
    /// Player died. Nothing runs until [`GameSession::restart`].
    GameOver,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Gameplay is frozen on the victory or game-over screen.
    Waiting,
    LevelAdvanced { index: usize },
    Victory,
    GameOver,
}

pub struct GameSession {
    config: GameConfig,
    levels: Vec<LevelData>,
    level_index: usize,
    level: Level,
    player: PlayerController,
    weapons: WeaponSystem,
    roster: EnemyRoster,
    mission: Mission,
    time: Time,
    rng: StdRng,
    phase: GamePhase,
    hud_stale: bool,
}

impl GameSession {
    /// Validate every level up front and load the first one.
    pub fn new(config: GameConfig, levels: Vec<LevelData>) -> Result<Self, LevelError> {
        if levels.is_empty() {
            return Err(LevelError::NoLevels);
        }
        for data in &levels {
            data.validate()?;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut player = PlayerController::new(Level::empty().spawn);
        player.mouse_sensitivity = config.mouse_sensitivity;
        let roster = EnemyRoster::new();
        let mission = Mission::new(Vec::new(), &roster);

        let mut session = Self {
            weapons: WeaponSystem::new(config.fire_policy),
            config,
            levels,
            level_index: 0,
            level: Level::empty(),
            player,
            roster,
            mission,
            time: Time::new(),
            rng,
            phase: GamePhase::Playing,
            hud_stale: true,
        };
        session.load_level(0)?;
        Ok(session)
    }

    /// Tear down the current level and build `index` in its place.
    ///
    /// The roster reset happens before anything new is spawned, so handles and
    /// objectives from the old level never see the new one.
    pub fn load_level(&mut self, index: usize) -> Result<(), LevelError> {
        let data = self.levels.get(index).ok_or(LevelError::NoLevels)?;

        self.roster.reset();
        self.level.clear();
        let builder = LevelBuilder::new(self.config.enemy_spawn_chance);
        self.level = builder.build(data, &mut self.roster, &mut self.rng)?;
        self.mission = Mission::new(data.mission.clone(), &self.roster);

        self.player.reset(self.level.spawn);
        self.player.health.set(MAX_HEALTH);
        self.weapons.reset();
        self.level_index = index;
        self.phase = GamePhase::Playing;
        self.hud_stale = true;

        log::info!(
            "Loaded level {}/{} with {} enemies",
            index + 1,
            self.levels.len(),
            self.roster.len()
        );
        Ok(())
    }

    /// Start again from the first level with full health.
    pub fn restart(&mut self) -> Result<(), LevelError> {
        log::info!("Restarting");
        self.load_level(0)
    }

    /// Push the full HUD state: health, weapon slot and task list.
    pub fn sync_hud(&mut self, hud: &mut dyn Hud) {
        hud.update_health(self.player.health.current);
        hud.set_active_weapon(self.weapons.active().slot());
        hud.update_tasks(self.labels(), self.mission.objectives());
        self.hud_stale = false;
    }

    /// Run one frame.
    ///
    /// Order: player, enemies, weapons, mission, then the death and level
    /// transition checks. Enemies see the post-move player, and a kill made
    /// this frame can finish the mission this frame.
    pub fn tick(&mut self, dt: Duration, input: &InputState, hud: &mut dyn Hud) -> Result<TickOutcome, LevelError> {
        self.time.advance(dt);
        let now = self.time.now();
        let dt = dt.as_secs_f32();

        match self.phase {
            GamePhase::Playing => {}
            GamePhase::GameOver => return Ok(TickOutcome::Waiting),
            GamePhase::Victory { resume_at } => {
                if now < resume_at {
                    return Ok(TickOutcome::Waiting);
                }
                self.load_level(0)?;
                self.sync_hud(hud);
                return Ok(TickOutcome::LevelAdvanced { index: 0 });
            }
        }
        if self.hud_stale {
            self.sync_hud(hud);
        }

        self.player.update(input, &self.level.grid, dt);

        if self.roster.update(&mut self.player, &self.level.grid, dt, now) > 0 {
            hud.update_health(self.player.health.current);
        }

        if let Some(slot) = input.weapon_slot_pressed() {
            self.weapons.switch_weapon(slot, hud);
        }
        let trigger = if input.is_fire_pressed() {
            Some(Trigger::Pressed)
        } else if input.is_fire_held() {
            Some(Trigger::Held)
        } else {
            None
        };
        if let Some(trigger) = trigger {
            self.weapons.fire(&self.player.camera(), &mut self.roster, trigger, now);
        }
        self.weapons.update(now);

        let event = self.mission.update(self.player.position, &self.roster);
        hud.update_tasks(self.labels(), self.mission.objectives());

        if !self.player.is_alive() {
            log::info!("Game over on level {}", self.level_index + 1);
            self.phase = GamePhase::GameOver;
            return Ok(TickOutcome::GameOver);
        }

        match event {
            Some(MissionEvent::Completed) => self.advance_level(hud),
            None => Ok(TickOutcome::Running),
        }
    }

    fn advance_level(&mut self, hud: &mut dyn Hud) -> Result<TickOutcome, LevelError> {
        let next = self.level_index + 1;
        if next < self.levels.len() {
            self.load_level(next)?;
            self.sync_hud(hud);
            return Ok(TickOutcome::LevelAdvanced { index: next });
        }

        let resume_at = self.time.now() + self.config.victory_delay();
        log::info!("Victory! Back to level 1 in {:?}", self.config.victory_delay());
        self.phase = GamePhase::Victory { resume_at };
        Ok(TickOutcome::Victory)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// HUD labels of the current level's objectives.
    pub fn labels(&self) -> &[String] {
        &self.levels[self.level_index].mission_hud
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn roster(&self) -> &EnemyRoster {
        &self.roster
    }

    pub fn weapons(&self) -> &WeaponSystem {
        &self.weapons
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn time(&self) -> &Time {
        &self.time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{Objective, ObjectiveSpec};
    use engine_core::Vec3;
    use input::{ElementState, KeyCode, MouseButton};

    #[derive(Default)]
    struct RecordingHud {
        health: Vec<u32>,
        weapons: Vec<u8>,
        tasks: Vec<Vec<bool>>,
    }

    impl Hud for RecordingHud {
        fn update_health(&mut self, value: u32) {
            self.health.push(value);
        }

        fn set_active_weapon(&mut self, slot: u8) {
            self.weapons.push(slot);
        }

        fn update_tasks(&mut self, labels: &[String], objectives: &[Objective]) {
            assert_eq!(labels.len(), objectives.len(), "labels must line up with objectives");
            self.tasks.push(objectives.iter().map(Objective::is_complete).collect());
        }
    }

    fn level(layout: &[&str], tile_size: f32, mission: Vec<ObjectiveSpec>) -> LevelData {
        LevelData {
            layout: layout.iter().map(|r| r.to_string()).collect(),
            tile_size,
            wall_height: 3.0,
            mission_hud: (0..mission.len()).map(|i| format!("task {}", i)).collect(),
            mission,
        }
    }

    fn unreachable_goal() -> Vec<ObjectiveSpec> {
        vec![ObjectiveSpec::FindObject {
            position: [500.0, 1.0, 500.0],
        }]
    }

    /// Config that spawns an enemy on every plain floor tile.
    fn populated() -> GameConfig {
        GameConfig {
            enemy_spawn_chance: 1.0,
            seed: Some(7),
            ..Default::default()
        }
    }

    fn empty() -> GameConfig {
        GameConfig {
            enemy_spawn_chance: 0.0,
            seed: Some(7),
            ..Default::default()
        }
    }

    fn holding(key: KeyCode) -> InputState {
        let mut input = InputState::new();
        input.process_keyboard(key, ElementState::Pressed);
        input
    }

    fn frame() -> Duration {
        Duration::from_millis(100)
    }

    #[test]
    fn enclosed_spawn_only_opens_toward_the_gap() {
        let data = level(&["RRR", "RS0", "RRR"], 2.0, unreachable_goal());
        let mut session = GameSession::new(empty(), vec![data]).unwrap();
        let mut hud = RecordingHud::default();
        let spawn = Vec3::new(0.0, 1.7, 0.0);
        assert_eq!(session.player().position, spawn);

        for key in [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA] {
            session.tick(frame(), &holding(key), &mut hud).unwrap();
            assert_eq!(session.player().position, spawn, "{:?} should be blocked", key);
        }

        session.tick(frame(), &holding(KeyCode::KeyD), &mut hud).unwrap();
        let moved = session.player().position - spawn;
        assert!((moved.x - 0.5).abs() < 1e-5, "moved {:?}", moved);
        assert!(moved.z.abs() < 1e-5);
    }

    #[test]
    fn enemy_attack_respects_cooldown() {
        // Enemy five units from the spawn, well inside its attack range.
        let data = level(&["S0"], 5.0, vec![ObjectiveSpec::KillAllEnemies]);
        let mut session = GameSession::new(populated(), vec![data]).unwrap();
        let mut hud = RecordingHud::default();
        let idle = InputState::new();
        assert_eq!(session.roster().len(), 1);

        session.tick(Duration::from_millis(16), &idle, &mut hud).unwrap();
        assert_eq!(session.player().health.current, 95);

        session.tick(Duration::from_millis(500), &idle, &mut hud).unwrap();
        assert_eq!(session.player().health.current, 95, "still cooling down");

        session.tick(Duration::from_millis(2000), &idle, &mut hud).unwrap();
        assert_eq!(session.player().health.current, 90);
        assert_eq!(hud.health, vec![100, 95, 90]);
    }

    #[test]
    fn completed_mission_advances_exactly_once() {
        let here = || vec![ObjectiveSpec::FindObject { position: [0.0, 1.0, 0.0] }];
        let levels = vec![level(&["S"], 2.0, here()), level(&["S"], 2.0, here())];
        let mut session = GameSession::new(empty(), levels).unwrap();
        let mut hud = RecordingHud::default();
        let idle = InputState::new();

        assert_eq!(
            session.tick(frame(), &idle, &mut hud).unwrap(),
            TickOutcome::LevelAdvanced { index: 1 }
        );
        assert_eq!(session.level_index(), 1);
        assert!(!session.mission().is_complete(), "fresh mission on the new level");

        assert_eq!(session.tick(frame(), &idle, &mut hud).unwrap(), TickOutcome::Victory);
        assert_eq!(session.level_index(), 1);
        assert!(matches!(session.phase(), GamePhase::Victory { .. }));
    }

    #[test]
    fn victory_loops_back_to_first_level() {
        let data = level(&["S"], 2.0, vec![ObjectiveSpec::KillAllEnemies]);
        let config = GameConfig {
            victory_delay_ms: 1000,
            ..empty()
        };
        let mut session = GameSession::new(config, vec![data]).unwrap();
        let mut hud = RecordingHud::default();
        let idle = InputState::new();

        // No enemies at all: the kill objective is done on the first frame.
        assert_eq!(session.tick(frame(), &idle, &mut hud).unwrap(), TickOutcome::Victory);
        for _ in 0..9 {
            assert_eq!(session.tick(frame(), &idle, &mut hud).unwrap(), TickOutcome::Waiting);
        }
        assert_eq!(
            session.tick(frame(), &idle, &mut hud).unwrap(),
            TickOutcome::LevelAdvanced { index: 0 }
        );
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn kill_with_shotgun_finishes_level_same_frame() {
        // Enemy straight ahead of the spawn (forward is -Z).
        let data = level(&["0", "S"], 5.0, vec![ObjectiveSpec::KillAllEnemies]);
        let mut session = GameSession::new(populated(), vec![data]).unwrap();
        let mut hud = RecordingHud::default();

        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);

        let outcome = session.tick(Duration::from_millis(16), &input, &mut hud).unwrap();
        assert_eq!(outcome, TickOutcome::Victory);
        assert_eq!(hud.weapons, vec![1, 2]);
        assert!(session.roster().all_dead());
        assert_eq!(session.weapons().active().slot(), 2);
    }

    #[test]
    fn held_button_does_not_repeat_per_click() {
        let data = level(&["0", "S"], 5.0, vec![ObjectiveSpec::KillAllEnemies]);
        let mut session = GameSession::new(populated(), vec![data]).unwrap();
        let mut hud = RecordingHud::default();

        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        session.tick(frame(), &input, &mut hud).unwrap();

        let enemy = session.roster().hit_boxes()[0].0;
        assert_eq!(session.roster().health(enemy), Some(30), "one pistol shot");

        input.begin_frame();
        session.tick(frame(), &input, &mut hud).unwrap();
        assert_eq!(session.roster().health(enemy), Some(30), "holding is not clicking");
    }

    #[test]
    fn death_is_terminal_until_restart() {
        let data = level(&["S0"], 5.0, vec![ObjectiveSpec::KillAllEnemies]);
        let mut session = GameSession::new(populated(), vec![data]).unwrap();
        let mut hud = RecordingHud::default();
        let idle = InputState::new();

        let mut outcome = TickOutcome::Running;
        for _ in 0..20 {
            outcome = session.tick(Duration::from_secs(2), &idle, &mut hud).unwrap();
        }
        assert_eq!(outcome, TickOutcome::GameOver);
        assert_eq!(session.player().health.current, 0);
        assert_eq!(
            session.tick(Duration::from_secs(2), &idle, &mut hud).unwrap(),
            TickOutcome::Waiting
        );

        let old_epoch = session.roster().epoch();
        session.restart().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.player().health.current, MAX_HEALTH);
        assert_ne!(session.roster().epoch(), old_epoch);
    }

    #[test]
    fn invalid_levels_are_rejected_up_front() {
        assert!(matches!(GameSession::new(empty(), Vec::new()), Err(LevelError::NoLevels)));

        let mut bad = level(&["S"], 2.0, vec![ObjectiveSpec::KillAllEnemies]);
        bad.mission_hud.clear();
        let good = level(&["S"], 2.0, vec![ObjectiveSpec::KillAllEnemies]);
        assert!(matches!(
            GameSession::new(empty(), vec![good, bad]),
            Err(LevelError::HudMismatch { .. })
        ));
    }
}
