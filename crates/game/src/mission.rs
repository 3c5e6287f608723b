//! Mission objectives and the Active -> Complete state machine.

use engine_core::Vec3;
use serde::{Deserialize, Serialize};

use crate::enemy::EnemyRoster;

/// Pickup distance for find-object objectives.
pub const FIND_RADIUS: f32 = 2.0;

/// Level-data description of one objective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectiveSpec {
    /// Walk within reach of an item at `position`.
    FindObject { position: [f32; 3] },
    /// Every enemy in the level is dead.
    KillAllEnemies,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectiveKind {
    FindObject {
        position: Vec3,
        /// The pickup marker is still in the world.
        marker_visible: bool,
    },
    /// Bound to the roster epoch it was created for.
    KillAllEnemies { roster_epoch: u32 },
}

/// A single objective. `complete` only ever goes false -> true.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    complete: bool,
}

impl Objective {
    pub fn from_spec(spec: &ObjectiveSpec, roster: &EnemyRoster) -> Self {
        let kind = match spec {
            ObjectiveSpec::FindObject { position } => ObjectiveKind::FindObject {
                position: Vec3::from_array(*position),
                marker_visible: true,
            },
            ObjectiveSpec::KillAllEnemies => ObjectiveKind::KillAllEnemies {
                roster_epoch: roster.epoch(),
            },
        };
        Self { kind, complete: false }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Re-evaluate. Completed objectives are never looked at again.
    pub fn update(&mut self, player_position: Vec3, roster: &EnemyRoster) {
        if self.complete {
            return;
        }
        match &mut self.kind {
            ObjectiveKind::FindObject {
                position,
                marker_visible,
            } => {
                if player_position.distance(*position) < FIND_RADIUS {
                    *marker_visible = false;
                    self.complete = true;
                }
            }
            ObjectiveKind::KillAllEnemies { roster_epoch } => {
                // A view from an earlier level must not read the new roster.
                if *roster_epoch == roster.epoch() && roster.all_dead() {
                    self.complete = true;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionState {
    Active,
    Complete,
}

/// Emitted once, on the frame a mission completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionEvent {
    Completed,
}

/// Ordered objectives gating level completion.
#[derive(Debug, Clone)]
pub struct Mission {
    specs: Vec<ObjectiveSpec>,
    objectives: Vec<Objective>,
    state: MissionState,
}

impl Mission {
    pub fn new(specs: Vec<ObjectiveSpec>, roster: &EnemyRoster) -> Self {
        let mut mission = Self {
            specs,
            objectives: Vec::new(),
            state: MissionState::Active,
        };
        mission.init(roster);
        mission
    }

    /// Build the objective list from the specs.
    fn init(&mut self, roster: &EnemyRoster) {
        self.objectives = self
            .specs
            .iter()
            .map(|spec| Objective::from_spec(spec, roster))
            .collect();
        self.state = MissionState::Active;
    }

    /// Discard progress and markers and start over.
    pub fn reset(&mut self, roster: &EnemyRoster) {
        self.init(roster);
    }

    /// Update every objective; reports completion on the transition frame only.
    pub fn update(&mut self, player_position: Vec3, roster: &EnemyRoster) -> Option<MissionEvent> {
        if self.state == MissionState::Complete {
            return None;
        }
        for objective in &mut self.objectives {
            objective.update(player_position, roster);
        }
        if self.objectives.iter().all(Objective::is_complete) {
            self.state = MissionState::Complete;
            log::info!("Mission complete ({} objectives)", self.objectives.len());
            return Some(MissionEvent::Completed);
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.state == MissionState::Complete
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyStats;

    #[test]
    fn kill_all_tracks_live_roster_and_stays_complete() {
        let mut roster = EnemyRoster::new();
        let a = roster.spawn(Vec3::new(0.0, 1.0, 0.0), EnemyStats::human());
        let b = roster.spawn(Vec3::new(4.0, 1.0, 0.0), EnemyStats::human());
        let mut objective = Objective::from_spec(&ObjectiveSpec::KillAllEnemies, &roster);

        objective.update(Vec3::ZERO, &roster);
        assert!(!objective.is_complete());

        roster.damage(a, 100);
        objective.update(Vec3::ZERO, &roster);
        assert!(!objective.is_complete(), "one still standing");

        roster.damage(b, 100);
        objective.update(Vec3::ZERO, &roster);
        assert!(objective.is_complete());

        roster.spawn(Vec3::ZERO, EnemyStats::human());
        objective.update(Vec3::ZERO, &roster);
        assert!(objective.is_complete(), "never toggles back");
    }

    #[test]
    fn kill_all_from_previous_level_never_completes() {
        let mut roster = EnemyRoster::new();
        roster.spawn(Vec3::ZERO, EnemyStats::human());
        let mut objective = Objective::from_spec(&ObjectiveSpec::KillAllEnemies, &roster);
        roster.reset();
        objective.update(Vec3::ZERO, &roster);
        assert!(!objective.is_complete());
    }

    #[test]
    fn find_object_completes_inside_radius_and_hides_marker() {
        let roster = EnemyRoster::new();
        let spec = ObjectiveSpec::FindObject { position: [2.0, 1.0, 2.0] };
        let mut objective = Objective::from_spec(&spec, &roster);

        objective.update(Vec3::new(2.0, 1.0, 4.0), &roster);
        assert!(!objective.is_complete(), "exactly 2.0 away is not close enough");

        objective.update(Vec3::new(2.0, 1.7, 3.0), &roster);
        assert!(objective.is_complete());
        assert_eq!(
            objective.kind,
            ObjectiveKind::FindObject {
                position: Vec3::new(2.0, 1.0, 2.0),
                marker_visible: false
            }
        );

        objective.update(Vec3::new(50.0, 0.0, 50.0), &roster);
        assert!(objective.is_complete());
    }

    #[test]
    fn mission_reports_completion_exactly_once() {
        let mut roster = EnemyRoster::new();
        let enemy = roster.spawn(Vec3::new(10.0, 1.0, 10.0), EnemyStats::human());
        let mut mission = Mission::new(
            vec![
                ObjectiveSpec::FindObject { position: [0.0, 1.0, 0.0] },
                ObjectiveSpec::KillAllEnemies,
            ],
            &roster,
        );

        assert_eq!(mission.update(Vec3::new(0.0, 1.7, 0.0), &roster), None);
        assert_eq!(mission.state(), MissionState::Active);
        assert!(mission.objectives()[0].is_complete());

        roster.damage(enemy, 50);
        assert_eq!(mission.update(Vec3::new(30.0, 1.7, 0.0), &roster), Some(MissionEvent::Completed));
        assert_eq!(mission.update(Vec3::new(30.0, 1.7, 0.0), &roster), None);
        assert!(mission.is_complete());
    }

    #[test]
    fn reset_returns_to_active_with_fresh_objectives() {
        let roster = EnemyRoster::new();
        let mut mission = Mission::new(vec![ObjectiveSpec::FindObject { position: [0.0, 1.0, 0.0] }], &roster);
        assert_eq!(mission.update(Vec3::new(0.0, 1.0, 0.0), &roster), Some(MissionEvent::Completed));

        mission.reset(&roster);
        assert_eq!(mission.state(), MissionState::Active);
        assert!(!mission.objectives()[0].is_complete());
    }
}
