//! HUD collaborator seam.
//!
//! The gameplay core pushes health, weapon slot and objective progress through
//! [`Hud`]; whoever draws the overlay implements it.

use crate::mission::Objective;

pub trait Hud {
    fn update_health(&mut self, value: u32);
    /// Active weapon slot, 1-4.
    fn set_active_weapon(&mut self, slot: u8);
    /// `labels[i]` describes `objectives[i]`.
    fn update_tasks(&mut self, labels: &[String], objectives: &[Objective]);
}

/// HUD that writes changes to the log. Used by the headless runner.
#[derive(Debug, Default)]
pub struct LogHud {
    health: Option<u32>,
    weapon: Option<u8>,
    completed: Vec<bool>,
}

impl LogHud {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hud for LogHud {
    fn update_health(&mut self, value: u32) {
        if self.health != Some(value) {
            log::info!("Health: {}", value);
            self.health = Some(value);
        }
    }

    fn set_active_weapon(&mut self, slot: u8) {
        if self.weapon != Some(slot) {
            log::info!("Weapon slot {}", slot);
            self.weapon = Some(slot);
        }
    }

    fn update_tasks(&mut self, labels: &[String], objectives: &[Objective]) {
        let completed: Vec<bool> = objectives.iter().map(Objective::is_complete).collect();
        if completed == self.completed {
            return;
        }
        for (label, done) in labels.iter().zip(&completed) {
            log::info!("[{}] {}", if *done { "x" } else { " " }, label);
        }
        self.completed = completed;
    }
}
