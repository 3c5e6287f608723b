//! Weapon catalog, switching and hit-scan fire resolution.

use engine_core::{Entity, ScheduledEvents, Transform, Vec3};
use physics::raycast_all;
use std::time::Duration;

use crate::config::FirePolicy;
use crate::enemy::{DamageOutcome, EnemyRoster};
use crate::hud::Hud;

/// Camera-space offset the shot ray starts from.
pub const MUZZLE_OFFSET: Vec3 = Vec3::new(0.3, -0.2, -0.5);
pub const MUZZLE_FLASH_TIME: Duration = Duration::from_millis(50);
pub const HITSCAN_RANGE: f32 = 1000.0;

/// Weapon types available to the player, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponType {
    Pistol,
    Shotgun,
    Chaingun,
    RocketLauncher,
}

/// Variant-specific visual played on every shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireHook {
    /// Swap to a firing frame for a moment.
    ShotFrame { hold: Duration },
}

/// Fixed stat table entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub damage: u32,
    pub fire_interval: Duration,
    pub automatic: bool,
    pub fire_hook: Option<FireHook>,
}

impl WeaponType {
    pub const ALL: [WeaponType; 4] = [
        WeaponType::Pistol,
        WeaponType::Shotgun,
        WeaponType::Chaingun,
        WeaponType::RocketLauncher,
    ];

    /// Weapon bound to a number key; `None` outside 1-4.
    pub fn from_slot(slot: u8) -> Option<Self> {
        Self::ALL.get(usize::from(slot).checked_sub(1)?).copied()
    }

    pub fn slot(self) -> u8 {
        match self {
            WeaponType::Pistol => 1,
            WeaponType::Shotgun => 2,
            WeaponType::Chaingun => 3,
            WeaponType::RocketLauncher => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponType::Pistol => "Pistol",
            WeaponType::Shotgun => "Shotgun",
            WeaponType::Chaingun => "Chaingun",
            WeaponType::RocketLauncher => "Rocket Launcher",
        }
    }

    pub fn stats(self) -> WeaponStats {
        let shot_frame = Some(FireHook::ShotFrame {
            hold: Duration::from_millis(100),
        });
        let (damage, interval_ms, automatic, fire_hook) = match self {
            WeaponType::Pistol => (20, 500, false, shot_frame),
            WeaponType::Shotgun => (50, 800, false, shot_frame),
            WeaponType::Chaingun => (10, 800, true, None),
            WeaponType::RocketLauncher => (200, 800, false, None),
        };
        WeaponStats {
            damage,
            fire_interval: Duration::from_millis(interval_ms),
            automatic,
            fire_hook,
        }
    }
}

/// How the fire button is being used this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Fresh click.
    Pressed,
    /// Still down from an earlier frame.
    Held,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeaponEffect {
    MuzzleFlashOff,
    ShotFrameOff,
}

/// Weapon instance with its visual state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub weapon_type: WeaponType,
    pub stats: WeaponStats,
    last_fire: Option<Duration>,
    visible: bool,
    muzzle_flash: bool,
    shot_frame: bool,
    effects: ScheduledEvents<WeaponEffect>,
}

impl Weapon {
    pub fn new(weapon_type: WeaponType) -> Self {
        Self {
            weapon_type,
            stats: weapon_type.stats(),
            last_fire: None,
            visible: false,
            muzzle_flash: false,
            shot_frame: false,
            effects: ScheduledEvents::new(),
        }
    }

    /// Would the trigger produce a shot now?
    pub fn can_fire(&self, trigger: Trigger, policy: FirePolicy, now: Duration) -> bool {
        match policy {
            FirePolicy::PerClick => trigger == Trigger::Pressed,
            FirePolicy::RateLimited => {
                let wants = trigger == Trigger::Pressed || self.stats.automatic;
                let ready = self
                    .last_fire
                    .map_or(true, |last| now.saturating_sub(last) >= self.stats.fire_interval);
                wants && ready
            }
        }
    }

    fn record_shot(&mut self, now: Duration) {
        self.last_fire = Some(now);
        self.muzzle_flash = true;
        self.effects.schedule(now + MUZZLE_FLASH_TIME, WeaponEffect::MuzzleFlashOff);
        if let Some(FireHook::ShotFrame { hold }) = self.stats.fire_hook {
            self.shot_frame = true;
            self.effects.schedule(now + hold, WeaponEffect::ShotFrameOff);
        }
    }

    /// Apply due visual effects.
    pub fn update(&mut self, now: Duration) {
        for effect in self.effects.drain_due(now) {
            match effect {
                WeaponEffect::MuzzleFlashOff => self.muzzle_flash = false,
                WeaponEffect::ShotFrameOff => self.shot_frame = false,
            }
        }
    }

    fn show(&mut self) {
        self.visible = true;
    }

    /// Hide the model and drop any pending effects.
    fn hide(&mut self) {
        self.visible = false;
        self.muzzle_flash = false;
        self.shot_frame = false;
        self.effects.cancel_all();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_muzzle_flash_visible(&self) -> bool {
        self.muzzle_flash
    }

    pub fn is_shot_frame(&self) -> bool {
        self.shot_frame
    }

    pub fn last_fire(&self) -> Option<Duration> {
        self.last_fire
    }
}

/// What a pull of the trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotResult {
    Hit { target: Entity, outcome: DamageOutcome },
    Miss,
}

/// Holds the four weapons and which one is drawn.
pub struct WeaponSystem {
    weapons: Vec<Weapon>,
    active: WeaponType,
    policy: FirePolicy,
}

impl WeaponSystem {
    pub fn new(policy: FirePolicy) -> Self {
        let mut system = Self {
            weapons: WeaponType::ALL.iter().map(|&t| Weapon::new(t)).collect(),
            active: WeaponType::Pistol,
            policy,
        };
        system.reset();
        system
    }

    /// Back to a holstered-everything-but-the-pistol state.
    pub fn reset(&mut self) {
        for weapon in &mut self.weapons {
            weapon.hide();
            weapon.last_fire = None;
        }
        self.active = WeaponType::Pistol;
        self.weapon_mut(WeaponType::Pistol).show();
    }

    pub fn active(&self) -> WeaponType {
        self.active
    }

    pub fn weapon(&self, weapon_type: WeaponType) -> &Weapon {
        &self.weapons[usize::from(weapon_type.slot() - 1)]
    }

    fn weapon_mut(&mut self, weapon_type: WeaponType) -> &mut Weapon {
        &mut self.weapons[usize::from(weapon_type.slot() - 1)]
    }

    pub fn active_weapon(&self) -> &Weapon {
        self.weapon(self.active)
    }

    /// Draw the weapon in `slot` (1-4). Unknown slots and the current slot are ignored.
    pub fn switch_weapon(&mut self, slot: u8, hud: &mut dyn Hud) -> bool {
        let Some(next) = WeaponType::from_slot(slot) else {
            return false;
        };
        if next == self.active {
            return false;
        }
        self.weapon_mut(self.active).hide();
        self.weapon_mut(next).show();
        self.active = next;
        hud.set_active_weapon(next.slot());
        log::debug!("Switched to {}", next.name());
        true
    }

    /// Pull the trigger. Returns `None` when the policy does not allow a shot.
    ///
    /// The ray starts at the camera plus the rotated muzzle offset and damages the
    /// nearest living enemy it passes through; dead bodies are skipped.
    pub fn fire(
        &mut self,
        camera: &Transform,
        roster: &mut EnemyRoster,
        trigger: Trigger,
        now: Duration,
    ) -> Option<ShotResult> {
        let policy = self.policy;
        let active = self.active;
        let weapon = self.weapon_mut(active);
        if !weapon.can_fire(trigger, policy, now) {
            return None;
        }
        weapon.record_shot(now);
        let damage = weapon.stats.damage;

        let origin = camera.position + camera.rotation * MUZZLE_OFFSET;
        let hits = raycast_all(origin, camera.forward(), HITSCAN_RANGE, roster.hit_boxes());
        for hit in hits {
            if !roster.is_alive(hit.target) {
                continue;
            }
            let outcome = roster.damage(hit.target, damage);
            log::debug!(
                "{} hit {:?} at {:.1}m: {:?}",
                active.name(),
                hit.target,
                hit.distance,
                outcome
            );
            return Some(ShotResult::Hit {
                target: hit.target,
                outcome,
            });
        }
        Some(ShotResult::Miss)
    }

    /// Advance visual effects of every weapon.
    pub fn update(&mut self, now: Duration) {
        for weapon in &mut self.weapons {
            weapon.update(now);
        }
    }
}
