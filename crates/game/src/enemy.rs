//! Enemy roster and per-enemy AI: face, pursue, sidestep walls, attack on cooldown.

use engine_core::{Entity, Health, Quat, ScheduledEvents, Transform, Vec3, World};
use physics::{CollisionGrid, HitBox};
use std::time::Duration;

use crate::player::PlayerController;

/// Deflections tried, in order, when the direct path is walled off.
pub const WALL_AVOID_ANGLES: [f32; 4] = [45.0, -45.0, 90.0, -90.0];
/// Half-size of an enemy's collision probe.
pub const ENEMY_COLLISION_MARGIN: f32 = 0.1;
/// How long the attack pose stays up.
pub const ATTACK_FLASH: Duration = Duration::from_millis(400);
/// Enemy body is a 1x2x1 box.
pub const ENEMY_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 1.0, 0.5);

/// Stat block for one enemy type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: u32,
    pub speed: f32,
    pub damage: u32,
    /// Distance at which the enemy can hit the player.
    pub attack_range: f32,
    /// Distance at which the enemy starts moving toward the player.
    pub pursuit_range: f32,
    pub attack_cooldown: Duration,
}

impl EnemyStats {
    /// The default soldier.
    pub fn human() -> Self {
        Self {
            health: 50,
            speed: 4.0,
            damage: 5,
            attack_range: 10.0,
            pursuit_range: 30.0,
            attack_cooldown: Duration::from_millis(2000),
        }
    }
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self::human()
    }
}

/// What the renderer should show for an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAppearance {
    Idle,
    Attacking,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnemyEvent {
    EndAttackPose,
}

/// Outcome of applying damage to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Wounded { remaining: u32 },
    Killed,
    /// Already dead; nothing changed.
    AlreadyDead,
    /// The handle does not belong to the current roster.
    Missing,
}

/// Enemy AI state. Lives next to `Transform` and `Health` in the roster world.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub stats: EnemyStats,
    /// Current speed; drops to zero on death.
    pub speed: f32,
    alive: bool,
    last_attack: Option<Duration>,
    last_avoid_direction: Option<Vec3>,
    appearance: EnemyAppearance,
    events: ScheduledEvents<EnemyEvent>,
}

impl Enemy {
    pub fn new(stats: EnemyStats) -> Self {
        Self {
            stats,
            speed: stats.speed,
            alive: true,
            last_attack: None,
            last_avoid_direction: None,
            appearance: EnemyAppearance::Idle,
            events: ScheduledEvents::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn appearance(&self) -> EnemyAppearance {
        self.appearance
    }

    pub fn last_attack(&self) -> Option<Duration> {
        self.last_attack
    }

    pub fn last_avoid_direction(&self) -> Option<Vec3> {
        self.last_avoid_direction
    }

    /// Apply damage. The first time health reaches zero the enemy dies; later hits are no-ops.
    pub fn take_damage(&mut self, health: &mut Health, amount: u32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::AlreadyDead;
        }
        let remaining = health.take_damage(amount);
        if remaining > 0 {
            return DamageOutcome::Wounded { remaining };
        }
        self.die();
        DamageOutcome::Killed
    }

    fn die(&mut self) {
        self.alive = false;
        self.speed = 0.0;
        self.appearance = EnemyAppearance::Dead;
        self.events.cancel_all();
    }

    /// One AI step. Returns damage dealt to the player this frame.
    pub fn think(
        &mut self,
        transform: &mut Transform,
        player_position: Vec3,
        player_health: &mut Health,
        grid: &CollisionGrid,
        dt: f32,
        now: Duration,
    ) -> u32 {
        for event in self.events.drain_due(now) {
            match event {
                EnemyEvent::EndAttackPose if self.alive => self.appearance = EnemyAppearance::Idle,
                EnemyEvent::EndAttackPose => {}
            }
        }

        let distance = transform.position.distance(player_position);
        transform.face_towards(player_position);

        if !self.alive {
            return 0;
        }

        let mut dealt = 0;
        if distance <= self.stats.attack_range {
            dealt = self.try_attack(distance, player_health, now);
        }
        if distance <= self.stats.pursuit_range {
            self.pursue(transform, player_position, distance, grid, dt);
        }
        dealt
    }

    fn try_attack(&mut self, distance: f32, player_health: &mut Health, now: Duration) -> u32 {
        if let Some(last) = self.last_attack {
            if now.saturating_sub(last) < self.stats.attack_cooldown {
                return 0;
            }
        }
        if distance > self.stats.attack_range {
            return 0;
        }

        player_health.take_damage(self.stats.damage);
        self.last_attack = Some(now);
        self.appearance = EnemyAppearance::Attacking;
        self.events.schedule(now + ATTACK_FLASH, EnemyEvent::EndAttackPose);
        self.stats.damage
    }

    /// Walk toward the player, sidestepping walls. Holds position once in attack range.
    fn pursue(&mut self, transform: &mut Transform, target: Vec3, distance: f32, grid: &CollisionGrid, dt: f32) {
        if distance <= self.stats.attack_range {
            return;
        }

        let offset = target - transform.position;
        let direction = Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero();
        let step = self.speed * dt;
        let blocked = |candidate: Vec3| grid.query(candidate, ENEMY_COLLISION_MARGIN);

        let direct = transform.position + direction * step;
        if !blocked(direct) {
            transform.position = direct;
            return;
        }

        for angle in WALL_AVOID_ANGLES {
            let deflected = (Quat::from_rotation_y(angle.to_radians()) * direction).normalize_or_zero();
            let candidate = transform.position + deflected * step;
            if !blocked(candidate) {
                self.last_avoid_direction = Some(deflected);
                transform.position = candidate;
                return;
            }
        }

        // Cornered: keep going the way that last worked, if it still does.
        if let Some(previous) = self.last_avoid_direction {
            let candidate = transform.position + previous * step;
            if !blocked(candidate) {
                transform.position = candidate;
            }
        }
    }
}

/// Central owner of every enemy in the current level.
///
/// Handles are generational `hecs` entities; `reset` clears the world and bumps
/// the epoch, so handles and views from a previous level resolve to nothing.
pub struct EnemyRoster {
    world: World,
    epoch: u32,
}

impl Default for EnemyRoster {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyRoster {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            epoch: 0,
        }
    }

    pub fn spawn(&mut self, position: Vec3, stats: EnemyStats) -> Entity {
        self.world.spawn((
            Transform::from_position(position),
            Health::new(stats.health),
            Enemy::new(stats),
        ))
    }

    /// Drop every enemy and invalidate outstanding handles.
    pub fn reset(&mut self) {
        self.world.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn alive_count(&self) -> usize {
        self.world
            .query::<&Enemy>()
            .iter()
            .filter(|(_, enemy)| enemy.is_alive())
            .count()
    }

    /// True when no enemy is alive (including an empty roster).
    pub fn all_dead(&self) -> bool {
        self.alive_count() == 0
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.world
            .get::<&Enemy>(entity)
            .map(|enemy| enemy.is_alive())
            .unwrap_or(false)
    }

    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.world.get::<&Transform>(entity).ok().map(|t| t.position)
    }

    pub fn health(&self, entity: Entity) -> Option<u32> {
        self.world.get::<&Health>(entity).ok().map(|h| h.current)
    }

    pub fn appearance(&self, entity: Entity) -> Option<EnemyAppearance> {
        self.world.get::<&Enemy>(entity).ok().map(|e| e.appearance())
    }

    /// Every enemy body, dead or alive.
    pub fn hit_boxes(&self) -> Vec<(Entity, HitBox)> {
        self.world
            .query::<(&Transform, &Enemy)>()
            .iter()
            .map(|(entity, (transform, _))| (entity, HitBox::new(transform.position, ENEMY_HALF_EXTENTS)))
            .collect()
    }

    pub fn damage(&mut self, entity: Entity, amount: u32) -> DamageOutcome {
        match self.world.query_one_mut::<(&mut Health, &mut Enemy)>(entity) {
            Ok((health, enemy)) => enemy.take_damage(health, amount),
            Err(_) => DamageOutcome::Missing,
        }
    }

    /// Run every enemy's AI against the post-move player. Returns total damage dealt.
    pub fn update(&mut self, player: &mut PlayerController, grid: &CollisionGrid, dt: f32, now: Duration) -> u32 {
        let player_position = player.position;
        let mut dealt = 0;
        for (entity, (transform, enemy)) in self.world.query_mut::<(&mut Transform, &mut Enemy)>() {
            let damage = enemy.think(transform, player_position, &mut player.health, grid, dt, now);
            if damage > 0 {
                log::debug!("Enemy {:?} hit player for {} damage", entity, damage);
                dealt += damage;
            }
        }
        dealt
    }
}
