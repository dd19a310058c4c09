/// Player, enemies and the boss share one `Combatant` type.  What differs
/// between them is carried by `Role` (damage policy, extra state) and
/// `ShotPattern` (shoot policy), not by a type hierarchy.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::{GameConfig, ProjectileTuning};
use crate::entities::{Entity, EntityId, IdAllocator, Projectile, Rect, Side};

// ── Policies ─────────────────────────────────────────────────────────────────

/// Decoded player intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    /// Edge-triggered: true only on the tick the fire key went down.
    pub fire: bool,
}

/// How a volley is laid out.
#[derive(Clone, Debug, PartialEq)]
pub enum ShotPattern {
    /// One projectile from the centre.
    Single,
    /// One projectile per horizontal offset from the centre.
    Spread(Vec<f32>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BossState {
    pub invincible: bool,
    pub last_hit_ms: u64,
    pub invincibility_ms: u64,
    /// Special bursts keep their own clock, separate from the regular volley.
    pub last_special_ms: u64,
}

impl BossState {
    /// Whether a hit arriving at `now` would be discarded.
    pub fn shielded(&self, now: u64) -> bool {
        self.invincible && now.saturating_sub(self.last_hit_ms) <= self.invincibility_ms
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    Player { lives: u32 },
    Enemy,
    Boss(BossState),
}

/// Result of a damage attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Discarded by an invincibility window; health untouched.
    Ignored,
    /// Health went down but is still above zero.
    Wounded,
    /// Health is now zero.
    Depleted,
}

// ── Combatant ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Combatant {
    pub body: Entity,
    /// Always within `[0, max_health]`.
    pub health: u32,
    pub max_health: u32,
    /// Horizontal speed in px/s.  Patrolling units carry a sign (positive =
    /// rightward); the player only uses the magnitude.
    pub speed: f32,
    pub shoot_delay_ms: u64,
    pub last_shot_ms: u64,
    pub pattern: ShotPattern,
    pub role: Role,
}

impl Combatant {
    pub fn player(id: EntityId, config: &GameConfig) -> Self {
        let p = &config.player;
        Combatant {
            body: Entity::new(id, Rect::new(p.start_x, p.start_y, p.width, p.height)),
            health: p.max_health,
            max_health: p.max_health,
            speed: p.speed,
            shoot_delay_ms: 0,
            last_shot_ms: 0,
            pattern: ShotPattern::Single,
            role: Role::Player { lives: p.lives },
        }
    }

    pub fn enemy(id: EntityId, x: f32, y: f32, now: u64, config: &GameConfig) -> Self {
        let e = &config.enemy;
        Combatant {
            body: Entity::new(id, Rect::new(x, y, e.width, e.height)),
            health: e.max_health,
            max_health: e.max_health,
            speed: e.speed,
            shoot_delay_ms: e.shoot_delay_ms,
            last_shot_ms: now,
            pattern: ShotPattern::Single,
            role: Role::Enemy,
        }
    }

    /// The boss, horizontally centred on screen.
    pub fn boss(id: EntityId, now: u64, config: &GameConfig) -> Self {
        let b = &config.boss;
        let x = config.screen_width / 2.0 - b.width / 2.0;
        Combatant {
            body: Entity::new(id, Rect::new(x, b.y, b.width, b.height)),
            health: b.max_health,
            max_health: b.max_health,
            speed: b.speed,
            shoot_delay_ms: b.shoot_delay_ms,
            last_shot_ms: now,
            pattern: ShotPattern::Spread(b.spread_offsets.clone()),
            role: Role::Boss(BossState {
                invincible: false,
                last_hit_ms: 0,
                invincibility_ms: b.invincibility_ms,
                last_special_ms: now,
            }),
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.role, Role::Boss(_))
    }

    /// Remaining lives, for the player only.
    pub fn lives(&self) -> Option<u32> {
        match self.role {
            Role::Player { lives } => Some(lives),
            _ => None,
        }
    }

    pub fn is_invincible(&self, now: u64) -> bool {
        match &self.role {
            Role::Boss(boss) => boss.shielded(now),
            _ => false,
        }
    }

    // ── Movement ─────────────────────────────────────────────────────────────

    /// Player movement: left/right intent scaled by speed and `dt`, clamped so
    /// the box stays inside `[0, screen_width]`.
    pub fn steer(&mut self, intent: &Intent, dt: f32, screen_width: f32) {
        let mut dir = 0.0;
        if intent.move_left {
            dir -= 1.0;
        }
        if intent.move_right {
            dir += 1.0;
        }
        let max_x = (screen_width - self.body.rect.w).max(0.0);
        self.body.rect.x = (self.body.rect.x + dir * self.speed.abs() * dt).clamp(0.0, max_x);
    }

    /// Horizontal bounce.  The speed sign flips on the step that would carry
    /// the box past an edge, and the box is parked on that edge.
    pub fn patrol(&mut self, dt: f32, screen_width: f32) {
        let max_x = (screen_width - self.body.rect.w).max(0.0);
        let next = self.body.rect.x + self.speed * dt;
        if next < 0.0 {
            self.body.rect.x = 0.0;
            self.speed = self.speed.abs();
        } else if next > max_x {
            self.body.rect.x = max_x;
            self.speed = -self.speed.abs();
        } else {
            self.body.rect.x = next;
        }
    }

    // ── Shooting ─────────────────────────────────────────────────────────────

    /// One upward shot from the top-centre.  The player has no fire timer;
    /// the caller gates this on the fire key edge.
    pub fn shoot(&self, ids: &mut IdAllocator, tuning: &ProjectileTuning) -> Projectile {
        Projectile::spawn(
            ids.fresh(),
            self.body.rect.center_x(),
            self.body.rect.y,
            Side::PlayerSide,
            tuning,
        )
    }

    pub fn fire_ready(&self, now: u64) -> bool {
        now.saturating_sub(self.last_shot_ms) > self.shoot_delay_ms
    }

    /// Downward shots from the bottom-centre, laid out by the shot pattern.
    pub fn volley(&self, ids: &mut IdAllocator, tuning: &ProjectileTuning) -> Vec<Projectile> {
        let cx = self.body.rect.center_x();
        let bottom = self.body.rect.bottom();
        match &self.pattern {
            ShotPattern::Single => {
                vec![Projectile::spawn(ids.fresh(), cx, bottom, Side::EnemySide, tuning)]
            }
            ShotPattern::Spread(offsets) => offsets
                .iter()
                .map(|dx| Projectile::spawn(ids.fresh(), cx + dx, bottom, Side::EnemySide, tuning))
                .collect(),
        }
    }

    /// Boss burst: every `special_delay_ms`, a handful of shots at offsets
    /// drawn (with repetition) from the configured candidates.  Runs on its
    /// own timer so it never resets the regular volley cadence.
    pub fn special_attack(
        &mut self,
        now: u64,
        ids: &mut IdAllocator,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Vec<Projectile> {
        let Role::Boss(boss) = &mut self.role else {
            return Vec::new();
        };
        if now.saturating_sub(boss.last_special_ms) <= config.boss.special_delay_ms {
            return Vec::new();
        }
        boss.last_special_ms = now;

        let cx = self.body.rect.center_x();
        let bottom = self.body.rect.bottom();
        (0..config.boss.special_shots)
            .filter_map(|_| config.boss.special_offsets.choose(&mut *rng))
            .map(|dx| {
                Projectile::spawn(ids.fresh(), cx + dx, bottom, Side::EnemySide, &config.projectile)
            })
            .collect()
    }

    /// Per-tick update for enemies and the boss: patrol, fire when the
    /// cadence allows, and (boss only) run the special burst and let an
    /// expired invincibility window lapse.  Returns the shots fired.
    pub fn update(
        &mut self,
        now: u64,
        dt: f32,
        ids: &mut IdAllocator,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> Vec<Projectile> {
        if !self.body.alive || matches!(self.role, Role::Player { .. }) {
            return Vec::new();
        }
        self.patrol(dt, config.screen_width);

        let mut shots = Vec::new();
        if self.fire_ready(now) {
            shots.extend(self.volley(ids, &config.projectile));
            self.last_shot_ms = now;
        }
        shots.extend(self.special_attack(now, ids, config, rng));

        if let Role::Boss(boss) = &mut self.role {
            if boss.invincible && now.saturating_sub(boss.last_hit_ms) > boss.invincibility_ms {
                boss.invincible = false;
            }
        }
        shots
    }

    // ── Health ───────────────────────────────────────────────────────────────

    /// The only way health goes down.  The boss discards hits inside its
    /// invincibility window and opens a new window on every hit it accepts.
    pub fn take_damage(&mut self, amount: u32, now: u64) -> DamageOutcome {
        if let Role::Boss(boss) = &mut self.role {
            if boss.shielded(now) {
                debug!(id = self.body.id.0, amount, "boss hit ignored while invincible");
                return DamageOutcome::Ignored;
            }
            boss.invincible = true;
            boss.last_hit_ms = now;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            DamageOutcome::Depleted
        } else {
            DamageOutcome::Wounded
        }
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Player only: spend a life and, if any remain, refill health.
    /// Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        let Role::Player { lives } = &mut self.role else {
            return 0;
        };
        *lives = lives.saturating_sub(1);
        if *lives > 0 {
            self.health = self.max_health;
        }
        *lives
    }

    pub fn gain_life(&mut self) {
        if let Role::Player { lives } = &mut self.role {
            *lives = lives.saturating_add(1);
        }
    }
}
