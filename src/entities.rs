/// All game entity types: positioned, sized data with a small amount of
/// self-contained behaviour (movement of inert bodies, idempotent death).

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, Role};
use crate::config::ProjectileTuning;

// ── Identity ─────────────────────────────────────────────────────────────────

/// Opaque handle, unique for the lifetime of the object it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Hands out fresh ids.  Never reuses a value, even across a game reset.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn fresh(&mut self) -> EntityId {
        self.next += 1;
        EntityId(self.next)
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Axis-aligned bounding box in screen pixels (y grows downward).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    /// Box of the given size whose horizontal centre is `center_x` and whose
    /// bottom edge sits on `bottom`.
    pub fn from_center_bottom(center_x: f32, bottom: f32, w: f32, h: f32) -> Self {
        Rect { x: center_x - w / 2.0, y: bottom - h, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict overlap: boxes that merely share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

// ── Base entity ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub rect: Rect,
    pub alive: bool,
}

impl Entity {
    pub fn new(id: EntityId, rect: Rect) -> Self {
        Entity { id, rect, alive: true }
    }

    /// Mark the entity dead.  Returns `true` only for the call that actually
    /// killed it; repeated calls are no-ops.
    pub fn destroy(&mut self) -> bool {
        std::mem::replace(&mut self.alive, false)
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// Which side fired a projectile.  Decides the collection it lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    PlayerSide,
    EnemySide,
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub body: Entity,
    /// Vertical speed in px/s.  Negative travels up toward the enemies.
    pub velocity: f32,
    pub side: Side,
    pub damage: u32,
}

impl Projectile {
    /// A fresh projectile centred on `center_x` with its bottom edge at
    /// `bottom`.  Speed and damage come from the firing side's tuning.
    pub fn spawn(
        id: EntityId,
        center_x: f32,
        bottom: f32,
        side: Side,
        tuning: &ProjectileTuning,
    ) -> Self {
        let (velocity, damage) = match side {
            Side::PlayerSide => (tuning.player_speed, tuning.player_damage),
            Side::EnemySide => (tuning.enemy_speed, tuning.enemy_damage),
        };
        Projectile {
            body: Entity::new(
                id,
                Rect::from_center_bottom(center_x, bottom, tuning.width, tuning.height),
            ),
            velocity,
            side,
            damage,
        }
    }

    /// Move by `velocity * dt` and die on the same step the box leaves
    /// the vertical band `[0, screen_height]`.
    pub fn advance(&mut self, dt: f32, screen_height: f32) {
        if !self.body.alive {
            return;
        }
        self.body.rect.y += self.velocity * dt;
        if self.body.rect.bottom() < 0.0 || self.body.rect.y > screen_height {
            self.body.destroy();
        }
    }
}

// ── Collectibles ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Restores health, capped at the player's maximum.
    Health,
    /// Grants one extra life.
    Life,
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub body: Entity,
    pub kind: CollectibleKind,
    /// Downward drift in px/s.
    pub fall_speed: f32,
}

impl Collectible {
    pub fn advance(&mut self, dt: f32, screen_height: f32) {
        if !self.body.alive {
            return;
        }
        self.body.rect.y += self.fall_speed * dt;
        if self.body.rect.y > screen_height {
            self.body.destroy();
        }
    }
}

// ── Phase ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// Gameplay frozen until a restart is requested.
    GameOver,
    /// Terminal: never leaves this phase.
    Victory,
}

// ── Entity collections ───────────────────────────────────────────────────────

/// Every live object in play, partitioned by role.  Owned exclusively by the
/// game state machine; the boss, when present, is one of `enemies`.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Combatant,
    pub enemies: Vec<Combatant>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub collectibles: Vec<Collectible>,
    pub ids: IdAllocator,
}

impl World {
    pub fn new(player: Combatant, ids: IdAllocator) -> Self {
        World {
            player,
            enemies: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            collectibles: Vec::new(),
            ids,
        }
    }

    /// Kill whatever non-player entity carries `id`.  Unknown or already dead
    /// ids are ignored.  Returns `true` if this call did the killing.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        if let Some(e) = self.enemies.iter_mut().find(|e| e.body.id == id) {
            return e.body.destroy();
        }
        if let Some(p) = self
            .player_projectiles
            .iter_mut()
            .chain(self.enemy_projectiles.iter_mut())
            .find(|p| p.body.id == id)
        {
            return p.body.destroy();
        }
        if let Some(c) = self.collectibles.iter_mut().find(|c| c.body.id == id) {
            return c.body.destroy();
        }
        false
    }

    /// Drop every dead entity from its collection.
    pub fn prune(&mut self) {
        self.enemies.retain(|e| e.body.alive);
        self.player_projectiles.retain(|p| p.body.alive);
        self.enemy_projectiles.retain(|p| p.body.alive);
        self.collectibles.retain(|c| c.body.alive);
    }

    /// Remove every entity except the player.
    pub fn clear(&mut self) {
        self.enemies.clear();
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
        self.collectibles.clear();
    }

    pub fn live_enemies(&self) -> impl Iterator<Item = &Combatant> {
        self.enemies.iter().filter(|e| e.body.alive)
    }

    pub fn boss(&self) -> Option<&Combatant> {
        self.live_enemies().find(|e| e.is_boss())
    }

    pub fn boss_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.enemies
            .iter_mut()
            .find(|e| e.body.id == id && e.body.alive && e.is_boss())
    }
}

// ── Render snapshot ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Player,
    Enemy,
    Boss,
    PlayerShot,
    EnemyShot,
    HealthPack,
    ExtraLife,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteView {
    pub kind: SpriteKind,
    pub rect: Rect,
}

/// Boss health for the proportional bar on the final level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BossGauge {
    pub health: u32,
    pub max_health: u32,
}

impl BossGauge {
    pub fn fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

/// Immutable per-tick view handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub sprites: Vec<SpriteView>,
    pub score: u32,
    pub health: u32,
    pub max_health: u32,
    pub lives: u32,
    pub level: u8,
    pub phase: Phase,
    pub boss: Option<BossGauge>,
}

impl World {
    /// Every live entity as a (kind, box) pair, player last so it draws on top.
    pub fn sprites(&self) -> Vec<SpriteView> {
        let mut out = Vec::new();
        for e in self.live_enemies() {
            let kind = match e.role {
                Role::Boss(_) => SpriteKind::Boss,
                _ => SpriteKind::Enemy,
            };
            out.push(SpriteView { kind, rect: e.body.rect });
        }
        for c in self.collectibles.iter().filter(|c| c.body.alive) {
            let kind = match c.kind {
                CollectibleKind::Health => SpriteKind::HealthPack,
                CollectibleKind::Life => SpriteKind::ExtraLife,
            };
            out.push(SpriteView { kind, rect: c.body.rect });
        }
        for p in self.player_projectiles.iter().filter(|p| p.body.alive) {
            out.push(SpriteView { kind: SpriteKind::PlayerShot, rect: p.body.rect });
        }
        for p in self.enemy_projectiles.iter().filter(|p| p.body.alive) {
            out.push(SpriteView { kind: SpriteKind::EnemyShot, rect: p.body.rect });
        }
        out.push(SpriteView { kind: SpriteKind::Player, rect: self.player.body.rect });
        out
    }
}
