/// The game state machine.
///
/// `Game` owns every entity collection, the score and the phase.  Each call
/// to `tick` runs the whole frame to completion in a fixed order: input,
/// entity updates, collision resolution, event application, level check,
/// snapshot.  All randomness comes through the injected RNG so callers
/// control determinism (tests use a seeded RNG).

use rand::Rng;
use tracing::{debug, info};

use crate::collision::{self, Resolution};
use crate::combatant::{Combatant, DamageOutcome};
use crate::config::{ConfigError, GameConfig};
use crate::entities::{BossGauge, CollectibleKind, IdAllocator, Phase, Snapshot, World};
use crate::level::{LevelDirector, LevelOutcome};

pub use crate::combatant::Intent;

#[derive(Clone, Debug)]
pub struct Game {
    pub config: GameConfig,
    pub world: World,
    pub director: LevelDirector,
    pub phase: Phase,
    pub score: u32,
    /// Timestamp of the most recent tick, in milliseconds.
    pub clock_ms: u64,
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

impl Game {
    /// Validate the config and build a fresh game on level 1 at time `now`.
    pub fn initialize(config: GameConfig, now: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = IdAllocator::default();
        let player = Combatant::player(ids.fresh(), &config);
        let mut world = World::new(player, ids);
        let director = LevelDirector::new();
        director.spawn_roster(&mut world, &config, now);
        info!("game initialised");

        Ok(Game {
            config,
            world,
            director,
            phase: Phase::Playing,
            score: 0,
            clock_ms: now,
        })
    }

    /// True once the game has been won; nothing changes after that.
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Victory
    }

    /// Honoured only in GameOver: full reset back to level 1.  Returns whether
    /// the restart happened.
    pub fn request_restart(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.score = 0;
        self.director.reset();
        self.world.clear();
        let id = self.world.ids.fresh();
        self.world.player = Combatant::player(id, &self.config);
        self.director.spawn_roster(&mut self.world, &self.config, self.clock_ms);
        self.phase = Phase::Playing;
        info!("game restarted");
        true
    }

    // ── Per-frame tick ────────────────────────────────────────────────────────

    /// Advance the game to time `now` (monotonic milliseconds).  Outside of
    /// Playing the world is frozen and only the snapshot is produced.
    pub fn tick(&mut self, intent: Intent, now: u64, rng: &mut impl Rng) -> Snapshot {
        let elapsed = now.saturating_sub(self.clock_ms).min(self.config.max_frame_ms);
        self.clock_ms = self.clock_ms.max(now);

        if self.phase == Phase::Playing {
            let dt = elapsed as f32 / 1000.0;
            self.step(intent, now, dt, rng);
        }
        self.snapshot()
    }

    fn step(&mut self, intent: Intent, now: u64, dt: f32, rng: &mut impl Rng) {
        let width = self.config.screen_width;
        let height = self.config.screen_height;

        // ── 1. Player input ──────────────────────────────────────────────────
        self.world.player.steer(&intent, dt, width);
        if intent.fire {
            let shot = self.world.player.shoot(&mut self.world.ids, &self.config.projectile);
            self.world.player_projectiles.push(shot);
        }

        // ── 2. Entity updates ────────────────────────────────────────────────
        let mut fired = Vec::new();
        for enemy in &mut self.world.enemies {
            fired.extend(enemy.update(now, dt, &mut self.world.ids, &self.config, rng));
        }
        self.world.enemy_projectiles.extend(fired);

        for shot in self
            .world
            .player_projectiles
            .iter_mut()
            .chain(self.world.enemy_projectiles.iter_mut())
        {
            shot.advance(dt, height);
        }
        for item in &mut self.world.collectibles {
            item.advance(dt, height);
        }
        self.world.prune();

        // ── 3. Collisions ────────────────────────────────────────────────────
        let events = collision::resolve(&self.world, &self.config);

        // ── 4. Apply effects in the order they were produced ─────────────────
        for event in events {
            if self.phase != Phase::Playing {
                break;
            }
            self.apply(event, now);
        }
        self.world.prune();

        // ── 5. Level progression ─────────────────────────────────────────────
        if self.phase == Phase::Playing {
            let outcome = self.director.advance(&mut self.world, &self.config, now);
            if outcome == LevelOutcome::Victory {
                self.phase = Phase::Victory;
                info!(score = self.score, "victory");
            }
        }
    }

    fn apply(&mut self, event: Resolution, now: u64) {
        match event {
            Resolution::Despawn(id) => {
                self.world.despawn(id);
            }
            Resolution::ScoreAwarded(points) => {
                self.score = self.score.saturating_add(points);
            }
            Resolution::BossDamaged { boss, amount } => {
                let Some(boss) = self.world.boss_mut(boss) else {
                    return;
                };
                match boss.take_damage(amount, now) {
                    DamageOutcome::Depleted => {
                        boss.body.destroy();
                        self.score = self.score.saturating_add(self.config.boss_score);
                        info!("boss destroyed");
                    }
                    DamageOutcome::Wounded => {
                        debug!(health = boss.health, "boss hit");
                    }
                    DamageOutcome::Ignored => {}
                }
            }
            Resolution::PlayerDamaged(amount) => self.damage_player(amount, now),
            Resolution::PickedUp(CollectibleKind::Health) => {
                self.world.player.heal(self.config.collectible.health_restore);
            }
            Resolution::PickedUp(CollectibleKind::Life) => {
                self.world.player.gain_life();
            }
        }
    }

    fn damage_player(&mut self, amount: u32, now: u64) {
        if self.world.player.take_damage(amount, now) != DamageOutcome::Depleted {
            return;
        }
        let lives = self.world.player.lose_life();
        if lives == 0 {
            self.phase = Phase::GameOver;
            info!(score = self.score, "game over");
        } else {
            info!(lives, "life lost");
        }
    }

    // ── Read-only view ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        let player = &self.world.player;
        let boss = if self.director.is_boss_level() {
            self.world.boss().map(|b| BossGauge { health: b.health, max_health: b.max_health })
        } else {
            None
        };
        Snapshot {
            sprites: self.world.sprites(),
            score: self.score,
            health: player.health,
            max_health: player.max_health,
            lives: player.lives().unwrap_or(0),
            level: self.director.current(),
            phase: self.phase,
            boss,
        }
    }
}
