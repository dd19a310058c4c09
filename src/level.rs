/// Level progression: which roster is on the field and what comes next.

use tracing::info;

use crate::combatant::Combatant;
use crate::config::{GameConfig, PickupSpawn, WAVE_LEVELS};
use crate::entities::{Collectible, Entity, IdAllocator, Rect, World};

pub const FIRST_LEVEL: u8 = 1;
pub const BOSS_LEVEL: u8 = WAVE_LEVELS as u8 + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelOutcome {
    /// Enemies remain on the current level.
    InProgress,
    /// The previous level was cleared and this one has been spawned.
    Advanced(u8),
    /// The boss level was cleared.
    Victory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelDirector {
    current: u8,
}

impl Default for LevelDirector {
    fn default() -> Self {
        LevelDirector { current: FIRST_LEVEL }
    }
}

impl LevelDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn is_boss_level(&self) -> bool {
        self.current == BOSS_LEVEL
    }

    /// Back to level 1.  Does not touch the world.
    pub fn reset(&mut self) {
        self.current = FIRST_LEVEL;
    }

    /// Populate the world with the current level's roster.
    pub fn spawn_roster(&self, world: &mut World, config: &GameConfig, now: u64) {
        match config.wave(self.current) {
            Some(wave) => {
                for i in 0..wave.enemy_count {
                    let id = world.ids.fresh();
                    world
                        .enemies
                        .push(Combatant::enemy(id, wave.slot_x(i), wave.row_y, now, config));
                }
                for pickup in &wave.pickups {
                    let item = spawn_pickup(&mut world.ids, pickup, config);
                    world.collectibles.push(item);
                }
                info!(
                    level = self.current,
                    enemies = wave.enemy_count,
                    pickups = wave.pickups.len(),
                    "spawned wave"
                );
            }
            None => {
                let id = world.ids.fresh();
                world.enemies.push(Combatant::boss(id, now, config));
                info!(level = self.current, "spawned boss");
            }
        }
    }

    /// Cleared once no enemy (boss included) is left alive.
    pub fn is_cleared(&self, world: &World) -> bool {
        world.live_enemies().next().is_none()
    }

    /// If the level is cleared, move on: spawn the next roster or report
    /// victory after the boss level.
    pub fn advance(&mut self, world: &mut World, config: &GameConfig, now: u64) -> LevelOutcome {
        if !self.is_cleared(world) {
            return LevelOutcome::InProgress;
        }
        if self.current >= BOSS_LEVEL {
            return LevelOutcome::Victory;
        }
        self.current += 1;
        info!(level = self.current, "level cleared, advancing");
        self.spawn_roster(world, config, now);
        LevelOutcome::Advanced(self.current)
    }
}

fn spawn_pickup(ids: &mut IdAllocator, spawn: &PickupSpawn, config: &GameConfig) -> Collectible {
    let size = config.collectible.size;
    Collectible {
        body: Entity::new(ids.fresh(), Rect::from_center_bottom(spawn.x, spawn.y, size, size)),
        kind: spawn.kind,
        fall_speed: config.collectible.fall_speed,
    }
}
