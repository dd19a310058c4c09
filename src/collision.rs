/// Collision resolution.
///
/// `resolve` only reads the world and reports what should happen; the game
/// state machine applies the resulting events.  Rules run in a fixed order
/// and an entity consumed by an earlier rule is invisible to later ones.

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::entities::{CollectibleKind, EntityId, World};

#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Remove a non-player entity.  Emitted at most once per entity per tick.
    Despawn(EntityId),
    ScoreAwarded(u32),
    /// A player shot hit the boss; must be routed through `take_damage`.
    BossDamaged { boss: EntityId, amount: u32 },
    PlayerDamaged(u32),
    PickedUp(CollectibleKind),
}

/// Book-keeping for one pass: what has already been consumed this tick.
struct Pass {
    consumed: HashSet<EntityId>,
    events: Vec<Resolution>,
}

impl Pass {
    fn consumed(&self, id: EntityId) -> bool {
        self.consumed.contains(&id)
    }

    fn despawn(&mut self, id: EntityId) {
        if self.consumed.insert(id) {
            self.events.push(Resolution::Despawn(id));
        }
    }
}

/// Compute every collision effect for the current tick.
pub fn resolve(world: &World, config: &GameConfig) -> Vec<Resolution> {
    let mut pass = Pass { consumed: HashSet::new(), events: Vec::new() };

    enemies_vs_player_shots(world, config, &mut pass);
    player_vs_enemies(world, config, &mut pass);
    player_vs_enemy_shots(world, &mut pass);
    player_vs_collectibles(world, &mut pass);

    pass.events
}

// ── Rule 1: player shots ↔ enemies ────────────────────────────────────────────

/// A shot is spent on the first enemy it touches.  A regular enemy dies on
/// first touch and scores once; the boss instead takes one damage event per shot.
fn enemies_vs_player_shots(world: &World, config: &GameConfig, pass: &mut Pass) {
    for enemy in world.live_enemies() {
        let mut hit = false;
        for shot in world.player_projectiles.iter().filter(|p| p.body.alive) {
            if pass.consumed(shot.body.id) || !shot.body.rect.overlaps(&enemy.body.rect) {
                continue;
            }
            if enemy.is_boss() {
                pass.events.push(Resolution::BossDamaged {
                    boss: enemy.body.id,
                    amount: shot.damage,
                });
            }
            pass.despawn(shot.body.id);
            hit = true;
        }
        if hit && !enemy.is_boss() {
            pass.despawn(enemy.body.id);
            pass.events.push(Resolution::ScoreAwarded(config.kill_score));
        }
    }
}

// ── Rule 2: contact damage ────────────────────────────────────────────────────

fn player_vs_enemies(world: &World, config: &GameConfig, pass: &mut Pass) {
    let player = &world.player.body.rect;
    for enemy in world.live_enemies() {
        if pass.consumed(enemy.body.id) || !enemy.body.rect.overlaps(player) {
            continue;
        }
        // The boss is never removed by contact; only its own health can end it.
        if !enemy.is_boss() {
            pass.despawn(enemy.body.id);
        }
        pass.events.push(Resolution::PlayerDamaged(config.contact_damage));
    }
}

// ── Rule 3: enemy shots ↔ player ──────────────────────────────────────────────

fn player_vs_enemy_shots(world: &World, pass: &mut Pass) {
    let player = &world.player.body.rect;
    for shot in world.enemy_projectiles.iter().filter(|p| p.body.alive) {
        if pass.consumed(shot.body.id) || !shot.body.rect.overlaps(player) {
            continue;
        }
        pass.despawn(shot.body.id);
        pass.events.push(Resolution::PlayerDamaged(shot.damage));
    }
}

// ── Rule 4: pickups ───────────────────────────────────────────────────────────

fn player_vs_collectibles(world: &World, pass: &mut Pass) {
    let player = &world.player.body.rect;
    for item in world.collectibles.iter().filter(|c| c.body.alive) {
        if pass.consumed(item.body.id) || !item.body.rect.overlaps(player) {
            continue;
        }
        pass.despawn(item.body.id);
        pass.events.push(Resolution::PickedUp(item.kind));
    }
}
