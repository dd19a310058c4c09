use tank_battle::combatant::Combatant;
use tank_battle::config::GameConfig;
use tank_battle::entities::*;

fn make_world() -> (World, GameConfig) {
    let config = GameConfig::default();
    let mut ids = IdAllocator::default();
    let player = Combatant::player(ids.fresh(), &config);
    (World::new(player, ids), config)
}

// ── Rect ──────────────────────────────────────────────────────────────────────

#[test]
fn rect_overlap_detects_intersection() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 5.0, 10.0, 10.0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn rect_sharing_an_edge_does_not_overlap() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let right = Rect::new(10.0, 0.0, 10.0, 10.0);
    let below = Rect::new(0.0, 10.0, 10.0, 10.0);
    assert!(!a.overlaps(&right));
    assert!(!a.overlaps(&below));
}

#[test]
fn rect_from_center_bottom() {
    let r = Rect::from_center_bottom(100.0, 50.0, 10.0, 20.0);
    assert_eq!(r.x, 95.0);
    assert_eq!(r.y, 30.0);
    assert_eq!(r.center_x(), 100.0);
    assert_eq!(r.bottom(), 50.0);
}

// ── Ids & destruction ─────────────────────────────────────────────────────────

#[test]
fn id_allocator_never_repeats() {
    let mut ids = IdAllocator::default();
    let a = ids.fresh();
    let b = ids.fresh();
    let c = ids.fresh();
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);
}

#[test]
fn destroy_is_idempotent() {
    let mut e = Entity::new(EntityId(7), Rect::new(0.0, 0.0, 1.0, 1.0));
    assert!(e.destroy());
    assert!(!e.destroy());
    assert!(!e.alive);
}

#[test]
fn world_despawn_twice_matches_despawn_once() {
    let (mut once, config) = make_world();
    let id = once.ids.fresh();
    once.enemies.push(Combatant::enemy(id, 10.0, 10.0, 0, &config));
    let mut twice = once.clone();

    assert!(once.despawn(id));
    assert!(twice.despawn(id));
    assert!(!twice.despawn(id));

    once.prune();
    twice.prune();
    assert_eq!(once.enemies.len(), twice.enemies.len());
    assert!(twice.enemies.is_empty());
}

#[test]
fn world_despawn_unknown_id_is_ignored() {
    let (mut world, _) = make_world();
    assert!(!world.despawn(EntityId(9999)));
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[test]
fn projectile_spawn_uses_side_tuning() {
    let config = GameConfig::default();
    let up = Projectile::spawn(EntityId(1), 50.0, 100.0, Side::PlayerSide, &config.projectile);
    let down = Projectile::spawn(EntityId(2), 50.0, 100.0, Side::EnemySide, &config.projectile);
    assert!(up.velocity < 0.0);
    assert!(down.velocity > 0.0);
    assert_eq!(up.damage, config.projectile.player_damage);
    assert_eq!(down.damage, config.projectile.enemy_damage);
}

#[test]
fn projectile_despawns_on_the_tick_it_leaves_the_top() {
    let config = GameConfig::default();
    // bottom edge at y=5; one 16 ms step moves it up 9.6 px, past 0
    let mut p = Projectile::spawn(EntityId(1), 50.0, 5.0, Side::PlayerSide, &config.projectile);
    p.advance(0.016, config.screen_height);
    assert!(!p.body.alive);
}

#[test]
fn projectile_despawns_on_the_tick_it_leaves_the_bottom() {
    let config = GameConfig::default();
    let h = config.screen_height;
    // top edge at 715: first step lands at 719.8 (inside), second at 724.6
    let mut p = Projectile::spawn(EntityId(1), 50.0, 735.0, Side::EnemySide, &config.projectile);
    p.advance(0.016, h);
    assert!(p.body.alive);
    p.advance(0.016, h);
    assert!(!p.body.alive);
}

#[test]
fn projectile_inside_band_survives() {
    let config = GameConfig::default();
    let mut p = Projectile::spawn(EntityId(1), 50.0, 400.0, Side::PlayerSide, &config.projectile);
    p.advance(0.016, config.screen_height);
    assert!(p.body.alive);
    assert!((p.body.rect.y - (380.0 - 9.6)).abs() < 1e-3);
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[test]
fn collectible_drifts_down_and_expires_below_screen() {
    let mut c = Collectible {
        body: Entity::new(EntityId(1), Rect::new(0.0, 100.0, 20.0, 20.0)),
        kind: CollectibleKind::Health,
        fall_speed: 60.0,
    };
    c.advance(0.5, 720.0);
    assert_eq!(c.body.rect.y, 130.0);
    c.body.rect.y = 719.0;
    c.advance(0.5, 720.0);
    assert!(!c.body.alive);
}

// ── Snapshot sprites ──────────────────────────────────────────────────────────

#[test]
fn sprites_skip_dead_entities_and_draw_player_last() {
    let (mut world, config) = make_world();
    let a = world.ids.fresh();
    let b = world.ids.fresh();
    world.enemies.push(Combatant::enemy(a, 10.0, 10.0, 0, &config));
    world.enemies.push(Combatant::enemy(b, 100.0, 10.0, 0, &config));
    world.despawn(a);

    let sprites = world.sprites();
    assert_eq!(sprites.len(), 2);
    assert_eq!(sprites[0].kind, SpriteKind::Enemy);
    assert_eq!(sprites.last().map(|s| s.kind), Some(SpriteKind::Player));
}

#[test]
fn boss_gauge_fraction() {
    let g = BossGauge { health: 250, max_health: 1000 };
    assert!((g.fraction() - 0.25).abs() < f32::EPSILON);
    let empty = BossGauge { health: 0, max_health: 0 };
    assert_eq!(empty.fraction(), 0.0);
}
