use tank_battle::combatant::*;
use tank_battle::config::GameConfig;
use tank_battle::entities::{EntityId, IdAllocator, Side};

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_player() -> (Combatant, GameConfig) {
    let config = GameConfig::default();
    (Combatant::player(EntityId(1), &config), config)
}

fn make_boss(now: u64) -> (Combatant, GameConfig) {
    let config = GameConfig::default();
    (Combatant::boss(EntityId(1), now, &config), config)
}

const LEFT: Intent = Intent { move_left: true, move_right: false, fire: false };
const RIGHT: Intent = Intent { move_left: false, move_right: true, fire: false };

// ── Player movement ───────────────────────────────────────────────────────────

#[test]
fn player_starts_at_configured_position() {
    let (p, _) = make_player();
    assert_eq!(p.body.rect.x, 100.0);
    assert_eq!(p.body.rect.y, 500.0);
    assert_eq!(p.health, 100);
    assert_eq!(p.lives(), Some(3));
}

#[test]
fn steer_scales_by_speed_and_dt() {
    let (mut p, config) = make_player();
    p.steer(&RIGHT, 0.5, config.screen_width);
    assert_eq!(p.body.rect.x, 250.0); // 100 + 300 * 0.5
    p.steer(&LEFT, 0.25, config.screen_width);
    assert_eq!(p.body.rect.x, 175.0);
}

#[test]
fn steer_with_both_directions_stands_still() {
    let (mut p, config) = make_player();
    let both = Intent { move_left: true, move_right: true, fire: false };
    p.steer(&both, 0.5, config.screen_width);
    assert_eq!(p.body.rect.x, 100.0);
}

#[test]
fn steer_clamps_to_left_edge() {
    let (mut p, config) = make_player();
    p.steer(&LEFT, 1.0, config.screen_width);
    assert_eq!(p.body.rect.x, 0.0);
}

#[test]
fn steer_clamps_to_right_edge() {
    let (mut p, config) = make_player();
    p.body.rect.x = 1200.0;
    p.steer(&RIGHT, 1.0, config.screen_width);
    assert_eq!(p.body.rect.right(), config.screen_width);
}

#[test]
fn steer_never_moves_vertically() {
    let (mut p, config) = make_player();
    p.steer(&RIGHT, 0.1, config.screen_width);
    assert_eq!(p.body.rect.y, 500.0);
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn player_shot_leaves_top_centre_going_up() {
    let (p, config) = make_player();
    let mut ids = IdAllocator::default();
    let shot = p.shoot(&mut ids, &config.projectile);
    assert_eq!(shot.side, Side::PlayerSide);
    assert_eq!(shot.body.rect.center_x(), p.body.rect.center_x());
    assert_eq!(shot.body.rect.bottom(), p.body.rect.y);
    assert!(shot.velocity < 0.0);
}

#[test]
fn enemy_fires_only_after_delay_strictly_elapsed() {
    let config = GameConfig::default();
    let mut e = Combatant::enemy(EntityId(1), 100.0, 100.0, 0, &config);
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();

    assert!(e.update(1500, 0.0, &mut ids, &config, &mut rng).is_empty());
    let shots = e.update(1501, 0.0, &mut ids, &config, &mut rng);
    assert_eq!(shots.len(), 1);
    assert_eq!(e.last_shot_ms, 1501);
    assert!(e.update(2000, 0.0, &mut ids, &config, &mut rng).is_empty());
}

#[test]
fn enemy_shot_leaves_bottom_centre_going_down() {
    let config = GameConfig::default();
    let e = Combatant::enemy(EntityId(1), 100.0, 100.0, 0, &config);
    let mut ids = IdAllocator::default();
    let shots = e.volley(&mut ids, &config.projectile);
    assert_eq!(shots.len(), 1);
    assert_eq!(shots[0].side, Side::EnemySide);
    assert_eq!(shots[0].body.rect.center_x(), 125.0);
    assert_eq!(shots[0].body.rect.bottom(), 130.0);
    assert!(shots[0].velocity > 0.0);
}

#[test]
fn boss_volley_is_a_five_way_spread() {
    let (boss, config) = make_boss(0);
    let mut ids = IdAllocator::default();
    let shots = boss.volley(&mut ids, &config.projectile);
    let cx = boss.body.rect.center_x();
    let offsets: Vec<f32> = shots.iter().map(|s| s.body.rect.center_x() - cx).collect();
    assert_eq!(offsets, vec![-40.0, -20.0, 0.0, 20.0, 40.0]);
}

#[test]
fn boss_spawns_centred() {
    let (boss, config) = make_boss(0);
    assert_eq!(boss.body.rect.center_x(), config.screen_width / 2.0);
    assert_eq!(boss.health, 1000);
    assert_eq!(boss.max_health, 1000);
}

// ── Boss special attack ───────────────────────────────────────────────────────

#[test]
fn special_attack_waits_for_its_own_delay() {
    let (mut boss, config) = make_boss(0);
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();
    assert!(boss.special_attack(5000, &mut ids, &config, &mut rng).is_empty());
    let burst = boss.special_attack(5001, &mut ids, &config, &mut rng);
    assert_eq!(burst.len(), 5);
}

#[test]
fn special_attack_offsets_come_from_candidates() {
    let (mut boss, config) = make_boss(0);
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();
    let cx = boss.body.rect.center_x();
    for shot in boss.special_attack(6000, &mut ids, &config, &mut rng) {
        let dx = shot.body.rect.center_x() - cx;
        assert!([-30.0, 0.0, 30.0].contains(&dx), "unexpected offset {dx}");
    }
}

#[test]
fn regular_volleys_do_not_reset_special_timer() {
    let (mut boss, config) = make_boss(0);
    let mut ids = IdAllocator::default();
    let mut rng = seeded_rng();

    // Regular volleys at 1501, 3002, 4503: five shots each, no burst yet.
    for t in [1501, 3002, 4503] {
        assert_eq!(boss.update(t, 0.0, &mut ids, &config, &mut rng).len(), 5);
    }
    // 5001: regular cadence not due (498 ms since last volley), burst is.
    let shots = boss.update(5001, 0.0, &mut ids, &config, &mut rng);
    assert_eq!(shots.len(), 5);
    assert_eq!(boss.last_shot_ms, 4503);
}

#[test]
fn special_attack_is_a_no_op_for_regular_enemies() {
    let config = GameConfig::default();
    let mut e = Combatant::enemy(EntityId(1), 0.0, 0.0, 0, &config);
    let mut ids = IdAllocator::default();
    assert!(e.special_attack(99_999, &mut ids, &config, &mut seeded_rng()).is_empty());
}

// ── Patrol / bounce ───────────────────────────────────────────────────────────

#[test]
fn patrol_does_not_flip_before_contact() {
    let config = GameConfig::default();
    let max_x = config.screen_width - config.enemy.width;
    let mut e = Combatant::enemy(EntityId(1), max_x - 10.0, 0.0, 0, &config);
    e.patrol(0.016, config.screen_width); // 2.88 px, still inside
    assert!(e.speed > 0.0);
    assert!(e.body.rect.x < max_x);
}

#[test]
fn patrol_flips_at_first_contact_with_right_edge() {
    let config = GameConfig::default();
    let max_x = config.screen_width - config.enemy.width;
    let mut e = Combatant::enemy(EntityId(1), max_x - 1.0, 0.0, 0, &config);
    e.patrol(0.016, config.screen_width);
    assert!(e.speed < 0.0);
    assert_eq!(e.body.rect.x, max_x);
    // Next step heads back left.
    e.patrol(0.016, config.screen_width);
    assert!(e.body.rect.x < max_x);
}

#[test]
fn patrol_flips_at_left_edge() {
    let config = GameConfig::default();
    let mut e = Combatant::enemy(EntityId(1), 1.0, 0.0, 0, &config);
    e.speed = -config.enemy.speed;
    e.patrol(0.016, config.screen_width);
    assert!(e.speed > 0.0);
    assert_eq!(e.body.rect.x, 0.0);
}

// ── Damage policies ───────────────────────────────────────────────────────────

#[test]
fn boss_ignores_hits_inside_invincibility_window() {
    let (mut boss, _) = make_boss(0);
    assert_eq!(boss.take_damage(50, 1000), DamageOutcome::Wounded);
    assert_eq!(boss.health, 950);
    assert_eq!(boss.take_damage(50, 1400), DamageOutcome::Ignored);
    assert_eq!(boss.take_damage(50, 1500), DamageOutcome::Ignored);
    assert_eq!(boss.health, 950);
    assert_eq!(boss.take_damage(50, 1501), DamageOutcome::Wounded);
    assert_eq!(boss.health, 900);
}

#[test]
fn boss_ignored_hit_does_not_extend_window() {
    let (mut boss, _) = make_boss(0);
    boss.take_damage(50, 1000);
    boss.take_damage(50, 1400); // ignored
    assert!(boss.is_invincible(1500));
    assert!(!boss.is_invincible(1501));
}

#[test]
fn boss_update_lapses_invincibility() {
    let (mut boss, config) = make_boss(0);
    let mut ids = IdAllocator::default();
    boss.take_damage(10, 1000);
    boss.update(1400, 0.0, &mut ids, &config, &mut seeded_rng());
    assert!(matches!(&boss.role, Role::Boss(b) if b.invincible));
    boss.update(1501, 0.0, &mut ids, &config, &mut seeded_rng());
    assert!(matches!(&boss.role, Role::Boss(b) if !b.invincible));
}

#[test]
fn boss_health_floors_at_zero() {
    let (mut boss, _) = make_boss(0);
    assert_eq!(boss.take_damage(5000, 1000), DamageOutcome::Depleted);
    assert_eq!(boss.health, 0);
}

#[test]
fn player_damage_and_heal_stay_in_range() {
    let (mut p, _) = make_player();
    for _ in 0..10 {
        p.take_damage(20, 0);
        assert!(p.health <= p.max_health);
    }
    assert_eq!(p.health, 0);
    for _ in 0..10 {
        p.heal(20);
        assert!(p.health <= p.max_health);
    }
    assert_eq!(p.health, 100);
}

#[test]
fn player_has_no_invincibility() {
    let (mut p, _) = make_player();
    assert_eq!(p.take_damage(20, 10), DamageOutcome::Wounded);
    assert_eq!(p.take_damage(20, 11), DamageOutcome::Wounded);
    assert_eq!(p.health, 60);
}

#[test]
fn lose_life_refills_health_until_last_life() {
    let (mut p, _) = make_player();
    p.health = 0;
    assert_eq!(p.lose_life(), 2);
    assert_eq!(p.health, 100);
    p.health = 0;
    assert_eq!(p.lose_life(), 1);
    p.health = 0;
    assert_eq!(p.lose_life(), 0);
    assert_eq!(p.health, 0);
    assert_eq!(p.lose_life(), 0); // saturates
}

#[test]
fn gain_life_only_applies_to_player() {
    let (mut p, config) = make_player();
    p.gain_life();
    assert_eq!(p.lives(), Some(4));
    let mut e = Combatant::enemy(EntityId(2), 0.0, 0.0, 0, &config);
    e.gain_life();
    assert_eq!(e.lives(), None);
}
