//! End-to-end battle scenarios

mod common;

use std::f32::consts::PI;

use glam::Vec2;
use mech_duel::ai::presets::{self, STARTER_TREE};
use mech_duel::ai::{AiConfig, Sliders};
use mech_duel::loadout::MountSlot;
use mech_duel::sim::{
    ArenaType, BattleEvent, CombatantState, MovementState, Side, WinCondition, apply_damage,
    line_of_sight,
};
use mech_duel::tuning::SpawnPose;
use mech_duel::{BattleEngine, BattleOptions, Loadout, Tuning, simulate};

use common::*;

/// Heavy frame on plain sliders so it fires on the first aligned tick
fn juggernaut() -> Loadout {
    Loadout {
        ai: AiConfig::Sliders {
            sliders: Sliders::default(),
        },
        ..Loadout::juggernaut()
    }
}

/// Spawns 40 units apart, facing each other
fn point_blank(seed: u64) -> BattleOptions {
    BattleOptions::seeded(seed)
        .with_arena(ArenaType::Open)
        .with_tuning(Tuning::with_spawns(
            SpawnPose::new(380.0, 300.0, 0.0),
            SpawnPose::new(420.0, 300.0, PI),
        ))
}

#[test]
fn test_guaranteed_loss() {
    let mut glass = Loadout::starter();
    glass.name = "GLASS".to_string();
    glass.stats.ap = 1.0;
    glass.stats.defense = 0.0;

    let result = simulate(glass, juggernaut(), point_blank(11));

    assert_eq!(result.winner, Side::Enemy);
    assert_eq!(result.win_condition, WinCondition::Elimination);
    assert!(result.duration <= 10, "took {} ticks", result.duration);
    assert!(result.events().any(|(_, e)| matches!(
        e,
        BattleEvent::Destroyed {
            target: Side::Player,
            ..
        }
    )));
    assert_elimination_consistent(&result);
}

#[test]
fn test_shield_mitigation() {
    let loadout = Loadout::juggernaut();
    let defense = loadout.stats.defense;
    let tuning = Tuning::default();
    let mut target = CombatantState::new(Side::Enemy, &loadout, Vec2::new(400.0, 300.0), 0.0);
    target.is_shielded = true;
    target.shield_time = 20;

    let mut events = Vec::new();
    let before = target.hp;
    let dealt = apply_damage(&mut target, defense, 1000.0, 500.0, &tuning, &mut events);

    assert!(dealt <= 300.0 - defense / 20.0 + 1e-3, "dealt {dealt}");
    assert!((before - target.hp - dealt).abs() < 1e-3);
    assert!(target.energy < target.max_energy);
    assert!(matches!(events[0], BattleEvent::ShieldBlock { target: Side::Enemy, .. }));
}

#[test]
fn test_shield_window_opens_in_battle() {
    // Full caution: the shield arm triggers whenever a shot is lined up
    let mut turtle = juggernaut();
    turtle.ai = AiConfig::Sliders {
        sliders: Sliders::new(50.0, 100.0, 0.0, 50.0, 50.0),
    };
    let tuning = Tuning::default();
    let result = simulate(Loadout::starter(), turtle, point_blank(5));

    let shielded = result
        .frames
        .iter()
        .filter(|f| f.enemy.is_shielded)
        .count();
    assert!(shielded > 0);
    for frame in &result.frames {
        assert!(frame.enemy.shield_time <= tuning.shield_ticks);
    }
}

#[test]
fn test_ammo_exhaustion_rams() {
    let mut engine = BattleEngine::new(
        dry(Loadout::starter()),
        dry(Loadout::starter()),
        BattleOptions::seeded(3).with_arena(ArenaType::Open),
    );

    let mut gap = f32::MAX;
    for _ in 0..30 {
        let frame = engine.tick();
        assert_eq!(frame.player.movement, MovementState::Ramming);
        assert_eq!(frame.enemy.movement, MovementState::Ramming);
        assert!(!frame.player.is_firing_any());

        let now = frame.player.position.distance(frame.enemy.position);
        assert!(now < gap, "gap grew to {now} at tick {}", frame.tick);
        gap = now;
    }
    assert!(engine.combatant(Side::Player).velocity.x > 0.0);
    assert!(engine.combatant(Side::Enemy).velocity.x < 0.0);
}

#[test]
fn test_urban_wall_blocks_sight_and_fire() {
    let mut engine = BattleEngine::new(
        Loadout::starter(),
        Loadout::starter(),
        BattleOptions::seeded(8).with_arena(ArenaType::Urban),
    );
    let player = engine.combatant(Side::Player).position;
    let enemy = engine.combatant(Side::Enemy).position;
    assert!(!line_of_sight(player, enemy, engine.obstacles()));
    assert!(!line_of_sight(enemy, player, engine.obstacles()));

    let frame = engine.tick();
    for side in [Side::Player, Side::Enemy] {
        let state = frame.combatant(side);
        for slot in MountSlot::ALL {
            assert!(!state.mount(slot).firing, "{} {:?} firing", side.as_str(), slot);
        }
    }
    assert!(!frame.events.iter().any(|e| matches!(e, BattleEvent::Fire { .. })));
    assert!(frame.projectiles.is_empty());
}

#[test]
fn test_stagger_lifecycle() {
    let tuning = Tuning::default();
    let result = simulate(Loadout::starter(), juggernaut(), point_blank(21));

    let staggers = assert_stagger_lifecycle(&result, &tuning);
    assert!(staggers > 0, "no stagger ran its course");

    let (start, _) = result
        .events()
        .find(|(_, e)| matches!(e, BattleEvent::StaggerBreak { .. }))
        .expect("a stagger break");
    let staggered = result.frames[start as usize..]
        .iter()
        .take_while(|f| f.player.is_staggered)
        .count();
    assert_eq!(staggered, tuning.stagger_ticks as usize);
    // Staggered mid-tick; the controller is skipped from the next tick on
    assert_eq!(
        result.frames[start as usize + 1].player.movement,
        MovementState::Disabled
    );
}

#[test]
fn test_same_seed_same_battle() {
    let run = || {
        simulate(
            Loadout::starter(),
            Loadout::skirmisher(),
            BattleOptions::seeded(0xC0FFEE),
        )
    };
    let a = run();
    let b = run();
    assert_eq!(a, b);
    assert_eq!(a.seed, 0xC0FFEE);
}

#[test]
fn test_full_battle_holds_invariants() {
    let tuning = Tuning::default();
    let result = simulate(
        Loadout::skirmisher(),
        Loadout::juggernaut(),
        BattleOptions::seeded(77).with_arena(ArenaType::Pillars),
    );

    assert!(result.duration <= tuning.tick_budget());
    assert_eq!(result.frames.len(), result.duration as usize);
    assert_eq!(result.arena_type, ArenaType::Pillars);
    assert_eq!(result.obstacles.len(), 3);
    assert_frame_invariants(&result);
    assert_ammo_monotonic(&result);
    assert_elimination_consistent(&result);
    assert_stagger_lifecycle(&result, &tuning);
}

#[test]
fn test_tree_controlled_battle() {
    let mut scripted = Loadout::starter();
    scripted.ai = presets::lookup(STARTER_TREE).expect("starter tree preset");

    let result = simulate(
        scripted,
        Loadout::starter(),
        BattleOptions::seeded(4).with_arena(ArenaType::Open),
    );

    assert!(
        result
            .frames
            .iter()
            .any(|f| f.player.movement == MovementState::Scripted)
    );
    assert_frame_invariants(&result);
    assert_elimination_consistent(&result);
}

#[test]
fn test_time_limit_decides_on_hp() {
    let tuning = Tuning {
        max_ticks: 120,
        ..Tuning::default()
    };
    let result = simulate(
        dry(Loadout::starter()),
        dry(Loadout::starter()),
        BattleOptions::seeded(1)
            .with_arena(ArenaType::Open)
            .with_tuning(tuning),
    );

    assert_eq!(result.duration, 120);
    assert_eq!(result.win_condition, WinCondition::TimeLimit);
    // Nobody can deal damage, so the tie goes to the player
    assert_eq!(result.winner, Side::Player);
}

#[test]
fn test_result_json_shape() {
    let tuning = Tuning {
        max_ticks: 5,
        ..Tuning::default()
    };
    let result = simulate(
        Loadout::starter(),
        Loadout::starter(),
        BattleOptions::seeded(2).with_tuning(tuning),
    );
    let json = serde_json::to_value(&result).expect("serializable result");
    assert_eq!(json["frames"].as_array().map(Vec::len), Some(5));
    assert!(json["winCondition"].is_string());
    assert!(json["frames"][0]["player"]["maxHp"].is_number());
}
