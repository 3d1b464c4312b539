// Shared assertions over battle replays
#![allow(dead_code)]

use mech_duel::BattleResult;
use mech_duel::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use mech_duel::sim::{BattleEvent, CombatantState, Side, WinCondition};
use mech_duel::{Loadout, Tuning};

/// Same build with every mount emptied
pub fn dry(mut loadout: Loadout) -> Loadout {
    for spec in [
        &mut loadout.mounts.right_arm,
        &mut loadout.mounts.left_arm,
        &mut loadout.mounts.left_back,
        &mut loadout.mounts.right_back,
    ] {
        spec.ammo = 0;
    }
    loadout
}

pub fn assert_bounded(state: &CombatantState, tick: u32) {
    let side = state.side.as_str();
    assert!(
        state.hp >= 0.0 && state.hp <= state.max_hp,
        "{side} hp {} out of range at tick {tick}",
        state.hp
    );
    assert!(
        state.energy >= 0.0 && state.energy <= state.max_energy,
        "{side} energy {} out of range at tick {tick}",
        state.energy
    );
    assert!(state.heat >= 0.0, "{side} heat negative at tick {tick}");
    assert!(
        state.stability >= 0.0 && state.stability <= state.max_stability,
        "{side} stability {} out of range at tick {tick}",
        state.stability
    );
    assert!(
        (0.0..=ARENA_WIDTH).contains(&state.position.x)
            && (0.0..=ARENA_HEIGHT).contains(&state.position.y),
        "{side} left the arena at tick {tick}: {}",
        state.position
    );
}

/// Per-frame resource, stability and position bounds
pub fn assert_frame_invariants(result: &BattleResult) {
    for frame in &result.frames {
        assert_bounded(&frame.player, frame.tick);
        assert_bounded(&frame.enemy, frame.tick);
    }
}

/// Ammo per mount never goes up
pub fn assert_ammo_monotonic(result: &BattleResult) {
    for pair in result.frames.windows(2) {
        for side in [Side::Player, Side::Enemy] {
            let before = pair[0].combatant(side);
            let after = pair[1].combatant(side);
            for (a, b) in before.mounts.iter().zip(after.mounts.iter()) {
                assert!(
                    b.ammo <= a.ammo,
                    "{} ammo rose at tick {}",
                    side.as_str(),
                    pair[1].tick
                );
            }
        }
    }
}

/// The winner agrees with the final hp readout
pub fn assert_elimination_consistent(result: &BattleResult) {
    let last = result.last_frame().expect("battle recorded frames");
    match (last.player.hp > 0.0, last.enemy.hp > 0.0) {
        (false, false) => {
            assert_eq!(result.winner, Side::Enemy);
            assert_eq!(result.win_condition, WinCondition::MutualDestruction);
        }
        (false, true) => {
            assert_eq!(result.winner, Side::Enemy);
            assert_eq!(result.win_condition, WinCondition::Elimination);
        }
        (true, false) => {
            assert_eq!(result.winner, Side::Player);
            assert_eq!(result.win_condition, WinCondition::Elimination);
        }
        (true, true) => assert_eq!(result.win_condition, WinCondition::TimeLimit),
    }
}

fn took_hit(events: &[BattleEvent], side: Side) -> bool {
    events.iter().any(|e| {
        matches!(e, BattleEvent::Hit { target, .. } | BattleEvent::MeleeHit { target, .. }
            if *target == side)
    })
}

fn broke(events: &[BattleEvent], side: Side) -> bool {
    events
        .iter()
        .any(|e| matches!(e, BattleEvent::StaggerBreak { target, .. } if *target == side))
}

/// Every stagger lasts exactly `stagger_ticks` frames and ends at full stability
///
/// Returns the number of staggers seen through to recovery.
pub fn assert_stagger_lifecycle(result: &BattleResult, tuning: &Tuning) -> usize {
    let window = tuning.stagger_ticks as usize;
    let frames = &result.frames;
    let mut completed = 0;

    for (start, frame) in frames.iter().enumerate() {
        for side in [Side::Player, Side::Enemy] {
            if !broke(&frame.events, side) {
                continue;
            }
            for offset in 0..window {
                let Some(f) = frames.get(start + offset) else {
                    break;
                };
                let state = f.combatant(side);
                assert!(
                    state.is_staggered,
                    "{} recovered early at tick {}",
                    side.as_str(),
                    f.tick
                );
                assert_eq!(state.stagger_timer as usize, window - offset);
            }

            let Some(after) = frames.get(start + window) else {
                continue;
            };
            let state = after.combatant(side);
            if broke(&after.events, side) {
                // Knocked straight back down on the recovery tick
                completed += 1;
                continue;
            }
            assert!(
                !state.is_staggered,
                "{} still staggered at tick {}",
                side.as_str(),
                after.tick
            );
            if !took_hit(&after.events, side) {
                assert_eq!(state.stability, state.max_stability);
            }
            completed += 1;
        }
    }
    completed
}
