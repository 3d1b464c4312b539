//! Post-battle tallies reduced from a result's event stream

use serde::{Deserialize, Serialize};

use super::state::{BattleEvent, BattleResult, Side, WinCondition};

/// Totals for one side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideTally {
    /// Discharges of any mount
    pub shots: u32,
    /// Projectile hits landed
    pub hits: u32,
    pub melee_hits: u32,
    /// Rated damage of landed hits, before mitigation
    pub raw_damage: f32,
    /// Hits absorbed by this side's shield
    pub blocks: u32,
    /// Times this side broke the opponent's stability
    pub staggers_inflicted: u32,
    /// Controller notes emitted
    pub decisions: u32,
    /// Final hp as a fraction of max
    pub hp_remaining: f32,
}

impl SideTally {
    /// Landed hits over shots, zero if nothing was fired
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            (self.hits + self.melee_hits) as f32 / self.shots as f32
        }
    }
}

/// Whole-battle summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub winner: Side,
    pub win_condition: WinCondition,
    pub duration: u32,
    pub player: SideTally,
    pub enemy: SideTally,
    /// Projectiles lost to walls and arena bounds
    pub wall_impacts: u32,
}

impl BattleSummary {
    pub fn from_result(result: &BattleResult) -> Self {
        let mut summary = Self {
            winner: result.winner,
            win_condition: result.win_condition,
            duration: result.duration,
            player: SideTally::default(),
            enemy: SideTally::default(),
            wall_impacts: 0,
        };

        for (_, event) in result.events() {
            match event {
                BattleEvent::Fire { source, .. } => summary.side_mut(*source).shots += 1,
                BattleEvent::Hit { source, damage, .. } => {
                    let tally = summary.side_mut(*source);
                    tally.hits += 1;
                    tally.raw_damage += damage;
                }
                BattleEvent::MeleeHit { source, damage, .. } => {
                    let tally = summary.side_mut(*source);
                    tally.melee_hits += 1;
                    tally.raw_damage += damage;
                }
                BattleEvent::ShieldBlock { target, .. } => summary.side_mut(*target).blocks += 1,
                BattleEvent::StaggerBreak { target, .. } => {
                    summary.side_mut(target.opponent()).staggers_inflicted += 1
                }
                BattleEvent::WallCollision { .. } => summary.wall_impacts += 1,
                BattleEvent::AiDecision { source, .. } => summary.side_mut(*source).decisions += 1,
                BattleEvent::Destroyed { .. } => {}
            }
        }

        if let Some(frame) = result.last_frame() {
            summary.player.hp_remaining = frame.player.hp_fraction();
            summary.enemy.hp_remaining = frame.enemy.hp_fraction();
        }
        summary
    }

    pub fn side(&self, side: Side) -> &SideTally {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideTally {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Battle length in seconds
    pub fn seconds(&self) -> f32 {
        self.duration as f32 / crate::consts::TICKS_PER_SECOND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::{Loadout, MountSlot};
    use crate::sim::arena::ArenaType;
    use crate::sim::state::{BattleFrame, CombatantState};
    use glam::Vec2;

    fn result_with(events: Vec<BattleEvent>) -> BattleResult {
        let loadout = Loadout::starter();
        let player = CombatantState::new(Side::Player, &loadout, Vec2::new(100.0, 300.0), 0.0);
        let mut enemy = CombatantState::new(Side::Enemy, &loadout, Vec2::new(700.0, 300.0), 0.0);
        enemy.hp = enemy.max_hp / 2.0;
        BattleResult {
            winner: Side::Player,
            win_condition: WinCondition::TimeLimit,
            frames: vec![BattleFrame {
                tick: 0,
                player,
                enemy,
                projectiles: Vec::new(),
                events,
            }],
            duration: 120,
            obstacles: Vec::new(),
            arena_type: ArenaType::Open,
            seed: 1,
        }
    }

    #[test]
    fn test_tallies() {
        let at = Vec2::ZERO;
        let result = result_with(vec![
            BattleEvent::Fire {
                source: Side::Player,
                slot: MountSlot::RightArm,
            },
            BattleEvent::Fire {
                source: Side::Player,
                slot: MountSlot::LeftArm,
            },
            BattleEvent::Hit {
                source: Side::Player,
                target: Side::Enemy,
                damage: 350.0,
                location: at,
            },
            BattleEvent::MeleeHit {
                source: Side::Player,
                target: Side::Enemy,
                damage: 800.0,
                location: at,
            },
            BattleEvent::StaggerBreak {
                target: Side::Enemy,
                location: at,
            },
            BattleEvent::ShieldBlock {
                target: Side::Enemy,
                location: at,
            },
            BattleEvent::WallCollision { location: at },
        ]);

        let summary = BattleSummary::from_result(&result);
        assert_eq!(summary.player.shots, 2);
        assert_eq!(summary.player.hits, 1);
        assert_eq!(summary.player.melee_hits, 1);
        assert_eq!(summary.player.raw_damage, 1150.0);
        assert_eq!(summary.player.staggers_inflicted, 1);
        assert_eq!(summary.player.accuracy(), 1.0);
        assert_eq!(summary.enemy.blocks, 1);
        assert_eq!(summary.enemy.hp_remaining, 0.5);
        assert_eq!(summary.wall_impacts, 1);
        assert_eq!(summary.seconds(), 2.0);
    }

    #[test]
    fn test_accuracy_without_shots() {
        assert_eq!(SideTally::default().accuracy(), 0.0);
    }
}
