//! Battle state and replay record types
//!
//! Everything captured in a `BattleFrame` is a plain value: cloning the live
//! state yields a snapshot that later ticks cannot touch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::loadout::{Loadout, MountSlot, WeaponKind};

/// Which combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    #[inline]
    pub fn opponent(&self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "PLAYER",
            Side::Enemy => "ENEMY",
        }
    }
}

/// Movement mode chosen by the controller on its last decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementState {
    #[default]
    Idle,
    /// Rushing a staggered opponent
    Executing,
    /// Backing off to recover stability
    Stabilizing,
    /// Closing in without line of sight
    Hunting,
    Strafing,
    /// Out of ammo, charging the opponent
    Ramming,
    /// Driven by a behavior tree action
    Scripted,
    /// Overheated or staggered, no decision made
    Disabled,
}

impl MovementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementState::Idle => "IDLE",
            MovementState::Executing => "EXECUTING",
            MovementState::Stabilizing => "STABILIZING",
            MovementState::Hunting => "HUNTING",
            MovementState::Strafing => "STRAFING",
            MovementState::Ramming => "RAMMING",
            MovementState::Scripted => "SCRIPTED",
            MovementState::Disabled => "DISABLED",
        }
    }
}

/// Mutable per-mount state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountState {
    pub ammo: u32,
    pub max_ammo: u32,
    /// Ticks until the mount can discharge again
    pub cooldown: u32,
    /// Fire intent for this tick
    pub firing: bool,
}

/// Live state of one combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantState {
    pub side: Side,
    pub position: Vec2,
    pub rotation: f32,
    pub velocity: Vec2,
    pub target_rotation: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub energy: f32,
    pub max_energy: f32,
    pub heat: f32,
    pub max_heat: f32,
    pub stability: f32,
    pub max_stability: f32,
    pub is_staggered: bool,
    pub stagger_timer: u32,
    /// Indexed by `MountSlot::index`
    pub mounts: [MountState; 4],
    pub is_boosting: bool,
    pub is_overheated: bool,
    pub is_shielded: bool,
    pub shield_time: u32,
    pub movement: MovementState,
}

impl CombatantState {
    /// Fresh state at battle start
    pub fn new(side: Side, loadout: &Loadout, position: Vec2, rotation: f32) -> Self {
        let stats = &loadout.stats;
        let max_stability = loadout.max_stability().max(0.0);
        let mounts = MountSlot::ALL.map(|slot| {
            let ammo = loadout.weapon(slot).ammo;
            MountState {
                ammo,
                max_ammo: ammo,
                cooldown: 0,
                firing: false,
            }
        });

        Self {
            side,
            position,
            rotation,
            velocity: Vec2::ZERO,
            target_rotation: rotation,
            hp: stats.ap.max(0.0),
            max_hp: stats.ap.max(0.0),
            energy: stats.energy_capacity.max(0.0),
            max_energy: stats.energy_capacity.max(0.0),
            heat: 0.0,
            max_heat: stats.effective_heat_capacity(),
            stability: max_stability,
            max_stability,
            is_staggered: false,
            stagger_timer: 0,
            mounts,
            is_boosting: false,
            is_overheated: false,
            is_shielded: false,
            shield_time: 0,
            movement: MovementState::Idle,
        }
    }

    #[inline]
    pub fn mount(&self, slot: MountSlot) -> &MountState {
        &self.mounts[slot.index()]
    }

    #[inline]
    pub fn mount_mut(&mut self, slot: MountSlot) -> &mut MountState {
        &mut self.mounts[slot.index()]
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Ratio with a zero denominator treated as full
    fn ratio(value: f32, max: f32) -> f32 {
        if max > 0.0 { value / max } else { 1.0 }
    }

    pub fn hp_fraction(&self) -> f32 {
        Self::ratio(self.hp, self.max_hp)
    }

    pub fn energy_fraction(&self) -> f32 {
        Self::ratio(self.energy, self.max_energy)
    }

    pub fn stability_fraction(&self) -> f32 {
        Self::ratio(self.stability, self.max_stability)
    }

    pub fn total_ammo(&self) -> u32 {
        self.mounts.iter().map(|m| m.ammo).sum()
    }

    pub fn total_max_ammo(&self) -> u32 {
        self.mounts.iter().map(|m| m.max_ammo).sum()
    }

    /// Drop boost and every fire intent
    pub fn clear_intents(&mut self) {
        self.is_boosting = false;
        for mount in &mut self.mounts {
            mount.firing = false;
        }
    }

    pub fn is_firing_any(&self) -> bool {
        self.mounts.iter().any(|m| m.firing)
    }

    /// Spend energy, never dropping below zero
    #[inline]
    pub fn drain_energy(&mut self, amount: f32) {
        self.energy = (self.energy - amount).max(0.0);
    }
}

/// A projectile in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projectile {
    pub id: u32,
    pub owner: Side,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    /// Stability damage on hit
    pub impact: f32,
    pub kind: WeaponKind,
    /// Max homing turn per tick (radians), zero for ballistic rounds
    pub guidance: f32,
    pub target: Side,
}

impl Projectile {
    #[inline]
    pub fn is_guided(&self) -> bool {
        self.guidance > 0.0
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleEvent {
    Fire {
        source: Side,
        slot: MountSlot,
    },
    Hit {
        source: Side,
        target: Side,
        damage: f32,
        location: Vec2,
    },
    MeleeHit {
        source: Side,
        target: Side,
        damage: f32,
        location: Vec2,
    },
    ShieldBlock {
        target: Side,
        location: Vec2,
    },
    WallCollision {
        location: Vec2,
    },
    Destroyed {
        target: Side,
        location: Vec2,
    },
    StaggerBreak {
        target: Side,
        location: Vec2,
    },
    AiDecision {
        source: Side,
        message: String,
    },
}

/// Immutable snapshot of one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleFrame {
    pub tick: u32,
    pub player: CombatantState,
    pub enemy: CombatantState,
    pub projectiles: Vec<Projectile>,
    pub events: Vec<BattleEvent>,
}

impl BattleFrame {
    pub fn combatant(&self, side: Side) -> &CombatantState {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }
}

/// How the winner was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinCondition {
    Elimination,
    /// Both destroyed on the same tick
    MutualDestruction,
    /// Tick budget ran out; higher hp fraction wins
    TimeLimit,
}

/// Final, authoritative outcome plus the full replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    pub winner: Side,
    pub win_condition: WinCondition,
    pub frames: Vec<BattleFrame>,
    /// Ticks simulated
    pub duration: u32,
    pub obstacles: Vec<super::arena::Obstacle>,
    pub arena_type: super::arena::ArenaType,
    pub seed: u64,
}

impl BattleResult {
    pub fn last_frame(&self) -> Option<&BattleFrame> {
        self.frames.last()
    }

    /// All events in tick order, paired with their tick
    pub fn events(&self) -> impl Iterator<Item = (u32, &BattleEvent)> {
        self.frames
            .iter()
            .flat_map(|f| f.events.iter().map(move |e| (f.tick, e)))
    }
}
