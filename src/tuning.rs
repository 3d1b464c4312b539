//! Data-driven battle balance
//!
//! Defaults reproduce the stock rules. Callers override individual values
//! through `BattleOptions::tuning`; the engine never reads global state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Starting position and facing of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnPose {
    pub position: Vec2,
    pub rotation: f32,
}

impl SpawnPose {
    pub const fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            rotation,
        }
    }
}

/// Tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tuning {
    /// Tick budget before the battle is decided on hp fraction
    pub max_ticks: u32,
    pub player_spawn: SpawnPose,
    pub enemy_spawn: SpawnPose,
    /// Per-tick velocity multiplier
    pub velocity_damping: f32,
    /// Fraction of the remaining turn applied each tick
    pub turn_rate: f32,
    /// Velocity multiplier on arena boundary contact
    pub wall_bounce: f32,
    pub stagger_ticks: u32,
    /// Ticks for stability to regenerate from empty to full
    pub stability_recovery_ticks: u32,
    pub shield_ticks: u32,
    pub shield_cooldown: u32,
    pub shield_damage_factor: f32,
    pub shield_impact_factor: f32,
    /// Energy the shield burns per point of raw incoming damage
    pub shield_energy_per_damage: f32,
    pub stagger_damage_factor: f32,
    /// Incoming damage is reduced by defense / this
    pub defense_divisor: f32,
    pub missile_max_speed: f32,
    pub missile_acceleration: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_ticks: MAX_TICKS,
            player_spawn: SpawnPose::new(100.0, 300.0, 0.0),
            enemy_spawn: SpawnPose::new(700.0, 300.0, std::f32::consts::PI),
            velocity_damping: 0.92,
            turn_rate: 0.1,
            wall_bounce: -0.5,
            stagger_ticks: 90,
            stability_recovery_ticks: 600,
            shield_ticks: 40,
            shield_cooldown: 90,
            shield_damage_factor: 0.3,
            shield_impact_factor: 0.2,
            shield_energy_per_damage: 0.5,
            stagger_damage_factor: 1.5,
            defense_divisor: 20.0,
            missile_max_speed: 20.0,
            missile_acceleration: 1.05,
        }
    }
}

impl Tuning {
    /// Defaults with both combatants placed explicitly
    pub fn with_spawns(player: SpawnPose, enemy: SpawnPose) -> Self {
        Self {
            player_spawn: player,
            enemy_spawn: enemy,
            ..Self::default()
        }
    }

    /// Tick budget clamped to at least one tick
    pub fn tick_budget(&self) -> u32 {
        self.max_ticks.max(1)
    }

    /// Spawn point pulled inside the arena bounds
    pub fn clamp_spawn(pose: SpawnPose) -> SpawnPose {
        let position = Vec2::new(
            pose.position.x.clamp(1.0, ARENA_WIDTH - 1.0),
            pose.position.y.clamp(1.0, ARENA_HEIGHT - 1.0),
        );
        SpawnPose { position, ..pose }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_three_minutes() {
        assert_eq!(Tuning::default().tick_budget(), 10_800);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "staggerTicks": 30,
            "playerSpawn": { "position": [10.0, 20.0], "rotation": 0.5 }
        }"#;
        let tuning: Tuning = serde_json::from_str(json).expect("valid tuning json");
        assert_eq!(tuning.stagger_ticks, 30);
        assert_eq!(tuning.player_spawn, SpawnPose::new(10.0, 20.0, 0.5));
        assert_eq!(tuning.shield_ticks, 40);
    }

    #[test]
    fn test_json_keys_are_camel_case() {
        let value = serde_json::to_value(Tuning::default()).expect("tuning serializes");
        assert_eq!(value["maxTicks"], 10_800);
        assert!(value.get("stability_recovery_ticks").is_none());
        assert!(value.get("stabilityRecoveryTicks").is_some());
    }

    #[test]
    fn test_clamp_spawn() {
        let pose = Tuning::clamp_spawn(SpawnPose::new(-50.0, 9000.0, 1.0));
        assert_eq!(pose.position, Vec2::new(1.0, ARENA_HEIGHT - 1.0));
        assert_eq!(pose.rotation, 1.0);
    }
}
