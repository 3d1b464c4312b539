//! Mech Duel - deterministic two-mech battle simulator
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tick loop, physics, combat, arena)
//! - `ai`: Controllers that turn perception into per-tick intents
//! - `loadout`: Build input consumed by the engine
//! - `options` / `tuning`: Explicit per-battle configuration

pub mod ai;
pub mod error;
pub mod loadout;
pub mod options;
pub mod sim;
pub mod tuning;

pub use error::LoadoutError;
pub use loadout::Loadout;
pub use options::BattleOptions;
pub use sim::{BattleEngine, BattleResult, Side, simulate};
pub use tuning::Tuning;

/// Simulation constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: f32 = 60.0;
    /// Battle time limit (3 minutes)
    pub const MAX_TICKS: u32 = 60 * 180;

    /// Arena dimensions (px)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Mech collision radius against obstacles
    pub const MECH_RADIUS: f32 = 20.0;
    /// Projectiles strike within this distance of a mech center
    pub const PROJECTILE_HIT_RADIUS: f32 = MECH_RADIUS + 5.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}
