//! Deterministic simulation module
//!
//! All battle logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the engine
//! - Stable evaluation order (player before enemy)
//! - No I/O and no global state

pub mod arena;
pub mod combat;
pub mod engine;
pub mod geometry;
pub mod rng;
pub mod state;
pub mod summary;

pub use arena::{ArenaType, Obstacle, ObstacleKind, line_of_sight};
pub use combat::{WeaponProfile, apply_damage};
pub use engine::{BattleEngine, simulate};
pub use rng::BattleRng;
pub use state::{
    BattleEvent, BattleFrame, BattleResult, CombatantState, MountState, MovementState,
    Projectile, Side, WinCondition,
};
pub use summary::{BattleSummary, SideTally};
