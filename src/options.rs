//! Per-battle options passed to the engine constructor

use serde::{Deserialize, Serialize};

use crate::sim::ArenaType;
use crate::tuning::Tuning;

/// Battle construction options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BattleOptions {
    /// RNG seed; wall-clock derived when absent
    pub seed: Option<u64>,
    /// Requested arena ("OPEN", "PILLARS", "URBAN", "WASTELAND"); random when
    /// absent or unrecognized
    pub arena: Option<String>,
    pub tuning: Tuning,
}

impl BattleOptions {
    /// Options with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Fix the arena
    pub fn with_arena(mut self, arena: ArenaType) -> Self {
        self.arena = Some(arena.as_str().to_string());
        self
    }

    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }
}
