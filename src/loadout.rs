//! Loadout input: aggregate stats, leg archetype, weapon mounts, AI config
//!
//! Loadouts arrive pre-aggregated from the part catalog. Nothing here is
//! validated; the engine trusts what it is given.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::{AiConfig, Sliders};
use crate::error::LoadoutError;

/// Ammo ceiling used for mounts that never realistically run dry
pub const UNLIMITED_AMMO: u32 = 999;

/// Aggregate numeric capabilities of a build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadoutStats {
    /// Armor points (max hp)
    pub ap: f32,
    pub weight: f32,
    pub weight_capacity: f32,
    /// Energy regenerated per second before drain
    pub energy_output: f32,
    pub energy_capacity: f32,
    /// Continuous energy drain per second
    pub energy_drain: f32,
    /// Heat dissipated per two seconds
    pub cooling: f32,
    pub heat_capacity: f32,
    pub mobility: f32,
    pub firepower: f32,
    pub defense: f32,
    pub scan_range: f32,
    pub precision: f32,
}

impl LoadoutStats {
    /// Heat ceiling, 3000 when unset
    pub fn effective_heat_capacity(&self) -> f32 {
        if self.heat_capacity > 0.0 {
            self.heat_capacity
        } else {
            3000.0
        }
    }

    /// Firing precision, 100 when unset
    pub fn effective_precision(&self) -> f32 {
        if self.precision > 0.0 {
            self.precision
        } else {
            100.0
        }
    }
}

/// Leg archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegType {
    #[default]
    Biped,
    ReverseJoint,
    Tank,
    Quad,
    Hover,
}

impl LegType {
    /// Multiplier on base stability
    pub fn stability_factor(&self) -> f32 {
        match self {
            LegType::Tank => 1.5,
            LegType::Quad => 1.2,
            LegType::Biped | LegType::ReverseJoint | LegType::Hover => 1.0,
        }
    }
}

/// Weapon archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeaponKind {
    Rifle,
    /// Rapid-fire
    MachineGun,
    /// Heavy ordnance
    Bazooka,
    /// Long-range cannon
    Cannon,
    /// Guided munition
    Missile,
    Blade,
    /// Short, heavy-impact melee spike
    PileBunker,
    /// Energy barrier
    Shield,
    /// Sensor; never discharges
    Radar,
    #[default]
    Empty,
}

impl WeaponKind {
    #[inline]
    pub fn is_melee(&self) -> bool {
        matches!(self, WeaponKind::Blade | WeaponKind::PileBunker)
    }
}

/// Engagement range band of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeBand {
    Short,
    Medium,
    Long,
}

/// Static description of the weapon in one mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: WeaponKind,
    #[serde(default)]
    pub range: Option<RangeBand>,
    /// Rated damage per hit
    #[serde(default)]
    pub damage: f32,
    /// Energy spent per discharge
    #[serde(default = "default_energy_cost")]
    pub energy_cost: f32,
    #[serde(default)]
    pub ammo: u32,
}

fn default_energy_cost() -> f32 {
    10.0
}

impl Default for WeaponSpec {
    fn default() -> Self {
        Self::empty()
    }
}

impl WeaponSpec {
    pub fn new(
        name: &str,
        kind: WeaponKind,
        range: Option<RangeBand>,
        damage: f32,
        energy_cost: f32,
        ammo: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            range,
            damage,
            energy_cost,
            ammo,
        }
    }

    pub fn empty() -> Self {
        Self::new("NONE", WeaponKind::Empty, None, 0.0, 0.0, 0)
    }

    #[inline]
    pub fn is_long_range(&self) -> bool {
        self.range == Some(RangeBand::Long)
    }

    #[inline]
    pub fn is_short_range(&self) -> bool {
        self.range == Some(RangeBand::Short)
    }
}

/// The four weapon slots, in firing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MountSlot {
    /// Primary, right arm
    RightArm,
    /// Primary, left arm
    LeftArm,
    /// Secondary, left shoulder
    LeftBack,
    /// Secondary, right shoulder
    RightBack,
}

impl MountSlot {
    pub const ALL: [MountSlot; 4] = [
        MountSlot::RightArm,
        MountSlot::LeftArm,
        MountSlot::LeftBack,
        MountSlot::RightBack,
    ];

    #[inline]
    pub fn index(&self) -> usize {
        match self {
            MountSlot::RightArm => 0,
            MountSlot::LeftArm => 1,
            MountSlot::LeftBack => 2,
            MountSlot::RightBack => 3,
        }
    }
}

/// Weapon table of a build, indexed by `MountSlot::index`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mounts {
    #[serde(default)]
    pub right_arm: WeaponSpec,
    #[serde(default)]
    pub left_arm: WeaponSpec,
    #[serde(default)]
    pub left_back: WeaponSpec,
    #[serde(default)]
    pub right_back: WeaponSpec,
}

impl Mounts {
    pub fn get(&self, slot: MountSlot) -> &WeaponSpec {
        match slot {
            MountSlot::RightArm => &self.right_arm,
            MountSlot::LeftArm => &self.left_arm,
            MountSlot::LeftBack => &self.left_back,
            MountSlot::RightBack => &self.right_back,
        }
    }
}

/// A complete build as consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loadout {
    pub name: String,
    pub stats: LoadoutStats,
    #[serde(default)]
    pub legs: LegType,
    #[serde(default)]
    pub mounts: Mounts,
    #[serde(default)]
    pub ai: AiConfig,
}

impl Loadout {
    /// Max stability derived from weight, defense and leg archetype
    pub fn max_stability(&self) -> f32 {
        let base = self.stats.weight * 0.25 + self.stats.defense * 0.5;
        base * self.legs.stability_factor()
    }

    pub fn weapon(&self, slot: MountSlot) -> &WeaponSpec {
        self.mounts.get(slot)
    }

    /// Load a loadout from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, LoadoutError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let loadout: Loadout =
            serde_json::from_str(&text).map_err(|source| LoadoutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        log::info!("Loaded loadout {:?} from {}", loadout.name, path.display());
        Ok(loadout)
    }

    /// Factory starter frame: rifle, laser blade, 4-cell missiles
    pub fn starter() -> Self {
        Self {
            name: "STARTER".to_string(),
            stats: LoadoutStats {
                ap: 7800.0,
                weight: 5900.0,
                weight_capacity: 8000.0,
                energy_output: 3000.0,
                energy_capacity: 5000.0,
                energy_drain: 1230.0,
                cooling: 1000.0,
                heat_capacity: 3000.0,
                mobility: 500.0,
                firepower: 1800.0,
                defense: 1300.0,
                scan_range: 400.0,
                precision: 120.0,
            },
            legs: LegType::Biped,
            mounts: Mounts {
                right_arm: WeaponSpec::new(
                    "RIFLE-X1",
                    WeaponKind::Rifle,
                    Some(RangeBand::Medium),
                    350.0,
                    10.0,
                    180,
                ),
                left_arm: WeaponSpec::new(
                    "BLADE-Z",
                    WeaponKind::Blade,
                    Some(RangeBand::Short),
                    800.0,
                    150.0,
                    UNLIMITED_AMMO,
                ),
                left_back: WeaponSpec::new(
                    "MISSILE-4",
                    WeaponKind::Missile,
                    Some(RangeBand::Long),
                    600.0,
                    50.0,
                    30,
                ),
                right_back: WeaponSpec::empty(),
            },
            ai: AiConfig::Sliders {
                sliders: Sliders::default(),
            },
        }
    }

    /// Heavy tank frame: bazooka, energy shield, back cannon, radar
    pub fn juggernaut() -> Self {
        Self {
            name: "JUGGERNAUT".to_string(),
            stats: LoadoutStats {
                ap: 10300.0,
                weight: 9450.0,
                weight_capacity: 12000.0,
                energy_output: 4500.0,
                energy_capacity: 6000.0,
                energy_drain: 2120.0,
                cooling: 2000.0,
                heat_capacity: 4500.0,
                mobility: 200.0,
                firepower: 2800.0,
                defense: 2450.0,
                scan_range: 850.0,
                precision: 120.0,
            },
            legs: LegType::Tank,
            mounts: Mounts {
                right_arm: WeaponSpec::new(
                    "BAZOOKA-X",
                    WeaponKind::Bazooka,
                    Some(RangeBand::Medium),
                    1500.0,
                    50.0,
                    40,
                ),
                left_arm: WeaponSpec::new(
                    "SHIELD-E",
                    WeaponKind::Shield,
                    None,
                    0.0,
                    300.0,
                    UNLIMITED_AMMO,
                ),
                left_back: WeaponSpec::new(
                    "CANNON-S",
                    WeaponKind::Cannon,
                    Some(RangeBand::Long),
                    1200.0,
                    100.0,
                    20,
                ),
                right_back: WeaponSpec::new(
                    "RADAR-X",
                    WeaponKind::Radar,
                    None,
                    0.0,
                    80.0,
                    0,
                ),
            },
            ai: AiConfig::Preset {
                id: "chip_turtle".to_string(),
                sliders: Sliders::default(),
            },
        }
    }

    /// Light hover skirmisher: machine gun, pile bunker, 6-cell missiles
    pub fn skirmisher() -> Self {
        Self {
            name: "SKIRMISHER".to_string(),
            stats: LoadoutStats {
                ap: 6200.0,
                weight: 5450.0,
                weight_capacity: 8500.0,
                energy_output: 3000.0,
                energy_capacity: 5000.0,
                energy_drain: 1880.0,
                cooling: 1000.0,
                heat_capacity: 2800.0,
                mobility: 1350.0,
                firepower: 4645.0,
                defense: 1030.0,
                scan_range: 400.0,
                precision: 170.0,
            },
            legs: LegType::Hover,
            mounts: Mounts {
                right_arm: WeaponSpec::new(
                    "MG-HURRICANE",
                    WeaponKind::MachineGun,
                    Some(RangeBand::Short),
                    45.0,
                    20.0,
                    800,
                ),
                left_arm: WeaponSpec::new(
                    "PILE-BUNKER",
                    WeaponKind::PileBunker,
                    Some(RangeBand::Short),
                    3500.0,
                    50.0,
                    20,
                ),
                left_back: WeaponSpec::empty(),
                right_back: WeaponSpec::new(
                    "MISSILE-6",
                    WeaponKind::Missile,
                    Some(RangeBand::Long),
                    900.0,
                    60.0,
                    24,
                ),
            },
            ai: AiConfig::Preset {
                id: "chip_berserker".to_string(),
                sliders: Sliders::default(),
            },
        }
    }

    /// Built-in sample builds by name (case-insensitive)
    pub fn sample(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "starter" => Some(Self::starter()),
            "juggernaut" => Some(Self::juggernaut()),
            "skirmisher" => Some(Self::skirmisher()),
            _ => None,
        }
    }
}
