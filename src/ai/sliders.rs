//! Slider-driven heuristic controller
//!
//! Five personality sliders in [0, 100] shape a stand-off range, movement
//! overrides and per-mount firing discipline.

use serde::{Deserialize, Serialize};

use super::{Intent, Perception};
use crate::loadout::{MountSlot, WeaponKind};
use crate::sim::geometry::{heading, shortest_angle};
use crate::sim::rng::BattleRng;
use crate::sim::state::{BattleEvent, MovementState};

/// Range the controller tries to hold with ranged arms
const BASE_RANGE: f32 = 400.0;
const SHORT_RANGE: f32 = 150.0;
const LONG_RANGE: f32 = 600.0;
/// Stand-off when the primary is dry and the left arm is melee or shield
const MELEE_RANGE: f32 = 50.0;

/// Short-band right arm weapons only fire inside this distance
const SHORT_WEAPON_REACH: f32 = 200.0;
/// Left melee arm fires inside this distance
const MELEE_REACH: f32 = 100.0;
const CRITICAL_STABILITY: f32 = 0.3;
const STRAFE_MULTIPLIER: f32 = 5.0;

/// Personality sliders, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sliders {
    /// Shrinks the stand-off range and unlocks back weapons
    pub aggression: f32,
    /// Shield usage probability
    pub caution: f32,
    /// Strafe probability
    pub mobility: f32,
    /// Tightens the firing alignment cone
    pub focus: f32,
    /// Energy fraction held back before boosting
    pub energy_save: f32,
}

impl Default for Sliders {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0, 50.0, 50.0)
    }
}

impl Sliders {
    pub const fn new(
        aggression: f32,
        caution: f32,
        mobility: f32,
        focus: f32,
        energy_save: f32,
    ) -> Self {
        Self {
            aggression,
            caution,
            mobility,
            focus,
            energy_save,
        }
    }

    /// Copy with every slider clamped into [0, 100]
    pub fn clamped(&self) -> Self {
        let c = |v: f32| if v.is_finite() { v.clamp(0.0, 100.0) } else { 50.0 };
        Self::new(
            c(self.aggression),
            c(self.caution),
            c(self.mobility),
            c(self.focus),
            c(self.energy_save),
        )
    }

    /// Preferred distance before aggression is applied
    pub fn optimal_range(view: &Perception<'_>) -> f32 {
        let me = view.me;
        let loadout = view.loadout;
        let primary_dry = me.mount(MountSlot::RightArm).ammo == 0;
        if me.total_ammo() == 0 {
            return 0.0;
        }

        let left_kind = loadout.weapon(MountSlot::LeftArm).kind;
        if primary_dry && (left_kind.is_melee() || left_kind == WeaponKind::Shield) {
            return MELEE_RANGE;
        }

        let arms = [
            loadout.weapon(MountSlot::RightArm),
            loadout.weapon(MountSlot::LeftArm),
        ];
        let mut range = BASE_RANGE;
        if arms.iter().any(|w| w.is_short_range()) {
            range = SHORT_RANGE;
        }
        if arms.iter().any(|w| w.is_long_range()) {
            range = LONG_RANGE;
        }
        range
    }

    /// Stand-off distance the controller steers toward
    pub fn desired_range(&self, view: &Perception<'_>) -> f32 {
        (Self::optimal_range(view) - (self.aggression - 50.0) * 4.0).max(0.0)
    }
}

/// Fill `intent` with the heuristic decision for this tick
pub fn drive(
    view: &Perception<'_>,
    sliders: &Sliders,
    intent: &mut Intent,
    rng: &mut BattleRng,
    events: &mut Vec<BattleEvent>,
) {
    let me = view.me;
    let opponent = view.opponent;
    let stats = &view.loadout.stats;
    let distance = view.distance;

    intent.target_rotation = view.bearing;

    let total_dry = me.total_ammo() == 0;
    let desired = sliders.desired_range(view);
    let move_speed = stats.mobility / 1000.0 * 2.0;
    let can_boost = me.energy_fraction() >= sliders.energy_save / 100.0 * 0.8;
    let stability_critical = me.stability_fraction() < CRITICAL_STABILITY;

    let mut movement = MovementState::Idle;
    let mut advance = distance > desired + 100.0;
    let mut retreat = distance < desired - 50.0;
    let mut strafe = false;
    let mut boost = false;

    if opponent.is_staggered {
        movement = MovementState::Executing;
        advance = true;
        retreat = false;
        boost = can_boost;
    } else if stability_critical && !total_dry {
        movement = MovementState::Stabilizing;
        retreat = true;
        advance = false;
        strafe = sliders.mobility > 50.0;
    } else if !view.has_los && sliders.aggression > 50.0 {
        movement = MovementState::Hunting;
        advance = true;
    } else if rng.next() < sliders.mobility / 1000.0 {
        strafe = true;
    }

    // Nothing left to shoot: close the distance and stay on it
    if total_dry {
        movement = MovementState::Ramming;
        advance = true;
        retreat = false;
        strafe = false;
        boost = can_boost && distance > 50.0;
    }

    let forward = heading(me.rotation) * move_speed;
    if advance {
        intent.impulse += forward;
        boost |= can_boost;
    } else if retreat {
        intent.impulse -= forward;
        boost |= can_boost;
    }

    if strafe {
        movement = MovementState::Strafing;
        let side = if rng.next() > 0.5 { 1.0 } else { -1.0 };
        let angle = me.rotation + std::f32::consts::FRAC_PI_2 * side;
        intent.impulse += heading(angle) * move_speed * STRAFE_MULTIPLIER;
    }

    intent.boost = boost;
    intent.movement = movement;

    if movement != MovementState::Idle && rng.next() < 0.005 {
        events.push(BattleEvent::AiDecision {
            source: me.side,
            message: format!("{} PROTOCOL", movement.as_str()),
        });
    }

    choose_fire(view, sliders, stability_critical, intent, rng);
}

/// Per-mount firing decisions
fn choose_fire(
    view: &Perception<'_>,
    sliders: &Sliders,
    stability_critical: bool,
    intent: &mut Intent,
    rng: &mut BattleRng,
) {
    let me = view.me;
    let loadout = view.loadout;
    let distance = view.distance;

    let alignment = shortest_angle(view.bearing, me.rotation).abs();
    let aligned = alignment < 0.5 - sliders.focus / 200.0;
    let in_range = distance < loadout.stats.scan_range;
    let force_fire = view.opponent.is_staggered && view.has_los;

    intent.cease_fire();
    if !(aligned && view.has_los && in_range) && !force_fire {
        return;
    }

    let loaded = |slot: MountSlot| me.mount(slot).ammo > 0;

    let right = loadout.weapon(MountSlot::RightArm);
    let fire_right =
        loaded(MountSlot::RightArm) && (!right.is_short_range() || distance < SHORT_WEAPON_REACH);
    intent.set_fire(MountSlot::RightArm, fire_right);

    let fire_left = loaded(MountSlot::LeftArm)
        && match loadout.weapon(MountSlot::LeftArm).kind {
            WeaponKind::Shield => {
                rng.next() < sliders.caution / 100.0 || stability_critical
            }
            kind if kind.is_melee() => distance < MELEE_REACH || view.opponent.is_staggered,
            _ => true,
        };
    intent.set_fire(MountSlot::LeftArm, fire_left);

    let backs_unlocked =
        force_fire || (sliders.aggression > 40.0 && me.energy > me.max_energy * 0.4);
    if backs_unlocked {
        for slot in [MountSlot::LeftBack, MountSlot::RightBack] {
            intent.set_fire(slot, loaded(slot));
        }
    }
}
