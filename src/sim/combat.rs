//! Weapon discharge and damage resolution
//!
//! Each weapon archetype maps to a `WeaponProfile` (cooldown, heat, impact
//! and delivery). Discharging always pays energy, heat and one round of ammo,
//! then delivers by projectile, melee strike or shield window.

use glam::Vec2;

use super::geometry::{bearing, distance, heading, shortest_angle};
use super::rng::BattleRng;
use super::state::{BattleEvent, CombatantState, Projectile};
use crate::loadout::{Loadout, MountSlot, WeaponKind, WeaponSpec};
use crate::tuning::Tuning;

/// Heat added by a discharge unless the archetype overrides it
const BASE_HEAT: f32 = 150.0;
/// Spread range for regular projectiles (radians, total width)
const BASE_SPREAD: f32 = 0.2;
const MACHINE_GUN_SPREAD: f32 = 0.35;

const MISSILE_LAUNCH_SPEED: f32 = 5.0;
const MISSILE_GUIDANCE: f32 = 0.15;

/// Melee strikes only land inside this facing tolerance
const MELEE_ARC: f32 = 0.8;
const BLADE_REACH: f32 = 80.0;
const PILE_BUNKER_REACH: f32 = 40.0;

/// How a discharge reaches the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Delivery {
    Ballistic { speed: f32, max_spread: f32 },
    Guided { launch_speed: f32, guidance: f32 },
    Melee { reach: f32, arc: f32 },
    /// Opens a shield window on the shooter
    Barrier { duration: u32 },
}

/// Resolved firing characteristics of one weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    /// Ticks before the mount can fire again
    pub cooldown: u32,
    pub heat: f32,
    /// Stability damage dealt on hit
    pub impact: f32,
    pub delivery: Delivery,
}

impl WeaponProfile {
    /// Profile for a mounted weapon, `None` if it can never discharge
    pub fn of(spec: &WeaponSpec, tuning: &Tuning) -> Option<Self> {
        let dmg = spec.damage;
        // Fractional cooldowns round up: the mount is ready once the count hits zero
        let default_cooldown = (60.0 - dmg / 100.0).max(10.0).ceil() as u32;
        let default_speed = 10.0 + dmg / 500.0;
        let ballistic = |speed: f32| Delivery::Ballistic {
            speed,
            max_spread: BASE_SPREAD,
        };

        let profile = match spec.kind {
            WeaponKind::Rifle if spec.is_long_range() => Self {
                cooldown: 100,
                heat: 350.0,
                impact: dmg * 0.8,
                delivery: ballistic(25.0),
            },
            WeaponKind::Rifle => Self {
                cooldown: default_cooldown,
                heat: BASE_HEAT,
                impact: dmg * 0.5,
                delivery: ballistic(default_speed),
            },
            WeaponKind::MachineGun => Self {
                cooldown: 6,
                heat: 40.0,
                impact: dmg * 0.2,
                delivery: Delivery::Ballistic {
                    speed: 15.0,
                    max_spread: MACHINE_GUN_SPREAD,
                },
            },
            WeaponKind::Bazooka => Self {
                cooldown: 120,
                heat: 400.0,
                impact: dmg * 1.5,
                delivery: ballistic(12.0),
            },
            WeaponKind::Cannon => Self {
                cooldown: 150,
                heat: 600.0,
                impact: dmg * 1.2,
                delivery: ballistic(20.0),
            },
            WeaponKind::Missile => Self {
                cooldown: default_cooldown,
                heat: 250.0,
                impact: dmg,
                delivery: Delivery::Guided {
                    launch_speed: MISSILE_LAUNCH_SPEED,
                    guidance: MISSILE_GUIDANCE,
                },
            },
            WeaponKind::Blade => Self {
                cooldown: default_cooldown,
                heat: 100.0,
                impact: dmg,
                delivery: Delivery::Melee {
                    reach: BLADE_REACH,
                    arc: MELEE_ARC,
                },
            },
            WeaponKind::PileBunker => Self {
                cooldown: default_cooldown,
                heat: 100.0,
                impact: dmg * 2.0,
                delivery: Delivery::Melee {
                    reach: PILE_BUNKER_REACH,
                    arc: MELEE_ARC,
                },
            },
            WeaponKind::Shield => Self {
                cooldown: tuning.shield_cooldown,
                heat: BASE_HEAT,
                impact: 0.0,
                delivery: Delivery::Barrier {
                    duration: tuning.shield_ticks,
                },
            },
            WeaponKind::Radar | WeaponKind::Empty => return None,
        };
        Some(profile)
    }
}

/// Shared mutable battle resources a discharge may touch
pub struct CombatContext<'a> {
    pub tuning: &'a Tuning,
    pub rng: &'a mut BattleRng,
    pub events: &'a mut Vec<BattleEvent>,
    pub projectiles: &'a mut Vec<Projectile>,
    pub next_projectile_id: &'a mut u32,
}

/// Angular error for a projectile given the build's precision
///
/// Precision 50 or below uses the full spread; 200 and above fires true.
pub fn spread(rng: &mut BattleRng, max_spread: f32, precision: f32) -> f32 {
    let accuracy = ((precision - 50.0) / 150.0).clamp(0.0, 1.0);
    (rng.next() - 0.5) * max_spread * (1.0 - accuracy)
}

/// Discharge the weapon in `slot`
///
/// The caller has already checked the fire intent, cooldown and ammo.
pub fn fire_weapon(
    shooter: &mut CombatantState,
    loadout: &Loadout,
    slot: MountSlot,
    target: &mut CombatantState,
    target_defense: f32,
    ctx: &mut CombatContext<'_>,
) {
    let spec = loadout.weapon(slot);
    let Some(profile) = WeaponProfile::of(spec, ctx.tuning) else {
        return;
    };

    shooter.drain_energy(spec.energy_cost);
    shooter.heat += profile.heat;
    let mount = shooter.mount_mut(slot);
    mount.cooldown = profile.cooldown;
    mount.ammo = mount.ammo.saturating_sub(1);

    ctx.events.push(BattleEvent::Fire {
        source: shooter.side,
        slot,
    });

    let (speed, max_spread, guidance) = match profile.delivery {
        Delivery::Barrier { duration } => {
            shooter.shield_time = duration;
            return;
        }
        Delivery::Melee { reach, arc } => {
            let d = distance(shooter.position, target.position);
            let facing_error =
                shortest_angle(bearing(shooter.position, target.position), shooter.rotation).abs();
            if d < reach && facing_error < arc {
                ctx.events.push(BattleEvent::MeleeHit {
                    source: shooter.side,
                    target: target.side,
                    damage: spec.damage,
                    location: target.position,
                });
                apply_damage(
                    target,
                    target_defense,
                    spec.damage,
                    profile.impact,
                    ctx.tuning,
                    ctx.events,
                );
            }
            return;
        }
        Delivery::Ballistic { speed, max_spread } => (speed, max_spread, 0.0),
        Delivery::Guided {
            launch_speed,
            guidance,
        } => (launch_speed, BASE_SPREAD, guidance),
    };

    let error = spread(ctx.rng, max_spread, loadout.stats.effective_precision());
    let id = *ctx.next_projectile_id;
    *ctx.next_projectile_id += 1;
    ctx.projectiles.push(Projectile {
        id,
        owner: shooter.side,
        position: shooter.position,
        velocity: heading(shooter.rotation + error) * speed,
        damage: spec.damage,
        impact: profile.impact,
        kind: spec.kind,
        guidance,
        target: target.side,
    });
}

/// Resolve incoming damage against `target`, returning hp actually removed
///
/// Shield mitigation, stagger vulnerability, then flat defense reduction
/// (never below 1). Stability only erodes while the target is still standing
/// and not already staggered.
pub fn apply_damage(
    target: &mut CombatantState,
    defense: f32,
    damage: f32,
    impact: f32,
    tuning: &Tuning,
    events: &mut Vec<BattleEvent>,
) -> f32 {
    let mut dealt = damage;
    let mut impact = impact;

    if target.is_shielded {
        dealt *= tuning.shield_damage_factor;
        impact *= tuning.shield_impact_factor;
        target.drain_energy(damage * tuning.shield_energy_per_damage);
        events.push(BattleEvent::ShieldBlock {
            target: target.side,
            location: target.position,
        });
    }

    if target.is_staggered {
        dealt *= tuning.stagger_damage_factor;
    }

    dealt = (dealt - defense / tuning.defense_divisor).max(1.0);
    let before = target.hp;
    target.hp -= dealt;
    if target.hp <= 0.0 {
        target.hp = 0.0;
        log::debug!("{} destroyed at {}", target.side.as_str(), target.position);
        events.push(BattleEvent::Destroyed {
            target: target.side,
            location: target.position,
        });
    }

    if !target.is_staggered && target.is_alive() {
        target.stability -= impact;
        if target.stability <= 0.0 {
            stagger(target, tuning);
            events.push(BattleEvent::StaggerBreak {
                target: target.side,
                location: target.position,
            });
        }
    }

    before - target.hp
}

/// Break stability: the unit freezes for the stagger window
fn stagger(target: &mut CombatantState, tuning: &Tuning) {
    target.stability = 0.0;
    target.is_staggered = true;
    target.stagger_timer = tuning.stagger_ticks;
    target.clear_intents();
    log::debug!("{} staggered", target.side.as_str());
}

/// Whether a projectile at `pos` is close enough to strike `target`
#[inline]
pub fn projectile_hits(pos: Vec2, target: &CombatantState) -> bool {
    distance(pos, target.position) < crate::consts::PROJECTILE_HIT_RADIUS
}
