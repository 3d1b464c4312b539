//! Fixed timestep battle engine
//!
//! One engine runs one battle. Each tick follows the same order:
//! status decay, controller decisions (player first), physics, combat,
//! projectiles, resources, snapshot. Nothing else may touch the RNG.

use glam::Vec2;

use super::arena::{ArenaType, Obstacle};
use super::combat::{CombatContext, apply_damage, fire_weapon, projectile_hits};
use super::geometry::{
    bearing, heading, point_in_expanded_rect, segment_intersects_rect, shortest_angle, sign,
    turn_toward,
};
use super::rng::{BattleRng, system_seed};
use super::state::{
    BattleEvent, BattleFrame, BattleResult, CombatantState, MovementState, Projectile, Side,
    WinCondition,
};
use crate::ai::{Controller, Intent, Perception};
use crate::consts::*;
use crate::loadout::{Loadout, LoadoutStats, MountSlot};
use crate::normalize_angle;
use crate::options::BattleOptions;
use crate::tuning::{SpawnPose, Tuning};

/// Energy burned per boosted tick before the weight term
const BOOST_ENERGY_BASE: f32 = 5.0;
const BOOST_HEAT: f32 = 8.0;
/// Heat capacity fraction below which an overheat clears
const OVERHEAT_RECOVERY: f32 = 0.6;

/// A combatant: static build, live state and its controller
#[derive(Debug, Clone)]
struct Fighter {
    loadout: Loadout,
    state: CombatantState,
    controller: Controller,
}

impl Fighter {
    fn new(side: Side, loadout: Loadout, pose: SpawnPose) -> Self {
        let pose = Tuning::clamp_spawn(pose);
        let state = CombatantState::new(side, &loadout, pose.position, pose.rotation);
        let controller = Controller::from_config(&loadout.ai);
        Self {
            loadout,
            state,
            controller,
        }
    }
}

/// Deterministic two-combatant battle
pub struct BattleEngine {
    player: Fighter,
    enemy: Fighter,
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
    obstacles: Vec<Obstacle>,
    arena_type: ArenaType,
    rng: BattleRng,
    tuning: Tuning,
    current_tick: u32,
    frames: Vec<BattleFrame>,
}

impl BattleEngine {
    pub fn new(player: Loadout, enemy: Loadout, options: BattleOptions) -> Self {
        let seed = options.seed.unwrap_or_else(system_seed);
        let mut rng = BattleRng::new(seed);
        let tuning = options.tuning;

        let player = Fighter::new(Side::Player, player, tuning.player_spawn);
        let enemy = Fighter::new(Side::Enemy, enemy, tuning.enemy_spawn);

        let arena_type = ArenaType::resolve(options.arena.as_deref(), &mut rng);
        let obstacles = arena_type.layout();

        Self {
            player,
            enemy,
            projectiles: Vec::new(),
            next_projectile_id: 0,
            obstacles,
            arena_type,
            rng,
            frames: Vec::with_capacity(tuning.tick_budget() as usize),
            tuning,
            current_tick: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn arena_type(&self) -> ArenaType {
        self.arena_type
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn current_tick(&self) -> u32 {
        self.current_tick
    }

    pub fn frames(&self) -> &[BattleFrame] {
        &self.frames
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn combatant(&self, side: Side) -> &CombatantState {
        &self.fighter(side).state
    }

    fn fighter(&self, side: Side) -> &Fighter {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    fn fighter_mut(&mut self, side: Side) -> &mut Fighter {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Budget spent or a combatant destroyed
    pub fn is_finished(&self) -> bool {
        self.current_tick >= self.tuning.tick_budget()
            || !self.player.state.is_alive()
            || !self.enemy.state.is_alive()
    }

    /// Run to completion
    pub fn run(mut self) -> BattleResult {
        log::info!(
            "Battle start: {} vs {} in {} (seed {})",
            self.player.loadout.name,
            self.enemy.loadout.name,
            self.arena_type.as_str(),
            self.rng.seed()
        );

        while !self.is_finished() {
            self.tick();
        }

        let (winner, win_condition) = self.outcome();
        log::info!(
            "Battle over after {} ticks: {} wins by {:?}",
            self.current_tick,
            winner.as_str(),
            win_condition
        );

        BattleResult {
            winner,
            win_condition,
            duration: self.current_tick,
            seed: self.rng.seed(),
            arena_type: self.arena_type,
            obstacles: self.obstacles,
            frames: self.frames,
        }
    }

    /// Winner as things stand
    ///
    /// A destroyed player loses even if the enemy fell on the same tick.
    pub fn outcome(&self) -> (Side, WinCondition) {
        let player = &self.player.state;
        let enemy = &self.enemy.state;
        match (player.is_alive(), enemy.is_alive()) {
            (false, false) => (Side::Enemy, WinCondition::MutualDestruction),
            (false, true) => (Side::Enemy, WinCondition::Elimination),
            (true, false) => (Side::Player, WinCondition::Elimination),
            (true, true) => {
                let winner = if player.hp_fraction() >= enemy.hp_fraction() {
                    Side::Player
                } else {
                    Side::Enemy
                };
                (winner, WinCondition::TimeLimit)
            }
        }
    }

    /// Advance one tick and record its frame
    pub fn tick(&mut self) -> &BattleFrame {
        let mut events = Vec::new();

        for fighter in [&mut self.player, &mut self.enemy] {
            update_status(&mut fighter.state, &self.tuning);
        }

        for side in [Side::Player, Side::Enemy] {
            self.decide(side, &mut events);
        }

        for fighter in [&mut self.player, &mut self.enemy] {
            let weight = fighter.loadout.stats.weight;
            update_physics(&mut fighter.state, weight, &self.obstacles, &self.tuning);
        }

        for side in [Side::Player, Side::Enemy] {
            self.update_combat(side, &mut events);
        }

        self.update_projectiles(&mut events);

        for fighter in [&mut self.player, &mut self.enemy] {
            update_resources(&mut fighter.state, &fighter.loadout.stats);
        }

        self.frames.push(BattleFrame {
            tick: self.current_tick,
            player: self.player.state.clone(),
            enemy: self.enemy.state.clone(),
            projectiles: self.projectiles.clone(),
            events,
        });
        self.current_tick += 1;

        &self.frames[self.frames.len() - 1]
    }

    /// Controller step; staggered units get no decision
    fn decide(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        let intent = {
            let (me, opponent) = match side {
                Side::Player => (&self.player, &self.enemy),
                Side::Enemy => (&self.enemy, &self.player),
            };
            if me.state.is_staggered {
                None
            } else {
                let view = Perception::new(
                    &me.state,
                    &me.loadout,
                    &opponent.state,
                    &self.obstacles,
                    self.current_tick,
                );
                Some(me.controller.decide(&view, &mut self.rng, events))
            }
        };

        let state = &mut self.fighter_mut(side).state;
        match intent {
            Some(intent) => apply_intent(state, &intent),
            None => {
                state.clear_intents();
                state.movement = MovementState::Disabled;
            }
        }
    }

    fn update_combat(&mut self, side: Side, events: &mut Vec<BattleEvent>) {
        let (me, opponent) = match side {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        };
        let state = &mut me.state;

        for mount in &mut state.mounts {
            mount.cooldown = mount.cooldown.saturating_sub(1);
        }

        if state.shield_time > 0 {
            state.is_shielded = true;
            state.shield_time -= 1;
        } else {
            state.is_shielded = false;
        }

        if state.energy <= 0.0 || state.is_staggered {
            return;
        }

        let mut ctx = CombatContext {
            tuning: &self.tuning,
            rng: &mut self.rng,
            events,
            projectiles: &mut self.projectiles,
            next_projectile_id: &mut self.next_projectile_id,
        };
        let defense = opponent.loadout.stats.defense;

        for slot in MountSlot::ALL {
            let mount = state.mount(slot);
            if mount.firing && mount.cooldown == 0 && mount.ammo > 0 {
                fire_weapon(state, &me.loadout, slot, &mut opponent.state, defense, &mut ctx);
            }
        }
    }

    /// Move every projectile, newest first
    fn update_projectiles(&mut self, events: &mut Vec<BattleEvent>) {
        let tuning = &self.tuning;
        let mut i = self.projectiles.len();
        while i > 0 {
            i -= 1;
            let p = &mut self.projectiles[i];

            if p.is_guided() {
                let target_pos = match p.target {
                    Side::Player => self.player.state.position,
                    Side::Enemy => self.enemy.state.position,
                };
                let current = p.velocity.y.atan2(p.velocity.x);
                let course = turn_toward(current, bearing(p.position, target_pos), p.guidance);
                let speed = (p.velocity.length() * tuning.missile_acceleration)
                    .min(tuning.missile_max_speed);
                p.velocity = heading(course) * speed;
            }

            let next = p.position + p.velocity;
            let blocked = self
                .obstacles
                .iter()
                .any(|obs| segment_intersects_rect(p.position, next, &obs.rect));
            let outside = next.x < 0.0
                || next.x > ARENA_WIDTH
                || next.y < 0.0
                || next.y > ARENA_HEIGHT;

            if blocked || outside {
                events.push(BattleEvent::WallCollision { location: next });
                self.projectiles.remove(i);
                continue;
            }

            p.position = next;
            let (owner, damage, impact) = (p.owner, p.damage, p.impact);

            let target = match owner.opponent() {
                Side::Player => &mut self.player,
                Side::Enemy => &mut self.enemy,
            };
            if projectile_hits(next, &target.state) {
                events.push(BattleEvent::Hit {
                    source: owner,
                    target: target.state.side,
                    damage,
                    location: next,
                });
                let defense = target.loadout.stats.defense;
                apply_damage(&mut target.state, defense, damage, impact, tuning, events);
                self.projectiles.remove(i);
            }
        }
    }
}

/// Copy a controller decision onto the live state
fn apply_intent(state: &mut CombatantState, intent: &Intent) {
    state.target_rotation = intent.target_rotation;
    state.velocity += intent.impulse;
    state.is_boosting = intent.boost;
    for slot in MountSlot::ALL {
        state.mount_mut(slot).firing = intent.fires(slot);
    }
    state.movement = intent.movement;
}

/// Stagger countdown, or stability regeneration when standing
fn update_status(state: &mut CombatantState, tuning: &Tuning) {
    if state.is_staggered {
        state.stagger_timer = state.stagger_timer.saturating_sub(1);
        if state.stagger_timer == 0 {
            state.is_staggered = false;
            state.stability = state.max_stability;
        }
    } else if state.stability < state.max_stability {
        let recovery = tuning.stability_recovery_ticks.max(1) as f32;
        state.stability =
            (state.stability + state.max_stability / recovery).min(state.max_stability);
    }
}

fn update_physics(
    state: &mut CombatantState,
    weight: f32,
    obstacles: &[Obstacle],
    tuning: &Tuning,
) {
    state.velocity *= tuning.velocity_damping;

    if state.is_boosting && state.energy > 0.0 && !state.is_staggered {
        state.drain_energy(BOOST_ENERGY_BASE + weight / 500.0);
        state.heat += BOOST_HEAT;
    }

    // Moves that would leave the arena bounce instead
    let next = state.position + state.velocity;
    if next.x > 0.0 && next.x < ARENA_WIDTH && next.y > 0.0 && next.y < ARENA_HEIGHT {
        state.position = next;
    } else {
        state.velocity *= tuning.wall_bounce;
    }

    for obs in obstacles {
        if point_in_expanded_rect(state.position, &obs.rect, MECH_RADIUS) {
            let away = state.position - obs.center();
            state.velocity += Vec2::new(sign(away.x), sign(away.y));
        }
    }

    if !state.is_staggered {
        let delta = shortest_angle(state.rotation, state.target_rotation);
        state.rotation = normalize_angle(state.rotation + delta * tuning.turn_rate);
    }
}

/// Energy regeneration, cooling and overheat hysteresis
fn update_resources(state: &mut CombatantState, stats: &LoadoutStats) {
    if state.energy < state.max_energy {
        let regen = (stats.energy_output - stats.energy_drain) / TICKS_PER_SECOND;
        state.energy = (state.energy + regen).clamp(0.0, state.max_energy);
    }

    if state.heat > 0.0 {
        state.heat = (state.heat - stats.cooling / 120.0).max(0.0);
    }

    if !state.is_overheated && state.heat > state.max_heat {
        state.is_overheated = true;
        log::debug!("{} overheated", state.side.as_str());
    } else if state.is_overheated && state.heat < state.max_heat * OVERHEAT_RECOVERY {
        state.is_overheated = false;
    }

    if state.is_overheated {
        for mount in &mut state.mounts {
            mount.firing = false;
        }
    }
}

/// Run a battle to completion
pub fn simulate(player: Loadout, enemy: Loadout, options: BattleOptions) -> BattleResult {
    BattleEngine::new(player, enemy, options).run()
}
