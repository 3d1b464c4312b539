//! Combatant controllers
//!
//! A controller reads the battle from one combatant's point of view and
//! returns an `Intent` for the tick. It never mutates engine state directly.
//!
//! Two strategies:
//! - `tree`: behavior tree compiled from the loadout's node list
//! - `sliders`: continuous heuristic driven by five personality sliders
//!
//! The strategy is resolved once per battle by `Controller::from_config`.

pub mod presets;
pub mod sliders;
pub mod tree;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::loadout::{Loadout, MountSlot};
use crate::sim::arena::{Obstacle, line_of_sight};
use crate::sim::geometry::{bearing, distance};
use crate::sim::rng::BattleRng;
use crate::sim::state::{BattleEvent, CombatantState, MovementState};

pub use sliders::Sliders;
pub use tree::{BehaviorTree, NodeSpec};

/// AI payload carried by a loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AiConfig {
    Sliders {
        #[serde(default)]
        sliders: Sliders,
    },
    Tree {
        #[serde(default)]
        nodes: Vec<NodeSpec>,
        /// Used whenever the tree makes no decision
        #[serde(default)]
        sliders: Sliders,
    },
    /// Named preset; `sliders` apply if the id is unknown
    Preset {
        id: String,
        #[serde(default)]
        sliders: Sliders,
    },
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::Sliders {
            sliders: Sliders::default(),
        }
    }
}

/// What a controller wants its combatant to do this tick
#[derive(Debug, Clone, PartialEq)]
pub struct Intent {
    pub target_rotation: f32,
    /// Added to velocity before physics integration
    pub impulse: Vec2,
    pub boost: bool,
    /// Indexed by `MountSlot::index`
    pub fire: [bool; 4],
    pub movement: MovementState,
}

impl Intent {
    /// No movement, no firing, facing `rotation`
    pub fn hold(rotation: f32) -> Self {
        Self {
            target_rotation: rotation,
            impulse: Vec2::ZERO,
            boost: false,
            fire: [false; 4],
            movement: MovementState::Idle,
        }
    }

    /// Neutral intent for a combatant that cannot act
    pub fn disabled(rotation: f32) -> Self {
        Self {
            movement: MovementState::Disabled,
            ..Self::hold(rotation)
        }
    }

    #[inline]
    pub fn set_fire(&mut self, slot: MountSlot, on: bool) {
        self.fire[slot.index()] = on;
    }

    #[inline]
    pub fn fires(&self, slot: MountSlot) -> bool {
        self.fire[slot.index()]
    }

    pub fn cease_fire(&mut self) {
        self.fire = [false; 4];
    }

    pub fn fires_any(&self) -> bool {
        self.fire.iter().any(|f| *f)
    }
}

/// One combatant's view of the battle for a single decision
pub struct Perception<'a> {
    pub me: &'a CombatantState,
    pub loadout: &'a Loadout,
    pub opponent: &'a CombatantState,
    pub obstacles: &'a [Obstacle],
    pub tick: u32,
    /// Distance to the opponent
    pub distance: f32,
    /// Bearing to the opponent
    pub bearing: f32,
    pub has_los: bool,
}

impl<'a> Perception<'a> {
    pub fn new(
        me: &'a CombatantState,
        loadout: &'a Loadout,
        opponent: &'a CombatantState,
        obstacles: &'a [Obstacle],
        tick: u32,
    ) -> Self {
        Self {
            me,
            loadout,
            opponent,
            obstacles,
            tick,
            distance: distance(me.position, opponent.position),
            bearing: bearing(me.position, opponent.position),
            has_los: line_of_sight(me.position, opponent.position, obstacles),
        }
    }
}

#[derive(Debug, Clone)]
enum Strategy {
    Sliders(Sliders),
    Tree {
        tree: BehaviorTree,
        fallback: Sliders,
    },
}

/// Per-combatant decision maker, fixed for the whole battle
#[derive(Debug, Clone)]
pub struct Controller {
    strategy: Strategy,
}

impl Controller {
    /// Resolve presets and compile trees once
    pub fn from_config(config: &AiConfig) -> Self {
        let resolved = match config {
            AiConfig::Preset { id, sliders } => match presets::lookup(id) {
                Some(preset) => preset,
                None => {
                    log::warn!("Unknown AI preset {:?}, using loadout sliders", id);
                    AiConfig::Sliders { sliders: *sliders }
                }
            },
            other => other.clone(),
        };

        let strategy = match resolved {
            AiConfig::Sliders { sliders } => Strategy::Sliders(sliders.clamped()),
            AiConfig::Tree { nodes, sliders } => match BehaviorTree::compile(&nodes) {
                Some(tree) => Strategy::Tree {
                    tree,
                    fallback: sliders.clamped(),
                },
                None => {
                    log::warn!("Behavior tree has no root node, using sliders");
                    Strategy::Sliders(sliders.clamped())
                }
            },
            // Presets never nest
            AiConfig::Preset { sliders, .. } => Strategy::Sliders(sliders.clamped()),
        };

        Self { strategy }
    }

    pub fn uses_tree(&self) -> bool {
        matches!(self.strategy, Strategy::Tree { .. })
    }

    /// Decide this tick's intent
    ///
    /// Callers skip this entirely for staggered combatants.
    pub fn decide(
        &self,
        view: &Perception<'_>,
        rng: &mut BattleRng,
        events: &mut Vec<BattleEvent>,
    ) -> Intent {
        let me = view.me;

        // Overheated: no decisions until heat falls below the hysteresis band
        if me.is_overheated {
            if rng.next() < 0.01 {
                events.push(BattleEvent::AiDecision {
                    source: me.side,
                    message: "SYSTEM OVERHEAT - COOLING".to_string(),
                });
            }
            return Intent::disabled(view.bearing);
        }

        let mut intent = Intent::hold(me.target_rotation);
        match &self.strategy {
            Strategy::Sliders(sliders) => {
                sliders::drive(view, sliders, &mut intent, rng, events);
            }
            Strategy::Tree { tree, fallback } => {
                if tree.evaluate(view, &mut intent, rng, events) {
                    intent.movement = MovementState::Scripted;
                } else {
                    // A failed tree keeps whatever its actions already set
                    sliders::drive(view, fallback, &mut intent, rng, events);
                }
            }
        }
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Side;

    fn duel() -> (Loadout, CombatantState, CombatantState) {
        let loadout = Loadout::starter();
        let me = CombatantState::new(Side::Player, &loadout, Vec2::new(300.0, 300.0), 0.0);
        let opp = CombatantState::new(
            Side::Enemy,
            &loadout,
            Vec2::new(500.0, 300.0),
            std::f32::consts::PI,
        );
        (loadout, me, opp)
    }

    #[test]
    fn test_overheated_holds_fire_and_faces_opponent() {
        let (loadout, mut me, mut opp) = duel();
        me.is_overheated = true;
        me.target_rotation = 2.0;
        opp.position = Vec2::new(300.0, 500.0);
        let view = Perception::new(&me, &loadout, &opp, &[], 0);
        let controller = Controller::from_config(&loadout.ai);

        let intent = controller.decide(&view, &mut BattleRng::new(1), &mut Vec::new());
        assert!(!intent.fires_any());
        assert!(!intent.boost);
        assert_eq!(intent.impulse, Vec2::ZERO);
        assert_eq!(intent.movement, MovementState::Disabled);
        assert!((intent.target_rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_unknown_preset_uses_own_sliders() {
        let config = AiConfig::Preset {
            id: "chip_missing".to_string(),
            sliders: Sliders::default(),
        };
        assert!(!Controller::from_config(&config).uses_tree());
    }

    #[test]
    fn test_rootless_tree_falls_back() {
        let config = AiConfig::Tree {
            nodes: vec![NodeSpec::action("a1", "Fire", "attack_right")],
            sliders: Sliders::default(),
        };
        assert!(!Controller::from_config(&config).uses_tree());
    }

    #[test]
    fn test_failed_tree_runs_sliders_on_same_intent() {
        let config = AiConfig::Tree {
            nodes: vec![
                NodeSpec::root("root", &["seq"]),
                NodeSpec::sequence("seq", &["a_move", "c_fail"]),
                NodeSpec::action("a_move", "Advance", "move_forward"),
                NodeSpec::condition("c_fail", "Never", "range_less", "0"),
            ],
            sliders: Sliders::new(50.0, 50.0, 0.0, 50.0, 50.0),
        };
        let controller = Controller::from_config(&config);
        assert!(controller.uses_tree());

        let (loadout, mut me, mut opp) = duel();
        me.target_rotation = 2.0;
        opp.is_staggered = true;
        let view = Perception::new(&me, &loadout, &opp, &[], 0);
        let intent = controller.decide(&view, &mut BattleRng::new(5), &mut Vec::new());

        assert_eq!(intent.movement, MovementState::Executing);
        assert!(intent.target_rotation.abs() < 1e-5);
        // Half a step from the tree plus the sliders' full advance
        assert!((intent.impulse.x - 1.5).abs() < 1e-4);
        assert!(intent.impulse.y.abs() < 1e-4);
    }

    #[test]
    fn test_tree_preset_resolves_to_tree() {
        let config = AiConfig::Preset {
            id: "tree_starter".to_string(),
            sliders: Sliders::default(),
        };
        assert!(Controller::from_config(&config).uses_tree());
    }

    #[test]
    fn test_config_json_modes() {
        let json = r#"{ "mode": "SLIDERS", "sliders": { "aggression": 90 } }"#;
        let config: AiConfig = serde_json::from_str(json).expect("valid sliders config");
        match config {
            AiConfig::Sliders { sliders } => {
                assert_eq!(sliders.aggression, 90.0);
                assert_eq!(sliders.caution, 50.0);
            }
            other => panic!("unexpected config {:?}", other),
        }

        let json = r#"{ "mode": "PRESET", "id": "chip_sniper" }"#;
        let config: AiConfig = serde_json::from_str(json).expect("valid preset config");
        assert!(matches!(config, AiConfig::Preset { .. }));
    }
}
