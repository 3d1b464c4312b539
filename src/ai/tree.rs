//! Behavior tree controller
//!
//! Trees arrive as a flat list of `NodeSpec`s that reference children by id.
//! `BehaviorTree::compile` resolves ids to indices once so evaluation never
//! touches strings. Child links that lead back onto the path from the root
//! are cut at compile time. Evaluation still stops past `MAX_DEPTH` or after
//! `MAX_VISITS` nodes and treats the rest of the walk as failed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Intent, Perception};
use crate::loadout::MountSlot;
use crate::sim::arena::nearest_obstacle;
use crate::sim::geometry::{bearing, distance, heading};
use crate::sim::rng::BattleRng;
use crate::sim::state::BattleEvent;

/// Deepest node evaluated below the root
pub const MAX_DEPTH: usize = 32;
/// Node visits allowed per evaluation; the rest of the walk fails
pub const MAX_VISITS: usize = 1024;

/// Obstacles within this distance count as available cover
const COVER_RADIUS: f32 = 150.0;
/// How far past the obstacle center `take_cover` aims
const COVER_OFFSET: f32 = 120.0;

const STEP_IMPULSE: f32 = 0.5;
const DASH_IMPULSE: f32 = 1.0;
const COVER_IMPULSE: f32 = 0.8;

/// Chance a successful action is announced
const EXEC_NOTE_CHANCE: f32 = 0.02;

/// Parameters attached to condition and action nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub condition: Option<String>,
    /// Numeric threshold, kept as text
    pub param: Option<String>,
    pub action: Option<String>,
}

/// One node as authored in a loadout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    /// ROOT, SELECTOR, SEQUENCE, CONDITION or ACTION
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub children: Vec<String>,
    #[serde(default)]
    pub config: NodeConfig,
}

impl NodeSpec {
    fn composite(id: &str, kind: &str, children: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            kind: kind.to_string(),
            label: kind.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
            config: NodeConfig::default(),
        }
    }

    pub fn root(id: &str, children: &[&str]) -> Self {
        Self::composite(id, "ROOT", children)
    }

    pub fn selector(id: &str, children: &[&str]) -> Self {
        Self::composite(id, "SELECTOR", children)
    }

    pub fn sequence(id: &str, children: &[&str]) -> Self {
        Self::composite(id, "SEQUENCE", children)
    }

    pub fn condition(id: &str, label: &str, condition: &str, param: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "CONDITION".to_string(),
            label: label.to_string(),
            children: Vec::new(),
            config: NodeConfig {
                condition: Some(condition.to_string()),
                param: Some(param.to_string()),
                action: None,
            },
        }
    }

    pub fn action(id: &str, label: &str, action: &str) -> Self {
        Self {
            id: id.to_string(),
            kind: "ACTION".to_string(),
            label: label.to_string(),
            children: Vec::new(),
            config: NodeConfig {
                condition: None,
                param: None,
                action: Some(action.to_string()),
            },
        }
    }
}

/// Leaf predicates; thresholds are percentages unless noted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Distance below threshold (px)
    RangeLess(f32),
    /// Distance above threshold (px)
    RangeMore(f32),
    HpLess(f32),
    HpMore(f32),
    EnergyLess(f32),
    StabilityLess(f32),
    EnemyStaggered,
    AmmoLess(f32),
    /// Battle time above threshold (seconds)
    TimeElapsed(f32),
    Visible,
    CoverAvailable,
    EnemyCount,
    /// Unrecognized name, never satisfied
    Never,
}

impl Condition {
    pub fn parse(name: &str, param: Option<&str>) -> Self {
        let p = param.and_then(|s| s.trim().parse::<f32>().ok()).unwrap_or(0.0);
        match name {
            "range_less" => Condition::RangeLess(p),
            "range_more" => Condition::RangeMore(p),
            "hp_less" => Condition::HpLess(p),
            "hp_more" => Condition::HpMore(p),
            "energy_less" => Condition::EnergyLess(p),
            "stability_less" => Condition::StabilityLess(p),
            "enemy_staggered" => Condition::EnemyStaggered,
            "ammo_less" => Condition::AmmoLess(p),
            "time_elapsed" => Condition::TimeElapsed(p),
            "visible" => Condition::Visible,
            "cover_available" => Condition::CoverAvailable,
            "enemy_count" => Condition::EnemyCount,
            other => {
                log::warn!("Unknown tree condition {:?}, treating as false", other);
                Condition::Never
            }
        }
    }

    pub fn check(&self, view: &Perception<'_>) -> bool {
        let me = view.me;
        match *self {
            Condition::RangeLess(p) => view.distance < p,
            Condition::RangeMore(p) => view.distance > p,
            Condition::HpLess(p) => me.hp_fraction() * 100.0 < p,
            Condition::HpMore(p) => me.hp_fraction() * 100.0 > p,
            Condition::EnergyLess(p) => me.energy_fraction() * 100.0 < p,
            Condition::StabilityLess(p) => me.stability_fraction() * 100.0 < p,
            Condition::EnemyStaggered => view.opponent.is_staggered,
            Condition::AmmoLess(p) => {
                let max = me.total_max_ammo();
                max == 0 || (me.total_ammo() as f32 / max as f32) * 100.0 < p
            }
            Condition::TimeElapsed(p) => view.tick as f32 / crate::consts::TICKS_PER_SECOND > p,
            Condition::Visible => view.has_los,
            Condition::CoverAvailable => view
                .obstacles
                .iter()
                .any(|obs| distance(me.position, obs.center()) < COVER_RADIUS),
            Condition::EnemyCount => true,
            Condition::Never => false,
        }
    }
}

/// Leaf behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AttackRight,
    AttackLeft,
    FireAll,
    MoveForward,
    Retreat,
    StrafeLeft,
    StrafeRight,
    BoostDash,
    TakeCover,
    /// Unrecognized name, succeeds without doing anything
    Idle,
}

impl Action {
    pub fn parse(name: &str) -> Self {
        match name {
            "attack_right" => Action::AttackRight,
            "attack_left" => Action::AttackLeft,
            "fire_all" => Action::FireAll,
            "move_forward" => Action::MoveForward,
            "retreat" => Action::Retreat,
            "strafe_left" => Action::StrafeLeft,
            "strafe_right" => Action::StrafeRight,
            "boost_dash" => Action::BoostDash,
            "take_cover" => Action::TakeCover,
            other => {
                log::warn!("Unknown tree action {:?}, treating as no-op", other);
                Action::Idle
            }
        }
    }

    /// Apply to `intent`, returning whether the action succeeded
    pub fn execute(&self, view: &Perception<'_>, intent: &mut Intent) -> bool {
        use std::f32::consts::FRAC_PI_2;

        let angle = view.bearing;
        intent.target_rotation = angle;

        let step = |dir: f32, impulse: f32, intent: &mut Intent| {
            intent.impulse += heading(dir) * impulse;
            intent.boost = true;
        };

        match self {
            Action::AttackRight => {
                if view.has_los {
                    intent.set_fire(MountSlot::RightArm, true);
                }
            }
            Action::AttackLeft => {
                if view.has_los {
                    intent.set_fire(MountSlot::LeftArm, true);
                }
            }
            Action::FireAll => {
                if view.has_los {
                    intent.fire = [true; 4];
                }
            }
            Action::MoveForward => step(angle, STEP_IMPULSE, intent),
            Action::Retreat => step(angle, -STEP_IMPULSE, intent),
            Action::StrafeLeft => step(angle - FRAC_PI_2, STEP_IMPULSE, intent),
            Action::StrafeRight => step(angle + FRAC_PI_2, STEP_IMPULSE, intent),
            Action::BoostDash => step(view.me.rotation, DASH_IMPULSE, intent),
            Action::TakeCover => {
                let Some(cover) = nearest_obstacle(view.me.position, view.obstacles) else {
                    return false;
                };
                let center = cover.center();
                let away = bearing(view.opponent.position, center);
                let destination = center + heading(away) * COVER_OFFSET;
                let toward = bearing(view.me.position, destination);
                step(toward, COVER_IMPULSE, intent);
                intent.target_rotation = toward;
            }
            Action::Idle => {}
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    /// OR over children; also used for ROOT
    Selector,
    /// AND over children
    Sequence,
    Condition(Condition),
    Action(Action),
    /// Unrecognized node type, always fails
    Invalid,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    label: String,
    children: Vec<usize>,
}

/// Compiled tree: nodes in authoring order, children as indices
#[derive(Debug, Clone)]
pub struct BehaviorTree {
    nodes: Vec<Node>,
    root: usize,
}

impl BehaviorTree {
    /// Compile authored nodes; `None` when there is no ROOT node
    ///
    /// The first ROOT wins and the first node with a given id wins. Child ids
    /// that name no node are dropped, as are links that close a cycle.
    pub fn compile(specs: &[NodeSpec]) -> Option<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
        for (i, spec) in specs.iter().enumerate() {
            index.entry(spec.id.as_str()).or_insert(i);
        }

        let root = specs.iter().position(|s| s.kind == "ROOT")?;

        let mut nodes: Vec<Node> = specs
            .iter()
            .map(|spec| {
                let kind = match spec.kind.as_str() {
                    "ROOT" | "SELECTOR" => NodeKind::Selector,
                    "SEQUENCE" => NodeKind::Sequence,
                    "CONDITION" => NodeKind::Condition(Condition::parse(
                        spec.config.condition.as_deref().unwrap_or_default(),
                        spec.config.param.as_deref(),
                    )),
                    "ACTION" => match spec.config.action.as_deref() {
                        Some(name) => NodeKind::Action(Action::parse(name)),
                        None => NodeKind::Action(Action::Idle),
                    },
                    other => {
                        log::warn!("Unknown tree node type {:?} on {:?}", other, spec.id);
                        NodeKind::Invalid
                    }
                };
                let children = spec
                    .children
                    .iter()
                    .filter_map(|child| index.get(child.as_str()).copied())
                    .collect();
                Node {
                    kind,
                    label: spec.label.clone(),
                    children,
                }
            })
            .collect();

        let (cut, reached) = break_cycles(&mut nodes, root);
        if cut > 0 {
            log::warn!("Behavior tree has cycles, dropped {} child links", cut);
        }
        if reached < nodes.len() {
            log::warn!(
                "Behavior tree has {} nodes unreachable from the root",
                nodes.len() - reached
            );
        }

        Some(Self { nodes, root })
    }

    /// Evaluate from the root, writing decisions into `intent`
    pub fn evaluate(
        &self,
        view: &Perception<'_>,
        intent: &mut Intent,
        rng: &mut BattleRng,
        events: &mut Vec<BattleEvent>,
    ) -> bool {
        let mut walk = Walk {
            view,
            intent,
            rng,
            events,
            visits: 0,
        };
        self.eval(self.root, 0, &mut walk)
    }

    fn eval(&self, idx: usize, depth: usize, walk: &mut Walk<'_, '_>) -> bool {
        if depth > MAX_DEPTH || walk.visits >= MAX_VISITS {
            return false;
        }
        walk.visits += 1;

        let node = &self.nodes[idx];
        match &node.kind {
            NodeKind::Selector => node
                .children
                .iter()
                .any(|&child| self.eval(child, depth + 1, walk)),
            NodeKind::Sequence => node
                .children
                .iter()
                .all(|&child| self.eval(child, depth + 1, walk)),
            NodeKind::Condition(condition) => condition.check(walk.view),
            NodeKind::Action(action) => {
                let ok = action.execute(walk.view, walk.intent);
                if ok && walk.rng.next() < EXEC_NOTE_CHANCE {
                    walk.events.push(BattleEvent::AiDecision {
                        source: walk.view.me.side,
                        message: format!("EXEC: {}", node.label),
                    });
                }
                ok
            }
            NodeKind::Invalid => false,
        }
    }
}

/// Mutable state threaded through one evaluation
struct Walk<'a, 'v> {
    view: &'a Perception<'v>,
    intent: &'a mut Intent,
    rng: &'a mut BattleRng,
    events: &'a mut Vec<BattleEvent>,
    visits: usize,
}

/// Depth-first walk from `root` that removes every child link pointing at a
/// node already on the current path
///
/// Returns the number of links removed and the number of nodes reached.
fn break_cycles(nodes: &mut [Node], root: usize) -> (usize, usize) {
    let mut on_path = vec![false; nodes.len()];
    let mut seen = vec![false; nodes.len()];
    let mut stack = vec![(root, 0usize)];
    on_path[root] = true;
    seen[root] = true;
    let mut cut = 0;

    while let Some(top) = stack.last_mut() {
        let (idx, pos) = *top;
        let Some(&child) = nodes[idx].children.get(pos) else {
            on_path[idx] = false;
            stack.pop();
            continue;
        };
        if on_path[child] {
            nodes[idx].children.remove(pos);
            cut += 1;
            continue;
        }
        top.1 += 1;
        if !seen[child] {
            seen[child] = true;
            on_path[child] = true;
            stack.push((child, 0));
        }
    }

    (cut, seen.iter().filter(|s| **s).count())
}
