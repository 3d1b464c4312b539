//! Named AI presets ("chips")

use super::tree::NodeSpec;
use super::{AiConfig, Sliders};

/// A named slider personality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chip {
    pub id: &'static str,
    pub name: &'static str,
    pub sliders: Sliders,
}

const fn chip(id: &'static str, name: &'static str, sliders: Sliders) -> Chip {
    Chip { id, name, sliders }
}

/// Slider presets as (aggression, caution, mobility, focus, energy_save)
pub const CHIPS: [Chip; 12] = [
    chip("chip_balanced", "STANDARD", Sliders::new(50.0, 50.0, 50.0, 50.0, 50.0)),
    chip("chip_saver", "ECO MODE", Sliders::new(40.0, 60.0, 40.0, 50.0, 100.0)),
    chip("chip_berserker", "BERSERKER", Sliders::new(100.0, 0.0, 100.0, 80.0, 0.0)),
    chip("chip_brawler", "BRAWLER", Sliders::new(70.0, 30.0, 80.0, 60.0, 40.0)),
    chip("chip_suppression", "SUPPRESSION", Sliders::new(60.0, 40.0, 20.0, 30.0, 40.0)),
    chip("chip_denial", "DENIAL", Sliders::new(40.0, 60.0, 30.0, 70.0, 60.0)),
    chip("chip_sniper", "EAGLE EYE", Sliders::new(0.0, 100.0, 40.0, 100.0, 60.0)),
    chip("chip_skirmisher", "GALE FORCE", Sliders::new(60.0, 70.0, 100.0, 40.0, 30.0)),
    chip("chip_focus", "FOCUS", Sliders::new(80.0, 20.0, 60.0, 100.0, 50.0)),
    chip("chip_turtle", "IRON SHELL", Sliders::new(20.0, 100.0, 20.0, 50.0, 90.0)),
    chip("chip_evasive", "PHANTOM", Sliders::new(30.0, 90.0, 100.0, 50.0, 20.0)),
    chip("chip_glass", "GLASSCANNON", Sliders::new(100.0, 0.0, 80.0, 90.0, 10.0)),
];

/// Id of the stock behavior tree preset
pub const STARTER_TREE: &str = "tree_starter";

/// Default tree: blade at point-blank range, rifle otherwise
pub fn starter_tree() -> Vec<NodeSpec> {
    vec![
        NodeSpec::root("root", &["sel1"]),
        NodeSpec::selector("sel1", &["seq1", "seq2"]),
        NodeSpec::sequence("seq1", &["cond1", "act1"]),
        NodeSpec::condition("cond1", "Enemy Close", "range_less", "50"),
        NodeSpec::action("act1", "Use Blade", "attack_left"),
        NodeSpec::sequence("seq2", &["act2"]),
        NodeSpec::action("act2", "Fire Rifle", "attack_right"),
    ]
}

pub fn chip_by_id(id: &str) -> Option<&'static Chip> {
    CHIPS.iter().find(|c| c.id == id)
}

/// Resolve a preset id to a concrete config
pub fn lookup(id: &str) -> Option<AiConfig> {
    if id == STARTER_TREE {
        return Some(AiConfig::Tree {
            nodes: starter_tree(),
            sliders: Sliders::default(),
        });
    }
    chip_by_id(id).map(|c| {
        log::debug!("AI chip {} ({})", c.name, c.id);
        AiConfig::Sliders { sliders: c.sliders }
    })
}
