//! Arena types and their fixed obstacle layouts

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Rect, distance, segment_intersects_rect};
use super::rng::BattleRng;

/// Arena layout selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArenaType {
    Open,
    Pillars,
    Urban,
    Wasteland,
}

impl ArenaType {
    /// Selection order used when the arena is picked at random
    pub const ALL: [ArenaType; 4] = [
        ArenaType::Open,
        ArenaType::Pillars,
        ArenaType::Urban,
        ArenaType::Wasteland,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArenaType::Open => "OPEN",
            ArenaType::Pillars => "PILLARS",
            ArenaType::Urban => "URBAN",
            ArenaType::Wasteland => "WASTELAND",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(ArenaType::Open),
            "pillars" => Some(ArenaType::Pillars),
            "urban" => Some(ArenaType::Urban),
            "wasteland" => Some(ArenaType::Wasteland),
            _ => None,
        }
    }

    /// Resolve a requested arena, falling back to a seeded random pick
    ///
    /// The RNG is only consumed when the request is absent or unknown.
    pub fn resolve(requested: Option<&str>, rng: &mut BattleRng) -> Self {
        if let Some(arena) = requested.and_then(Self::from_str) {
            return arena;
        }
        if let Some(name) = requested {
            log::warn!("Unknown arena type {:?}, picking one at random", name);
        }
        Self::ALL[rng.pick(Self::ALL.len())]
    }

    /// Fixed obstacle layout for this arena type
    pub fn layout(&self) -> Vec<Obstacle> {
        use ObstacleKind::*;
        let specs: &[(f32, f32, f32, f32, ObstacleKind)] = match self {
            ArenaType::Open => &[],
            ArenaType::Pillars => &[
                (300.0, 150.0, 50.0, 50.0, Pillar),
                (450.0, 400.0, 50.0, 50.0, Pillar),
                (375.0, 275.0, 50.0, 50.0, Pillar),
            ],
            ArenaType::Urban => &[
                (200.0, 100.0, 100.0, 100.0, Wall),
                (500.0, 400.0, 100.0, 100.0, Wall),
                (380.0, 250.0, 40.0, 100.0, Wall),
            ],
            ArenaType::Wasteland => &[
                (200.0, 150.0, 60.0, 60.0, Debris),
                (550.0, 400.0, 60.0, 60.0, Debris),
                (380.0, 280.0, 40.0, 40.0, Pillar),
            ],
        };

        specs
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h, kind))| Obstacle {
                id: i as u32 + 1,
                rect: Rect::new(x, y, w, h),
                kind,
            })
            .collect()
    }
}

/// Obstacle archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObstacleKind {
    Pillar,
    Wall,
    /// Solid for movement and projectiles, transparent to sight
    Debris,
}

/// A static, axis-aligned arena obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    #[serde(flatten)]
    pub rect: Rect,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(id: u32, rect: Rect, kind: ObstacleKind) -> Self {
        Self { id, rect, kind }
    }

    #[inline]
    pub fn blocks_sight(&self) -> bool {
        self.kind != ObstacleKind::Debris
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// Unobstructed sight line between two points
pub fn line_of_sight(from: Vec2, to: Vec2, obstacles: &[Obstacle]) -> bool {
    !obstacles.iter().any(|obs| {
        obs.blocks_sight()
            && obs.rect.overlaps_segment_bounds(from, to)
            && segment_intersects_rect(from, to, &obs.rect)
    })
}

/// Obstacle whose center is closest to `pos` (first wins on ties)
pub fn nearest_obstacle(pos: Vec2, obstacles: &[Obstacle]) -> Option<&Obstacle> {
    let mut best: Option<(&Obstacle, f32)> = None;
    for obs in obstacles {
        let d = distance(pos, obs.center());
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((obs, d));
        }
    }
    best.map(|(obs, _)| obs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(ArenaType::from_str("URBAN"), Some(ArenaType::Urban));
        assert_eq!(ArenaType::from_str("pillars"), Some(ArenaType::Pillars));
        assert_eq!(ArenaType::from_str("volcano"), None);
    }

    #[test]
    fn test_resolve_forced_does_not_consume_rng() {
        let mut rng = BattleRng::new(5);
        let mut reference = BattleRng::new(5);
        assert_eq!(ArenaType::resolve(Some("URBAN"), &mut rng), ArenaType::Urban);
        assert_eq!(rng.next().to_bits(), reference.next().to_bits());
    }

    #[test]
    fn test_resolve_invalid_is_random_but_seeded() {
        let a = ArenaType::resolve(Some("nope"), &mut BattleRng::new(9));
        let b = ArenaType::resolve(None, &mut BattleRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_layouts() {
        assert!(ArenaType::Open.layout().is_empty());
        for arena in [ArenaType::Pillars, ArenaType::Urban, ArenaType::Wasteland] {
            assert_eq!(arena.layout().len(), 3);
        }
    }

    #[test]
    fn test_urban_wall_blocks_spawn_line() {
        let obstacles = ArenaType::Urban.layout();
        assert!(!line_of_sight(
            Vec2::new(100.0, 300.0),
            Vec2::new(700.0, 300.0),
            &obstacles
        ));
    }

    #[test]
    fn test_debris_does_not_block_sight() {
        let debris = vec![Obstacle::new(
            1,
            Rect::new(380.0, 250.0, 40.0, 100.0),
            ObstacleKind::Debris,
        )];
        assert!(line_of_sight(
            Vec2::new(100.0, 300.0),
            Vec2::new(700.0, 300.0),
            &debris
        ));
    }

    #[test]
    fn test_nearest_obstacle() {
        let obstacles = ArenaType::Pillars.layout();
        let nearest = nearest_obstacle(Vec2::new(320.0, 160.0), &obstacles).map(|o| o.id);
        assert_eq!(nearest, Some(1));
        assert!(nearest_obstacle(Vec2::ZERO, &[]).is_none());
    }
}
