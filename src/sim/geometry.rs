//! Planar geometry helpers for sight lines and collisions
//!
//! Arena space is screen-style: origin top-left, +y down, angles in radians
//! measured from +x.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow the rect by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + margin * 2.0,
            self.height + margin * 2.0,
        )
    }

    /// Edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Cheap reject: does the segment's bounding box overlap this rect
    pub fn overlaps_segment_bounds(&self, a: Vec2, b: Vec2) -> bool {
        let min = a.min(b);
        let max = a.max(b);
        !(max.x < self.x || min.x > self.right() || max.y < self.y || min.y > self.bottom())
    }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Signed smallest rotation taking `from` onto `to`, in [-π, π]
#[inline]
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    let diff = to - from;
    diff.sin().atan2(diff.cos())
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Sign with zero mapped to zero (`f32::signum` maps +0.0 to 1.0)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Parametric segment/segment test, endpoints inclusive
///
/// Parallel or degenerate segments never intersect.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return false;
    }
    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;
    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

/// True if the segment `a`-`b` crosses any of the rect's four edges
///
/// A segment lying entirely inside the rect touches no edge and returns false.
pub fn segment_intersects_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    let tl = Vec2::new(rect.x, rect.y);
    let tr = Vec2::new(rect.right(), rect.y);
    let bl = Vec2::new(rect.x, rect.bottom());
    let br = Vec2::new(rect.right(), rect.bottom());

    segments_intersect(a, b, tl, bl)
        || segments_intersect(a, b, tr, br)
        || segments_intersect(a, b, tl, tr)
        || segments_intersect(a, b, bl, br)
}

/// Circle-vs-rect overlap test for a circle of radius `margin` centered at `p`
///
/// Uses the expanded rect (square corners), which is what the push-out
/// response expects.
#[inline]
pub fn point_in_expanded_rect(p: Vec2, rect: &Rect, margin: f32) -> bool {
    rect.expanded(margin).contains(p)
}

/// Rotate `current` toward `target` by at most `max_turn` radians
pub fn turn_toward(current: f32, target: f32, max_turn: f32) -> f32 {
    let delta = shortest_angle(current, target).clamp(-max_turn, max_turn);
    normalize_angle(current + delta)
}
