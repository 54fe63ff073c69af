//! Anchored axis-aligned collision boxes
//!
//! A [`Rectangle`] is an offset plus extents relative to an external anchor
//! position (the owning entity's center). The shifted overlap test is the
//! sole collision primitive used throughout the sim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision box relative to an anchor: `(x, y)` offsets the box center from
/// the anchor, `(w, h)` are the full extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rectangle {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Test overlap of two boxes anchored at `pos_a` and `pos_b`
    pub fn overlay_shifted(pos_a: Vec2, a: &Rectangle, pos_b: Vec2, b: &Rectangle) -> bool {
        let cax = pos_a.x + a.x;
        let cay = pos_a.y + a.y;
        let cbx = pos_b.x + b.x;
        let cby = pos_b.y + b.y;

        (cax - cbx).abs() * 2.0 < a.w + b.w && (cay - cby).abs() * 2.0 < a.h + b.h
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 16.0, 16.0)
    }
}
