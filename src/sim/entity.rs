//! Shared entity motion base and pool reuse
//!
//! Every moving object (player, enemies, particles) embeds a [`Body`]:
//! velocity approaches a per-axis target at a fixed rate, then integrates
//! into position. Pools reuse the first free slot and grow when full, so a
//! spawn never fails.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::approach_value;
use crate::sim::rect::Rectangle;

/// Position/velocity state shared by all game objects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub speed: Vec2,
    pub speed_target: Vec2,
    /// Per-axis approach rate toward the speed target, per tick
    pub friction: Vec2,
    pub exists: bool,
    pub hitbox: Rectangle,
}

impl Body {
    pub fn new(x: f32, y: f32, exists: bool) -> Self {
        Self {
            pos: Vec2::new(x, y),
            speed: Vec2::ZERO,
            speed_target: Vec2::ZERO,
            friction: Vec2::new(0.20, 0.15),
            exists,
            hitbox: Rectangle::default(),
        }
    }

    /// Approach the speed target and integrate position for one tick
    pub fn step(&mut self, tick: f32) {
        self.speed.x = approach_value(self.speed.x, self.speed_target.x, self.friction.x * tick);
        self.speed.y = approach_value(self.speed.y, self.speed_target.y, self.friction.y * tick);

        self.pos.x += self.speed.x * tick;
        self.pos.y += self.speed.y * tick;
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(0.0, 0.0, false)
    }
}

/// Pooled objects that can be reused once inactive
pub trait Pooled {
    fn exists(&self) -> bool;
}

/// Return the first free slot in a pool, growing it when every slot is live
pub fn next_free_slot<T: Pooled + Default>(pool: &mut Vec<T>) -> &mut T {
    match pool.iter().position(|o| !o.exists()) {
        Some(i) => &mut pool[i],
        None => {
            pool.push(T::default());
            pool.last_mut().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_approaches_target_without_overshoot() {
        let mut body = Body::new(0.0, 0.0, true);
        body.friction.x = 0.25;
        body.speed_target.x = 1.75;

        let mut previous = 0.0;
        for _ in 0..100 {
            body.step(1.0);
            assert!(body.speed.x <= 1.75 + f32::EPSILON);
            assert!(body.speed.x >= previous);
            previous = body.speed.x;
        }
        assert!((body.speed.x - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_step_integrates_position() {
        let mut body = Body::new(10.0, 20.0, true);
        body.speed = Vec2::new(2.0, -1.0);
        body.speed_target = body.speed;
        body.step(1.0);
        assert_eq!(body.pos, Vec2::new(12.0, 19.0));
    }

    #[derive(Default)]
    struct Slot {
        live: bool,
    }

    impl Pooled for Slot {
        fn exists(&self) -> bool {
            self.live
        }
    }

    #[test]
    fn test_next_free_slot_reuses_then_grows() {
        let mut pool: Vec<Slot> = Vec::new();

        next_free_slot(&mut pool).live = true;
        assert_eq!(pool.len(), 1);

        // All slots live: the pool grows
        next_free_slot(&mut pool).live = true;
        assert_eq!(pool.len(), 2);

        // A freed slot is reused instead of growing
        pool[0].live = false;
        next_free_slot(&mut pool).live = true;
        assert_eq!(pool.len(), 2);
    }
}
