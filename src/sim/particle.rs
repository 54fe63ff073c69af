//! Pooled visual effects: death particles and run dust
//!
//! Cosmetic only; neither kind participates in collision.

use glam::Vec2;
use rand::Rng;

use crate::consts::SCREEN_HEIGHT;
use crate::sim::entity::{Body, Pooled, next_free_slot};

/// Gravity target shared with the player fall speed
const PARTICLE_GRAVITY: f32 = 4.0;

/// A dark square flung out by a death or eat effect
#[derive(Debug, Clone, Default)]
pub struct Particle {
    pub body: Body,
    pub diameter: f32,
}

impl Particle {
    pub fn spawn<R: Rng>(&mut self, rng: &mut R, x: f32, y: f32, speed_x: f32, speed_y: f32) {
        self.body.pos = Vec2::new(x, y);
        self.body.speed = Vec2::new(speed_x, speed_y);
        self.body.speed_target = Vec2::new(speed_x, PARTICLE_GRAVITY);

        self.diameter = rng.random_range(2..6) as f32;

        self.body.exists = true;
    }

    pub fn update(&mut self, base_speed: f32, tick: f32) {
        if !self.body.exists {
            return;
        }

        self.body.step(tick);
        self.body.pos.y += base_speed * tick;

        if self.body.pos.y > SCREEN_HEIGHT + self.diameter {
            self.body.exists = false;
        }
    }
}

impl Pooled for Particle {
    fn exists(&self) -> bool {
        self.body.exists
    }
}

/// Burst `count` particles out of `center` with randomized spread
pub fn spawn_particle_explosion<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    center: Vec2,
    count: usize,
) {
    const HSPEED_VARY: f32 = 2.5;
    const VSPEED_MAX: f32 = 4.0;
    const VSPEED_MIN: f32 = -1.0;

    for _ in 0..count {
        let speed_x = rng.random_range(-1.0..1.0) * HSPEED_VARY;
        let speed_y = -rng.random_range(VSPEED_MIN..VSPEED_MAX);

        next_free_slot(particles).spawn(rng, center.x, center.y, speed_x, speed_y);
    }
}

/// A fading dust puff left behind by the player
#[derive(Debug, Clone, Default)]
pub struct Dust {
    pub pos: Vec2,
    /// Remaining life in [0, 1]; also scales the drawn radius
    pub timer: f32,
    timer_speed: f32,
    pub radius: f32,
    exists: bool,
}

impl Dust {
    pub fn spawn(&mut self, x: f32, y: f32, timer_speed: f32, radius: f32) {
        self.pos = Vec2::new(x, y);
        self.timer_speed = timer_speed;
        self.radius = radius;
        self.timer = 1.0;

        self.exists = true;
    }

    pub fn update(&mut self, base_speed: f32, tick: f32) {
        if !self.exists {
            return;
        }

        self.pos.y += base_speed * tick;

        self.timer -= self.timer_speed * tick;
        if self.timer <= 0.0 {
            self.exists = false;
        }
    }

    pub fn does_exist(&self) -> bool {
        self.exists
    }
}

impl Pooled for Dust {
    fn exists(&self) -> bool {
        self.exists
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_particle_expires_below_screen() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particle = Particle::default();
        particle.spawn(&mut rng, 128.0, SCREEN_HEIGHT - 1.0, 0.0, 0.0);
        assert!(particle.body.exists);

        for _ in 0..100 {
            particle.update(1.0, 1.0);
        }
        assert!(!particle.body.exists);
    }

    #[test]
    fn test_explosion_fills_pool() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut particles: Vec<Particle> = Vec::new();
        spawn_particle_explosion(&mut particles, &mut rng, Vec2::new(128.0, 96.0), 32);
        assert_eq!(particles.len(), 32);
        assert!(particles.iter().all(|p| p.body.exists));
    }

    #[test]
    fn test_dust_fades_out() {
        let mut dust = Dust::default();
        dust.spawn(64.0, 64.0, 1.0 / 45.0, 6.0);

        for _ in 0..44 {
            dust.update(0.0, 1.0);
        }
        assert!(dust.does_exist());

        // Accumulated f32 error can leave a sliver of timer after 45 ticks,
        // so allow one extra before the puff must be gone
        dust.update(0.0, 1.0);
        dust.update(0.0, 1.0);
        assert!(!dust.does_exist());
    }
}
