//! Enemies and coins: per-kind behavior and player interaction
//!
//! One pooled struct covers every kind; behavior dispatches on [`EnemyKind`].
//! Coins live in their own pool on the stage so they always resolve after the
//! other enemies, but the type is the same.
//!
//! Player interaction is resolved in a strict priority order each tick:
//! sticky follow, tongue capture, stomp, general overlap. At most one branch
//! fires, so a coin can never be collected twice in one tick.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{LEFT_WALL, RIGHT_WALL, SCREEN_HEIGHT, TILE_SIZE};
use crate::sim::GameEvent;
use crate::sim::entity::{Body, Pooled};
use crate::sim::particle::{Particle, spawn_particle_explosion};
use crate::sim::platform::Platform;
use crate::sim::player::Player;
use crate::sim::rect::Rectangle;
use crate::sim::stats::Stats;

const WALL_MARGIN: f32 = 8.0;
const DESPAWN_MARGIN: f32 = 16.0;

const BOB_AMPLITUDE: f32 = 2.0;
const BOB_SPEED: f32 = TAU / 90.0;
const PATROL_SPEED: f32 = 0.5;
const CAR_SPEED: f32 = 0.75;
const ORBIT_RADIUS: f32 = 16.0;
const ORBIT_SPEED: f32 = TAU / 180.0;
const SPIN_SPEED: f32 = TAU / 120.0;
/// Enemies stand 8 px above the row their platform surface defines
const SURFACE_OFFSET: f32 = 8.0;

const CAPTURE_RADIUS: f32 = 10.0;
const DEATH_TIME: f32 = 12.0;

const STOMP_POINTS: u32 = 100;
const EAT_POINTS: u32 = 150;
const EAT_HEALTH: f32 = 0.1;
const CONTACT_DAMAGE: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Coin,
    StaticBee,
    MovingBee,
    Slime,
    Car,
    Spikeball,
    ChainBall,
    MovingSpikeball,
}

impl EnemyKind {
    /// Hurts the player on any contact; cannot be stomped or eaten safely
    pub fn harmful(self) -> bool {
        matches!(
            self,
            EnemyKind::Spikeball | EnemyKind::ChainBall | EnemyKind::MovingSpikeball
        )
    }

    /// Needs a ground cell under it when spawned
    pub fn ground_anchored(self) -> bool {
        matches!(self, EnemyKind::Slime | EnemyKind::Car)
    }

    /// Patrols horizontally, so it takes part in enemy-enemy collisions
    pub fn moving(self) -> bool {
        matches!(
            self,
            EnemyKind::MovingBee | EnemyKind::Car | EnemyKind::MovingSpikeball
        )
    }

    /// Exempt from enemy-enemy collision even when overlapping a mover
    pub fn ignores_collision(self) -> bool {
        matches!(self, EnemyKind::Coin | EnemyKind::ChainBall)
    }

    fn hitbox(self) -> Rectangle {
        match self {
            EnemyKind::Coin => Rectangle::new(0.0, 0.0, 10.0, 10.0),
            EnemyKind::Slime => Rectangle::new(0.0, 2.0, 12.0, 10.0),
            EnemyKind::Car => Rectangle::new(0.0, 1.0, 14.0, 10.0),
            _ => Rectangle::new(0.0, 0.0, 12.0, 12.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    /// Anchor for bobbing and orbiting; scrolls with the stage
    spawn_pos: Vec2,

    pub frame: i32,
    frame_timer: f32,
    /// Bob/orbit phase
    special_timer: f32,
    /// Rotation for the spinning kinds, consumed by the draw pass
    pub angle: f32,
    dir: f32,

    dying: bool,
    death_timer: f32,
    sticky: bool,

    platform_index: usize,
}

impl Enemy {
    pub fn spawn<R: Rng>(
        &mut self,
        rng: &mut R,
        kind: EnemyKind,
        x: f32,
        y: f32,
        platform_index: usize,
    ) {
        self.body = Body::new(x, y, true);
        self.body.hitbox = kind.hitbox();
        self.kind = kind;
        self.spawn_pos = Vec2::new(x, y);

        self.frame = 0;
        self.frame_timer = 0.0;
        self.special_timer = rng.random::<f32>() * TAU;
        self.angle = 0.0;
        self.dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

        self.dying = false;
        self.death_timer = 0.0;
        self.sticky = false;
        self.platform_index = platform_index;
    }

    fn animate(&mut self, start: i32, end: i32, frame_time: f32, tick: f32) {
        self.frame_timer += tick;
        if self.frame_timer >= frame_time {
            self.frame += 1;
            if self.frame > end || self.frame < start {
                self.frame = start;
            }
            self.frame_timer -= frame_time;
        }
    }

    fn bob(&mut self, tick: f32) {
        self.special_timer = (self.special_timer + BOB_SPEED * tick) % TAU;
        self.body.pos.y = self.spawn_pos.y + self.special_timer.sin() * BOB_AMPLITUDE;
    }

    /// Horizontal patrol with flush reversal at the side walls
    fn patrol(&mut self, speed: f32, tick: f32) {
        self.body.pos.x += self.dir * speed * tick;

        if self.dir < 0.0 && self.body.pos.x < LEFT_WALL + WALL_MARGIN {
            self.body.pos.x = LEFT_WALL + WALL_MARGIN;
            self.dir = 1.0;
        } else if self.dir > 0.0 && self.body.pos.x > RIGHT_WALL - WALL_MARGIN {
            self.body.pos.x = RIGHT_WALL - WALL_MARGIN;
            self.dir = -1.0;
        }
    }

    fn update_coin(&mut self, tick: f32) {
        self.bob(tick);
        self.animate(0, 3, 8.0, tick);
    }

    fn update_static_bee(&mut self, tick: f32) {
        self.bob(tick);
        self.animate(0, 1, 8.0, tick);
    }

    fn update_moving_bee(&mut self, tick: f32) {
        self.patrol(PATROL_SPEED, tick);
        self.bob(tick);
        self.animate(0, 1, 6.0, tick);
    }

    fn update_slime(&mut self, tick: f32) {
        self.body.pos.y = self.spawn_pos.y;
        self.animate(0, 3, 10.0, tick);
    }

    fn update_car(&mut self, tick: f32, platforms: &[Platform]) {
        self.patrol(CAR_SPEED, tick);
        self.body.pos.y = self.spawn_pos.y;
        self.animate(0, 1, 4.0, tick);

        // Turn back at the edge of the ground run. Only while the stored
        // platform still carries this car; after it wraps the car is about
        // to scroll out anyway and falls back to wall patrol.
        let Some(platform) = platforms.get(self.platform_index) else {
            return;
        };
        if (platform.y - SURFACE_OFFSET - self.body.pos.y).abs() > 1.0 {
            return;
        }

        let ahead = self.body.pos.x + self.dir * TILE_SIZE / 2.0;
        let column = ((ahead - LEFT_WALL) / TILE_SIZE).floor() as i32;
        if !platform.is_ground(column, false) {
            self.dir = -self.dir;
        }
    }

    fn update_spikeball(&mut self, tick: f32) {
        self.bob(tick);
        self.angle = (self.angle + SPIN_SPEED * tick) % TAU;
    }

    fn update_chain_ball(&mut self, tick: f32) {
        self.special_timer = (self.special_timer + ORBIT_SPEED * tick) % TAU;
        self.body.pos = self.spawn_pos
            + Vec2::new(self.special_timer.cos(), self.special_timer.sin()) * ORBIT_RADIUS;
    }

    fn update_moving_spikeball(&mut self, tick: f32) {
        self.patrol(PATROL_SPEED, tick);
        self.bob(tick);
        self.angle = (self.angle + SPIN_SPEED * self.dir * tick) % TAU;
    }

    pub fn update(&mut self, base_speed: f32, tick: f32, platforms: &[Platform]) {
        if !self.body.exists {
            return;
        }

        if self.dying {
            self.body.pos.y += base_speed * tick;
            self.death_timer -= tick;
            if self.death_timer <= 0.0 {
                self.dying = false;
                self.body.exists = false;
            }
            return;
        }

        // A captured enemy is dragged by the tongue instead
        if !self.sticky {
            self.spawn_pos.y += base_speed * tick;

            match self.kind {
                EnemyKind::Coin => self.update_coin(tick),
                EnemyKind::StaticBee => self.update_static_bee(tick),
                EnemyKind::MovingBee => self.update_moving_bee(tick),
                EnemyKind::Slime => self.update_slime(tick),
                EnemyKind::Car => self.update_car(tick, platforms),
                EnemyKind::Spikeball => self.update_spikeball(tick),
                EnemyKind::ChainBall => self.update_chain_ball(tick),
                EnemyKind::MovingSpikeball => self.update_moving_spikeball(tick),
            }
        }

        if self.body.pos.y > SCREEN_HEIGHT + DESPAWN_MARGIN {
            self.body.exists = false;
        }
    }

    /// Start the shrink-out death animation
    fn die<R: Rng>(&mut self, rng: &mut R, particles: &mut Vec<Particle>) {
        self.dying = true;
        self.death_timer = DEATH_TIME;
        spawn_particle_explosion(particles, rng, self.body.pos, 16);
    }

    /// Remaining death animation progress in [0, 1] for the draw pass
    pub fn death_ratio(&self) -> f32 {
        if self.dying {
            self.death_timer / DEATH_TIME
        } else {
            0.0
        }
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    fn collect_coin(
        &mut self,
        player: &mut Player,
        stats: &mut Stats,
        events: &mut Vec<GameEvent>,
    ) {
        player.add_coins(stats, 1);
        self.body.exists = false;
        events.push(GameEvent::CoinCollected);
    }

    /// Resolve the captured enemy once the tongue has fully retracted
    fn resolve_sticky<R: Rng>(
        &mut self,
        player: &mut Player,
        stats: &mut Stats,
        rng: &mut R,
        particles: &mut Vec<Particle>,
        events: &mut Vec<GameEvent>,
    ) {
        self.sticky = false;
        player.release_sticky();

        if self.kind == EnemyKind::Coin {
            self.collect_coin(player, stats, events);
            return;
        }

        if self.kind.harmful() {
            player.hurt(CONTACT_DAMAGE, stats, rng, particles, events);
        } else {
            player.add_health(stats, EAT_HEALTH);
            player.add_points(stats, EAT_POINTS);
            events.push(GameEvent::Eat);
        }

        spawn_particle_explosion(particles, rng, self.body.pos, 16);
        self.body.exists = false;
    }

    fn check_stomp<R: Rng>(
        &mut self,
        player: &mut Player,
        stats: &mut Stats,
        rng: &mut R,
        particles: &mut Vec<Particle>,
        events: &mut Vec<GameEvent>,
        tick: f32,
    ) -> bool {
        const STOMP_SPEED_THRESHOLD: f32 = -0.25;
        const STOMP_WIDTH: f32 = 12.0;
        const TOP_CHECK_AREA: f32 = 2.0;
        const BOTTOM_CHECK_AREA: f32 = 4.0;
        const PLAYER_WIDTH: f32 = 8.0;
        const PLAYER_BOTTOM: f32 = 8.0;

        if player.body.speed.y < STOMP_SPEED_THRESHOLD {
            return false;
        }
        if (player.body.pos.x - self.body.pos.x).abs() * 2.0 >= STOMP_WIDTH + PLAYER_WIDTH {
            return false;
        }

        let enemy_top =
            self.body.pos.y + self.body.hitbox.y - self.body.hitbox.h / 2.0;
        let player_bottom = player.body.pos.y + PLAYER_BOTTOM;
        let fall = player.body.speed.y.abs();

        if player_bottom < enemy_top - TOP_CHECK_AREA * tick
            || player_bottom > enemy_top + (BOTTOM_CHECK_AREA + fall) * tick
        {
            return false;
        }

        let harmful = self.kind.harmful();
        player.bounce(harmful);

        if harmful {
            player.hurt(CONTACT_DAMAGE, stats, rng, particles, events);
        } else {
            self.die(rng, particles);
            player.add_points(stats, STOMP_POINTS);
            events.push(GameEvent::Stomp);
        }
        true
    }

    /// Resolve this enemy against the player, one branch per tick:
    /// sticky follow, then tongue capture, then stomp, then general overlap.
    pub fn player_collision<R: Rng>(
        &mut self,
        player: &mut Player,
        stats: &mut Stats,
        rng: &mut R,
        particles: &mut Vec<Particle>,
        events: &mut Vec<GameEvent>,
        tick: f32,
    ) {
        if !self.body.exists || self.dying || !player.body.exists {
            return;
        }

        if self.sticky {
            if player.is_tongue_active() {
                self.body.pos = player.tongue_position();
            } else {
                self.resolve_sticky(player, stats, rng, particles, events);
            }
            return;
        }

        if player.is_tongue_active() && !player.has_sticky_object() {
            let tip = player.tongue_position();
            if tip.distance(self.body.pos) < CAPTURE_RADIUS {
                self.sticky = true;
                player.capture_with_tongue();
                return;
            }
        }

        // Coins are collected, never stomped
        if self.kind != EnemyKind::Coin
            && self.check_stomp(player, stats, rng, particles, events, tick)
        {
            return;
        }

        if Rectangle::overlay_shifted(
            player.body.pos,
            &player.body.hitbox,
            self.body.pos,
            &self.body.hitbox,
        ) {
            if self.kind == EnemyKind::Coin {
                self.collect_coin(player, stats, events);
            } else {
                player.hurt(CONTACT_DAMAGE, stats, rng, particles, events);
            }
        }
    }

    /// Two patrolling enemies that meet reverse away from each other
    pub fn enemy_collision(&mut self, other: &mut Enemy) {
        if !self.body.exists || !other.body.exists || self.dying || other.dying {
            return;
        }
        if self.sticky || other.sticky {
            return;
        }
        if !self.kind.moving() || !other.kind.moving() {
            return;
        }
        if self.kind.ignores_collision() || other.kind.ignores_collision() {
            return;
        }

        if Rectangle::overlay_shifted(
            self.body.pos,
            &self.body.hitbox,
            other.body.pos,
            &other.body.hitbox,
        ) {
            if self.body.pos.x < other.body.pos.x {
                self.dir = -1.0;
                other.dir = 1.0;
            } else {
                self.dir = 1.0;
                other.dir = -1.0;
            }
        }
    }
}

impl Pooled for Enemy {
    fn exists(&self) -> bool {
        self.body.exists
    }
}
