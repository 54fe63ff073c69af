//! Stage orchestration: scrolling, difficulty ramp, spawning, collisions
//!
//! The stage owns every pool and drives one deterministic tick at a time.
//! All randomness flows through the stage-owned Pcg32, so a whole run is
//! reproducible from its seed.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::approach_value;
use crate::consts::{
    INITIAL_SHIFT, LEFT_WALL, PLATFORM_COUNT, PLATFORM_SPACING, PLATFORM_WIDTH, SCREEN_HEIGHT,
    TILE_SIZE,
};
use crate::ports::input::InputSnapshot;
use crate::ports::storage::StoragePort;
use crate::sim::GameEvent;
use crate::sim::enemy::{Enemy, EnemyKind};
use crate::sim::entity::next_free_slot;
use crate::sim::particle::Particle;
use crate::sim::platform::Platform;
use crate::sim::player::Player;
use crate::sim::stats::Stats;
use crate::tuning::{ENEMY_TYPE_TABLE_LEN, Tuning};

/// Spawnable kinds in the same order as the tuning weight tables
const ENEMY_KIND_TABLE: [EnemyKind; ENEMY_TYPE_TABLE_LEN] = [
    EnemyKind::StaticBee,
    EnemyKind::MovingBee,
    EnemyKind::Slime,
    EnemyKind::Car,
    EnemyKind::Spikeball,
    EnemyKind::ChainBall,
    EnemyKind::MovingSpikeball,
];

const PLAYER_START_X: f32 = 128.0;
const PLAYER_START_Y: f32 = 120.0;

/// Spike hazard box inside one tile cell
const SPIKE_WIDTH: f32 = 12.0;
const SPIKE_HEIGHT: f32 = 10.0;

const SPIKE_PHASE_SPEED: f32 = TAU / 60.0;

/// Vertical offsets from a row's surface for spawned entities
const GROUND_SPAWN_OFFSET: f32 = 8.0;
const AIR_SPAWN_OFFSET: f32 = 16.0;
const COIN_SPAWN_OFFSET: f32 = 12.0;

pub struct Stage {
    /// Wall texture scroll phase, consumed by the draw pass
    wall_phase: f32,
    /// Spike glint animation phase, consumed by the draw pass
    spike_phase: f32,

    base_speed: f32,
    elapsed: f32,

    platforms: Vec<Platform>,
    enemies: Vec<Enemy>,
    /// Coins resolve after the other enemies, hence the separate pool
    coins: Vec<Enemy>,
    particles: Vec<Particle>,
    player: Player,
    stats: Stats,

    rng: Pcg32,
    tuning: Tuning,
    events: Vec<GameEvent>,
    game_over: bool,
}

impl Stage {
    pub fn new(seed: u64, storage: Box<dyn StoragePort>, tuning: Tuning) -> Self {
        log::info!("Starting stage with seed {seed}");
        let mut rng = Pcg32::seed_from_u64(seed);

        let platforms = (0..PLATFORM_COUNT)
            .map(|i| {
                let initial = i == PLATFORM_COUNT - 1;
                Platform::new(
                    &mut rng,
                    INITIAL_SHIFT + PLATFORM_SPACING * i as f32,
                    SCREEN_HEIGHT,
                    INITIAL_SHIFT,
                    initial,
                    0.0,
                    &tuning,
                )
            })
            .collect();

        Self {
            wall_phase: 0.0,
            spike_phase: 0.0,
            base_speed: 0.0,
            elapsed: 0.0,
            platforms,
            enemies: Vec::new(),
            coins: Vec::new(),
            particles: Vec::new(),
            player: Player::new(PLAYER_START_X, PLAYER_START_Y),
            stats: Stats::new(storage),
            rng,
            tuning,
            events: Vec::new(),
            game_over: false,
        }
    }

    /// Advance one logical tick. `tick` is the frame-delta multiplier,
    /// 1.0 per 60 Hz step.
    pub fn update(&mut self, input: &InputSnapshot, tick: f32) {
        self.wall_phase = (self.wall_phase + self.base_speed * tick) % TILE_SIZE;
        self.spike_phase = (self.spike_phase + SPIKE_PHASE_SPEED * tick) % TAU;

        self.elapsed += tick;
        let target = self.tuning.speed_target(self.elapsed);
        self.base_speed = approach_value(
            self.base_speed,
            target,
            self.tuning.speed_approach * tick,
        );
        let t = self.tuning.difficulty(self.elapsed);

        self.stats.update(tick);
        if self.player.body.exists {
            self.stats.update_health(-self.tuning.health_drain * tick);
            if self.stats.health() <= 0.0 {
                self.player.hurt(
                    0.0,
                    &mut self.stats,
                    &mut self.rng,
                    &mut self.particles,
                    &mut self.events,
                );
            }
        }

        self.player.update(
            input,
            self.base_speed,
            tick,
            &mut self.rng,
            &mut self.particles,
            &mut self.events,
        );

        for i in 0..self.enemies.len() {
            let (head, tail) = self.enemies.split_at_mut(i + 1);
            let enemy = &mut head[i];

            enemy.update(self.base_speed, tick, &self.platforms);
            for other in tail.iter_mut() {
                enemy.enemy_collision(other);
            }
            enemy.player_collision(
                &mut self.player,
                &mut self.stats,
                &mut self.rng,
                &mut self.particles,
                &mut self.events,
                tick,
            );
        }

        for coin in &mut self.coins {
            coin.update(self.base_speed, tick, &self.platforms);
            coin.player_collision(
                &mut self.player,
                &mut self.stats,
                &mut self.rng,
                &mut self.particles,
                &mut self.events,
                tick,
            );
        }

        let mut regenerated = Vec::new();
        for (i, platform) in self.platforms.iter_mut().enumerate() {
            if platform.update(self.base_speed, tick, &mut self.rng, t, &self.tuning) {
                regenerated.push(i);
            }
        }
        for index in regenerated {
            self.spawn_row(index, t);
        }

        self.check_terrain_collisions(tick);

        for particle in &mut self.particles {
            particle.update(self.base_speed, tick);
        }

        if !self.player.body.exists && !self.game_over {
            self.game_over = true;
            self.stats.store_hiscore();
            log::info!("Game over, final score {}", self.stats.score());
        }
    }

    fn check_terrain_collisions(&mut self, tick: f32) {
        for platform in &self.platforms {
            for x in 0..PLATFORM_WIDTH {
                let cell_x = LEFT_WALL + x as f32 * TILE_SIZE;

                if platform.is_ground(x as i32, false) {
                    self.player.floor_collision(
                        cell_x,
                        platform.y,
                        TILE_SIZE,
                        self.base_speed,
                        tick,
                    );
                }

                if platform.spikes[x] {
                    self.player.spike_collision(
                        cell_x + TILE_SIZE / 2.0,
                        platform.y + TILE_SIZE / 2.0,
                        SPIKE_WIDTH,
                        SPIKE_HEIGHT,
                        &mut self.stats,
                        &mut self.rng,
                        &mut self.particles,
                        &mut self.events,
                    );
                }
            }
        }
    }

    /// Populate a freshly regenerated row with enemies and coins. Columns
    /// are reserved as they are taken so nothing spawns on top of anything
    /// else in the same row.
    fn spawn_row(&mut self, index: usize, t: f32) {
        use crate::sim::random::sample_weighted_interpolated;

        let mut reserved = [false; PLATFORM_WIDTH];

        let enemy_count = sample_weighted_interpolated(
            &mut self.rng,
            &self.tuning.enemy_count_weights_initial,
            &self.tuning.enemy_count_weights_final,
            t,
        );
        for _ in 0..enemy_count {
            let kind_index = sample_weighted_interpolated(
                &mut self.rng,
                &self.tuning.enemy_type_weights_initial,
                &self.tuning.enemy_type_weights_final,
                t,
            );
            let kind = ENEMY_KIND_TABLE[kind_index];

            let (column, offset) = if kind.ground_anchored() {
                // No free ground cell on this row: skip the spawn entirely
                let Some(column) =
                    free_ground_column(&mut self.rng, &self.platforms[index], &reserved, true)
                else {
                    continue;
                };
                (column, GROUND_SPAWN_OFFSET)
            } else {
                let Some(column) = unreserved_column(&mut self.rng, &reserved) else {
                    continue;
                };
                (column, AIR_SPAWN_OFFSET)
            };
            reserved[column] = true;

            let x = LEFT_WALL + column as f32 * TILE_SIZE + TILE_SIZE / 2.0;
            let y = self.platforms[index].y - offset;
            next_free_slot(&mut self.enemies).spawn(&mut self.rng, kind, x, y, index);
        }

        let coin_count = sample_weighted_interpolated(
            &mut self.rng,
            &self.tuning.coin_count_weights_initial,
            &self.tuning.coin_count_weights_final,
            t,
        );
        for _ in 0..coin_count {
            let Some(column) =
                free_ground_column(&mut self.rng, &self.platforms[index], &reserved, false)
            else {
                continue;
            };
            reserved[column] = true;

            let x = LEFT_WALL + column as f32 * TILE_SIZE + TILE_SIZE / 2.0;
            let y = self.platforms[index].y - COIN_SPAWN_OFFSET;
            next_free_slot(&mut self.coins).spawn(&mut self.rng, EnemyKind::Coin, x, y, index);
        }
    }

    /// Take this tick's accumulated events, leaving the queue empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn coins(&self) -> &[Enemy] {
        &self.coins
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn wall_phase(&self) -> f32 {
        self.wall_phase
    }

    pub fn spike_phase(&self) -> f32 {
        self.spike_phase
    }
}

/// Wrap-around probe for an unreserved, ground-eligible column, starting
/// at a random cell. `None` when the row has no eligible cell left.
fn free_ground_column<R: Rng>(
    rng: &mut R,
    platform: &Platform,
    reserved: &[bool; PLATFORM_WIDTH],
    ignore_bridge: bool,
) -> Option<usize> {
    let start = rng.random_range(0..PLATFORM_WIDTH);
    for offset in 0..PLATFORM_WIDTH {
        let column = (start + offset) % PLATFORM_WIDTH;
        if !reserved[column] && platform.is_ground(column as i32, ignore_bridge) {
            return Some(column);
        }
    }
    None
}

/// Wrap-around probe for any unreserved column
fn unreserved_column<R: Rng>(
    rng: &mut R,
    reserved: &[bool; PLATFORM_WIDTH],
) -> Option<usize> {
    let start = rng.random_range(0..PLATFORM_WIDTH);
    for offset in 0..PLATFORM_WIDTH {
        let column = (start + offset) % PLATFORM_WIDTH;
        if !reserved[column] {
            return Some(column);
        }
    }
    None
}
