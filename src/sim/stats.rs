//! Session stats: score, coins, health and the persisted hiscore
//!
//! The raw score is the truth value; a smoothed "visible" score animates the
//! HUD counter toward it. The hiscore is the only thing written through the
//! storage port, best-effort.

use crate::approach_value;
use crate::ports::storage::StoragePort;

/// Storage key for the persisted hiscore
pub const HISCORE_KEY: &str = "frogfall_hiscore";

/// Ticks the HUD coin counter flickers after a pickup
const COIN_FLICKER_TIME: f32 = 30.0;
/// Visible health bar approach rate, per tick
const HEALTH_BAR_SPEED: f32 = 1.0 / 60.0;
/// Fraction of the remaining score gap the counter closes per tick
const SCORE_COUNT_FACTOR: f32 = 1.0 / 20.0;

pub struct Stats {
    score: u32,
    visible_score: f32,
    /// Counting speed of the animated score, derived from the last gain
    score_delta: f32,

    pub coins: u32,
    coin_flicker: f32,

    health: f32,
    visible_health: f32,

    hiscore: u32,
    storage: Box<dyn StoragePort>,
}

impl Stats {
    /// Create session stats, loading the hiscore through the given port
    pub fn new(storage: Box<dyn StoragePort>) -> Self {
        let hiscore = storage
            .get_item(HISCORE_KEY)
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);
        log::info!("Loaded hiscore: {hiscore}");

        Self {
            score: 0,
            visible_score: 0.0,
            score_delta: 0.0,
            coins: 0,
            coin_flicker: 0.0,
            health: 1.0,
            visible_health: 1.0,
            hiscore,
            storage,
        }
    }

    /// Advance the smoothed HUD values one tick
    pub fn update(&mut self, tick: f32) {
        self.visible_score =
            approach_value(self.visible_score, self.score as f32, self.score_delta * tick);
        self.visible_health =
            approach_value(self.visible_health, self.health, HEALTH_BAR_SPEED * tick);

        if self.coin_flicker > 0.0 {
            self.coin_flicker -= tick;
        }
    }

    /// Add points, scaled up by the coins collected so far
    pub fn add_points(&mut self, points: u32) {
        let scaled = (points as f32 * (1.0 + self.coins as f32 / 10.0)) as u32;
        self.score += scaled;
        self.score_delta = (self.score as f32 - self.visible_score) * SCORE_COUNT_FACTOR;
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins += amount;
        self.coin_flicker = COIN_FLICKER_TIME;
    }

    /// Change health, clamped to [0, 1]
    pub fn update_health(&mut self, delta: f32) {
        self.health = (self.health + delta).clamp(0.0, 1.0);
    }

    /// Persist the hiscore if the session beat it. Storage failures are the
    /// port's problem; the in-memory value stays authoritative.
    pub fn store_hiscore(&mut self) {
        if self.score > self.hiscore {
            self.hiscore = self.score;
            self.storage.set_item(HISCORE_KEY, &self.hiscore.to_string());
            log::info!("New hiscore: {}", self.hiscore);
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn visible_score(&self) -> f32 {
        self.visible_score
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn visible_health(&self) -> f32 {
        self.visible_health
    }

    pub fn hiscore(&self) -> u32 {
        self.hiscore
    }

    /// True while the HUD coin counter should flicker
    pub fn coin_flickering(&self) -> bool {
        self.coin_flicker > 0.0
    }
}
