//! Data-driven game balance
//!
//! Every difficulty-facing table lives here so balance passes never touch
//! sim code. Weight tables are sampled through
//! [`crate::sim::random::sample_weighted_interpolated`] with the difficulty
//! progress `t` blending the `initial` table into the `final` table.
//!
//! Contract: weight tables are non-negative and sum to ~1; the sampler does
//! not normalize.

use serde::{Deserialize, Serialize};

/// Enemy kinds eligible for spawning, in weight-table order
/// (StaticBee, MovingBee, Slime, Car, Spikeball, ChainBall, MovingSpikeball)
pub const ENEMY_TYPE_TABLE_LEN: usize = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Elapsed-tick breakpoints for each scroll speed stage
    pub speed_stage_times: Vec<f32>,
    /// Target scroll speed per stage (same length as `speed_stage_times`)
    pub speed_stage_targets: Vec<f32>,
    /// Exponential approach factor toward the stage target, per tick
    pub speed_approach: f32,
    /// Elapsed ticks mapped to difficulty progress t = 1.0
    pub difficulty_horizon: f32,

    /// Health lost per tick while alive
    pub health_drain: f32,

    /// Enemies spawned per regenerated row (index = count)
    pub enemy_count_weights_initial: [f32; 4],
    pub enemy_count_weights_final: [f32; 4],

    /// Coins spawned per regenerated row (index = count)
    pub coin_count_weights_initial: [f32; 4],
    pub coin_count_weights_final: [f32; 4],

    /// Enemy type mix, indexed per `ENEMY_TYPE_TABLE_LEN` order
    pub enemy_type_weights_initial: [f32; ENEMY_TYPE_TABLE_LEN],
    pub enemy_type_weights_final: [f32; ENEMY_TYPE_TABLE_LEN],

    /// Spikes per regenerated row (index = count, capped by ground cells)
    pub spike_count_weights_initial: [f32; 4],
    pub spike_count_weights_final: [f32; 4],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            speed_stage_times: vec![0.0, 900.0, 2100.0, 3600.0, 5400.0, 7200.0],
            speed_stage_targets: vec![1.0, 1.2, 1.4, 1.6, 1.8, 2.0],
            speed_approach: 0.01,
            difficulty_horizon: 7200.0,

            health_drain: 1.0 / 2700.0,

            enemy_count_weights_initial: [0.40, 0.40, 0.20, 0.0],
            enemy_count_weights_final: [0.05, 0.25, 0.45, 0.25],

            coin_count_weights_initial: [0.30, 0.50, 0.20, 0.0],
            coin_count_weights_final: [0.40, 0.40, 0.15, 0.05],

            enemy_type_weights_initial: [0.35, 0.15, 0.30, 0.10, 0.05, 0.05, 0.0],
            enemy_type_weights_final: [0.10, 0.15, 0.15, 0.15, 0.15, 0.15, 0.15],

            spike_count_weights_initial: [0.80, 0.15, 0.05, 0.0],
            spike_count_weights_final: [0.30, 0.30, 0.25, 0.15],
        }
    }
}

impl Tuning {
    /// Load a balance table from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Target scroll speed for the given elapsed tick count
    pub fn speed_target(&self, elapsed: f32) -> f32 {
        let mut target = *self.speed_stage_targets.first().unwrap_or(&1.0);
        for (time, speed) in self.speed_stage_times.iter().zip(&self.speed_stage_targets) {
            if elapsed >= *time {
                target = *speed;
            }
        }
        target
    }

    /// Difficulty progress in [0, 1] for the given elapsed tick count
    pub fn difficulty(&self, elapsed: f32) -> f32 {
        (elapsed / self.difficulty_horizon).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(weights: &[f32]) {
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "weights sum to {sum}");
        assert!(weights.iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn test_default_tables_normalized() {
        let tuning = Tuning::default();
        assert_normalized(&tuning.enemy_count_weights_initial);
        assert_normalized(&tuning.enemy_count_weights_final);
        assert_normalized(&tuning.coin_count_weights_initial);
        assert_normalized(&tuning.coin_count_weights_final);
        assert_normalized(&tuning.enemy_type_weights_initial);
        assert_normalized(&tuning.enemy_type_weights_final);
        assert_normalized(&tuning.spike_count_weights_initial);
        assert_normalized(&tuning.spike_count_weights_final);
    }

    #[test]
    fn test_speed_target_follows_breakpoints() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_target(0.0), 1.0);
        assert_eq!(tuning.speed_target(1000.0), 1.2);
        assert_eq!(tuning.speed_target(100_000.0), 2.0);
    }

    #[test]
    fn test_difficulty_clamped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.difficulty(0.0), 0.0);
        assert_eq!(tuning.difficulty(tuning.difficulty_horizon * 2.0), 1.0);
        assert!(tuning.difficulty(3600.0) > 0.0 && tuning.difficulty(3600.0) < 1.0);
    }

    #[test]
    fn test_from_json_partial_overrides() {
        let tuning = Tuning::from_json(r#"{ "difficulty_horizon": 3600.0 }"#).unwrap();
        assert_eq!(tuning.difficulty_horizon, 3600.0);
        // Untouched fields keep their defaults
        assert_eq!(tuning.speed_approach, Tuning::default().speed_approach);
    }
}
