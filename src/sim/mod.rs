//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (`tick` is the frame delta, 1.0 per logical step)
//! - Seeded RNG only (stage-owned Pcg32)
//! - No rendering or platform dependencies; the draw pass reads public state
//!
//! Object pools (enemies, coins, particles, dust) are mutated only inside the
//! stage's update call and are read-only during the paired draw pass.

pub mod enemy;
pub mod entity;
pub mod particle;
pub mod platform;
pub mod player;
pub mod random;
pub mod rect;
pub mod stage;
pub mod stats;

pub use enemy::{Enemy, EnemyKind};
pub use entity::Body;
pub use particle::{Dust, Particle};
pub use platform::{Decoration, Platform, Tile};
pub use player::Player;
pub use rect::Rectangle;
pub use stage::Stage;
pub use stats::Stats;

/// Things that happened during one tick, drained by the harness
/// (screen shake, audio via [`crate::ports::audio::play_events`])
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Jump,
    DoubleJump,
    TongueOut,
    Stomp,
    Eat,
    CoinCollected,
    Hurt,
    PlayerDied,
}
