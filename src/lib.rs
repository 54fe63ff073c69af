//! Frogfall - deterministic core of a falling-frog arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (stage generation, physics, collisions)
//! - `ports`: Collaborator interfaces (input, audio, persistent storage)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, asset generation and the frame-loop harness live outside this
//! crate; they consume the public sim state read-only between ticks.

pub mod ports;
pub mod sim;
pub mod tuning;

pub use sim::stage::Stage;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 256.0;
    pub const SCREEN_HEIGHT: f32 = 192.0;

    /// Size of one terrain tile
    pub const TILE_SIZE: f32 = 16.0;
    /// Number of tile cells in one platform row
    pub const PLATFORM_WIDTH: usize = 14;

    /// Playfield side walls (one tile column on each edge)
    pub const LEFT_WALL: f32 = 16.0;
    pub const RIGHT_WALL: f32 = SCREEN_WIDTH - 16.0;

    /// Scrolling platform rows tiling the playfield vertically
    pub const PLATFORM_COUNT: usize = 4;
    pub const PLATFORM_SPACING: f32 = 64.0;
    /// Vertical position a row wraps back to after scrolling off-screen
    pub const INITIAL_SHIFT: f32 = -64.0;

    /// One logical tick at the 60 Hz reference rate
    pub const BASE_TICK: f32 = 1.0;
    /// Maximum logical ticks consumed per frame callback (harness contract)
    pub const MAX_SUBSTEPS: u32 = 5;
}

/// Move `x` toward `target` by at most `step`, clamping at the target
#[inline]
pub fn approach_value(x: f32, target: f32, step: f32) -> f32 {
    if x < target {
        (x + step).min(target)
    } else {
        (x - step).max(target)
    }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Initialize the `log` backend for the current platform.
///
/// Called once at harness startup; the sim itself only uses the `log` facade.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_approach_value_clamps_at_target() {
        assert_eq!(approach_value(0.0, 1.0, 10.0), 1.0);
        assert_eq!(approach_value(5.0, 1.0, 10.0), 1.0);
        assert_eq!(approach_value(0.0, 2.0, 0.5), 0.5);
        assert_eq!(approach_value(2.0, 0.0, 0.5), 1.5);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    proptest! {
        /// Repeated approach never overshoots the target.
        #[test]
        fn prop_approach_never_overshoots(
            start in -10.0f32..10.0,
            target in -10.0f32..10.0,
            step in 0.0f32..5.0,
        ) {
            let mut x = start;
            let mut prev_dist = (start - target).abs();
            for _ in 0..64 {
                x = approach_value(x, target, step);
                let dist = (x - target).abs();
                prop_assert!(dist <= prev_dist);
                prev_dist = dist;
            }
        }
    }
}
