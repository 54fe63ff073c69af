//! One scrolling platform row
//!
//! A row is 14 tile cells of ground, gaps and at most one bridge, with
//! vines, decorations and spikes layered on top. Rows scroll down with the
//! stage speed and fully regenerate when they wrap past the bottom of the
//! screen; the wrap signals the stage to spawn a fresh enemy/coin batch.
//!
//! Layout invariants kept by generation:
//! - a cell with a spike or vine never carries a decoration
//! - a cell horizontally adjacent to a bridge carries no decoration or spike

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::PLATFORM_WIDTH;
use crate::sim::random::{sample_weighted, sample_weighted_interpolated};
use crate::tuning::Tuning;

const MAX_GAP_RUN: usize = 4;
const MAX_GROUND_RUN: usize = 6;

const BRIDGE_PROB_INITIAL: f32 = 0.10;
const BRIDGE_PROB_STEP: f32 = 0.05;

const VINE_PROB_INITIAL: f32 = 0.15;
const VINE_PROB_STEP: f32 = 0.20;
const VINE_LENGTH_WEIGHTS: [f32; 3] = [0.50, 0.35, 0.15];
const MAX_VINE_LENGTH: u8 = 3;

const DECORATION_PROB_INITIAL: f32 = 0.20;
const DECORATION_PROB_STEP: f32 = 0.25;
const DECORATION_WEIGHTS: [f32; 5] = [0.30, 0.20, 0.15, 0.20, 0.15];

/// One horizontal cell of a platform row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Gap,
    Ground,
    Bridge,
}

/// Cosmetic per-cell overlay, mutually exclusive with vines and spikes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Decoration {
    #[default]
    None,
    SmallBush,
    BigBush,
    Palmtree,
    Flower,
    Rock,
}

impl Decoration {
    /// Decoration for a weight-table index (0 = SmallBush .. 4 = Rock)
    fn from_index(index: usize) -> Self {
        match index {
            0 => Decoration::SmallBush,
            1 => Decoration::BigBush,
            2 => Decoration::Palmtree,
            3 => Decoration::Flower,
            _ => Decoration::Rock,
        }
    }
}

/// One scrolling row of the endless stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub y: f32,
    screen_height: f32,
    initial_shift: f32,

    pub tiles: [Tile; PLATFORM_WIDTH],
    /// Vine length per cell, 0 = none, 1..=3 hanging below the row
    pub vines: [u8; PLATFORM_WIDTH],
    pub decorations: [Decoration; PLATFORM_WIDTH],
    pub spikes: [bool; PLATFORM_WIDTH],

    /// Bridge chance, raised a step for every row generated without one
    bridge_prob: f32,
    /// The starting row stays all ground until its first wrap
    initial: bool,
}

impl Platform {
    pub fn new<R: Rng>(
        rng: &mut R,
        y: f32,
        screen_height: f32,
        initial_shift: f32,
        initial: bool,
        t: f32,
        tuning: &Tuning,
    ) -> Self {
        let mut platform = Self {
            y,
            screen_height,
            initial_shift,
            tiles: [Tile::Gap; PLATFORM_WIDTH],
            vines: [0; PLATFORM_WIDTH],
            decorations: [Decoration::None; PLATFORM_WIDTH],
            spikes: [false; PLATFORM_WIDTH],
            bridge_prob: BRIDGE_PROB_INITIAL,
            initial,
        };
        platform.generate(rng, t, tuning);
        platform
    }

    /// Scroll down one tick; on wrapping past the bottom, regenerate and
    /// report it so the stage spawns a new batch for this row
    pub fn update<R: Rng>(
        &mut self,
        base_speed: f32,
        tick: f32,
        rng: &mut R,
        t: f32,
        tuning: &Tuning,
    ) -> bool {
        self.y += base_speed * tick;

        if self.y >= self.screen_height {
            self.y -= self.screen_height - self.initial_shift;
            self.initial = false;
            self.generate(rng, t, tuning);
            return true;
        }
        false
    }

    /// Ground query for collision and spawn placement. A spiked cell never
    /// counts as ground; bridges count unless `ignore_bridge` is set.
    pub fn is_ground(&self, x: i32, ignore_bridge: bool) -> bool {
        if x < 0 || x as usize >= PLATFORM_WIDTH {
            return false;
        }
        let x = x as usize;
        if self.spikes[x] {
            return false;
        }
        match self.tiles[x] {
            Tile::Ground => true,
            Tile::Bridge => !ignore_bridge,
            Tile::Gap => false,
        }
    }

    fn generate<R: Rng>(&mut self, rng: &mut R, t: f32, tuning: &Tuning) {
        self.vines = [0; PLATFORM_WIDTH];
        self.decorations = [Decoration::None; PLATFORM_WIDTH];
        self.spikes = [false; PLATFORM_WIDTH];

        if self.initial {
            // Solid footing for the opening moments: ground everywhere,
            // vines only
            self.tiles = [Tile::Ground; PLATFORM_WIDTH];
            self.place_vines_and_decorations(rng, true);
            return;
        }

        self.generate_tiles(rng);
        self.place_vines_and_decorations(rng, false);
        self.place_spikes(rng, t, tuning);
        self.clear_bridge_neighbors();
    }

    /// Alternating ground/gap runs of random length; a gap run may become
    /// the row's single bridge
    fn generate_tiles<R: Rng>(&mut self, rng: &mut R) {
        let mut ground = rng.random_bool(0.5);
        let mut bridge_created = false;

        let mut x = 0;
        while x < PLATFORM_WIDTH {
            let max = if ground { MAX_GROUND_RUN } else { MAX_GAP_RUN };
            let length = rng.random_range(1..=max);

            let mut tile = if ground { Tile::Ground } else { Tile::Gap };
            if !ground && !bridge_created && rng.random::<f32>() < self.bridge_prob {
                tile = Tile::Bridge;
                bridge_created = true;
            }

            for cell in self.tiles.iter_mut().skip(x).take(length) {
                *cell = tile;
            }

            x += length;
            ground = !ground;
        }

        if bridge_created {
            self.bridge_prob = BRIDGE_PROB_INITIAL;
        } else {
            self.bridge_prob += BRIDGE_PROB_STEP;
        }
    }

    /// Scan each ground run, dropping vines on interior cells and
    /// decorations on the remaining ground cells, both with rising
    /// probabilities that reset on every placement
    fn place_vines_and_decorations<R: Rng>(&mut self, rng: &mut R, vines_only: bool) {
        let mut last_vine_length = 0u8;
        let mut last_decoration_index: Option<usize> = None;

        let mut x = 0;
        while x < PLATFORM_WIDTH {
            if self.tiles[x] != Tile::Ground {
                x += 1;
                continue;
            }

            let start = x;
            while x < PLATFORM_WIDTH && self.tiles[x] == Tile::Ground {
                x += 1;
            }
            let end = x;
            let run_length = end - start;

            let mut vine_prob = VINE_PROB_INITIAL;
            let mut decoration_prob = DECORATION_PROB_INITIAL;

            for cx in start..end {
                // Vines avoid run edges so they never dangle over a gap
                let interior = cx > start && cx + 1 < end;

                if interior && rng.random::<f32>() < vine_prob {
                    vine_prob = VINE_PROB_INITIAL;

                    let mut length = sample_weighted(rng, &VINE_LENGTH_WEIGHTS) as u8 + 1;
                    if length == last_vine_length {
                        // Nudge to avoid two identical vines in a row
                        length = length % MAX_VINE_LENGTH + 1;
                    }
                    self.vines[cx] = length;
                    last_vine_length = length;
                    continue;
                }
                if interior {
                    vine_prob += VINE_PROB_STEP;
                }

                if vines_only {
                    continue;
                }

                if rng.random::<f32>() < decoration_prob {
                    decoration_prob = DECORATION_PROB_INITIAL;

                    let mut index = sample_weighted(rng, &DECORATION_WEIGHTS);
                    if Some(index) == last_decoration_index {
                        index = (index + 1) % DECORATION_WEIGHTS.len();
                    }
                    last_decoration_index = Some(index);

                    let mut decoration = Decoration::from_index(index);

                    // A big bush spans two cells; fall back to a small one
                    // where the second cell is missing
                    if decoration == Decoration::BigBush
                        && (run_length == 1 || cx + 1 == end || cx + 1 == PLATFORM_WIDTH)
                    {
                        decoration = Decoration::SmallBush;
                    }
                    // Palmtree canopies clip into the walls on edge cells
                    if decoration == Decoration::Palmtree
                        && (cx == 0 || cx + 1 == PLATFORM_WIDTH)
                    {
                        decoration = Decoration::SmallBush;
                    }

                    self.decorations[cx] = decoration;
                } else {
                    decoration_prob += DECORATION_PROB_STEP;
                }
            }
        }
    }

    /// Second pass: probe ground cells from a random start and drop a
    /// difficulty-scaled number of spikes, clearing whatever they land on
    fn place_spikes<R: Rng>(&mut self, rng: &mut R, t: f32, tuning: &Tuning) {
        let ground_cells = self
            .tiles
            .iter()
            .filter(|tile| **tile == Tile::Ground)
            .count();

        let count = sample_weighted_interpolated(
            rng,
            &tuning.spike_count_weights_initial,
            &tuning.spike_count_weights_final,
            t,
        )
        .min(ground_cells / 2);

        for _ in 0..count {
            let start = rng.random_range(0..PLATFORM_WIDTH);
            for offset in 0..PLATFORM_WIDTH {
                let x = (start + offset) % PLATFORM_WIDTH;
                if self.tiles[x] == Tile::Ground && !self.spikes[x] {
                    self.spikes[x] = true;
                    self.decorations[x] = Decoration::None;
                    self.vines[x] = 0;
                    break;
                }
            }
        }
    }

    /// Bridges visually overlap their neighbor cells, so those cells stay
    /// bare
    fn clear_bridge_neighbors(&mut self) {
        for x in 0..PLATFORM_WIDTH {
            let left_bridge = x > 0 && self.tiles[x - 1] == Tile::Bridge;
            let right_bridge = x + 1 < PLATFORM_WIDTH && self.tiles[x + 1] == Tile::Bridge;
            if left_bridge || right_bridge {
                self.decorations[x] = Decoration::None;
                self.spikes[x] = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn regular_platform(seed: u64, t: f32) -> Platform {
        let mut rng = Pcg32::seed_from_u64(seed);
        Platform::new(&mut rng, 0.0, 192.0, -64.0, false, t, &Tuning::default())
    }

    #[test]
    fn test_layout_invariants_over_many_rows() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut platform =
            Platform::new(&mut rng, 0.0, 192.0, -64.0, false, 0.0, &tuning);

        for row in 0..500 {
            let t = (row % 100) as f32 / 100.0;
            platform.generate(&mut rng, t, &tuning);

            let mut bridges = 0;
            for x in 0..PLATFORM_WIDTH {
                if platform.spikes[x] {
                    assert_eq!(platform.decorations[x], Decoration::None);
                    assert_eq!(platform.vines[x], 0);
                    assert_eq!(platform.tiles[x], Tile::Ground);
                }
                if platform.vines[x] > 0 {
                    assert_eq!(platform.decorations[x], Decoration::None);
                    assert!(platform.vines[x] <= MAX_VINE_LENGTH);
                }
                let near_bridge = (x > 0 && platform.tiles[x - 1] == Tile::Bridge)
                    || (x + 1 < PLATFORM_WIDTH && platform.tiles[x + 1] == Tile::Bridge);
                if near_bridge {
                    assert_eq!(platform.decorations[x], Decoration::None);
                    assert!(!platform.spikes[x]);
                }
                if platform.tiles[x] == Tile::Bridge
                    && !(x > 0 && platform.tiles[x - 1] == Tile::Bridge)
                {
                    bridges += 1;
                }
            }
            assert!(bridges <= 1, "at most one bridge per row");
        }
    }

    #[test]
    fn test_spiked_cell_is_never_ground() {
        for seed in 0..50 {
            let platform = regular_platform(seed, 1.0);
            for x in 0..PLATFORM_WIDTH {
                if platform.spikes[x] {
                    assert!(!platform.is_ground(x as i32, false));
                }
            }
        }
    }

    #[test]
    fn test_is_ground_bounds_and_bridges() {
        let mut platform = regular_platform(5, 0.0);
        platform.tiles = [Tile::Gap; PLATFORM_WIDTH];
        platform.spikes = [false; PLATFORM_WIDTH];
        platform.tiles[3] = Tile::Ground;
        platform.tiles[4] = Tile::Bridge;

        assert!(!platform.is_ground(-1, false));
        assert!(!platform.is_ground(PLATFORM_WIDTH as i32, false));
        assert!(platform.is_ground(3, false));
        assert!(platform.is_ground(3, true));
        assert!(platform.is_ground(4, false));
        assert!(!platform.is_ground(4, true));
        assert!(!platform.is_ground(5, false));
    }

    #[test]
    fn test_initial_platform_is_bare_ground() {
        let mut rng = Pcg32::seed_from_u64(11);
        let platform =
            Platform::new(&mut rng, 128.0, 192.0, -64.0, true, 0.0, &Tuning::default());

        assert!(platform.tiles.iter().all(|tile| *tile == Tile::Ground));
        assert!(platform.spikes.iter().all(|spike| !spike));
        assert!(platform
            .decorations
            .iter()
            .all(|decoration| *decoration == Decoration::None));
    }

    #[test]
    fn test_scroll_wraps_and_regenerates_once() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut platform = Platform::new(&mut rng, 0.0, 192.0, -64.0, false, 0.0, &tuning);

        let mut regenerations = 0;
        for _ in 0..192 {
            if platform.update(1.0, 1.0, &mut rng, 0.0, &tuning) {
                regenerations += 1;
            }
        }

        assert_eq!(regenerations, 1);
        assert_eq!(platform.y, -64.0);
    }

    #[test]
    fn test_initial_flag_clears_after_wrap() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(31);
        let mut platform = Platform::new(&mut rng, 128.0, 192.0, -64.0, true, 0.0, &tuning);

        for _ in 0..64 {
            platform.update(1.0, 1.0, &mut rng, 0.0, &tuning);
        }
        assert!(!platform.initial);
    }
}
