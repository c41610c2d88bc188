#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic level generator that decorates an occupancy grid with
//! platform shelves.
//!
//! Generation is purely functional given a seed: a guaranteed ground floor,
//! a configurable number of random shelves, and a guaranteed boss-side
//! corridor near the far edge. Shelves may overlap or end up unreachable;
//! the generator makes no connectivity promises beyond the ground floor and
//! the carved corridor.

use dungeon_brawl_core::{CellCoord, Grid, GridCell};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

const MIN_SHELF_WIDTH: u32 = 3;
const MAX_SHELF_WIDTH: u32 = 12;
const SHELF_BAND_TOP: u32 = 6;
const SHELF_BAND_BOTTOM_MARGIN: u32 = 6;

const DEFAULT_SHELF_PASSES: u32 = 34;

/// Row carved with the guaranteed boss-side corridor.
pub const BOSS_SHELF_ROW: u32 = 8;

/// Distance from the right grid edge at which the boss corridor begins.
pub const BOSS_CORRIDOR_NEAR_OFFSET: u32 = 20;

/// Distance from the right grid edge at which the boss corridor ends.
pub const BOSS_CORRIDOR_FAR_OFFSET: u32 = 5;

/// Configuration parameters required to construct the level generator.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    shelf_passes: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided pass count and seed.
    #[must_use]
    pub const fn new(shelf_passes: u32, rng_seed: u64) -> Self {
        Self {
            shelf_passes,
            rng_seed,
        }
    }

    /// Creates a configuration with the default pass count and the provided
    /// seed.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(DEFAULT_SHELF_PASSES, rng_seed)
    }
}

/// Generates the platform geometry for a run.
///
/// Always terminates and never fails: degenerate dimensions simply skip the
/// bands that no longer fit rather than erroring.
#[must_use]
pub fn generate(columns: u32, rows: u32, tile_length: f32, config: &Config) -> Grid {
    let mut grid = Grid::empty(columns, rows, tile_length);
    lay_ground_floor(&mut grid);

    let mut rng_state = config.rng_seed;
    for _ in 0..config.shelf_passes {
        lay_shelf(&mut grid, &mut rng_state);
    }

    carve_boss_corridor(&mut grid);
    grid
}

/// Range of columns occupied by the boss corridor for the provided width.
///
/// Returns `None` when the grid is too narrow to reserve the corridor.
#[must_use]
pub fn boss_corridor_columns(columns: u32) -> Option<(u32, u32)> {
    if columns <= BOSS_CORRIDOR_NEAR_OFFSET {
        return None;
    }
    let start = columns - BOSS_CORRIDOR_NEAR_OFFSET;
    let end = columns.saturating_sub(BOSS_CORRIDOR_FAR_OFFSET);
    if start >= end {
        return None;
    }
    Some((start, end))
}

fn lay_ground_floor(grid: &mut Grid) {
    let rows = grid.rows();
    if rows < 2 {
        return;
    }
    let ground_row = rows - 2;
    for column in 0..grid.columns() {
        grid.set(CellCoord::new(column, ground_row), GridCell::Solid);
    }
}

fn lay_shelf(grid: &mut Grid, rng_state: &mut u64) {
    let columns = grid.columns();
    let rows = grid.rows();
    if rows < SHELF_BAND_TOP + SHELF_BAND_BOTTOM_MARGIN {
        return;
    }

    let width = sample_range(rng_state, MIN_SHELF_WIDTH, MAX_SHELF_WIDTH);
    if columns < width + 2 {
        return;
    }

    let origin = sample_range(rng_state, 1, columns - width - 1);
    let row = sample_range(rng_state, SHELF_BAND_TOP, rows - SHELF_BAND_BOTTOM_MARGIN);
    for offset in 0..width {
        grid.set(CellCoord::new(origin + offset, row), GridCell::Solid);
    }
}

fn carve_boss_corridor(grid: &mut Grid) {
    if grid.rows() <= BOSS_SHELF_ROW + 1 {
        return;
    }
    let Some((start, end)) = boss_corridor_columns(grid.columns()) else {
        return;
    };
    for column in start..end {
        grid.set(CellCoord::new(column, BOSS_SHELF_ROW), GridCell::Solid);
    }
}

fn sample_range(state: &mut u64, lower: u32, upper_inclusive: u32) -> u32 {
    debug_assert!(lower <= upper_inclusive, "sample_range requires lower <= upper");
    let span = u64::from(upper_inclusive - lower) + 1;
    *state = state.wrapping_mul(RNG_MULTIPLIER).wrapping_add(RNG_INCREMENT);
    lower + (*state % span) as u32
}
