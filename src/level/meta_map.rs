// src/level/meta_map.rs
//! Randomized room layout over a boolean occupancy grid.
//!
//! Rooms are appended one after another along X (the growth axis). Each room
//! spans a run of rows and a Z range placed so it shares at least two cells
//! with the filled run of the row right before it.

use std::ops::Range;

use bevy::log::{debug, warn};
use rand::Rng;

use super::config::{validate_dimensions, LevelConfig};
use super::error::LevelError;

/// `true` = floor present. Indexed `(x, z)`; rows along X are stored contiguously.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    depth: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, depth: usize) -> Self {
        Self { width, depth, cells: vec![false; width * depth] }
    }

    #[inline]
    pub fn width(&self) -> usize { self.width }

    #[inline]
    pub fn depth(&self) -> usize { self.depth }

    #[inline]
    fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.depth, "cell ({x},{z}) outside grid");
        x * self.depth + z
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> bool {
        self.cells[self.index(x, z)]
    }

    /// Like `get`, but signed and bounds-checked; `None` outside the grid.
    pub fn get_checked(&self, x: i64, z: i64) -> Option<bool> {
        if x < 0 || z < 0 || x >= self.width as i64 || z >= self.depth as i64 {
            return None;
        }
        Some(self.get(x as usize, z as usize))
    }

    #[inline]
    pub fn set(&mut self, x: usize, z: usize, filled: bool) {
        let i = self.index(x, z);
        self.cells[i] = filled;
    }

    /// Mark the rectangle `rows × cols` as floor.
    pub fn fill(&mut self, rows: Range<usize>, cols: Range<usize>) {
        for x in rows {
            let start = self.index(x, 0);
            self.cells[start + cols.start..start + cols.end].fill(true);
        }
    }

    /// All cells of one growth row, ordered by Z.
    pub fn row(&self, x: usize) -> &[bool] {
        let start = self.index(x, 0);
        &self.cells[start..start + self.depth]
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Footprint of one appended room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomSpan {
    /// Growth-axis rows (X).
    pub rows: Range<usize>,
    /// Cross-axis columns (Z).
    pub cols: Range<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// First row not yet claimed by any room.
    pub advanced_rows: usize,
    pub rooms_placed: usize,
    pub rooms_skipped: usize,
    pub filled_cells: usize,
}

/// Result of a layout pass.
#[derive(Clone, Debug)]
pub struct MetaMap {
    pub grid: OccupancyGrid,
    /// Capacity hint for the quad buffer. Never below the real filled-cell count.
    pub quad_upper_bound: usize,
    pub stats: LayoutStats,
    /// Placed rooms in order; diagnostic only.
    pub rooms: Vec<RoomSpan>,
}

/// Why a room iteration left the grid untouched.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSkip {
    #[error("no rows left to grow into (room width {room_width})")]
    NoRows { room_width: i64 },
    #[error("room too shallow (max span {max_span})")]
    TooShallow { max_span: i64 },
    #[error("no placement overlaps the previous room (corner range {min}..={max})")]
    NoOverlap { min: i64, max: i64 },
}

/// Transient counters threaded through room generation.
struct LayoutState {
    advanced_rows: usize,
    num_quads: usize,
    avg_width_per_room: i64,
}

pub struct MetaMapBuilder {
    width: usize,
    depth: usize,
    room_count: usize,
}

impl MetaMapBuilder {
    pub fn new(width: u32, depth: u32, room_count: u32) -> Result<Self, LevelError> {
        validate_dimensions(width, depth, room_count)?;
        Ok(Self {
            width: width as usize,
            depth: depth as usize,
            room_count: room_count as usize,
        })
    }

    pub fn from_config(config: &LevelConfig) -> Result<Self, LevelError> {
        Self::new(config.width, config.depth, config.room_count)
    }

    /// Seed the 2x2 start block, then append `room_count` rooms.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> MetaMap {
        let mut grid = OccupancyGrid::new(self.width, self.depth);
        grid.fill(0..2, 0..2);

        let mut state = LayoutState {
            advanced_rows: 2,
            num_quads: 4,
            avg_width_per_room: if self.room_count == 0 {
                0
            } else {
                ((self.width - 2) / self.room_count) as i64
            },
        };

        let mut rooms = Vec::with_capacity(self.room_count);
        let mut skipped = 0;
        for i in 0..self.room_count {
            match self.add_room(&mut grid, &mut state, rng) {
                Ok(span) => {
                    debug!("Level: room {i} rows {:?} cols {:?}", span.rows, span.cols);
                    rooms.push(span);
                }
                Err(reason) => {
                    warn!("Level: room {i} skipped: {reason}");
                    skipped += 1;
                }
            }
        }

        let stats = LayoutStats {
            advanced_rows: state.advanced_rows,
            rooms_placed: rooms.len(),
            rooms_skipped: skipped,
            filled_cells: grid.filled_count(),
        };

        MetaMap { grid, quad_upper_bound: state.num_quads, stats, rooms }
    }

    fn add_room<R: Rng + ?Sized>(
        &self,
        grid: &mut OccupancyGrid,
        state: &mut LayoutState,
        rng: &mut R,
    ) -> Result<RoomSpan, RoomSkip> {
        let width = self.width as i64;
        let depth = self.depth as i64;
        let advanced = state.advanced_rows as i64;

        // Jitter is -1 or 0, never +1.
        let mut room_width = state.avg_width_per_room + rng.random_range(-1..=0);
        if room_width + advanced > width {
            room_width = width - advanced;
        }
        if room_width <= 0 {
            return Err(RoomSkip::NoRows { room_width });
        }

        let max_span = depth.min(room_width * 4);
        if max_span < 2 {
            return Err(RoomSkip::TooShallow { max_span });
        }
        let span = rng.random_range(2..=max_span);

        let (first, last) = boundary_run(grid.row(state.advanced_rows - 1));

        let corner_min = if span > first + 2 { 0 } else { first + 2 - span };
        let corner_max = if last + span - 2 > depth { depth - span } else { last - 2 };
        if corner_min > corner_max {
            return Err(RoomSkip::NoOverlap { min: corner_min, max: corner_max });
        }
        let first_corner = rng.random_range(corner_min..=corner_max);

        let last_corner = first_corner + span;
        let bottom = advanced + room_width;
        let rows = state.advanced_rows..bottom as usize;
        let cols = first_corner as usize..last_corner as usize;
        grid.fill(rows.clone(), cols.clone());

        state.advanced_rows = bottom as usize;
        // Over-counts on purpose: only sizes the index buffer.
        state.num_quads += (last_corner * bottom) as usize;

        Ok(RoomSpan { rows, cols })
    }
}

/// `(first, last)` of the first filled run in `row`: `first` is its first filled
/// cell, `last` the first empty cell after it (`row.len()` when the run touches
/// the end). An empty row yields `(-1, -1)`.
fn boundary_run(row: &[bool]) -> (i64, i64) {
    let mut first = -1;
    let mut last = -1;
    for (i, &filled) in row.iter().enumerate() {
        if filled && first == -1 {
            first = i as i64;
        }
        if !filled && first != -1 {
            last = i as i64;
            break;
        }
    }
    if first != -1 && last == -1 {
        last = row.len() as i64;
    }
    (first, last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_case::test_case;

    fn build(width: u32, depth: u32, rooms: u32, seed: u64) -> MetaMap {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        MetaMapBuilder::new(width, depth, rooms).unwrap().build(&mut rng)
    }

    #[test_case(2, 2, 0)]
    #[test_case(4, 4, 0)]
    #[test_case(10, 10, 3)]
    #[test_case(32, 16, 6)]
    #[test_case(64, 3, 20)]
    fn seed_block_is_always_filled(width: u32, depth: u32, rooms: u32) {
        for seed in 0..32 {
            let map = build(width, depth, rooms, seed);
            for (x, z) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                assert!(map.grid.get(x, z), "seed cell ({x},{z}) empty for seed {seed}");
            }
        }
    }

    #[test]
    fn no_rooms_leaves_only_the_seed() {
        let map = build(4, 4, 0, 1);
        assert_eq!(map.grid.filled_count(), 4);
        assert_eq!(map.quad_upper_bound, 4);
        assert_eq!(map.stats.advanced_rows, 2);
        assert!(map.rooms.is_empty());
    }

    #[test]
    fn ten_by_ten_three_rooms_stays_in_bounds() {
        for seed in 0..64 {
            let map = build(10, 10, 3, seed);
            assert!(map.stats.advanced_rows <= 10);
            assert_eq!(map.stats.rooms_placed + map.stats.rooms_skipped, 3);
            for room in &map.rooms {
                assert!(room.rows.end <= 10 && room.cols.end <= 10);
                assert!(room.rows.start < room.rows.end);
                assert!(room.cols.len() >= 2);
            }
        }
    }

    #[test_case(10, 10, 3)]
    #[test_case(40, 8, 12)]
    #[test_case(30, 30, 4)]
    #[test_case(12, 2, 10)]
    fn each_room_overlaps_previous_row_by_two(width: u32, depth: u32, rooms: u32) {
        for seed in 0..64 {
            let map = build(width, depth, rooms, seed);
            // Rebuild row by row so later rooms can't mask the boundary row.
            let mut grid = OccupancyGrid::new(width as usize, depth as usize);
            grid.fill(0..2, 0..2);
            for room in &map.rooms {
                let boundary = grid.row(room.rows.start - 1);
                let shared = room.cols.clone().filter(|&z| boundary[z]).count();
                assert!(shared >= 2, "room {room:?} shares {shared} cells (seed {seed})");
                grid.fill(room.rows.clone(), room.cols.clone());
            }
            assert_eq!(grid, map.grid);
        }
    }

    #[test]
    fn rooms_claim_consecutive_rows() {
        let map = build(40, 12, 8, 5);
        let mut next = 2;
        for room in &map.rooms {
            assert_eq!(room.rows.start, next);
            next = room.rows.end;
        }
        assert_eq!(next, map.stats.advanced_rows);
    }

    #[test_case(10, 10, 3)]
    #[test_case(32, 16, 6)]
    #[test_case(100, 50, 20)]
    fn quad_bound_never_undercounts(width: u32, depth: u32, rooms: u32) {
        for seed in 0..32 {
            let map = build(width, depth, rooms, seed);
            assert!(map.quad_upper_bound >= map.grid.filled_count());
            assert_eq!(map.stats.filled_cells, map.grid.filled_count());
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = build(48, 20, 7, 1234);
        let b = build(48, 20, 7, 1234);
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.rooms, b.rooms);
        assert_eq!(a.quad_upper_bound, b.quad_upper_bound);
    }

    #[test]
    fn empty_boundary_row_skips_the_room() {
        let builder = MetaMapBuilder::new(10, 10, 2).unwrap();
        let mut grid = OccupancyGrid::new(10, 10);
        let mut state = LayoutState { advanced_rows: 2, num_quads: 0, avg_width_per_room: 4 };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let err = builder.add_room(&mut grid, &mut state, &mut rng).unwrap_err();
        assert!(matches!(err, RoomSkip::NoOverlap { .. }));
        assert_eq!(grid.filled_count(), 0);
        assert_eq!(state.advanced_rows, 2);
        assert_eq!(state.num_quads, 0);
    }

    #[test]
    fn exhausted_rows_skip_the_room() {
        let builder = MetaMapBuilder::new(4, 4, 1).unwrap();
        let mut grid = OccupancyGrid::new(4, 4);
        grid.fill(0..4, 0..2);
        let mut state = LayoutState { advanced_rows: 4, num_quads: 8, avg_width_per_room: 2 };
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let err = builder.add_room(&mut grid, &mut state, &mut rng).unwrap_err();
        assert_eq!(err, RoomSkip::NoRows { room_width: 0 });
        assert_eq!(grid.filled_count(), 8);
    }

    #[test_case(&[false, false, false], (-1, -1))]
    #[test_case(&[true, true, false, false], (0, 2))]
    #[test_case(&[false, true, true, false, true], (1, 3))]
    #[test_case(&[false, false, true, true], (2, 4))]
    fn boundary_run_finds_first_filled_run(row: &[bool], expected: (i64, i64)) {
        assert_eq!(boundary_run(row), expected);
    }

    #[test]
    fn invalid_dimensions_are_rejected_up_front() {
        assert!(MetaMapBuilder::new(1, 5, 0).is_err());
        assert!(MetaMapBuilder::new(5, 5, 4).is_err());
    }

    #[test]
    fn get_checked_is_none_outside() {
        let grid = OccupancyGrid::new(3, 2);
        assert_eq!(grid.get_checked(-1, 0), None);
        assert_eq!(grid.get_checked(3, 0), None);
        assert_eq!(grid.get_checked(0, 2), None);
        assert_eq!(grid.get_checked(2, 1), Some(false));
    }
}
