//! Stochastic frontier expansion used to carve mountains, villages and
//! drought patches.
//!
//! Each step picks a random painted frontier cell and a random 4-neighbour
//! of it. The neighbour is painted when it is Transition and a `bias` coin
//! lands, or (for any other foreign zone) when a small override coin lands,
//! so regions can eat into each other. Every step may also retire the
//! picked frontier cell, which keeps shapes ragged instead of circular and
//! guarantees termination. Falling short of the target is normal.

use rand::Rng;
use tracing::debug;

use crate::grid::{Cell, ZoneGrid};
use crate::zone::ZoneType;

/// Chance that a non-Transition foreign cell is painted over when proposed.
pub const OVERRIDE_CHANCE: f64 = 0.05;

/// Chance per step that the picked frontier cell is retired.
pub const FRONTIER_DROP_CHANCE: f64 = 0.05;

/// Cells region growth must never paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedArea {
    /// Width of the border ring.
    pub margin: usize,
    /// Side of the square kept clear in the top-left corner.
    pub safe_corner: usize,
}

impl ReservedArea {
    pub fn new(margin: usize, safe_corner: usize) -> Self {
        Self { margin, safe_corner }
    }

    /// Nothing reserved.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    pub fn in_margin(&self, cell: Cell, grid: &ZoneGrid) -> bool {
        let m = self.margin as i64;
        let (x, y) = (cell.x as i64, cell.y as i64);
        x < m || y < m || x >= grid.cols() as i64 - m || y >= grid.rows() as i64 - m
    }

    pub fn in_safe_corner(&self, cell: Cell) -> bool {
        let s = self.safe_corner as i64;
        (cell.x as i64) < s && (cell.y as i64) < s
    }

    pub fn contains(&self, cell: Cell, grid: &ZoneGrid) -> bool {
        self.in_margin(cell, grid) || self.in_safe_corner(cell)
    }
}

/// What to paint and how far to grow it.
#[derive(Debug, Clone, Copy)]
pub struct GrowthRequest<'s> {
    pub zone: ZoneType,
    pub seeds: &'s [Cell],
    /// Maximum number of cells this request paints, seeds included.
    pub target: usize,
    /// Probability of painting a proposed Transition cell.
    pub bias: f64,
}

/// An in-progress region growth. Drive it with [`RegionGrowth::step`] or
/// run it to completion with [`RegionGrowth::run`].
pub struct RegionGrowth<'g, 'r, R: Rng + ?Sized> {
    grid: &'g mut ZoneGrid,
    rng: &'r mut R,
    reserve: ReservedArea,
    zone: ZoneType,
    bias: f64,
    target: usize,
    frontier: Vec<Cell>,
    painted: usize,
}

impl<'g, 'r, R: Rng + ?Sized> RegionGrowth<'g, 'r, R> {
    /// Paint the usable seeds and set up the frontier.
    ///
    /// Seeds outside the grid, inside the reserved area, or already of the
    /// requested zone are skipped; seeds beyond `target` are ignored.
    pub fn new(
        grid: &'g mut ZoneGrid,
        rng: &'r mut R,
        reserve: ReservedArea,
        request: &GrowthRequest<'_>,
    ) -> Self {
        let bias = if request.bias.is_nan() { 0.0 } else { request.bias.clamp(0.0, 1.0) };
        // A region never holds more cells than the grid.
        let capacity = request.target.min(grid.rows() * grid.cols());
        let mut growth = Self {
            grid,
            rng,
            reserve,
            zone: request.zone,
            bias,
            target: request.target,
            frontier: Vec::with_capacity(capacity),
            painted: 0,
        };
        for &seed in request.seeds {
            if growth.painted >= growth.target {
                break;
            }
            if growth.paintable(seed) {
                growth.paint(seed);
            }
        }
        growth
    }

    /// Cells painted so far by this growth.
    pub fn painted(&self) -> usize {
        self.painted
    }

    pub fn is_done(&self) -> bool {
        self.frontier.is_empty() || self.painted >= self.target
    }

    fn paintable(&self, cell: Cell) -> bool {
        match self.grid.get(cell) {
            Some(zone) => zone != self.zone && !self.reserve.contains(cell, self.grid),
            None => false,
        }
    }

    fn paint(&mut self, cell: Cell) {
        self.grid.set(cell, self.zone);
        self.frontier.push(cell);
        self.painted += 1;
    }

    /// Perform one expansion attempt. Returns `false` once growth is over.
    pub fn step(&mut self) -> bool {
        if self.is_done() {
            return false;
        }

        let idx = self.rng.gen_range(0..self.frontier.len());
        let from = self.frontier[idx];

        let n = self.grid.neighbors4(from).count();
        if n == 0 {
            // 1×1 grid: nothing can ever grow from here.
            self.frontier.swap_remove(idx);
            return true;
        }
        let pick = self.rng.gen_range(0..n);
        let candidate = self.grid.neighbors4(from).nth(pick);

        if let Some(cell) = candidate.filter(|&c| self.paintable(c)) {
            let current = self.grid.get(cell);
            let allow = (current == Some(ZoneType::Transition) && self.rng.gen_bool(self.bias))
                || self.rng.gen_bool(OVERRIDE_CHANCE);
            if allow {
                self.paint(cell);
            }
        }

        if self.rng.gen_bool(FRONTIER_DROP_CHANCE) {
            self.frontier.swap_remove(idx);
        }
        true
    }

    /// Step until the target is met or the frontier empties.
    /// Returns the number of cells painted.
    pub fn run(mut self) -> usize {
        while self.step() {}
        self.painted
    }
}

/// Grow one region on `grid`. Returns the number of cells painted, which
/// may be below `request.target`.
pub fn grow_region<R: Rng + ?Sized>(
    grid: &mut ZoneGrid,
    rng: &mut R,
    reserve: ReservedArea,
    request: &GrowthRequest<'_>,
) -> usize {
    let painted = RegionGrowth::new(grid, rng, reserve, request).run();
    debug!(
        zone = %request.zone,
        painted,
        target = request.target,
        "region growth finished"
    );
    painted
}
