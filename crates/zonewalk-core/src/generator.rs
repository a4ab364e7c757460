//! Layout orchestrator: runs every terrain stage in order and derives the
//! placement metadata agents and renderers read.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clusters::{find_clusters, Cluster};
use crate::config::{LayoutParams, RegionParams};
use crate::error::ConfigError;
use crate::grid::{Cell, ZoneGrid};
use crate::growth::{grow_region, GrowthRequest, ReservedArea};
use crate::settlements::{in_any_footprint, plan_settlements};
use crate::smoothing::smooth;
use crate::zone::ZoneType;

/// Mixed into user seeds so nearby seeds still give unrelated streams.
const SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

// ── Public structs ────────────────────────────────────────────────────────────

/// Complete terrain state produced by one generation.
///
/// Built in full before it is returned, then shared read-only: the grid sits
/// behind an `Arc` that agents clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub grid: Arc<ZoneGrid>,
    /// Mountain clusters of the final (smoothed) grid.
    pub mountain_clusters: Vec<Cluster>,
    /// Top-left anchors of 2×2 big-house footprints.
    pub big_houses: Vec<Cell>,
    pub small_houses: Vec<Cell>,
    /// Seed cell of the main village, if the layout was grown.
    pub village_anchor: Option<Cell>,
}

impl Layout {
    /// Derive clusters and settlements for an existing grid, e.g. a
    /// hand-authored map. No village anchor is known for such a grid.
    pub fn from_grid(grid: ZoneGrid, params: &LayoutParams) -> Self {
        let reserve = ReservedArea::new(params.margin, params.safe_corner);
        let plan = plan_settlements(&grid, &params.settlements, reserve);
        let mountain_clusters = find_clusters(&grid, ZoneType::Mountain);
        Self {
            grid: Arc::new(grid),
            mountain_clusters,
            big_houses: plan.big_houses,
            small_houses: plan.small_houses,
            village_anchor: None,
        }
    }

    /// Whether a house occupies `cell`.
    pub fn is_occupied(&self, cell: Cell) -> bool {
        in_any_footprint(&self.big_houses, cell) || self.small_houses.contains(&cell)
    }
}

/// RNG for a generation run: seeded when `seed` is given, fresh entropy
/// otherwise.
pub fn layout_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s ^ SEED_SALT),
        None => StdRng::from_entropy(),
    }
}

// ── Orchestrator ──────────────────────────────────────────────────────────────

/// Validated layout pipeline.
#[derive(Debug, Clone)]
pub struct LayoutGenerator {
    params: LayoutParams,
}

impl LayoutGenerator {
    pub fn new(params: LayoutParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Run the full pipeline.
    ///
    /// Pipeline order:
    ///   1. Mountains
    ///   2. Mountain clusters (to keep the village clear of them)
    ///   3. Main village
    ///   4. Drought patches
    ///   5. Smoothing
    ///   6. Settlements
    ///   7. Mountain clusters on the final grid
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Layout {
        let p = &self.params;
        let reserve = ReservedArea::new(p.margin, p.safe_corner);
        let mut grid = ZoneGrid::blank(p.rows, p.cols);

        // ── 1. Mountains ────────────────────────────────────────────────────
        grow_family(&mut grid, rng, reserve, ZoneType::Mountain, &p.mountains, p.margin);

        // ── 2. Early clusters ───────────────────────────────────────────────
        let early_clusters = find_clusters(&grid, ZoneType::Mountain);

        // ── 3. Village ──────────────────────────────────────────────────────
        let anchor = choose_village_seed(&grid, &early_clusters, p, reserve, rng);
        let seeds = [anchor];
        grow_region(
            &mut grid,
            rng,
            reserve,
            &GrowthRequest {
                zone: ZoneType::Village,
                seeds: &seeds,
                target: p.village.target_cells,
                bias: p.village.bias,
            },
        );

        // ── 4. Droughts ─────────────────────────────────────────────────────
        grow_family(&mut grid, rng, reserve, ZoneType::Drought, &p.droughts, p.margin);

        // ── 5. Smoothing ────────────────────────────────────────────────────
        smooth(&mut grid, p.smoothing_iterations);

        // ── 6 & 7. Settlements and final clusters ───────────────────────────
        let mut layout = Layout::from_grid(grid, p);
        layout.village_anchor = Some(anchor);

        info!(
            rows = p.rows,
            cols = p.cols,
            mountains = layout.mountain_clusters.len(),
            village_cells = layout.grid.count(ZoneType::Village),
            big_houses = layout.big_houses.len(),
            small_houses = layout.small_houses.len(),
            "layout generated"
        );
        layout
    }
}

/// Validate `params` and generate one layout.
pub fn generate_layout<R: Rng + ?Sized>(
    params: &LayoutParams,
    rng: &mut R,
) -> Result<Layout, ConfigError> {
    Ok(LayoutGenerator::new(params.clone())?.generate(rng))
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Grow `family.count` independent regions, each from one seed.
fn grow_family<R: Rng + ?Sized>(
    grid: &mut ZoneGrid,
    rng: &mut R,
    reserve: ReservedArea,
    zone: ZoneType,
    family: &RegionParams,
    margin: usize,
) {
    for _ in 0..family.count {
        let seed = grid.random_cell(rng, margin);
        let target = rng.gen_range(family.min_cells..=family.max_cells);
        let seeds = [seed];
        grow_region(grid, rng, reserve, &GrowthRequest { zone, seeds: &seeds, target, bias: family.bias });
    }
}

/// First random inset cell outside the reserved area and far enough from
/// every mountain centroid. Falls back to the grid center, or to the first
/// unreserved cell when the center itself is reserved.
fn choose_village_seed<R: Rng + ?Sized>(
    grid: &ZoneGrid,
    clusters: &[Cluster],
    params: &LayoutParams,
    reserve: ReservedArea,
    rng: &mut R,
) -> Cell {
    let village = &params.village;
    for _ in 0..village.attempts {
        let candidate = grid.random_cell(rng, village.inset);
        if reserve.contains(candidate, grid) {
            continue;
        }
        let clear = clusters
            .iter()
            .all(|m| candidate.distance(m.centroid) >= village.min_mountain_distance);
        if clear {
            return candidate;
        }
    }
    let center = grid.center();
    if !reserve.contains(center, grid) {
        return center;
    }
    grid.coords().find(|&c| !reserve.contains(c, grid)).unwrap_or(center)
}

// ── Unit tests ────────────────────────────────────────────────────────────────
