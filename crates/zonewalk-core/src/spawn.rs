//! Agent start positions.
//!
//! A biased pick drops the agent next to a mountain cluster far from the
//! village, where a greedy climber is likely to get trapped. An unbiased
//! pick is a uniform interior cell.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::clusters::Cluster;
use crate::config::LayoutParams;
use crate::generator::Layout;
use crate::grid::Cell;
use crate::zone::ZoneType;

/// Mountain clusters whose centroid lies more than `trap_min_distance` from
/// the village anchor. Empty when the layout has no anchor.
pub fn trap_candidates<'l>(layout: &'l Layout, params: &LayoutParams) -> Vec<&'l Cluster> {
    let Some(anchor) = layout.village_anchor else {
        return Vec::new();
    };
    layout
        .mountain_clusters
        .iter()
        .filter(|c| c.centroid.distance(anchor) > params.trap_min_distance)
        .collect()
}

/// Choose a start cell.
///
/// With `bias_trap`, a random trap cluster is chosen and the start is a
/// random in-bounds Transition 4-neighbour of its centroid. Whenever that is
/// impossible, or without `bias_trap`, the start is uniform over the
/// margin-excluded interior.
pub fn pick<R: Rng + ?Sized>(
    bias_trap: bool,
    layout: &Layout,
    params: &LayoutParams,
    rng: &mut R,
) -> Cell {
    if bias_trap {
        if let Some(cell) = trap_start(layout, params, rng) {
            return cell;
        }
    }
    layout.grid.random_cell(rng, params.margin)
}

fn trap_start<R: Rng + ?Sized>(layout: &Layout, params: &LayoutParams, rng: &mut R) -> Option<Cell> {
    let cluster = trap_candidates(layout, params).choose(rng).copied()?;
    let grid = &layout.grid;
    let open: Vec<Cell> = grid
        .neighbors4(cluster.centroid)
        .filter(|&n| grid.is(n, ZoneType::Transition))
        .collect();
    open.choose(rng).copied()
}
