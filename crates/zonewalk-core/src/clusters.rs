//! Connected-component extraction (4-connectivity) by breadth-first flood fill.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, ZoneGrid};
use crate::zone::ZoneType;

/// A maximal 4-connected group of same-zone cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub zone: ZoneType,
    /// Members in flood-fill visiting order; the first is the discovery cell.
    pub cells: Vec<Cell>,
    /// Mean member coordinate, rounded half-up per axis.
    pub centroid: Cell,
}

impl Cluster {
    pub fn size(&self) -> usize {
        self.cells.len()
    }
}

/// Every cluster of `zone`, in row-major order of discovery.
pub fn find_clusters(grid: &ZoneGrid, zone: ZoneType) -> Vec<Cluster> {
    let cols = grid.cols();
    let mut visited = vec![false; grid.rows() * cols];
    let idx = |c: Cell| c.y as usize * cols + c.x as usize;
    let mut clusters = Vec::new();
    let mut queue = VecDeque::new();

    for start in grid.coords() {
        if visited[idx(start)] || !grid.is(start, zone) {
            continue;
        }
        visited[idx(start)] = true;
        queue.push_back(start);

        let mut cells = Vec::new();
        let (mut sum_x, mut sum_y) = (0i64, 0i64);
        while let Some(cell) = queue.pop_front() {
            sum_x += cell.x as i64;
            sum_y += cell.y as i64;
            cells.push(cell);
            for n in grid.neighbors4(cell) {
                if !visited[idx(n)] && grid.is(n, zone) {
                    visited[idx(n)] = true;
                    queue.push_back(n);
                }
            }
        }

        let count = cells.len() as f64;
        let centroid = Cell::new(
            round_half_up(sum_x as f64 / count),
            round_half_up(sum_y as f64 / count),
        );
        clusters.push(Cluster { zone, cells, centroid });
    }

    clusters
}

fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
