//! Settlement placement: 2×2 big houses on the best village ground, then
//! scattered 1×1 small houses filtered by coordinate hash.
//!
//! Both passes are greedy over a ranked candidate list and stop early when
//! candidates run out, so fewer houses than requested is a normal result.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SettlementParams;
use crate::grid::{Cell, ScoredCell, ZoneGrid};
use crate::growth::ReservedArea;
use crate::hash::{cell_noise, SMALL_HOUSE_SALT};
use crate::zone::ZoneType;

/// Big-house scoring window around an anchor: offsets `-2..=3` cover the
/// 2×2 footprint plus a two-cell ring.
const WINDOW_MIN: i32 = -2;
const WINDOW_MAX: i32 = 3;

/// Penalty per Drought or Mountain cell in the scoring window.
const HOSTILE_PENALTY: f64 = 0.5;

/// Chosen house positions. Big houses are identified by the top-left cell
/// of their 2×2 footprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub big_houses: Vec<Cell>,
    pub small_houses: Vec<Cell>,
}

pub(crate) fn in_any_footprint(anchors: &[Cell], cell: Cell) -> bool {
    anchors
        .iter()
        .any(|a| cell.x >= a.x && cell.x <= a.x + 1 && cell.y >= a.y && cell.y <= a.y + 1)
}

/// True if the 2×2 block anchored at `anchor` is entirely Village.
pub fn fits_big_house(grid: &ZoneGrid, anchor: Cell) -> bool {
    [(0, 0), (1, 0), (0, 1), (1, 1)]
        .iter()
        .all(|&(dx, dy)| grid.is(anchor.offset(dx, dy), ZoneType::Village))
}

/// Village density around a big-house anchor, penalising hostile ground.
pub fn village_score(grid: &ZoneGrid, anchor: Cell) -> f64 {
    let mut score = 0.0;
    for dy in WINDOW_MIN..=WINDOW_MAX {
        for dx in WINDOW_MIN..=WINDOW_MAX {
            score += match grid.get(anchor.offset(dx, dy)) {
                Some(ZoneType::Village) => 1.0,
                Some(ZoneType::Drought) | Some(ZoneType::Mountain) => -HOSTILE_PENALTY,
                Some(ZoneType::Transition) | None => 0.0,
            };
        }
    }
    score
}

/// All valid big-house anchors, best first. Equal scores keep row-major order.
pub fn big_house_candidates(grid: &ZoneGrid) -> Vec<ScoredCell> {
    let mut candidates: Vec<ScoredCell> = grid
        .coords()
        .filter(|&c| fits_big_house(grid, c))
        .map(|cell| ScoredCell { cell, score: village_score(grid, cell) })
        .collect();
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates
}

/// Choose big and small houses on `grid`.
///
/// Small houses avoid the top-left safe corner described by `reserve`.
pub fn plan_settlements(
    grid: &ZoneGrid,
    params: &SettlementParams,
    reserve: ReservedArea,
) -> SettlementPlan {
    let mut big_houses: Vec<Cell> = Vec::with_capacity(params.max_big);
    for candidate in big_house_candidates(grid) {
        if big_houses.len() >= params.max_big {
            break;
        }
        let spaced = big_houses
            .iter()
            .all(|&b| b.distance(candidate.cell) >= params.min_big_spacing);
        if spaced {
            big_houses.push(candidate.cell);
        }
    }

    let mut small_candidates: Vec<ScoredCell> = grid
        .coords()
        .filter(|&c| {
            grid.is(c, ZoneType::Village)
                && !reserve.in_safe_corner(c)
                && !in_any_footprint(&big_houses, c)
        })
        .map(|cell| ScoredCell { cell, score: cell_noise(cell.x, cell.y, SMALL_HOUSE_SALT) })
        .filter(|c| c.score < params.small_house_threshold)
        .collect();
    small_candidates.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut small_houses: Vec<Cell> = Vec::with_capacity(params.max_small);
    for candidate in small_candidates {
        if small_houses.len() >= params.max_small {
            break;
        }
        let c = candidate.cell;
        let far_from_big = big_houses.iter().all(|&b| b.distance(c) >= params.min_small_to_big);
        let far_from_small = small_houses.iter().all(|&h| h.distance(c) >= params.min_small_spacing);
        if far_from_big && far_from_small {
            small_houses.push(c);
        }
    }

    debug!(
        big = big_houses.len(),
        small = small_houses.len(),
        "settlements planned"
    );
    SettlementPlan { big_houses, small_houses }
}
