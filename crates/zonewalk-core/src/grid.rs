use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::zone::{ZoneType, OUT_OF_BOUNDS_SCORE};

/// Unit steps in the order agents scan them: up, down, left, right.
pub const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// An integer grid coordinate. `x` is the column, `y` the row.
/// Signed so that stepping off the edge produces a rejectable value
/// instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance in cells.
    pub fn distance(self, other: Cell) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A cell paired with a ranking value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCell {
    pub cell: Cell,
    pub score: f64,
}

/// Fixed-size zone map, row-major. Every cell always holds a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneGrid {
    /// Row-major zone values, `rows * cols` long.
    cells: Vec<ZoneType>,
    rows: usize,
    cols: usize,
}

impl ZoneGrid {
    /// Create a grid filled with `fill`.
    pub fn new(rows: usize, cols: usize, fill: ZoneType) -> Self {
        Self { cells: vec![fill; rows * cols], rows, cols }
    }

    /// Create an all-Transition grid.
    pub fn blank(rows: usize, cols: usize) -> Self {
        Self::new(rows, cols, ZoneType::Transition)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[ZoneType] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.cols && (cell.y as usize) < self.rows
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.cols + cell.x as usize)
    }

    /// Zone at `cell`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, cell: Cell) -> Option<ZoneType> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Whether `cell` is inside the grid and holds `zone`.
    #[inline]
    pub fn is(&self, cell: Cell, zone: ZoneType) -> bool {
        self.get(cell) == Some(zone)
    }

    /// Overwrite the zone at `cell`. Returns `false` (and changes nothing)
    /// when `cell` is outside the grid.
    pub fn set(&mut self, cell: Cell, zone: ZoneType) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.cells[i] = zone;
                true
            }
            None => false,
        }
    }

    /// Score of the zone at `cell`; [`OUT_OF_BOUNDS_SCORE`] outside the grid.
    #[inline]
    pub fn score(&self, cell: Cell) -> i32 {
        self.get(cell).map_or(OUT_OF_BOUNDS_SCORE, ZoneType::score)
    }

    /// In-bounds 4-neighbours of `cell`, in [`DIRECTIONS`] order.
    pub fn neighbors4(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        DIRECTIONS
            .iter()
            .map(move |&(dx, dy)| cell.offset(dx, dy))
            .filter(move |&n| self.contains(n))
    }

    /// Every coordinate, row-major.
    pub fn coords(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols as i32;
        (0..self.rows as i32).flat_map(move |y| (0..cols).map(move |x| Cell::new(x, y)))
    }

    /// Number of cells holding `zone`.
    pub fn count(&self, zone: ZoneType) -> usize {
        self.cells.iter().filter(|&&z| z == zone).count()
    }

    /// Grid center, rounded down.
    pub fn center(&self) -> Cell {
        Cell::new((self.cols / 2) as i32, (self.rows / 2) as i32)
    }

    /// Uniformly random cell at least `inset` cells from every edge (x drawn
    /// first). Falls back to the full axis when it is too short for `inset`.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R, inset: usize) -> Cell {
        let x = random_coord(rng, self.cols, inset);
        let y = random_coord(rng, self.rows, inset);
        Cell::new(x, y)
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [ZoneType] {
        &mut self.cells
    }
}

fn random_coord<R: Rng + ?Sized>(rng: &mut R, len: usize, inset: usize) -> i32 {
    if len == 0 {
        0
    } else if 2 * inset < len {
        rng.gen_range(inset..len - inset) as i32
    } else {
        rng.gen_range(0..len) as i32
    }
}

/// Build a grid from rows of glyphs: `.` Transition, `V` Village,
/// `D` Drought, `M` Mountain.
#[cfg(test)]
pub(crate) fn grid_from_ascii(rows: &[&str]) -> ZoneGrid {
    let cols = rows.first().map_or(0, |r| r.len());
    let mut grid = ZoneGrid::blank(rows.len(), cols);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), cols, "ragged test grid at row {y}");
        for (x, ch) in row.chars().enumerate() {
            let zone = match ch {
                '.' => ZoneType::Transition,
                'V' => ZoneType::Village,
                'D' => ZoneType::Drought,
                'M' => ZoneType::Mountain,
                other => panic!("unknown glyph {other:?}"),
            };
            grid.set(Cell::new(x as i32, y as i32), zone);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut grid = ZoneGrid::blank(3, 4);
        for cell in [Cell::new(-1, 0), Cell::new(0, -1), Cell::new(4, 0), Cell::new(0, 3)] {
            assert_eq!(grid.get(cell), None, "{cell:?} should be outside");
            assert_eq!(grid.score(cell), OUT_OF_BOUNDS_SCORE);
            assert!(!grid.set(cell, ZoneType::Village));
        }
        assert_eq!(grid.count(ZoneType::Village), 0);
    }

    #[test]
    fn set_then_get_uses_column_major_x() {
        let mut grid = ZoneGrid::blank(3, 5);
        assert!(grid.set(Cell::new(4, 1), ZoneType::Mountain));
        assert_eq!(grid.get(Cell::new(4, 1)), Some(ZoneType::Mountain));
        assert_eq!(grid.cells()[5 + 4], ZoneType::Mountain);
        assert_eq!(grid.score(Cell::new(4, 1)), 80);
    }

    #[test]
    fn corner_has_two_neighbours_in_scan_order() {
        let grid = ZoneGrid::blank(3, 3);
        let corner: Vec<Cell> = grid.neighbors4(Cell::new(0, 0)).collect();
        assert_eq!(corner, vec![Cell::new(0, 1), Cell::new(1, 0)]);
        let middle: Vec<Cell> = grid.neighbors4(Cell::new(1, 1)).collect();
        assert_eq!(
            middle,
            vec![Cell::new(1, 0), Cell::new(1, 2), Cell::new(0, 1), Cell::new(2, 1)]
        );
    }

    #[test]
    fn coords_cover_grid_row_major() {
        let grid = ZoneGrid::blank(2, 3);
        let all: Vec<Cell> = grid.coords().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], Cell::new(0, 0));
        assert_eq!(all[3], Cell::new(0, 1));
    }

    #[test]
    fn ascii_helper_parses_glyphs() {
        let grid = grid_from_ascii(&[".V", "DM"]);
        assert_eq!(grid.get(Cell::new(1, 0)), Some(ZoneType::Village));
        assert_eq!(grid.get(Cell::new(0, 1)), Some(ZoneType::Drought));
        assert_eq!(grid.get(Cell::new(1, 1)), Some(ZoneType::Mountain));
    }

    #[test]
    fn random_cell_respects_inset() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let grid = ZoneGrid::blank(30, 30);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let c = grid.random_cell(&mut rng, 2);
            assert!((2..=27).contains(&c.x) && (2..=27).contains(&c.y), "{c:?} inside margin");
        }
        // Inset too large for a 3-wide grid: any cell will do.
        let small = ZoneGrid::blank(3, 3);
        for _ in 0..50 {
            assert!(small.contains(small.random_cell(&mut rng, 2)));
        }
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((Cell::new(0, 0).distance(Cell::new(3, 4)) - 5.0).abs() < 1e-12);
    }
}
