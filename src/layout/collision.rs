// Collision index for one layout pass.
//
// Committed boxes are bucketed in a uniform hash grid so a query only tests
// boxes in the cells it touches.

use std::collections::{HashMap, HashSet};

use super::Rect;

const MIN_CELL: f32 = 16.0;
/// Boxes spanning more cells than this skip the grid and are always tested.
const MAX_CELLS_PER_BOX: i64 = 4096;

#[derive(Debug, Clone)]
pub struct CollisionIndex {
    cell: f32,
    boxes: Vec<Rect>,
    cells: HashMap<(i32, i32), Vec<usize>>,
    oversized: Vec<usize>,
}

impl CollisionIndex {
    /// `cell` should be close to the size of a typical box.
    pub fn new(cell: f32) -> Self {
        let cell = if cell.is_finite() {
            cell.max(MIN_CELL)
        } else {
            MIN_CELL
        };
        Self {
            cell,
            boxes: Vec::new(),
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[Rect] {
        &self.boxes
    }

    fn cell_span(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let x0 = (rect.x / self.cell).floor() as i32;
        let y0 = (rect.y / self.cell).floor() as i32;
        let x1 = (rect.right() / self.cell).floor() as i32;
        let y1 = (rect.bottom() / self.cell).floor() as i32;
        (x0, y0, x1, y1)
    }

    fn span_is_oversized(span: (i32, i32, i32, i32)) -> bool {
        let (x0, y0, x1, y1) = span;
        let cols = x1 as i64 - x0 as i64 + 1;
        let rows = y1 as i64 - y0 as i64 + 1;
        cols * rows > MAX_CELLS_PER_BOX
    }

    /// Add a box to the index. Commits are never undone within a pass.
    pub fn commit(&mut self, rect: Rect) {
        let idx = self.boxes.len();
        self.boxes.push(rect);
        let span = self.cell_span(&rect);
        if Self::span_is_oversized(span) {
            self.oversized.push(idx);
            return;
        }
        let (x0, y0, x1, y1) = span;
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                self.cells.entry((ix, iy)).or_default().push(idx);
            }
        }
    }

    /// Indices of committed boxes that could overlap `rect`.
    fn candidates(&self, rect: &Rect) -> Vec<usize> {
        let span = self.cell_span(rect);
        if Self::span_is_oversized(span) {
            return (0..self.boxes.len()).collect();
        }
        let (x0, y0, x1, y1) = span;
        let mut seen = HashSet::new();
        let mut out: Vec<usize> = self.oversized.clone();
        seen.extend(self.oversized.iter().copied());
        for ix in x0..=x1 {
            for iy in y0..=y1 {
                if let Some(indices) = self.cells.get(&(ix, iy)) {
                    for &idx in indices {
                        if seen.insert(idx) {
                            out.push(idx);
                        }
                    }
                }
            }
        }
        out
    }

    pub fn overlaps_any(&self, rect: &Rect) -> bool {
        self.candidates(rect)
            .into_iter()
            .any(|idx| self.boxes[idx].overlaps(rect))
    }

    /// True when `rect` lies inside `bounds` and is clear of every committed box.
    pub fn fits(&self, rect: &Rect, bounds: &Rect) -> bool {
        self.fits_with_clearance(rect, bounds, 0.0)
    }

    /// Like [`fits`](Self::fits), but the overlap test uses `rect` grown by
    /// `clearance` on every side. Containment still uses the bare `rect`.
    pub fn fits_with_clearance(&self, rect: &Rect, bounds: &Rect, clearance: f32) -> bool {
        bounds.contains_rect(rect) && !self.overlaps_any(&rect.inflate(clearance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Rect {
        Rect::new(0.0, 0.0, 200.0, 200.0)
    }

    #[test]
    fn empty_index_accepts_in_bounds_box() {
        let index = CollisionIndex::new(32.0);
        assert!(index.fits(&Rect::new(10.0, 10.0, 20.0, 20.0), &canvas()));
    }

    #[test]
    fn out_of_bounds_box_never_fits() {
        let index = CollisionIndex::new(32.0);
        assert!(!index.fits(&Rect::new(190.0, 10.0, 20.0, 20.0), &canvas()));
        assert!(!index.fits(&Rect::new(-1.0, 10.0, 20.0, 20.0), &canvas()));
    }

    #[test]
    fn committed_box_blocks_overlapping_candidate() {
        let mut index = CollisionIndex::new(32.0);
        index.commit(Rect::new(50.0, 50.0, 40.0, 20.0));
        assert!(!index.fits(&Rect::new(60.0, 55.0, 40.0, 20.0), &canvas()));
        assert!(index.fits(&Rect::new(120.0, 120.0, 40.0, 20.0), &canvas()));
    }

    #[test]
    fn touching_edges_are_allowed() {
        let mut index = CollisionIndex::new(32.0);
        index.commit(Rect::new(50.0, 50.0, 40.0, 20.0));
        assert!(index.fits(&Rect::new(90.0, 50.0, 40.0, 20.0), &canvas()));
        assert!(index.fits(&Rect::new(50.0, 70.0, 40.0, 20.0), &canvas()));
    }

    #[test]
    fn oversized_box_is_still_found() {
        let mut index = CollisionIndex::new(16.0);
        index.commit(Rect::new(-5000.0, -5000.0, 10000.0, 10000.0));
        assert!(index.overlaps_any(&Rect::new(10.0, 10.0, 1.0, 1.0)));
    }

    #[test]
    fn box_spanning_many_cells_is_found_from_any_cell() {
        let mut index = CollisionIndex::new(16.0);
        index.commit(Rect::new(0.0, 0.0, 150.0, 10.0));
        assert!(index.overlaps_any(&Rect::new(140.0, 2.0, 4.0, 4.0)));
        assert!(!index.overlaps_any(&Rect::new(140.0, 20.0, 4.0, 4.0)));
    }
}
