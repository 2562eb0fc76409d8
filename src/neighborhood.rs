/// Dimensions of a field, used to clip neighborhoods at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub rows: usize,
    pub cols: usize,
}

impl Bounds {
    pub fn new(rows: usize, cols: usize) -> Self {
        Bounds { rows, cols }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    /// Row-major index of `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    pub fn neighborhood(&self, row: usize, col: usize) -> Neighborhood {
        Neighborhood {
            bounds: *self,
            row,
            col,
            offset: 0,
        }
    }
}

/// The in-bounds cells of the 3x3 block around a cell, itself included.
///
/// Offsets are visited row-major from (-1, -1) to (+1, +1), so the centre is
/// the fifth candidate. Candidates outside the field are skipped. The tie-break
/// in the strategy phase depends on this order.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    bounds: Bounds,
    row: usize,
    col: usize,
    offset: u8,
}

impl Iterator for Neighborhood {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < 9 {
            let dr = (self.offset / 3) as isize - 1;
            let dc = (self.offset % 3) as isize - 1;
            self.offset += 1;

            let r = self.row as isize + dr;
            let c = self.col as isize + dc;
            if self.bounds.contains(r, c) {
                return Some((r as usize, c as usize));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(9 - self.offset as usize))
    }
}
