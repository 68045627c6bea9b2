//! Fixed-size flat 2D grid storage.

use std::ops::{Index, IndexMut};

use thiserror::Error;

/// Errors raised when building a grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid grid dimensions: {width}x{height} (both must be non-zero)")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Cell data length {got} does not match {width}x{height} grid (expected {expected})")]
    LengthMismatch {
        width: usize,
        height: usize,
        expected: usize,
        got: usize,
    },
}

/// Axis-aligned neighbour offsets in a fixed order: east, west, south, north.
///
/// Ties between equally low neighbours resolve to the earliest entry.
pub const NEIGHBORS_4: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A `width × height` field stored row-major in one flat buffer.
///
/// Cell `(x, z)` lives at index `z * width + x`. The size is fixed at
/// construction and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

fn check_dimensions(width: usize, height: usize) -> Result<usize, GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(GridError::InvalidDimensions { width, height })
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        let len = check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![value; len],
        })
    }
}

impl<T> Grid<T> {
    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, GridError> {
        let expected = check_dimensions(width, height)?;
        if cells.len() != expected {
            return Err(GridError::LengthMismatch {
                width,
                height,
                expected,
                got: cells.len(),
            });
        }
        Ok(Self { width, height, cells })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`, never zero).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// A grid of the same dimensions with every cell set to `value`.
    pub fn filled_like<U: Clone>(&self, value: U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: vec![value; self.cells.len()],
        }
    }

    /// Flat index of `(x, z)`. Caller guarantees the coordinate is in range.
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> usize {
        debug_assert!(x < self.width && z < self.height);
        z * self.width + x
    }

    /// Inverse of [`Grid::index`].
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Flat index of `(x, z)` after clamping each coordinate into range.
    #[inline]
    pub fn clamped_index(&self, x: usize, z: usize) -> usize {
        self.index(x.min(self.width - 1), z.min(self.height - 1))
    }

    /// Bounds-checked read.
    pub fn get(&self, x: usize, z: usize) -> Option<&T> {
        if x < self.width && z < self.height {
            Some(&self.cells[self.index(x, z)])
        } else {
            None
        }
    }

    /// Bounds-checked mutable access.
    pub fn get_mut(&mut self, x: usize, z: usize) -> Option<&mut T> {
        if x < self.width && z < self.height {
            let i = self.index(x, z);
            Some(&mut self.cells[i])
        } else {
            None
        }
    }

    /// True for cells on the outer ring of the grid.
    #[inline]
    pub fn is_border(&self, x: usize, z: usize) -> bool {
        x == 0 || z == 0 || x + 1 == self.width || z + 1 == self.height
    }

    /// Flat index of the neighbour at `(dx, dz)`, or `None` past the edge.
    #[inline]
    pub fn neighbor(&self, x: usize, z: usize, dx: isize, dz: isize) -> Option<usize> {
        let nx = x.checked_add_signed(dx)?;
        let nz = z.checked_add_signed(dz)?;
        if nx < self.width && nz < self.height {
            Some(self.index(nx, nz))
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Copy> Grid<T> {
    /// Reads `(x, z)` with both coordinates clamped into range.
    #[inline]
    pub fn at_clamped(&self, x: usize, z: usize) -> T {
        self.cells[self.clamped_index(x, z)]
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl Grid<f64> {
    /// Sum of all cells.
    pub fn sum(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Minimum and maximum cell values.
    pub fn range(&self) -> (f64, f64) {
        self.cells
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, z): (usize, usize)) -> &T {
        assert!(x < self.width && z < self.height, "({x}, {z}) outside {}x{} grid", self.width, self.height);
        &self.cells[z * self.width + x]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, z): (usize, usize)) -> &mut T {
        assert!(x < self.width && z < self.height, "({x}, {z}) outside {}x{} grid", self.width, self.height);
        &mut self.cells[z * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::filled(0, 4, 0.0f64),
            Err(GridError::InvalidDimensions { width: 0, height: 4 })
        );
        assert!(Grid::filled(4, 0, 0.0f64).is_err());
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let err = Grid::from_vec(3, 3, vec![0.0f64; 8]).unwrap_err();
        assert_eq!(
            err,
            GridError::LengthMismatch { width: 3, height: 3, expected: 9, got: 8 }
        );
    }

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_vec(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid[(2, 0)], 2);
        assert_eq!(grid[(0, 1)], 3);
        assert_eq!(grid.index(1, 1), 4);
        assert_eq!(grid.coords(5), (2, 1));
    }

    #[test]
    fn test_clamped_reads() {
        let grid = Grid::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(grid.at_clamped(10, 0), 2.0);
        assert_eq!(grid.at_clamped(0, 99), 3.0);
        assert_eq!(grid.at_clamped(usize::MAX, usize::MAX), 4.0);
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_border_and_neighbors() {
        let grid = Grid::filled(4, 3, 0u8).unwrap();
        assert!(grid.is_border(0, 1));
        assert!(grid.is_border(3, 1));
        assert!(grid.is_border(1, 2));
        assert!(!grid.is_border(1, 1));
        assert!(!grid.is_border(2, 1));

        assert_eq!(grid.neighbor(0, 0, -1, 0), None);
        assert_eq!(grid.neighbor(3, 2, 1, 0), None);
        assert_eq!(grid.neighbor(1, 1, 1, 0), Some(grid.index(2, 1)));
        assert_eq!(grid.neighbor(1, 1, 0, -1), Some(grid.index(1, 0)));
    }

    #[test]
    fn test_sum_and_range() {
        let grid = Grid::from_vec(2, 2, vec![1.0, -2.0, 5.0, 0.5]).unwrap();
        assert_eq!(grid.sum(), 4.5);
        assert_eq!(grid.range(), (-2.0, 5.0));
    }
}
