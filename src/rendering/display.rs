//! Row-major 2D grid.
//!
//! [`Display`] is the storage behind the [`PixelBuffer`]: a contiguous `Vec` laid out
//! row by row (`y * width + x`), with every coordinate access bounds-checked on both
//! axes.
//!
//! [`PixelBuffer`]: crate::rendering::buffer::PixelBuffer

use std::fmt;
use std::fmt::{Debug, Formatter};

/// A fixed-size 2D grid of `T`.
///
/// # Example
///
/// ```rust
/// use tir::rendering::display::Display;
///
/// let mut display = Display::new(4, 3, 0u8);
/// *display.get_mut(3, 2).unwrap() = 7;
///
/// assert_eq!(display.get(3, 2), Some(&7));
/// // x past the end of a row does not wrap into the next row
/// assert_eq!(display.get(4, 1), None);
/// ```
pub struct Display<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Debug> Debug for Display<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Display {{ width: {}, height: {}, cells: {:?} }}",
            self.width, self.height, self.cells
        )
    }
}

impl<T> Default for Display<T> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }
}

impl<T: Clone> Display<T> {
    /// Creates a `width` x `height` grid with every cell set to `value`.
    pub fn new(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        for cell in self.cells.iter_mut() {
            *cell = value.clone();
        }
    }
}

impl<T> Display<T> {
    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells, always `width * height`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(x, y)`, or `None` if either coordinate is out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Returns the cell at `(x, y)` mutably, or `None` if either coordinate is out of bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        self.index(x, y).map(move |idx| &mut self.cells[idx])
    }

    /// Returns row `y` as a slice.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Iterates over all cells in row-major order together with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx % width, idx / width, cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_on_both_axes() {
        let mut display = Display::new(3, 2, 'a');
        assert!(display.get(2, 1).is_some());
        assert!(display.get(3, 0).is_none());
        assert!(display.get(0, 2).is_none());
        assert!(display.get_mut(usize::MAX, 0).is_none());
        assert_eq!(display.len(), 6);
    }

    #[test]
    fn test_row_major_layout() {
        let mut display = Display::new(3, 2, 0);
        *display.get_mut(1, 1).unwrap() = 5;
        assert_eq!(display.row(1), Some(&[0, 5, 0][..]));
        assert_eq!(display.row(2), None);

        let coords: Vec<_> = display.iter().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_fill_and_empty() {
        let mut display = Display::new(2, 2, 1);
        display.fill(9);
        assert!(display.iter().all(|(_, _, v)| *v == 9));
        assert!(Display::<u8>::default().is_empty());
    }
}
