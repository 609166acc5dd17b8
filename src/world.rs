//! Contracts for the data being visualized.

use crate::cell::Cell;

/// A finite grid of cells addressed by integer world coordinates.
///
/// `cell` returns `None` for positions outside the world; those screen
/// cells keep whatever background the buffer already has.
pub trait WorldSource {
    fn width(&self) -> i64;
    fn height(&self) -> i64;
    fn cell(&self, x: i64, y: i64) -> Option<Cell>;

    #[must_use]
    fn contains(&self, x: i64, y: i64) -> bool {
        (0..self.width()).contains(&x) && (0..self.height()).contains(&y)
    }
}

impl<T: WorldSource + ?Sized> WorldSource for &T {
    fn width(&self) -> i64 {
        (**self).width()
    }

    fn height(&self) -> i64 {
        (**self).height()
    }

    fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        (**self).cell(x, y)
    }
}

/// Text shown for the world cell under the mouse.
///
/// Returning `None` or an empty string hides the tooltip.
pub type TooltipProvider = Box<dyn Fn(i64, i64) -> Option<String>>;

/// A world backed by a row-major `Vec<Cell>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridWorld {
    width: i64,
    height: i64,
    cells: Vec<Cell>,
}

impl GridWorld {
    /// Build a world by evaluating `f` for every cell.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(i64, i64) -> Cell) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..i64::from(height) {
            for x in 0..i64::from(width) {
                cells.push(f(x, y));
            }
        }
        Self {
            width: i64::from(width),
            height: i64::from(height),
            cells,
        }
    }

    /// A world where every cell is `cell`.
    #[must_use]
    pub fn filled(width: u32, height: u32, cell: Cell) -> Self {
        Self::from_fn(width, height, |_, _| cell)
    }
}

impl WorldSource for GridWorld {
    fn width(&self) -> i64 {
        self.width
    }

    fn height(&self) -> i64 {
        self.height
    }

    fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        if !self.contains(x, y) {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }
}
