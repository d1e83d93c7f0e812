pub mod cell;

use std::collections::VecDeque;

pub use cell::{Cell, Direction, Neighbor, Walls};

use crate::error::{MazeError, Result};

/// The grid model: an R x C rectangle of cells with passages between adjacent cells.
///
/// Cells are addressed by their row-major index `row * cols + col`. The entrance is the
/// top-left cell and the exit the bottom-right one.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    cells: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Largest accepted row or column count.
    pub const MAX_DIMENSION: usize = u8::MAX as usize;
    /// Upper bound of the cell size hint, and the total size budget it divides.
    const MAX_CELL_SIZE: usize = 20;
    const DISPLAY_BUDGET: usize = 500;

    /// Creates a new maze with the given number of rows and columns and every passage closed.
    ///
    /// Fails if either dimension is zero or larger than [`Maze::MAX_DIMENSION`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::ZeroDimension { rows, cols });
        }
        if let Some(value) = [rows, cols].into_iter().find(|&d| d > Self::MAX_DIMENSION) {
            return Err(MazeError::DimensionTooLarge {
                value,
                max: Self::MAX_DIMENSION,
            });
        }
        let size = rows * cols;
        let cells = (0..size).map(|i| Cell::at(i, cols, size)).collect();
        Ok(Maze { cells, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells in the maze.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false, since construction rejects zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn entrance(&self) -> usize {
        0
    }

    pub fn exit(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn neighbor(&self, index: usize, direction: Direction) -> Option<Neighbor> {
        self.cells[index].neighbor(direction)
    }

    pub fn index_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Returns `(row, col)` of the cell at `index`.
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Opens the passage between two adjacent cells, on both sides.
    ///
    /// Returns `false` if the cells are not adjacent or the passage was already open.
    pub fn open_passage(&mut self, a: usize, b: usize) -> bool {
        let Some(direction) = self.cells[a]
            .neighbors()
            .find(|(_, n)| n.index == b)
            .map(|(d, _)| d)
        else {
            return false;
        };
        if self.cells[a].is_open(direction) {
            return false;
        }
        self.cells[a].set_open(direction, true);
        self.cells[b].set_open(direction.opposite(), true);
        true
    }

    /// Closes every passage, leaving the neighbor structure intact.
    pub fn close_all_passages(&mut self) {
        self.cells.iter_mut().for_each(|cell| {
            Direction::ALL
                .into_iter()
                .for_each(|d| cell.set_open(d, false));
        });
    }

    /// Number of open passages, counting each edge once.
    pub fn open_passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&d| cell.is_open(d))
                    .count()
            })
            .sum()
    }

    /// Whether every cell can be reached from the entrance through open passages.
    pub fn is_fully_connected(&self) -> bool {
        let mut reached = vec![false; self.len()];
        let mut queue = VecDeque::from([self.entrance()]);
        reached[self.entrance()] = true;
        let mut count = 1;
        while let Some(current) = queue.pop_front() {
            for (_, neighbor) in self.cells[current].neighbors() {
                if neighbor.open && !reached[neighbor.index] {
                    reached[neighbor.index] = true;
                    count += 1;
                    queue.push_back(neighbor.index);
                }
            }
        }
        count == self.len()
    }

    /// Walls around the cell at `index`. The entrance has no left wall and the exit no
    /// bottom wall, so the maze shows a doorway at each end.
    pub fn walls(&self, index: usize) -> Walls {
        let cell = &self.cells[index];
        Walls {
            left: index != self.entrance() && !cell.is_open(Direction::Left),
            right: !cell.is_open(Direction::Right),
            top: !cell.is_open(Direction::Up),
            bottom: index != self.exit() && !cell.is_open(Direction::Down),
        }
    }

    /// Suggested on-screen size of one cell, shrinking as the maze grows.
    pub fn cell_size_hint(&self) -> usize {
        Self::MAX_CELL_SIZE.min(Self::DISPLAY_BUDGET / self.rows.max(self.cols))
    }
}
