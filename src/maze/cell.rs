/// A movement direction, also naming one of the four neighbor slots of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Neighbor slots in the order every search strategy expands them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    fn slot(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }
}

/// The adjacent cell on one side, and whether a passage leads to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub index: usize,
    pub open: bool,
}

/// One grid cell. A slot is `None` on the grid boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    neighbors: [Option<Neighbor>; 4],
}

impl Cell {
    /// Computes the neighbor slots of cell `index` in a grid with `cols` columns and `size` cells.
    /// All passages start closed.
    pub(crate) fn at(index: usize, cols: usize, size: usize) -> Self {
        let closed = |index| Neighbor { index, open: false };
        let mut cell = Cell::default();
        cell.neighbors[Direction::Left.slot()] = (index % cols != 0).then(|| closed(index - 1));
        cell.neighbors[Direction::Right.slot()] =
            ((index + 1) % cols != 0).then(|| closed(index + 1));
        cell.neighbors[Direction::Up.slot()] = index.checked_sub(cols).map(closed);
        cell.neighbors[Direction::Down.slot()] =
            (index + cols < size).then(|| closed(index + cols));
        cell
    }

    pub fn neighbor(&self, direction: Direction) -> Option<Neighbor> {
        self.neighbors[direction.slot()]
    }

    /// Whether a passage leads out of this cell in `direction`.
    pub fn is_open(&self, direction: Direction) -> bool {
        self.neighbor(direction).is_some_and(|n| n.open)
    }

    /// Neighbor slots paired with their direction, in expansion order.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, Neighbor)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(|d| self.neighbor(d).map(|n| (d, n)))
    }

    pub(crate) fn set_open(&mut self, direction: Direction, open: bool) {
        if let Some(neighbor) = self.neighbors[direction.slot()].as_mut() {
            neighbor.open = open;
        }
    }
}

/// Wall presence on each side of a cell, as shown to a renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}
