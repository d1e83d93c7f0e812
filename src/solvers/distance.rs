use crate::maze::Maze;

/// How A* ranks frontier cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Cost to arrive plus Manhattan distance to the exit.
    TotalCost,
    /// Manhattan distance to the exit only (greedy best-first).
    ExitOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Distance {
    /// Cheapest known number of steps from the entrance, `None` until reached.
    pub cost_to_arrive: Option<u32>,
    /// Manhattan distance to the exit.
    pub cost_to_exit: u32,
}

/// Per-cell costs for an A* run.
#[derive(Debug, Default, Clone)]
pub struct DistanceMap {
    distances: Vec<Distance>,
}

impl DistanceMap {
    /// Computes exit distances for every cell; only the entrance has a known arrival cost.
    pub fn new(maze: &Maze) -> Self {
        let (exit_row, exit_col) = maze.coords_of(maze.exit());
        let mut distances = (0..maze.len())
            .map(|i| {
                let (row, col) = maze.coords_of(i);
                Distance {
                    cost_to_arrive: None,
                    cost_to_exit: (exit_row.abs_diff(row) + exit_col.abs_diff(col)) as u32,
                }
            })
            .collect::<Vec<_>>();
        distances[maze.entrance()].cost_to_arrive = Some(0);
        DistanceMap { distances }
    }

    pub fn get(&self, cell: usize) -> Distance {
        self.distances[cell]
    }

    /// Priority of `cell` under `heuristic`; lower is explored first.
    pub fn priority(&self, cell: usize, heuristic: Heuristic) -> u32 {
        let distance = self.distances[cell];
        match heuristic {
            Heuristic::TotalCost => distance
                .cost_to_arrive
                .map_or(u32::MAX, |c| c.saturating_add(distance.cost_to_exit)),
            Heuristic::ExitOnly => distance.cost_to_exit,
        }
    }

    /// Whether arriving at `cell` for `cost` beats what is known so far.
    pub fn is_improvement(&self, cell: usize, cost: u32) -> bool {
        self.distances[cell]
            .cost_to_arrive
            .is_none_or(|known| cost < known)
    }

    pub(crate) fn set_arrival(&mut self, cell: usize, cost: u32) {
        self.distances[cell].cost_to_arrive = Some(cost);
    }
}

impl std::fmt::Display for Heuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Heuristic::TotalCost => write!(f, "total cost"),
            Heuristic::ExitOnly => write!(f, "distance to exit"),
        }
    }
}
