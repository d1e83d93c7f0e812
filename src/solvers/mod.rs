use std::collections::VecDeque;

pub mod backtrack;
pub mod distance;
pub mod manual;
pub mod state;

pub use distance::{DistanceMap, Heuristic};
pub use manual::MoveOutcome;
pub use state::{Discovery, EdgeLog, FrontierEntry, SearchState, Visit};

use crate::{error::Result, maze::Maze};
use backtrack::backtrack;

/// Automatic traversal strategies. They differ only in which frontier entry is taken next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    Dfs,
    Bfs,
    AStar(Heuristic),
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::AStar(heuristic) => write!(f, "A* Search ({})", heuristic),
        }
    }
}

/// Result of one traversal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// A frontier entry was popped and the cell marked searched.
    Expanded(usize),
    /// The exit was popped; carries the solution path from entrance to exit.
    ExitFound(Vec<usize>),
    /// The frontier ran dry without reaching the exit.
    Exhausted,
    /// No run of this kind is active.
    Idle,
}

impl Solver {
    /// Removes the next entry to explore from the frontier.
    fn pop(
        self,
        frontier: &mut VecDeque<FrontierEntry>,
        distances: &DistanceMap,
    ) -> Option<FrontierEntry> {
        match self {
            Solver::Dfs => frontier.pop_back(),
            Solver::Bfs => frontier.pop_front(),
            Solver::AStar(heuristic) => {
                // min_by_key keeps the first of equal minimums
                let index = frontier
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, entry)| distances.priority(entry.cell, heuristic))
                    .map(|(i, _)| i)?;
                frontier.remove(index)
            }
        }
    }
}

/// Performs one pop-expand-mark cycle of `solver` and returns.
///
/// The caller owns pacing: it calls this again for the next step until the outcome is no
/// longer [`StepOutcome::Expanded`].
pub fn search_step(
    solver: Solver,
    maze: &Maze,
    state: &mut SearchState,
    distances: &mut DistanceMap,
) -> Result<StepOutcome> {
    let Some(entry) = solver.pop(&mut state.frontier, distances) else {
        return Ok(StepOutcome::Exhausted);
    };
    let cell = entry.cell;

    if cell == maze.exit() {
        state.mark_searched(cell);
        let path = backtrack(state, maze.entrance(), cell)?;
        return Ok(StepOutcome::ExitFound(path));
    }

    // Duplicate pops of a searched cell are only re-marked
    if !state.is_searched(cell) {
        match solver {
            Solver::Dfs | Solver::Bfs => expand(maze, state, &entry),
            Solver::AStar(_) => expand_by_cost(maze, state, distances, &entry),
        }
    }
    state.mark_searched(cell);
    Ok(StepOutcome::Expanded(cell))
}

/// Queues every open, unsearched and undiscovered neighbor.
fn expand(maze: &Maze, state: &mut SearchState, entry: &FrontierEntry) {
    for neighbor in entry.open_neighbors() {
        if !state.is_searched(neighbor) && state.log.record(entry.cell, neighbor) {
            state.frontier.push_back(FrontierEntry::new(maze, neighbor));
        }
    }
}

/// Queues open neighbors whose arrival cost improves through `entry`.
fn expand_by_cost(
    maze: &Maze,
    state: &mut SearchState,
    distances: &mut DistanceMap,
    entry: &FrontierEntry,
) {
    let Some(arrived) = distances.get(entry.cell).cost_to_arrive else {
        tracing::warn!("[solver] cell {} popped with unknown arrival cost", entry.cell);
        return;
    };
    let cost = arrived + 1;
    for neighbor in entry.open_neighbors() {
        if distances.is_improvement(neighbor, cost) && state.log.record(entry.cell, neighbor) {
            distances.set_arrival(neighbor, cost);
            state.frontier.push_back(FrontierEntry::new(maze, neighbor));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::generators::{RandomWeights, get_rng, randomized_kruskal};

    /// 2x2 maze with passages 0-1, 0-2 and 1-3.
    pub(crate) fn small_maze() -> Maze {
        let mut maze = Maze::new(2, 2).unwrap();
        let mut weight = |a: usize, b: usize| -> u32 {
            match (a, b) {
                (0, 1) => 1,
                (0, 2) => 2,
                (1, 3) => 3,
                _ => 4,
            }
        };
        randomized_kruskal(&mut maze, &mut weight).unwrap();
        maze
    }

    pub(crate) fn random_maze(rows: usize, cols: usize, seed: u64) -> Maze {
        let mut maze = Maze::new(rows, cols).unwrap();
        randomized_kruskal(&mut maze, &mut RandomWeights::new(get_rng(Some(seed)))).unwrap();
        maze
    }

    /// Runs `solver` to completion, returning the popped cells and the final outcome.
    fn run(solver: Solver, maze: &Maze) -> (Vec<usize>, StepOutcome, SearchState, DistanceMap) {
        let mut state = SearchState::new(maze.len());
        let mut distances = DistanceMap::new(maze);
        state.begin(maze);
        let mut popped = Vec::new();
        loop {
            match search_step(solver, maze, &mut state, &mut distances).unwrap() {
                StepOutcome::Expanded(cell) => popped.push(cell),
                outcome => return (popped, outcome, state, distances),
            }
        }
    }

    const ALL_SOLVERS: [Solver; 4] = [
        Solver::Dfs,
        Solver::Bfs,
        Solver::AStar(Heuristic::TotalCost),
        Solver::AStar(Heuristic::ExitOnly),
    ];

    #[test]
    fn test_dfs_small_maze() {
        let maze = small_maze();
        let (popped, outcome, state, _) = run(Solver::Dfs, &maze);
        // The stack takes the bottom neighbor 2 before the right neighbor 1
        assert_eq!(popped, vec![0, 2, 1]);
        assert_eq!(outcome, StepOutcome::ExitFound(vec![0, 1, 3]));
        let on_path = state
            .visits()
            .iter()
            .map(|v| v.on_solution_path)
            .collect::<Vec<_>>();
        assert_eq!(on_path, vec![true, true, false, true]);
        assert!(state.visits().iter().all(|v| v.searched));
    }

    #[test]
    fn test_bfs_small_maze() {
        let maze = small_maze();
        let (popped, outcome, state, _) = run(Solver::Bfs, &maze);
        assert_eq!(popped, vec![0, 1, 2]);
        assert_eq!(outcome, StepOutcome::ExitFound(vec![0, 1, 3]));
        assert_eq!(
            state.log().entries(),
            &[
                Discovery { from: 0, to: 1 },
                Discovery { from: 0, to: 2 },
                Discovery { from: 1, to: 3 },
            ]
        );
    }

    #[test]
    fn test_astar_small_maze() {
        let maze = small_maze();
        // Ties on total cost go to the earlier frontier entry
        let (popped, outcome, _, distances) = run(Solver::AStar(Heuristic::TotalCost), &maze);
        assert_eq!(popped, vec![0, 1, 2]);
        assert_eq!(outcome, StepOutcome::ExitFound(vec![0, 1, 3]));
        assert_eq!(distances.get(3).cost_to_arrive, Some(2));

        // Greedy search goes straight for the exit and never touches cell 2
        let (popped, _, state, _) = run(Solver::AStar(Heuristic::ExitOnly), &maze);
        assert_eq!(popped, vec![0, 1]);
        assert!(!state.is_searched(2));
    }

    #[test]
    fn test_all_solvers_agree_on_solution() {
        for seed in 0..5 {
            let maze = random_maze(9, 13, seed);
            let paths = ALL_SOLVERS
                .map(|solver| match run(solver, &maze).1 {
                    StepOutcome::ExitFound(path) => path,
                    other => panic!("{solver} ended with {other:?}"),
                })
                .to_vec();
            assert!(paths.windows(2).all(|w| w[0] == w[1]), "seed {seed}");

            // The path is a chain of open passages from entrance to exit
            let path = &paths[0];
            assert_eq!(path.first(), Some(&maze.entrance()));
            assert_eq!(path.last(), Some(&maze.exit()));
            assert!(path.windows(2).all(|w| {
                maze.cell(w[0]).neighbors().any(|(_, n)| n.index == w[1] && n.open)
            }));
        }
    }

    #[test]
    fn test_astar_arrival_costs_are_path_depths() {
        let maze = random_maze(15, 15, 11);
        let (_, outcome, state, distances) = run(Solver::AStar(Heuristic::TotalCost), &maze);
        let StepOutcome::ExitFound(path) = outcome else {
            panic!("exit not found");
        };
        for (depth, &cell) in path.iter().enumerate() {
            assert_eq!(distances.get(cell).cost_to_arrive, Some(depth as u32));
        }
        // Every searched cell got its arrival cost from the cell that discovered it
        for d in state.log().entries() {
            let from = distances.get(d.from).cost_to_arrive.unwrap();
            assert_eq!(distances.get(d.to).cost_to_arrive, Some(from + 1));
        }
    }

    #[test]
    fn test_solution_flags_imply_searched() {
        let maze = random_maze(10, 10, 5);
        for solver in ALL_SOLVERS {
            let (_, _, state, _) = run(solver, &maze);
            assert!(
                state
                    .visits()
                    .iter()
                    .all(|v| !v.on_solution_path || v.searched)
            );
        }
    }

    #[test]
    fn test_exhausted_without_passages() {
        let maze = Maze::new(2, 2).unwrap();
        for solver in ALL_SOLVERS {
            let (popped, outcome, _, _) = run(solver, &maze);
            assert_eq!(popped, vec![0]);
            assert_eq!(outcome, StepOutcome::Exhausted);
        }
    }

    #[test]
    fn test_single_cell_maze_is_solved_immediately() {
        let maze = Maze::new(1, 1).unwrap();
        let (popped, outcome, _, _) = run(Solver::Bfs, &maze);
        assert!(popped.is_empty());
        assert_eq!(outcome, StepOutcome::ExitFound(vec![0]));
    }

    #[test]
    fn test_astar_tie_break_keeps_first_minimum() {
        let maze = small_maze();
        let distances = DistanceMap::new(&maze);
        let mut frontier = VecDeque::from([
            FrontierEntry::new(&maze, 2),
            FrontierEntry::new(&maze, 1),
        ]);
        // Both sit one step from the exit
        let popped = Solver::AStar(Heuristic::ExitOnly).pop(&mut frontier, &distances);
        assert_eq!(popped.map(|e| e.cell), Some(2));
    }
}
