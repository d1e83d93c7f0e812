use rand::rngs::StdRng;

use crate::{
    error::Result,
    generators::{RandomWeights, WeightSource, get_rng, randomized_kruskal},
    maze::{Direction, Maze, Walls},
    solvers::{
        DistanceMap, EdgeLog, MoveOutcome, SearchState, Solver, StepOutcome, Visit,
        backtrack::backtrack,
        manual::{begin_manual, manual_move},
        search_step,
    },
};

/// Settings for a new [`MazeSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for edge weights; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            seed: None,
        }
    }
}

/// Which kind of run currently owns the search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Search(Solver),
    Manual,
}

/// One maze together with the state of the traversal running on it.
///
/// Runs advance only when the owner calls [`MazeSession::step`] or
/// [`MazeSession::manual_move`]; switching mode cancels whatever was running.
pub struct MazeSession {
    maze: Maze,
    state: SearchState,
    distances: DistanceMap,
    mode: Mode,
    rng: StdRng,
    steps: usize,
    solution: Option<Vec<usize>>,
}

impl MazeSession {
    /// Builds a session and carves its first maze.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let maze = Maze::new(config.rows, config.cols)?;
        let mut session = MazeSession {
            state: SearchState::new(maze.len()),
            maze,
            distances: DistanceMap::default(),
            mode: Mode::Idle,
            rng: get_rng(config.seed),
            steps: 0,
            solution: None,
        };
        session.generate()?;
        Ok(session)
    }

    /// Replaces the grid with a new `rows` x `cols` one and carves it.
    /// On error the current maze is kept.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.maze = Maze::new(rows, cols)?;
        self.state = SearchState::new(self.maze.len());
        self.generate().map(|_| ())
    }

    /// Closes every passage and clears all search state.
    pub fn reset(&mut self) {
        self.maze.close_all_passages();
        self.clear_run();
        self.mode = Mode::Idle;
    }

    /// Resets and carves a fresh maze. Returns the number of passages opened.
    pub fn generate(&mut self) -> Result<usize> {
        self.reset();
        let mut weights = RandomWeights::new(&mut self.rng);
        Self::carve(&mut self.maze, &mut weights)
    }

    /// Resets and carves a maze with edge weights from `weights`.
    pub fn generate_with(&mut self, weights: &mut impl WeightSource) -> Result<usize> {
        self.reset();
        Self::carve(&mut self.maze, weights)
    }

    fn carve(maze: &mut Maze, weights: &mut impl WeightSource) -> Result<usize> {
        let opened = randomized_kruskal(maze, weights)?;
        tracing::info!("[session] generated {}x{} maze", maze.rows(), maze.cols());
        Ok(opened)
    }

    fn clear_run(&mut self) {
        self.state.clear();
        self.distances = DistanceMap::default();
        self.steps = 0;
        self.solution = None;
    }

    /// Starts an automatic run, discarding any run in progress.
    pub fn start(&mut self, solver: Solver) {
        self.clear_run();
        self.state.begin(&self.maze);
        if let Solver::AStar(_) = solver {
            self.distances = DistanceMap::new(&self.maze);
        }
        self.mode = Mode::Search(solver);
        tracing::info!("[session] started {}", solver);
    }

    /// Advances the active automatic run by one step.
    ///
    /// Returns [`StepOutcome::Idle`] without touching any state when no automatic run is
    /// active, e.g. after it finished or was cancelled.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let Mode::Search(solver) = self.mode else {
            return Ok(StepOutcome::Idle);
        };
        let outcome = search_step(solver, &self.maze, &mut self.state, &mut self.distances)
            .inspect_err(|_| self.mode = Mode::Idle)?;
        match &outcome {
            StepOutcome::Expanded(_) => self.steps += 1,
            StepOutcome::ExitFound(path) => {
                self.steps += 1;
                self.solution = Some(path.clone());
                self.mode = Mode::Idle;
                tracing::info!(
                    "[session] {} reached the exit after {} steps, path length {}",
                    solver,
                    self.steps,
                    path.len()
                );
            }
            StepOutcome::Exhausted => {
                self.mode = Mode::Idle;
                tracing::warn!("[session] {} exhausted the frontier", solver);
            }
            StepOutcome::Idle => {}
        }
        Ok(outcome)
    }

    /// Steps the active run until it stops, returning the final outcome.
    pub fn run_to_end(&mut self) -> Result<StepOutcome> {
        loop {
            match self.step()? {
                StepOutcome::Expanded(_) => continue,
                outcome => return Ok(outcome),
            }
        }
    }

    /// Stops the active run; its state stays visible until the next run starts.
    pub fn cancel(&mut self) {
        if self.mode != Mode::Idle {
            tracing::debug!("[session] cancelled {:?}", self.mode);
        }
        self.mode = Mode::Idle;
    }

    /// Starts manual play from the entrance, discarding any run in progress.
    pub fn start_manual(&mut self) -> Result<()> {
        self.clear_run();
        begin_manual(&self.maze, &mut self.state);
        self.mode = Mode::Manual;
        if self.maze.entrance() == self.maze.exit() {
            let path = backtrack(&mut self.state, self.maze.entrance(), self.maze.exit())?;
            self.finish_manual(path);
        }
        Ok(())
    }

    /// Applies one directional input to the manual run. A no-op unless manual play is active.
    pub fn manual_move(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.mode != Mode::Manual {
            return Ok(MoveOutcome::Ignored);
        }
        let outcome = manual_move(&self.maze, &mut self.state, direction)?;
        match &outcome {
            MoveOutcome::Advanced(_) | MoveOutcome::Retreated(_) => self.steps += 1,
            MoveOutcome::ExitReached(path) => {
                self.steps += 1;
                self.finish_manual(path.clone());
            }
            MoveOutcome::Blocked | MoveOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    fn finish_manual(&mut self, path: Vec<usize>) {
        tracing::info!(
            "[session] manual play reached the exit in {} moves",
            self.steps
        );
        self.solution = Some(path);
        self.mode = Mode::Idle;
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode != Mode::Idle
    }

    pub fn visits(&self) -> &[Visit] {
        self.state.visits()
    }

    pub fn visit(&self, cell: usize) -> Visit {
        self.state.visits()[cell]
    }

    pub fn walls(&self, cell: usize) -> Walls {
        self.maze.walls(cell)
    }

    pub fn cell_size_hint(&self) -> usize {
        self.maze.cell_size_hint()
    }

    pub fn edge_log(&self) -> &EdgeLog {
        self.state.log()
    }

    pub fn distances(&self) -> &DistanceMap {
        &self.distances
    }

    /// Path from entrance to exit found by the last finished run.
    pub fn solution_path(&self) -> Option<&[usize]> {
        self.solution.as_deref()
    }

    /// Steps (or moves) taken by the current run.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn frontier_len(&self) -> usize {
        self.state.frontier().len()
    }

    pub fn searched_count(&self) -> usize {
        self.state.searched_count()
    }

    /// Cell the player stands on during manual play.
    pub fn manual_position(&self) -> Option<usize> {
        match self.mode {
            Mode::Manual => self.state.frontier().back().map(|entry| entry.cell),
            _ => None,
        }
    }

    /// Depth of the manual move stack, the entrance included.
    pub fn manual_depth(&self) -> usize {
        match self.mode {
            Mode::Manual => self.state.frontier().len(),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::MazeError, solvers::Heuristic};

    fn seeded(rows: usize, cols: usize, seed: u64) -> MazeSession {
        MazeSession::new(SessionConfig {
            rows,
            cols,
            seed: Some(seed),
        })
        .unwrap()
    }

    /// 2x2 session whose passages are 0-1, 0-2 and 1-3.
    fn small_session() -> MazeSession {
        let mut session = seeded(2, 2, 0);
        let mut weight = |a: usize, b: usize| -> u32 {
            match (a, b) {
                (0, 1) => 1,
                (0, 2) => 2,
                (1, 3) => 3,
                _ => 4,
            }
        };
        session.generate_with(&mut weight).unwrap();
        session
    }

    #[test]
    fn test_new_session_is_a_spanning_tree() {
        let session = MazeSession::new(SessionConfig::default()).unwrap();
        assert_eq!(session.maze().rows(), 20);
        assert_eq!(session.maze().open_passage_count(), 399);
        assert!(session.maze().is_fully_connected());
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.cell_size_hint(), 20);
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let config = SessionConfig {
            rows: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            MazeSession::new(config),
            Err(MazeError::ZeroDimension { .. })
        ));

        let mut session = seeded(4, 4, 1);
        let before = session.maze().clone();
        assert!(session.resize(3, 0).is_err());
        assert_eq!(session.maze(), &before);
    }

    #[test]
    fn test_same_seed_same_mazes() {
        let mut a = seeded(10, 10, 9);
        let mut b = seeded(10, 10, 9);
        assert_eq!(a.maze(), b.maze());
        a.generate().unwrap();
        b.generate().unwrap();
        assert_eq!(a.maze(), b.maze());
    }

    #[test]
    fn test_small_maze_dfs() {
        let mut session = small_session();
        session.start(Solver::Dfs);
        assert_eq!(session.step(), Ok(StepOutcome::Expanded(0)));
        assert_eq!(session.frontier_len(), 2);
        assert_eq!(session.step(), Ok(StepOutcome::Expanded(2)));
        assert_eq!(session.step(), Ok(StepOutcome::Expanded(1)));
        assert_eq!(session.step(), Ok(StepOutcome::ExitFound(vec![0, 1, 3])));
        assert_eq!(session.solution_path(), Some(&[0, 1, 3][..]));
        assert_eq!(session.steps(), 4);
        assert!(!session.is_running());
        // Finished runs stay put
        assert_eq!(session.step(), Ok(StepOutcome::Idle));
        assert!(session.visit(3).on_solution_path);
        assert!(!session.visit(2).on_solution_path);
    }

    #[test]
    fn test_all_strategies_find_the_same_path() {
        let mut session = seeded(25, 18, 4);
        let mut paths = Vec::new();
        for solver in [
            Solver::Dfs,
            Solver::Bfs,
            Solver::AStar(Heuristic::TotalCost),
            Solver::AStar(Heuristic::ExitOnly),
        ] {
            session.start(solver);
            assert!(matches!(session.run_to_end(), Ok(StepOutcome::ExitFound(_))));
            paths.push(session.solution_path().unwrap().to_vec());
        }
        assert!(paths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_cancel_stops_stepping() {
        let mut session = seeded(10, 10, 2);
        session.start(Solver::Bfs);
        session.step().unwrap();
        session.step().unwrap();
        session.cancel();
        let searched = session.searched_count();
        let frontier = session.frontier_len();
        assert_eq!(session.step(), Ok(StepOutcome::Idle));
        assert_eq!(session.searched_count(), searched);
        assert_eq!(session.frontier_len(), frontier);
    }

    #[test]
    fn test_switching_mode_resets_run() {
        let mut session = seeded(10, 10, 2);
        session.start(Solver::Dfs);
        for _ in 0..5 {
            session.step().unwrap();
        }
        session.start(Solver::AStar(Heuristic::TotalCost));
        assert_eq!(session.searched_count(), 0);
        assert_eq!(session.frontier_len(), 1);
        assert!(session.edge_log().is_empty());
        assert_eq!(session.steps(), 0);
        assert_eq!(session.distances().get(0).cost_to_arrive, Some(0));

        session.start_manual().unwrap();
        assert_eq!(session.searched_count(), 1);
        assert_eq!(session.manual_depth(), 1);
        // Automatic stepping no longer applies
        assert_eq!(session.step(), Ok(StepOutcome::Idle));
    }

    #[test]
    fn test_manual_play() {
        let mut session = small_session();
        // Input without an active manual run is ignored
        assert_eq!(session.manual_move(Direction::Right), Ok(MoveOutcome::Ignored));
        assert_eq!(session.searched_count(), 0);

        session.start_manual().unwrap();
        assert_eq!(session.manual_move(Direction::Up), Ok(MoveOutcome::Blocked));
        assert_eq!(session.manual_move(Direction::Down), Ok(MoveOutcome::Advanced(2)));
        assert_eq!(session.manual_depth(), 2);
        assert_eq!(session.manual_move(Direction::Up), Ok(MoveOutcome::Retreated(0)));
        assert_eq!(session.manual_depth(), 1);
        assert!(!session.visit(2).searched);
        assert_eq!(session.manual_move(Direction::Right), Ok(MoveOutcome::Advanced(1)));
        assert_eq!(
            session.manual_move(Direction::Down),
            Ok(MoveOutcome::ExitReached(vec![0, 1, 3]))
        );
        assert_eq!(session.steps(), 4);
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.manual_move(Direction::Up), Ok(MoveOutcome::Ignored));
    }

    #[test]
    fn test_single_cell_manual_is_already_solved() {
        let mut session = seeded(1, 1, 0);
        session.start_manual().unwrap();
        assert_eq!(session.solution_path(), Some(&[0][..]));
        assert!(!session.is_running());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = seeded(6, 7, 3);
        session.start(Solver::Bfs);
        session.run_to_end().unwrap();

        session.reset();
        assert_eq!(session.maze().open_passage_count(), 0);
        assert!(
            session
                .visits()
                .iter()
                .all(|v| !v.searched && !v.on_solution_path)
        );
        assert_eq!(session.frontier_len(), 0);
        assert!(session.edge_log().is_empty());
        assert_eq!(session.solution_path(), None);

        assert_eq!(session.generate(), Ok(41));
        assert!(session.maze().is_fully_connected());
    }

    #[test]
    fn test_resize_regenerates() {
        let mut session = seeded(3, 3, 8);
        session.start(Solver::Dfs);
        session.resize(5, 12).unwrap();
        assert_eq!(session.maze().len(), 60);
        assert_eq!(session.visits().len(), 60);
        assert_eq!(session.mode(), Mode::Idle);
        assert!(session.maze().is_fully_connected());
        assert_eq!(session.cell_size_hint(), 20);
    }
}
