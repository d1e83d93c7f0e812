use crate::{
    error::{MazeError, Result},
    solvers::state::SearchState,
};

/// Walks the discovered-edge log back from `exit` to `entrance`, marking every cell on the
/// way as part of the solution. Returns the path ordered from entrance to exit.
pub fn backtrack(state: &mut SearchState, entrance: usize, exit: usize) -> Result<Vec<usize>> {
    let mut path = vec![exit];
    state.visits[exit].on_solution_path = true;

    let mut current = exit;
    // Each step follows a distinct log entry, so the walk can't exceed the log length
    for _ in 0..=state.log.len() {
        if current == entrance {
            path.reverse();
            tracing::debug!("[backtrack] solution path of {} cells", path.len());
            return Ok(path);
        }
        let Some(from) = state.log.discoverer_of(current) else {
            break;
        };
        state.visits[from].on_solution_path = true;
        path.push(from);
        current = from;
    }

    tracing::error!("[backtrack] trail broken at cell {}", current);
    Err(MazeError::BrokenTrail { cell: current })
}
