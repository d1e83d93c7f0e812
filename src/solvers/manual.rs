use crate::{
    error::Result,
    maze::{Direction, Maze},
    solvers::{
        backtrack::backtrack,
        state::{FrontierEntry, SearchState},
    },
};

/// What a directional input did during manual play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No manual run is active.
    Ignored,
    /// No open passage in that direction.
    Blocked,
    /// Moved forward into a new cell.
    Advanced(usize),
    /// Stepped back into the previous cell, undoing the last move.
    Retreated(usize),
    /// Moved into the exit; carries the solution path from entrance to exit.
    ExitReached(Vec<usize>),
}

/// Starts manual play: the frontier becomes a move stack holding only the entrance.
pub fn begin_manual(maze: &Maze, state: &mut SearchState) {
    state.begin(maze);
    state.mark_searched(maze.entrance());
}

/// Attempts to move from the top of the move stack in `direction`.
///
/// Entering an unsearched cell pushes it; entering a searched one is a retreat that pops the
/// current cell and clears its `searched` flag.
pub fn manual_move(
    maze: &Maze,
    state: &mut SearchState,
    direction: Direction,
) -> Result<MoveOutcome> {
    let Some(current) = state.frontier.back().copied() else {
        return Ok(MoveOutcome::Ignored);
    };
    let Some(target) = current
        .neighbor(direction)
        .filter(|n| n.open)
        .map(|n| n.index)
    else {
        return Ok(MoveOutcome::Blocked);
    };

    if state.is_searched(target) {
        tracing::debug!("[manual] Moving back from {} to {}", current.cell, target);
        state.visits[current.cell].searched = false;
        state.log.forget(current.cell);
        state.frontier.pop_back();
        return Ok(MoveOutcome::Retreated(target));
    }

    tracing::debug!("[manual] Moving to new cell {}", target);
    state.mark_searched(target);
    state.log.record(current.cell, target);
    state.frontier.push_back(FrontierEntry::new(maze, target));

    if target == maze.exit() {
        let path = backtrack(state, maze.entrance(), target)?;
        return Ok(MoveOutcome::ExitReached(path));
    }
    Ok(MoveOutcome::Advanced(target))
}
