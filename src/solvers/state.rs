use std::collections::VecDeque;

use crate::maze::{Direction, Maze, Neighbor};

/// Per-cell search flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    pub searched: bool,
    pub on_solution_path: bool,
}

/// One step of discovery: `from` was being expanded when `to` was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discovery {
    pub from: usize,
    pub to: usize,
}

/// Which cell first led to which other cell during the current run.
///
/// A cell is discovered at most once per run, which keeps the walk back from the exit
/// well defined.
#[derive(Debug, Default, Clone)]
pub struct EdgeLog {
    entries: Vec<Discovery>,
}

impl EdgeLog {
    /// Appends `from -> to`. Refused (returns `false`) if `to` was already discovered.
    pub fn record(&mut self, from: usize, to: usize) -> bool {
        if self.discoverer_of(to).is_some() {
            return false;
        }
        self.entries.push(Discovery { from, to });
        true
    }

    /// Drops the entry that discovered `to`, if any.
    pub fn forget(&mut self, to: usize) {
        self.entries.retain(|d| d.to != to);
    }

    pub fn discoverer_of(&self, to: usize) -> Option<usize> {
        self.entries.iter().find(|d| d.to == to).map(|d| d.from)
    }

    pub fn entries(&self) -> &[Discovery] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A queued cell together with a snapshot of its neighbor slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontierEntry {
    pub cell: usize,
    neighbors: [Option<Neighbor>; 4],
}

impl FrontierEntry {
    pub fn new(maze: &Maze, cell: usize) -> Self {
        FrontierEntry {
            cell,
            neighbors: Direction::ALL.map(|d| maze.neighbor(cell, d)),
        }
    }

    /// Neighbors reachable through an open passage, in expansion order.
    pub fn open_neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors
            .iter()
            .flatten()
            .filter(|n| n.open)
            .map(|n| n.index)
    }

    pub fn neighbor(&self, direction: Direction) -> Option<Neighbor> {
        let slot = Direction::ALL.iter().position(|&d| d == direction)?;
        self.neighbors[slot]
    }
}

/// Everything one traversal run mutates: visitation record, frontier and edge log.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub(crate) visits: Vec<Visit>,
    pub(crate) frontier: VecDeque<FrontierEntry>,
    pub(crate) log: EdgeLog,
}

impl SearchState {
    pub fn new(size: usize) -> Self {
        SearchState {
            visits: vec![Visit::default(); size],
            frontier: VecDeque::new(),
            log: EdgeLog::default(),
        }
    }

    /// Clears every flag, the frontier and the edge log.
    pub fn clear(&mut self) {
        self.visits.fill(Visit::default());
        self.frontier.clear();
        self.log.clear();
    }

    /// Clears the state and seeds the frontier with the entrance.
    pub fn begin(&mut self, maze: &Maze) {
        self.clear();
        self.frontier.push_back(FrontierEntry::new(maze, maze.entrance()));
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn frontier(&self) -> &VecDeque<FrontierEntry> {
        &self.frontier
    }

    pub fn log(&self) -> &EdgeLog {
        &self.log
    }

    pub fn is_searched(&self, cell: usize) -> bool {
        self.visits[cell].searched
    }

    pub fn searched_count(&self) -> usize {
        self.visits.iter().filter(|v| v.searched).count()
    }

    pub(crate) fn mark_searched(&mut self, cell: usize) {
        self.visits[cell].searched = true;
    }
}
