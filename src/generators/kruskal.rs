use crate::{
    error::{MazeError, Result},
    generators::{WeightSource, union_find::UnionFind},
    maze::{Direction, Maze},
};

/// Candidate passage between two adjacent cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    cell1: usize,
    cell2: usize,
    weight: u32,
}

/// Lists every adjacent pair once, through each cell's right and bottom neighbor.
fn candidate_edges(maze: &Maze, weights: &mut impl WeightSource) -> Vec<Edge> {
    (0..maze.len())
        .flat_map(|i| {
            [Direction::Right, Direction::Down]
                .into_iter()
                .filter_map(move |d| maze.neighbor(i, d).map(|n| (i, n.index)))
        })
        .map(|(cell1, cell2)| Edge {
            cell1,
            cell2,
            weight: weights.weight(cell1, cell2),
        })
        .collect()
}

/// Carves a perfect maze with randomized Kruskal's algorithm.
///
/// Every passage is closed first. Candidate edges are sorted by weight (ties keep
/// enumeration order) and taken cheapest first; an edge is opened whenever it joins two
/// cells that are not yet connected, until all cells share one set.
///
/// Returns the number of passages opened, always `maze.len() - 1`.
pub fn randomized_kruskal(maze: &mut Maze, weights: &mut impl WeightSource) -> Result<usize> {
    maze.close_all_passages();

    let mut edges = candidate_edges(maze, weights);
    edges.sort_by_key(|edge| edge.weight);
    tracing::debug!(
        "[kruskal] {} candidate edges for a {}x{} maze",
        edges.len(),
        maze.rows(),
        maze.cols()
    );

    let mut uf = UnionFind::new(maze.len());
    let mut edges = edges.into_iter();
    let mut opened = 0;
    while !uf.all_connected() {
        let Some(edge) = edges.next() else {
            tracing::error!(
                "[kruskal] ran out of edges with {} components left",
                uf.components()
            );
            return Err(MazeError::GenerationStalled {
                components: uf.components(),
            });
        };
        if uf.find(edge.cell1) != uf.find(edge.cell2) {
            maze.open_passage(edge.cell1, edge.cell2);
            uf.union(edge.cell1, edge.cell2);
            opened += 1;
        }
    }

    tracing::debug!("[kruskal] opened {} passages", opened);
    Ok(opened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::RandomWeights;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_candidate_edges_list_each_pair_once() {
        let maze = Maze::new(3, 4).unwrap();
        let edges = candidate_edges(&maze, &mut |_: usize, _: usize| 0u32);
        // 3 rows * 3 horizontal + 2 * 4 vertical
        assert_eq!(edges.len(), 17);
        assert!(edges.iter().all(|e| e.cell2 == e.cell1 + 1 || e.cell2 == e.cell1 + 4));
    }

    #[test]
    fn test_spanning_tree_for_many_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        for rows in 1..=8 {
            for cols in 1..=8 {
                let mut maze = Maze::new(rows, cols).unwrap();
                let opened =
                    randomized_kruskal(&mut maze, &mut RandomWeights::new(&mut rng)).unwrap();
                assert_eq!(opened, rows * cols - 1);
                assert_eq!(maze.open_passage_count(), rows * cols - 1);
                assert!(maze.is_fully_connected(), "{rows}x{cols} not connected");
            }
        }
    }

    #[test]
    fn test_fixed_weights_choose_cheapest_edges() {
        // Edges in enumeration order: 0-1, 0-2, 1-3, 2-3
        let mut maze = Maze::new(2, 2).unwrap();
        let mut weight = |a: usize, b: usize| -> u32 {
            match (a, b) {
                (0, 1) => 10,
                (0, 2) => 20,
                (1, 3) => 30,
                _ => 40,
            }
        };
        randomized_kruskal(&mut maze, &mut weight).unwrap();
        assert!(maze.cell(0).is_open(Direction::Right));
        assert!(maze.cell(0).is_open(Direction::Down));
        assert!(maze.cell(1).is_open(Direction::Down));
        assert!(!maze.cell(2).is_open(Direction::Right));
    }

    #[test]
    fn test_equal_weights_keep_enumeration_order() {
        let mut maze = Maze::new(2, 2).unwrap();
        randomized_kruskal(&mut maze, &mut |_: usize, _: usize| 5u32).unwrap();
        assert!(maze.cell(0).is_open(Direction::Right));
        assert!(maze.cell(0).is_open(Direction::Down));
        assert!(maze.cell(1).is_open(Direction::Down));
        assert!(!maze.cell(2).is_open(Direction::Right));
    }

    #[test]
    fn test_regeneration_discards_old_passages() {
        let mut maze = Maze::new(5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        randomized_kruskal(&mut maze, &mut RandomWeights::new(&mut rng)).unwrap();
        randomized_kruskal(&mut maze, &mut RandomWeights::new(&mut rng)).unwrap();
        assert_eq!(maze.open_passage_count(), 24);
        assert!(maze.is_fully_connected());
    }

    #[test]
    fn test_single_cell_opens_nothing() {
        let mut maze = Maze::new(1, 1).unwrap();
        assert_eq!(
            randomized_kruskal(&mut maze, &mut |_: usize, _: usize| 0u32),
            Ok(0)
        );
    }
}
