use rand::{Rng, SeedableRng, rngs::StdRng};

mod kruskal;
pub mod union_find;

pub use kruskal::randomized_kruskal;

use crate::{error::Result, maze::Maze};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Supplies the weight of each candidate edge. Lower weights are opened first.
pub trait WeightSource {
    fn weight(&mut self, cell1: usize, cell2: usize) -> u32;
}

/// Any closure over the two endpoints can serve as a fixed weight table.
impl<F> WeightSource for F
where
    F: FnMut(usize, usize) -> u32,
{
    fn weight(&mut self, cell1: usize, cell2: usize) -> u32 {
        self(cell1, cell2)
    }
}

/// Uniform random weights in `0..RandomWeights::RANGE`.
pub struct RandomWeights<R> {
    rng: R,
}

impl<R: Rng> RandomWeights<R> {
    pub const RANGE: u32 = 100;

    pub fn new(rng: R) -> Self {
        RandomWeights { rng }
    }
}

impl<R: Rng> WeightSource for RandomWeights<R> {
    fn weight(&mut self, _cell1: usize, _cell2: usize) -> u32 {
        self.rng.random_range(0..Self::RANGE)
    }
}

/// Carves `maze` into a perfect maze with random edge weights.
/// Identical seeds produce identical mazes; `None` draws a fresh seed from the OS.
pub fn generate_maze(maze: &mut Maze, seed: Option<u64>) -> Result<usize> {
    let mut weights = RandomWeights::new(get_rng(seed));
    randomized_kruskal(maze, &mut weights)
}
