use crate::puzzle::{PuzzleState, CELLS, GOAL_TILES};
use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

pub const MIN_WALK: usize = 50;
pub const MAX_WALK: usize = 100;
pub const MAX_SHUFFLE_ATTEMPTS: usize = 10_000;

/// How a batch of solvable puzzles is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMethod {
    /// Random legal moves away from the goal; always solvable.
    RandomWalk,
    /// Uniform permutations filtered by inversion parity.
    Shuffle,
}

/// Produces solvable puzzles with duplicates removed inside each batch.
pub struct PuzzleGenerator<R: Rng = StdRng> {
    rng: R,
    min_walk: usize,
    max_walk: usize,
    max_attempts: usize,
}

impl PuzzleGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> PuzzleGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            min_walk: MIN_WALK,
            max_walk: MAX_WALK,
            max_attempts: MAX_SHUFFLE_ATTEMPTS,
        }
    }

    /// Bounds, inclusive, on the number of moves applied by a random walk.
    pub fn walk_length(mut self, min: usize, max: usize) -> Self {
        self.min_walk = min.min(max);
        self.max_walk = max.max(min);
        self
    }

    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn generate_single(&mut self) -> PuzzleState {
        let mut state = PuzzleState::goal();
        let moves = self.rng.gen_range(self.min_walk..=self.max_walk);

        for _ in 0..moves {
            let neighbors = state.neighbors();
            if let Some(next) = neighbors.choose(&mut self.rng) {
                state = *next;
            }
        }

        state
    }

    /// Short walks can only reach a handful of distinct states, so the number
    /// of walks is capped and the batch may come back short.
    pub fn generate_batch(&mut self, count: usize) -> Vec<PuzzleState> {
        let mut puzzles = Vec::with_capacity(count);
        let mut seen = HashSet::new();
        let budget = self.max_attempts.max(count.saturating_mul(10));
        let mut attempts = 0;

        while puzzles.len() < count && attempts < budget {
            attempts += 1;
            let puzzle = self.generate_single();
            if seen.insert(puzzle) {
                puzzles.push(puzzle);
            }
        }

        if puzzles.len() < count {
            warn!(
                "Only {} of {} distinct puzzles after {} walks",
                puzzles.len(),
                count,
                attempts
            );
        }

        puzzles
    }

    /// May return fewer than `count` puzzles once the attempt budget runs out.
    pub fn generate_with_inversion_check(&mut self, count: usize) -> Vec<PuzzleState> {
        let mut puzzles = Vec::with_capacity(count);
        let mut seen = HashSet::new();
        let mut tiles: [u8; CELLS] = GOAL_TILES;
        let mut attempts = 0;

        while puzzles.len() < count && attempts < self.max_attempts {
            attempts += 1;
            tiles.shuffle(&mut self.rng);
            let state = PuzzleState::from_permutation(tiles);
            if state.is_solvable() && seen.insert(state) {
                puzzles.push(state);
            }
        }

        if puzzles.len() < count {
            warn!(
                "Only {} of {} puzzles generated after {} attempts",
                puzzles.len(),
                count,
                attempts
            );
        }

        puzzles
    }

    pub fn generate(&mut self, method: GenerationMethod, count: usize) -> Vec<PuzzleState> {
        match method {
            GenerationMethod::RandomWalk => self.generate_batch(count),
            GenerationMethod::Shuffle => self.generate_with_inversion_check(count),
        }
    }
}
