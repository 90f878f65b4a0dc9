//! Branch-and-bound best-first search.
//!
//! Nodes are dequeued by `f = g + h` with insertion order breaking ties, so a
//! run is fully deterministic for a given puzzle and heuristic. A node whose
//! `g + h` already meets the best known solution cost is discarded without
//! being expanded, and successors are only queued while their `f` stays below
//! that cost. A neighbor already queued or closed is skipped outright, with no
//! decrease-key for a cheaper path found later.

use crate::heuristic::Heuristic;
use crate::puzzle::{Move, PuzzleState};
use crate::stats::SearchStatistics;
use log::debug;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::time::Instant;

/// Outcome of a single solve: the path from the initial state to the goal
/// (both included), if any, and the metrics gathered on the way.
#[derive(Debug, Clone)]
pub struct Solution {
    pub path: Option<Vec<PuzzleState>>,
    pub statistics: SearchStatistics,
}

impl Solution {
    pub fn moves(&self) -> Option<Vec<Move>> {
        let path = self.path.as_ref()?;
        path.windows(2)
            .map(|pair| Move::between(&pair[0], &pair[1]))
            .collect()
    }
}

struct Node {
    state: PuzzleState,
    g: u32,
    parent: Option<usize>,
}

/// Engine bound to one heuristic. Holds no state between calls.
#[derive(Debug, Clone, Copy)]
pub struct BranchAndBound {
    heuristic: Heuristic,
}

impl BranchAndBound {
    pub fn new(heuristic: Heuristic) -> Self {
        Self { heuristic }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    pub fn solve(&self, initial: &PuzzleState) -> Solution {
        let start = Instant::now();
        let mut stats = SearchStatistics::new(self.heuristic);

        if !initial.is_solvable() {
            stats.set_total_time(start.elapsed());
            debug!("{}: unsolvable puzzle {:?}", self.heuristic.short_name(), initial.tiles());
            return Solution {
                path: None,
                statistics: stats,
            };
        }

        if initial.is_goal() {
            stats.on_solution_found(0);
            stats.set_total_time(start.elapsed());
            return Solution {
                path: Some(vec![*initial]),
                statistics: stats,
            };
        }

        let mut arena: Vec<Node> = Vec::new();
        let mut open: BinaryHeap<Reverse<(u32, u64, usize)>> = BinaryHeap::new();
        // states with a queued entry; a state is queued at most once
        let mut open_set: HashSet<PuzzleState> = HashSet::new();
        let mut closed: HashSet<PuzzleState> = HashSet::new();
        let mut seq: u64 = 0;

        let mut best_cost = u32::MAX;
        let mut best_node: Option<usize> = None;

        arena.push(Node {
            state: *initial,
            g: 0,
            parent: None,
        });
        open_set.insert(*initial);
        open.push(Reverse((self.heuristic.compute(initial), seq, 0)));

        while let Some(Reverse((_, _, idx))) = open.pop() {
            let (state, g) = (arena[idx].state, arena[idx].g);
            open_set.remove(&state);

            if !closed.insert(state) {
                continue;
            }

            let h = self.heuristic.compute(&state);
            stats.on_node_expanded(h);

            if g + h >= best_cost {
                continue;
            }

            if state.is_goal() {
                best_cost = g;
                best_node = Some(idx);
                stats.on_solution_found(g);
                continue;
            }

            let new_g = g + 1;
            for neighbor in state.neighbors() {
                // first discovery wins, even if a cheaper path shows up later
                if closed.contains(&neighbor) || open_set.contains(&neighbor) {
                    continue;
                }

                let f = new_g + self.heuristic.compute(&neighbor);
                if f >= best_cost {
                    continue;
                }

                arena.push(Node {
                    state: neighbor,
                    g: new_g,
                    parent: Some(idx),
                });
                seq += 1;
                open.push(Reverse((f, seq, arena.len() - 1)));
                open_set.insert(neighbor);
            }
        }

        let path = best_node.map(|idx| Self::rebuild_path(&arena, idx));
        stats.set_total_time(start.elapsed());

        debug!(
            "{}: cost {:?}, {} nodes expanded in {:.6}s",
            self.heuristic.short_name(),
            path.as_ref().map(|_| best_cost),
            stats.nodes_expanded,
            stats.execution_time.as_secs_f64()
        );

        Solution {
            path,
            statistics: stats,
        }
    }

    pub fn solve_multiple(&self, puzzles: &[PuzzleState]) -> Vec<Solution> {
        puzzles.iter().map(|p| self.solve(p)).collect()
    }

    fn rebuild_path(arena: &[Node], goal: usize) -> Vec<PuzzleState> {
        let mut path = Vec::with_capacity(arena[goal].g as usize + 1);
        let mut cursor = Some(goal);
        while let Some(idx) = cursor {
            path.push(arena[idx].state);
            cursor = arena[idx].parent;
        }
        path.reverse();
        path
    }
}
