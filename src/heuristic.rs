use crate::puzzle::{PuzzleState, SIZE};

/// Lower bounds on the number of moves left to reach the goal.
///
/// All four are admissible and consistent, so best-first search ordered by
/// `g + h` returns optimal paths with any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// h = 0, uninformed baseline.
    Trivial,
    /// Non-blank tiles off their goal cell.
    MisplacedTiles,
    /// Sum of row and column distances of each tile to its goal cell.
    Manhattan,
    /// Manhattan plus two moves per reversed pair sharing a goal line.
    LinearConflict,
}

impl Heuristic {
    /// Comparison order used by experiments and reports.
    pub const ALL: [Heuristic; 4] = [
        Heuristic::Trivial,
        Heuristic::MisplacedTiles,
        Heuristic::Manhattan,
        Heuristic::LinearConflict,
    ];

    pub fn compute(&self, state: &PuzzleState) -> u32 {
        match self {
            Heuristic::Trivial => 0,
            Heuristic::MisplacedTiles => misplaced_tiles(state),
            Heuristic::Manhattan => manhattan_distance(state),
            Heuristic::LinearConflict => manhattan_distance(state) + 2 * linear_conflicts(state),
        }
    }

    /// Key used in the results file and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Trivial => "H1: Trivial (h=0)",
            Heuristic::MisplacedTiles => "H2: Misplaced Tiles",
            Heuristic::Manhattan => "H3: Manhattan Distance",
            Heuristic::LinearConflict => "H4: Linear Conflict",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Heuristic::Trivial => "H1",
            Heuristic::MisplacedTiles => "H2",
            Heuristic::Manhattan => "H3",
            Heuristic::LinearConflict => "H4",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.name() == name)
    }
}

fn misplaced_tiles(state: &PuzzleState) -> u32 {
    state
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(i, &tile)| tile != 0 && tile as usize != i)
        .count() as u32
}

fn manhattan_distance(state: &PuzzleState) -> u32 {
    let mut distance = 0;
    for (i, &tile) in state.tiles().iter().enumerate() {
        if tile == 0 {
            continue;
        }
        let goal = tile as usize;
        distance += (i / SIZE).abs_diff(goal / SIZE) + (i % SIZE).abs_diff(goal % SIZE);
    }
    distance as u32
}

/// Reversed pairs, counted independently along every row and every column.
fn linear_conflicts(state: &PuzzleState) -> u32 {
    let tiles = state.tiles();
    let mut conflicts = 0;

    for line in 0..SIZE {
        for i in 0..SIZE {
            for j in i + 1..SIZE {
                // row `line`, columns i < j
                let (a, b) = (tiles[line * SIZE + i] as usize, tiles[line * SIZE + j] as usize);
                if a != 0 && b != 0 && a / SIZE == line && b / SIZE == line && a % SIZE > b % SIZE {
                    conflicts += 1;
                }

                // column `line`, rows i < j
                let (a, b) = (tiles[i * SIZE + line] as usize, tiles[j * SIZE + line] as usize);
                if a != 0 && b != 0 && a % SIZE == line && b % SIZE == line && a / SIZE > b / SIZE {
                    conflicts += 1;
                }
            }
        }
    }

    conflicts
}
