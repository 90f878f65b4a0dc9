use crate::error::PuzzleError;
use std::fmt;
use std::str::FromStr;

pub const SIZE: usize = 3;
pub const CELLS: usize = SIZE * SIZE;

/// Blank in the top-left corner, every other tile on the cell matching its value.
pub const GOAL_TILES: [u8; CELLS] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Direction the blank travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// Neighbor generation order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (-1, 0),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Move::Up => Move::Down,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Right => Move::Left,
        }
    }

    /// The move that turns `from` into `to`, if they are one step apart.
    pub fn between(from: &PuzzleState, to: &PuzzleState) -> Option<Move> {
        Move::ALL
            .into_iter()
            .find(|&dir| from.apply_move(dir).as_ref() == Some(to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// An 8-puzzle configuration. Values are immutable: every move yields a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PuzzleState {
    tiles: [u8; CELLS],
    blank: u8,
}

impl PuzzleState {
    pub fn goal() -> Self {
        Self {
            tiles: GOAL_TILES,
            blank: 0,
        }
    }

    /// Validates that `tiles` is a permutation of `0..9`.
    pub fn new(tiles: [u8; CELLS]) -> Result<Self, PuzzleError> {
        let mut seen = [false; CELLS];
        for &tile in &tiles {
            let idx = tile as usize;
            if idx >= CELLS {
                return Err(PuzzleError::TileOutOfRange(tile));
            }
            if seen[idx] {
                return Err(PuzzleError::DuplicateTile(tile));
            }
            seen[idx] = true;
        }

        Ok(Self::from_permutation(tiles))
    }

    /// Caller guarantees `tiles` is a permutation.
    pub(crate) fn from_permutation(tiles: [u8; CELLS]) -> Self {
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or(0) as u8;
        Self { tiles, blank }
    }

    pub fn from_slice(tiles: &[u8]) -> Result<Self, PuzzleError> {
        let tiles: [u8; CELLS] = tiles
            .try_into()
            .map_err(|_| PuzzleError::WrongTileCount(tiles.len()))?;
        Self::new(tiles)
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.tiles
    }

    pub fn blank_index(&self) -> usize {
        self.blank as usize
    }

    pub fn is_goal(&self) -> bool {
        self.tiles == GOAL_TILES
    }

    pub fn apply_move(&self, movement: Move) -> Option<Self> {
        let (dr, dc) = movement.as_offset();
        let row = (self.blank as usize / SIZE) as isize + dr;
        let col = (self.blank as usize % SIZE) as isize + dc;

        if row < 0 || row >= SIZE as isize || col < 0 || col >= SIZE as isize {
            return None;
        }

        let target = row as usize * SIZE + col as usize;
        let mut tiles = self.tiles;
        tiles.swap(self.blank as usize, target);

        Some(Self {
            tiles,
            blank: target as u8,
        })
    }

    /// Successors in up, down, left, right order, skipping moves off the grid.
    pub fn neighbors(&self) -> Vec<Self> {
        Move::ALL
            .iter()
            .filter_map(|&dir| self.apply_move(dir))
            .collect()
    }

    /// Pairs of non-blank tiles whose relative order disagrees with the goal.
    pub fn inversion_count(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                self.tiles[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    /// Odd grid width, so parity of inversions alone decides reachability.
    pub fn is_solvable(&self) -> bool {
        self.inversion_count() % 2 == 0
    }
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self::goal()
    }
}

impl TryFrom<[u8; CELLS]> for PuzzleState {
    type Error = PuzzleError;

    fn try_from(tiles: [u8; CELLS]) -> Result<Self, Self::Error> {
        Self::new(tiles)
    }
}

/// Accepts either separated values (`1,0,2,...`, spaces allowed) or nine
/// bare digits (`102345678`).
impl FromStr for PuzzleState {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let tokens: Vec<&str> = if s.contains(|c: char| c == ',' || c.is_whitespace()) {
            s.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            s.char_indices()
                .map(|(i, c)| &s[i..i + c.len_utf8()])
                .collect()
        };

        let tiles = tokens
            .iter()
            .map(|t| {
                t.parse::<u8>()
                    .map_err(|_| PuzzleError::InvalidToken(t.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        Self::from_slice(&tiles)
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.chunks(SIZE) {
            for &val in row {
                if val == 0 {
                    write!(f, " _ ")?;
                } else {
                    write!(f, "{:2} ", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Renders a solution path step by step.
pub fn format_solution(path: &[PuzzleState]) -> String {
    let mut out = String::new();
    for (i, state) in path.iter().enumerate() {
        out.push_str(&format!("Step {}:\n{}\n", i, state));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(tiles: [u8; CELLS]) -> PuzzleState {
        PuzzleState::new(tiles).unwrap()
    }

    #[test]
    fn goal_is_goal() {
        assert!(PuzzleState::goal().is_goal());
        assert_eq!(PuzzleState::goal().blank_index(), 0);
        assert!(!state([1, 0, 2, 3, 4, 5, 6, 7, 8]).is_goal());
    }

    #[test]
    fn rejects_non_permutations() {
        assert_eq!(
            PuzzleState::new([0, 1, 2, 3, 4, 5, 6, 7, 9]),
            Err(PuzzleError::TileOutOfRange(9))
        );
        assert_eq!(
            PuzzleState::new([0, 1, 2, 3, 4, 5, 6, 7, 7]),
            Err(PuzzleError::DuplicateTile(7))
        );
        assert_eq!(
            PuzzleState::from_slice(&[0, 1, 2]),
            Err(PuzzleError::WrongTileCount(3))
        );
    }

    #[test]
    fn parses_both_text_forms() {
        let expected = state([1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!("1,0,2,3,4,5,6,7,8".parse::<PuzzleState>(), Ok(expected));
        assert_eq!("1 0 2 3 4 5 6 7 8".parse::<PuzzleState>(), Ok(expected));
        assert_eq!("102345678".parse::<PuzzleState>(), Ok(expected));
        assert_eq!(
            "1,x,2,3,4,5,6,7,8".parse::<PuzzleState>(),
            Err(PuzzleError::InvalidToken("x".to_string()))
        );
    }

    #[test]
    fn neighbor_counts_follow_blank_position() {
        // corner, edge, center
        assert_eq!(PuzzleState::goal().neighbors().len(), 2);
        assert_eq!(state([1, 0, 2, 3, 4, 5, 6, 7, 8]).neighbors().len(), 3);
        assert_eq!(state([1, 2, 3, 4, 0, 5, 6, 7, 8]).neighbors().len(), 4);
    }

    #[test]
    fn neighbors_are_ordered_up_down_left_right() {
        let center = state([1, 2, 3, 4, 0, 5, 6, 7, 8]);
        let blanks: Vec<usize> = center.neighbors().iter().map(|s| s.blank_index()).collect();
        assert_eq!(blanks, vec![1, 7, 3, 5]);
    }

    #[test]
    fn every_state_has_two_to_four_neighbors() {
        let mut frontier = vec![PuzzleState::goal()];
        for _ in 0..6 {
            frontier = frontier.iter().flat_map(|s| s.neighbors()).collect();
        }
        for s in &frontier {
            assert!((2..=4).contains(&s.neighbors().len()));
        }
    }

    #[test]
    fn moves_preserve_solvability() {
        let mut frontier = vec![state([1, 2, 5, 3, 4, 0, 6, 7, 8])];
        assert!(frontier[0].is_solvable());
        for _ in 0..5 {
            frontier = frontier.iter().flat_map(|s| s.neighbors()).collect();
            assert!(frontier.iter().all(|s| s.is_solvable()));
        }
    }

    #[test]
    fn inversion_parity_decides_solvability() {
        assert_eq!(PuzzleState::goal().inversion_count(), 0);
        let swapped = state([1, 2, 3, 4, 5, 6, 8, 7, 0]);
        assert_eq!(swapped.inversion_count(), 1);
        assert!(!swapped.is_solvable());
        assert!(state([1, 0, 2, 3, 4, 5, 6, 7, 8]).is_solvable());
    }

    #[test]
    fn move_between_neighbors() {
        let start = state([1, 0, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(Move::between(&start, &PuzzleState::goal()), Some(Move::Left));
        assert_eq!(Move::between(&PuzzleState::goal(), &start), Some(Move::Right));
        assert_eq!(Move::between(&start, &start), None);
        assert_eq!(Move::Left.opposite(), Move::Right);
    }

    #[test]
    fn displays_as_grid() {
        let shown = PuzzleState::goal().to_string();
        assert_eq!(shown, " _  1  2 \n 3  4  5 \n 6  7  8 \n");
        assert!(format_solution(&[PuzzleState::goal()]).starts_with("Step 0:\n"));
    }
}
