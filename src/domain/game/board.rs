//! Grid value types shared between sessions and rules engines.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One of the two interchangeable roles a participant can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// Marker as rendered on the board.
    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    /// The opposing role.
    pub fn other(&self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    fn from_symbol(s: &str) -> Option<Option<Mark>> {
        match s {
            "X" => Some(Some(Mark::X)),
            "O" => Some(Some(Mark::O)),
            "" => Some(None),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell address: `x` selects the row, `y` the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular grid of optional marks.
///
/// Serializes as rows of `"X"`, `"O"` or `""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Vec<Option<Mark>>>,
}

impl Board {
    /// An empty `rows` x `cols` grid.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            cells: vec![vec![None; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// True if `position` addresses a cell of this grid.
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.rows() && position.y < self.cols()
    }

    /// Mark at `position`; `None` for empty or out-of-range cells.
    pub fn mark_at(&self, position: Position) -> Option<Mark> {
        self.cells
            .get(position.x)
            .and_then(|row| row.get(position.y))
            .copied()
            .flatten()
    }

    /// True if `position` is inside the grid and unoccupied.
    pub fn is_vacant(&self, position: Position) -> bool {
        self.contains(position) && self.mark_at(position).is_none()
    }

    /// Copy of this board with `mark` placed at `position`.
    ///
    /// Out-of-range positions leave the copy unchanged.
    pub fn with_mark(&self, position: Position, mark: Mark) -> Board {
        let mut next = self.clone();
        if let Some(cell) = next
            .cells
            .get_mut(position.x)
            .and_then(|row| row.get_mut(position.y))
        {
            *cell = Some(mark);
        }
        next
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(Option::is_some)
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Rendered grid as it appears on the wire.
    pub fn to_symbols(&self) -> Vec<Vec<&'static str>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.map(|m| m.symbol()).unwrap_or("")).collect())
            .collect()
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_symbols().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<Vec<String>> = Vec::deserialize(deserializer)?;
        let cells = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|s| {
                        Mark::from_symbol(s)
                            .ok_or_else(|| D::Error::custom(format!("unknown board marker '{}'", s)))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Board { cells })
    }
}

/// Terminal condition reported by a rules engine after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Continue,
    Win,
    Draw,
}

/// Result of applying one move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub board: Board,
    pub terminal: Terminal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_is_vacant_everywhere() {
        let board = Board::empty(3, 3);
        assert_eq!(board.rows(), 3);
        assert_eq!(board.cols(), 3);
        assert!(board.is_vacant(Position::new(2, 2)));
        assert!(!board.is_vacant(Position::new(3, 0)));
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn with_mark_leaves_original_untouched() {
        let board = Board::empty(3, 3);
        let next = board.with_mark(Position::new(0, 1), Mark::O);
        assert_eq!(board.mark_at(Position::new(0, 1)), None);
        assert_eq!(next.mark_at(Position::new(0, 1)), Some(Mark::O));
    }

    #[test]
    fn serializes_rows_of_symbols() {
        let board = Board::empty(2, 2).with_mark(Position::new(1, 0), Mark::X);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json, serde_json::json!([["", ""], ["X", ""]]));

        let back: Board = serde_json::from_value(json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn rejects_unknown_marker() {
        let result: Result<Board, _> = serde_json::from_str(r#"[["Z"]]"#);
        assert!(result.is_err());
    }

    #[test]
    fn mark_other_flips() {
        assert_eq!(Mark::X.other(), Mark::O);
        assert_eq!(Mark::O.other(), Mark::X);
    }
}
