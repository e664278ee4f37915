//! Classic 3x3 tic-tac-toe.

use crate::domain::game::{Board, Mark, MoveOutcome, Position, Terminal};
use crate::ports::RulesEngine;

const SIZE: usize = 3;

/// Rows, columns, and both diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(2, 0), (1, 1), (0, 2)],
];

/// Three in a row wins; a full board without a line is a draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    fn has_line(board: &Board, mark: Mark) -> bool {
        LINES.iter().any(|line| {
            line.iter()
                .all(|&(x, y)| board.mark_at(Position::new(x, y)) == Some(mark))
        })
    }
}

impl RulesEngine for TicTacToe {
    fn initial_board(&self) -> Board {
        Board::empty(SIZE, SIZE)
    }

    fn legal_position(&self, board: &Board, position: Position) -> bool {
        board.is_vacant(position)
    }

    fn apply_move(&self, board: &Board, mark: Mark, position: Position) -> MoveOutcome {
        let board = board.with_mark(position, mark);
        let terminal = if Self::has_line(&board, mark) {
            Terminal::Win
        } else if board.is_full() {
            Terminal::Draw
        } else {
            Terminal::Continue
        };
        MoveOutcome { board, terminal }
    }
}
