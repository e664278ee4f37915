//! RulesEngine port - game rules as a pluggable capability.
//!
//! The session core never inspects the board itself. It asks the engine
//! whether a position is legal, hands it the mover's mark, and reacts to
//! the terminal condition the engine reports.

use crate::domain::game::{Board, Mark, MoveOutcome, Position};

/// Port for a two-role, turn-based grid game.
///
/// Implementations must be pure: the same inputs always yield the same
/// outputs, and the input board is never modified.
pub trait RulesEngine: Send + Sync {
    /// Board every round starts from.
    fn initial_board(&self) -> Board;

    /// True if a mark may be placed at `position` on `board`.
    fn legal_position(&self, board: &Board, position: Position) -> bool;

    /// Place `mark` at `position` and report whether the game ended.
    ///
    /// Only called after `legal_position` returned true.
    fn apply_move(&self, board: &Board, mark: Mark, position: Position) -> MoveOutcome;
}
