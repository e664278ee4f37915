//! Game module - board vocabulary exchanged with rules engines.
//!
//! The session core treats the board as opaque state owned by a
//! [`RulesEngine`](crate::ports::RulesEngine); these types are the
//! serializable surface of that state.

mod board;

pub use board::{Board, Mark, MoveOutcome, Position, Terminal};
