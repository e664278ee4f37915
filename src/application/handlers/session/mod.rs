//! Session command and query handlers.
//!
//! Every command handler follows the same discipline: lock the session,
//! mutate, publish the resulting snapshot, then release the lock.

mod create_session;
mod get_session;
mod join_session;
mod make_move;
mod publish;
mod vote_restart;

pub use create_session::{CreateSessionCommand, CreateSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use join_session::{JoinSessionCommand, JoinSessionHandler};
pub use make_move::{MakeMoveCommand, MakeMoveHandler, MakeMoveResult};
pub use vote_restart::{VoteRestartCommand, VoteRestartHandler, VoteRestartResult};
