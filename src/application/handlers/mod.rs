//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod session;

pub use session::{
    CreateSessionCommand, CreateSessionHandler, GetSessionHandler, GetSessionQuery,
    JoinSessionCommand, JoinSessionHandler, MakeMoveCommand, MakeMoveHandler, MakeMoveResult,
    VoteRestartCommand, VoteRestartHandler, VoteRestartResult,
};
