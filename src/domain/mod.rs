//! Domain layer - game sessions and their vocabulary.

pub mod foundation;
pub mod game;
pub mod session;
