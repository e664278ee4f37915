//! tictac-relay - Two-player game sessions with live state broadcast
//!
//! This crate owns short-lived, turn-based game sessions (tic-tac-toe by
//! default) and pushes every committed state change to any number of
//! WebSocket observers, in commit order.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
