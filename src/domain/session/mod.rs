//! Session domain module.
//!
//! Handles the game session lifecycle: creation by one participant,
//! join by a second, alternating moves until a win or draw, and
//! restart votes that start a fresh round.

mod aggregate;
mod errors;
mod roles;
mod snapshot;
mod status;

pub use aggregate::{RestartProgress, Session};
pub use errors::SessionError;
pub use roles::{MarkPolicy, RoleAssignment};
pub use snapshot::{RoleSnapshot, SessionSnapshot};
pub use status::{LifecycleStatus, Outcome};
