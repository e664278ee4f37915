//! Lifecycle status and outcome of a game session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ParticipantId;

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    /// Waiting for the second participant.
    #[default]
    Waiting,
    /// Both participants present, moves accepted.
    Active,
    /// A terminal condition was reached.
    Finished,
}

impl LifecycleStatus {
    /// Returns true if moves can be played.
    pub fn accepts_moves(&self) -> bool {
        matches!(self, LifecycleStatus::Active)
    }

    /// Validates a transition from this status to another.
    ///
    /// Valid transitions:
    /// - Waiting -> Active (second participant joins)
    /// - Active -> Finished (win or draw)
    /// - Active -> Active, Finished -> Active (round reset)
    pub fn can_transition_to(&self, target: &LifecycleStatus) -> bool {
        use LifecycleStatus::*;
        matches!(
            (self, target),
            (Waiting, Active) | (Active, Finished) | (Active, Active) | (Finished, Active)
        )
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleStatus::Waiting => "waiting",
            LifecycleStatus::Active => "active",
            LifecycleStatus::Finished => "finished",
        };
        write!(f, "{}", s)
    }
}

/// How a round ended, if it has.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Undecided,
    Winner(ParticipantId),
    Draw,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }

    pub fn winner(&self) -> Option<&ParticipantId> {
        match self {
            Outcome::Winner(p) => Some(p),
            _ => None,
        }
    }
}
